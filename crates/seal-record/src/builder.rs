use std::fs;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use seal_types::{ContentDigest, MediaSource};

use crate::evidence::{DeviceInfoProvider, LocationFix, LocationProvider, NetworkInfoProvider};
use crate::record::{EvidenceRecord, IntegrityGroup, LocationGroup};

/// Retry policy applied when location capture is requested but no fix is
/// immediately available: poll up to `attempts` more times, sleeping
/// `backoff` between polls, then give up and emit the empty group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for LocationPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Which optional evidence the record should carry.
///
/// These are policy flags supplied externally (preference management is out
/// of scope); the builder only honors them.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct EvidenceOptions {
    /// Include device identifiers (`DeviceID`, `Wifi MAC`).
    pub show_device_ids: bool,
    /// Capture a location fix for the location group.
    pub show_location: bool,
    /// Include mobile-cell details (`CellInfo`), only meaningful together
    /// with `show_location`.
    pub show_mobile_network: bool,
}

/// Assembles [`EvidenceRecord`]s from the evidence-provider seams.
///
/// Deterministic given identical inputs except for the proof-generation
/// timestamp. Every evidence-collection failure degrades to an empty
/// field; nothing here can abort a proof.
pub struct RecordBuilder {
    device: Arc<dyn DeviceInfoProvider>,
    network: Arc<dyn NetworkInfoProvider>,
    location: Arc<dyn LocationProvider>,
    policy: LocationPolicy,
    notes: String,
}

impl RecordBuilder {
    /// Create a builder over the given evidence providers.
    pub fn new(
        device: Arc<dyn DeviceInfoProvider>,
        network: Arc<dyn NetworkInfoProvider>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        Self {
            device,
            network,
            location,
            policy: LocationPolicy::default(),
            notes: String::new(),
        }
    }

    /// Override the location retry policy.
    pub fn with_policy(mut self, policy: LocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Free-text note carried in every record (e.g. engine name/version).
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Assemble one evidence record.
    ///
    /// Blocking: the location retry loop sleeps between polls. Callers on
    /// an async runtime run this inside `spawn_blocking`.
    pub fn build(
        &self,
        source: &MediaSource,
        digest: &ContentDigest,
        opts: &EvidenceOptions,
        integrity: Option<IntegrityGroup>,
    ) -> EvidenceRecord {
        let (device_id, wifi_mac) = if opts.show_device_ids {
            (self.device.device_id(), self.device.wifi_mac())
        } else {
            (String::new(), String::new())
        };

        let location = if opts.show_location {
            self.poll_location()
        } else {
            LocationGroup::unavailable()
        };

        let cell_info = if opts.show_location && opts.show_mobile_network {
            self.network.cell_info()
        } else {
            "none".to_string()
        };

        EvidenceRecord {
            file_path: source.to_string(),
            file_hash: digest.to_hex(),
            file_modified: modified_time(source),
            proof_generated: Utc::now().to_rfc3339(),
            device_id,
            wifi_mac,
            ipv4: self.network.ipv4(),
            ipv6: self.network.ipv6(),
            data_type: self.network.data_type(),
            network: self.network.network(),
            network_type: self.network.network_type(),
            hardware: self.device.hardware(),
            manufacturer: self.device.manufacturer(),
            screen_size: self.device.screen_size(),
            language: self.device.language(),
            locale: self.device.locale(),
            location,
            cell_info,
            integrity: integrity.unwrap_or_default(),
            notes: self.notes.clone(),
        }
    }

    fn poll_location(&self) -> LocationGroup {
        if !self.location.can_locate() {
            return LocationGroup::unavailable();
        }

        let mut fix = self.location.current_fix();
        let mut attempt = 0;
        while fix.is_none() && attempt < self.policy.attempts {
            attempt += 1;
            std::thread::sleep(self.policy.backoff);
            fix = self.location.current_fix();
        }

        match fix {
            Some(fix) => location_group(&fix),
            None => {
                debug!(
                    attempts = self.policy.attempts,
                    "no location fix after retries"
                );
                LocationGroup::unavailable()
            }
        }
    }
}

fn location_group(fix: &LocationFix) -> LocationGroup {
    LocationGroup {
        latitude: fix.latitude.to_string(),
        longitude: fix.longitude.to_string(),
        provider: fix.provider.clone(),
        accuracy: fix.accuracy.to_string(),
        altitude: fix.altitude.to_string(),
        bearing: fix.bearing.to_string(),
        speed: fix.speed.to_string(),
        time: fix.time.to_string(),
    }
}

fn modified_time(source: &MediaSource) -> String {
    fs::metadata(source.path())
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::evidence::{NoDeviceInfo, NoLocation, NoNetworkInfo};
    use crate::record::{FIELD_NAMES, SEPARATOR};

    fn digest() -> ContentDigest {
        ContentDigest::from_hash([0xab; 32])
    }

    fn headless_builder() -> RecordBuilder {
        RecordBuilder::new(
            Arc::new(NoDeviceInfo),
            Arc::new(NoNetworkInfo),
            Arc::new(NoLocation),
        )
    }

    /// Location provider that yields a fix only after `ready_after` polls.
    struct CountingLocation {
        polls: AtomicU32,
        ready_after: u32,
    }

    impl CountingLocation {
        fn never() -> Self {
            Self {
                polls: AtomicU32::new(0),
                ready_after: u32::MAX,
            }
        }

        fn after(polls: u32) -> Self {
            Self {
                polls: AtomicU32::new(0),
                ready_after: polls,
            }
        }
    }

    impl LocationProvider for CountingLocation {
        fn can_locate(&self) -> bool {
            true
        }

        fn current_fix(&self) -> Option<LocationFix> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            if n > self.ready_after {
                Some(LocationFix {
                    latitude: 48.8584,
                    longitude: 2.2945,
                    provider: "gps".to_string(),
                    accuracy: 3.5,
                    altitude: 35.0,
                    bearing: 90.0,
                    speed: 0.0,
                    time: 1_700_000_000_000,
                })
            } else {
                None
            }
        }
    }

    fn zero_backoff() -> LocationPolicy {
        LocationPolicy {
            attempts: 3,
            backoff: Duration::ZERO,
        }
    }

    #[test]
    fn location_disabled_yields_empty_group() {
        let source = MediaSource::new("/media/a.jpg");
        let record = headless_builder().build(
            &source,
            &digest(),
            &EvidenceOptions::default(),
            None,
        );

        assert_eq!(record.location, LocationGroup::unavailable());
        assert_eq!(record.cell_info, "none");
        assert_eq!(record.row().split(SEPARATOR).count(), FIELD_NAMES.len());
    }

    #[test]
    fn location_unavailable_after_retries() {
        let location = Arc::new(CountingLocation::never());
        let builder = RecordBuilder::new(
            Arc::new(NoDeviceInfo),
            Arc::new(NoNetworkInfo),
            location.clone(),
        )
        .with_policy(zero_backoff());

        let opts = EvidenceOptions {
            show_location: true,
            ..Default::default()
        };
        let record = builder.build(&MediaSource::new("/m"), &digest(), &opts, None);

        assert_eq!(record.location, LocationGroup::unavailable());
        // One initial poll plus three retries.
        assert_eq!(location.polls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn fix_found_on_retry_populates_group() {
        let location = Arc::new(CountingLocation::after(2));
        let builder = RecordBuilder::new(
            Arc::new(NoDeviceInfo),
            Arc::new(NoNetworkInfo),
            location,
        )
        .with_policy(zero_backoff());

        let opts = EvidenceOptions {
            show_location: true,
            ..Default::default()
        };
        let record = builder.build(&MediaSource::new("/m"), &digest(), &opts, None);

        assert_eq!(record.location.provider, "gps");
        assert_eq!(record.location.latitude, "48.8584");
        assert_eq!(record.location.time, "1700000000000");
    }

    #[test]
    fn device_ids_gated_by_option() {
        struct FakeDevice;
        impl DeviceInfoProvider for FakeDevice {
            fn device_id(&self) -> String {
                "dev-42".to_string()
            }
            fn wifi_mac(&self) -> String {
                "aa:bb:cc".to_string()
            }
            fn hardware(&self) -> String {
                "unit".to_string()
            }
            fn manufacturer(&self) -> String {
                "acme".to_string()
            }
            fn screen_size(&self) -> String {
                String::new()
            }
            fn language(&self) -> String {
                String::new()
            }
            fn locale(&self) -> String {
                String::new()
            }
        }

        let builder = RecordBuilder::new(
            Arc::new(FakeDevice),
            Arc::new(NoNetworkInfo),
            Arc::new(NoLocation),
        );
        let source = MediaSource::new("/m");

        let hidden = builder.build(&source, &digest(), &EvidenceOptions::default(), None);
        assert!(hidden.device_id.is_empty());
        assert!(hidden.wifi_mac.is_empty());
        // Hardware context is not gated, only identifiers are.
        assert_eq!(hidden.hardware, "unit");

        let opts = EvidenceOptions {
            show_device_ids: true,
            ..Default::default()
        };
        let shown = builder.build(&source, &digest(), &opts, None);
        assert_eq!(shown.device_id, "dev-42");
        assert_eq!(shown.wifi_mac, "aa:bb:cc");
    }

    #[test]
    fn integrity_evidence_flows_into_record() {
        let group = IntegrityGroup::attested("pkg=f00d", true, true, Utc::now());
        let record = headless_builder().build(
            &MediaSource::new("/m"),
            &digest(),
            &EvidenceOptions::default(),
            Some(group.clone()),
        );
        assert_eq!(record.integrity, group);
    }

    #[test]
    fn modified_time_read_from_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"x").unwrap();
        drop(file);

        let record = headless_builder().build(
            &MediaSource::new(&path),
            &digest(),
            &EvidenceOptions::default(),
            None,
        );
        assert!(!record.file_modified.is_empty());

        let gone = headless_builder().build(
            &MediaSource::new(dir.path().join("missing.mp4")),
            &digest(),
            &EvidenceOptions::default(),
            None,
        );
        assert!(gone.file_modified.is_empty());
    }

    #[test]
    fn notes_carried_in_every_record() {
        let builder = headless_builder().with_notes("seal v0.1.0");
        let record = builder.build(
            &MediaSource::new("/m"),
            &digest(),
            &EvidenceOptions::default(),
            None,
        );
        assert_eq!(record.notes, "seal v0.1.0");
    }

    #[test]
    fn digest_and_path_recorded() {
        let d = digest();
        let record = headless_builder().build(
            &MediaSource::new("/media/img.jpg"),
            &d,
            &EvidenceOptions::default(),
            None,
        );
        assert_eq!(record.file_hash, d.to_hex());
        assert_eq!(record.file_path, "/media/img.jpg");
        assert!(!record.proof_generated.is_empty());
    }
}
