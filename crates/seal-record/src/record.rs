use chrono::{DateTime, Utc};

/// Field separator used by the serialized proof format.
pub const SEPARATOR: char = ',';

/// Canonical evidence field names, in serialization order.
///
/// The order is fixed for the lifetime of the format: every row appended to
/// a proof file must line up under the header that was written with the
/// first row, regardless of which optional evidence was available.
pub const FIELD_NAMES: [&str; 30] = [
    "File Path",
    "File Hash SHA256",
    "File Modified",
    "Proof Generated",
    "DeviceID",
    "Wifi MAC",
    "IPv4",
    "IPv6",
    "DataType",
    "Network",
    "NetworkType",
    "Hardware",
    "Manufacturer",
    "ScreenSize",
    "Language",
    "Locale",
    "Location.Latitude",
    "Location.Longitude",
    "Location.Provider",
    "Location.Accuracy",
    "Location.Altitude",
    "Location.Bearing",
    "Location.Speed",
    "Location.Time",
    "CellInfo",
    "Integrity.Result",
    "Integrity.BasicIntegrity",
    "Integrity.CtsMatch",
    "Integrity.Timestamp",
    "Notes",
];

/// The eight location fields. Always fully populated or fully empty,
/// never partial, so rows stay columnar whether or not a fix was
/// available.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationGroup {
    pub latitude: String,
    pub longitude: String,
    pub provider: String,
    pub accuracy: String,
    pub altitude: String,
    pub bearing: String,
    pub speed: String,
    pub time: String,
}

impl LocationGroup {
    /// The empty group emitted when location is disabled or no fix could
    /// be obtained. The provider column reads `"none"`.
    pub fn unavailable() -> Self {
        Self {
            latitude: String::new(),
            longitude: String::new(),
            provider: "none".to_string(),
            accuracy: String::new(),
            altitude: String::new(),
            bearing: String::new(),
            speed: String::new(),
            time: String::new(),
        }
    }
}

impl Default for LocationGroup {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// The four platform-integrity fields. Populated only when a notarization
/// provider returned attestation metadata; otherwise all empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntegrityGroup {
    pub result: String,
    pub basic_integrity: String,
    pub cts_match: String,
    pub timestamp: String,
}

impl IntegrityGroup {
    /// Build a fully populated group from attestation results.
    pub fn attested(
        result: impl Into<String>,
        basic_integrity: bool,
        cts_match: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            result: result.into(),
            basic_integrity: basic_integrity.to_string(),
            cts_match: cts_match.to_string(),
            timestamp: timestamp.to_rfc3339(),
        }
    }

    /// `true` when no attestation evidence is present.
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

/// One ordered evidence record: the unit appended to a proof file.
///
/// Construction goes through [`RecordBuilder`](crate::builder::RecordBuilder);
/// serialization through [`header`](Self::header) and [`row`](Self::row).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvidenceRecord {
    pub file_path: String,
    pub file_hash: String,
    pub file_modified: String,
    pub proof_generated: String,
    pub device_id: String,
    pub wifi_mac: String,
    pub ipv4: String,
    pub ipv6: String,
    pub data_type: String,
    pub network: String,
    pub network_type: String,
    pub hardware: String,
    pub manufacturer: String,
    pub screen_size: String,
    pub language: String,
    pub locale: String,
    pub location: LocationGroup,
    pub cell_info: String,
    pub integrity: IntegrityGroup,
    pub notes: String,
}

impl EvidenceRecord {
    /// Ordered (name, value) pairs. The order matches [`FIELD_NAMES`]
    /// exactly and never depends on any map iteration.
    pub fn fields(&self) -> [(&'static str, &str); 30] {
        [
            ("File Path", &self.file_path),
            ("File Hash SHA256", &self.file_hash),
            ("File Modified", &self.file_modified),
            ("Proof Generated", &self.proof_generated),
            ("DeviceID", &self.device_id),
            ("Wifi MAC", &self.wifi_mac),
            ("IPv4", &self.ipv4),
            ("IPv6", &self.ipv6),
            ("DataType", &self.data_type),
            ("Network", &self.network),
            ("NetworkType", &self.network_type),
            ("Hardware", &self.hardware),
            ("Manufacturer", &self.manufacturer),
            ("ScreenSize", &self.screen_size),
            ("Language", &self.language),
            ("Locale", &self.locale),
            ("Location.Latitude", &self.location.latitude),
            ("Location.Longitude", &self.location.longitude),
            ("Location.Provider", &self.location.provider),
            ("Location.Accuracy", &self.location.accuracy),
            ("Location.Altitude", &self.location.altitude),
            ("Location.Bearing", &self.location.bearing),
            ("Location.Speed", &self.location.speed),
            ("Location.Time", &self.location.time),
            ("CellInfo", &self.cell_info),
            ("Integrity.Result", &self.integrity.result),
            ("Integrity.BasicIntegrity", &self.integrity.basic_integrity),
            ("Integrity.CtsMatch", &self.integrity.cts_match),
            ("Integrity.Timestamp", &self.integrity.timestamp),
            ("Notes", &self.notes),
        ]
    }

    /// The header row: field names joined by the separator. Written only
    /// once per proof file, when the file does not yet exist.
    pub fn header() -> String {
        let sep = SEPARATOR.to_string();
        FIELD_NAMES.join(sep.as_str())
    }

    /// One serialized value row. Values are sanitized so the column count
    /// stays constant: the separator and line breaks become spaces.
    pub fn row(&self) -> String {
        let sep = SEPARATOR.to_string();
        self.fields()
            .iter()
            .map(|(_, value)| sanitize(value))
            .collect::<Vec<_>>()
            .join(sep.as_str())
    }
}

fn sanitize(value: &str) -> String {
    value.replace([SEPARATOR, '\n', '\r'], " ")
}
