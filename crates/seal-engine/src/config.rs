use std::time::Duration;

use serde::{Deserialize, Serialize};

use seal_record::{EvidenceOptions, LocationPolicy};

/// Configuration for the proof engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Which optional evidence to include in records.
    pub evidence: EvidenceOptions,
    /// Whether to launch notarization after the baseline proof. Whether
    /// notarization *should* occur is policy decided outside this core;
    /// this flag only carries the decision.
    pub auto_notarize: bool,
    /// Wait after a capture event before processing, so a file still being
    /// written has settled.
    pub quiescence_delay: Duration,
    /// Retry policy for location capture.
    pub location_policy: LocationPolicy,
    /// File names ignored by intake (noise written by capture apps).
    pub ignore_names: Vec<String>,
    /// Capacity of the intake worker queue.
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            evidence: EvidenceOptions::default(),
            auto_notarize: true,
            quiescence_delay: Duration::from_secs(30),
            location_policy: LocationPolicy::default(),
            ignore_names: vec![".probe".to_string()],
            channel_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = EngineConfig::default();
        assert!(c.auto_notarize);
        assert_eq!(c.quiescence_delay, Duration::from_secs(30));
        assert_eq!(c.ignore_names, vec![".probe".to_string()]);
        assert_eq!(c.location_policy.attempts, 3);
        assert_eq!(c.channel_capacity, 1024);
    }
}
