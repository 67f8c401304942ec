/// A single location fix from the platform location service.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Name of the source that produced the fix (e.g. `"gps"`).
    pub provider: String,
    /// Estimated accuracy in meters.
    pub accuracy: f64,
    /// Altitude in meters above the reference ellipsoid.
    pub altitude: f64,
    /// Bearing in degrees.
    pub bearing: f64,
    /// Ground speed in meters per second.
    pub speed: f64,
    /// Fix time as epoch milliseconds.
    pub time: i64,
}

/// Synchronous getters for device identity and hardware context.
///
/// Implementations must not fail: anything unavailable is returned as an
/// empty string, never an error that could abort the proof.
pub trait DeviceInfoProvider: Send + Sync {
    fn device_id(&self) -> String;
    fn wifi_mac(&self) -> String;
    fn hardware(&self) -> String;
    fn manufacturer(&self) -> String;
    fn screen_size(&self) -> String;
    fn language(&self) -> String;
    fn locale(&self) -> String;
}

/// Synchronous getters for network context. Same degradation contract as
/// [`DeviceInfoProvider`]: unavailable values are empty strings.
pub trait NetworkInfoProvider: Send + Sync {
    fn ipv4(&self) -> String;
    fn ipv6(&self) -> String;
    fn data_type(&self) -> String;
    fn network(&self) -> String;
    fn network_type(&self) -> String;
    fn cell_info(&self) -> String;
}

/// Source of location fixes.
pub trait LocationProvider: Send + Sync {
    /// Whether location capture is possible at all (hardware, permissions).
    /// When `false` the builder skips polling entirely.
    fn can_locate(&self) -> bool;

    /// The current fix, or `None` if one is not yet available.
    fn current_fix(&self) -> Option<LocationFix>;
}

/// Device provider for headless use: every field is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDeviceInfo;

impl DeviceInfoProvider for NoDeviceInfo {
    fn device_id(&self) -> String {
        String::new()
    }
    fn wifi_mac(&self) -> String {
        String::new()
    }
    fn hardware(&self) -> String {
        String::new()
    }
    fn manufacturer(&self) -> String {
        String::new()
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

/// Network provider for headless use: every field is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNetworkInfo;

impl NetworkInfoProvider for NoNetworkInfo {
    fn ipv4(&self) -> String {
        String::new()
    }
    fn ipv6(&self) -> String {
        String::new()
    }
    fn data_type(&self) -> String {
        String::new()
    }
    fn network(&self) -> String {
        String::new()
    }
    fn network_type(&self) -> String {
        String::new()
    }
    fn cell_info(&self) -> String {
        String::new()
    }
}

/// Location provider that can never produce a fix.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn can_locate(&self) -> bool {
        false
    }

    fn current_fix(&self) -> Option<LocationFix> {
        None
    }
}
