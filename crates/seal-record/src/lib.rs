//! Proof record construction.
//!
//! An [`EvidenceRecord`] is an ordered mapping of evidence field names to
//! string values with a fixed field set and order, so that rows appended to
//! the same proof file over time stay columnar. The [`RecordBuilder`]
//! assembles records from evidence-provider seams, applying the location
//! retry policy and degrading every collection failure to an empty field.

pub mod builder;
pub mod evidence;
pub mod record;

pub use builder::{EvidenceOptions, LocationPolicy, RecordBuilder};
pub use evidence::{
    DeviceInfoProvider, LocationFix, LocationProvider, NetworkInfoProvider, NoDeviceInfo,
    NoLocation, NoNetworkInfo,
};
pub use record::{EvidenceRecord, IntegrityGroup, LocationGroup, FIELD_NAMES, SEPARATOR};
