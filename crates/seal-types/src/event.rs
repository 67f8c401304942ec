use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of file-system change that triggers proof generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureEventKind {
    /// A file opened for writing was closed.
    CloseWrite,
    /// A file was moved into the watched tree.
    MovedTo,
}

impl fmt::Display for CaptureEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CloseWrite => write!(f, "CloseWrite"),
            Self::MovedTo => write!(f, "MovedTo"),
        }
    }
}

/// A raw change notification from the external event source.
///
/// The intake debouncer consumes these, filters noise, and forwards stable
/// paths to the processing pipeline once the quiescence delay elapses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// Path the event refers to.
    pub path: PathBuf,
    /// What happened to the path.
    pub kind: CaptureEventKind,
}

impl CaptureEvent {
    /// Create a new capture event.
    pub fn new(path: impl Into<PathBuf>, kind: CaptureEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", CaptureEventKind::CloseWrite), "CloseWrite");
        assert_eq!(format!("{}", CaptureEventKind::MovedTo), "MovedTo");
    }

    #[test]
    fn serde_roundtrip() {
        let event = CaptureEvent::new("/media/img_001.jpg", CaptureEventKind::CloseWrite);
        let json = serde_json::to_string(&event).unwrap();
        let parsed: CaptureEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
