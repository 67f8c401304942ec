use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Short tag identifying a notarization provider.
///
/// The tag doubles as the file-name suffix for the provider's raw receipt
/// (`<digest>.<tag>` inside the digest directory), so it must be safe to
/// embed in a file name: non-empty ASCII alphanumeric, `-` and `_` allowed.
/// `proof` and `sig` are reserved for the record and signature files that
/// share the directory.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderTag(String);

/// Suffixes already claimed by non-receipt files in a digest directory.
const RESERVED_TAGS: [&str; 2] = ["proof", "sig"];

impl ProviderTag {
    /// Create a validated provider tag.
    pub fn new(tag: impl Into<String>) -> Result<Self, TypeError> {
        let tag = tag.into();
        let valid = !tag.is_empty()
            && !RESERVED_TAGS.contains(&tag.as_str())
            && tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(TypeError::InvalidProviderTag(tag));
        }
        Ok(Self(tag))
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderTag({})", self.0)
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
