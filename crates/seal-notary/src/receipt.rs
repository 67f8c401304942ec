use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seal_types::ProviderTag;

use crate::error::DecodeError;

/// Platform-integrity attestation carried by providers that return more
/// than a timestamp (e.g. a device-integrity verdict).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttestationEvidence {
    /// Provider-specific attestation summary (e.g. `package=digest`).
    pub result: String,
    /// Whether the device passed the basic integrity check.
    pub basic_integrity: bool,
    /// Whether the device profile matched the compatibility test suite.
    pub cts_match: bool,
    /// Attestation time reported by the provider.
    pub timestamp: DateTime<Utc>,
}

/// How a provider's payload string is encoded on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadEncoding {
    /// The payload is plain text; its UTF-8 bytes are the receipt.
    Utf8,
    /// The payload is base64; it decodes to binary receipt bytes.
    Base64,
}

/// Raw result of a successful provider invocation, before decoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The provider's payload, possibly encoded binary.
    pub payload: String,
    /// Encoding of `payload`.
    pub encoding: PayloadEncoding,
    /// Logical notarization time reported by (or assigned to) the provider.
    pub timestamp: DateTime<Utc>,
    /// Extra attestation metadata, if the provider carries any.
    pub attestation: Option<AttestationEvidence>,
}

impl ProviderResponse {
    /// Decode the payload into a normalized receipt for the given tag.
    pub fn decode(&self, tag: ProviderTag) -> Result<NotarizationReceipt, DecodeError> {
        let payload = match self.encoding {
            PayloadEncoding::Utf8 => self.payload.clone().into_bytes(),
            PayloadEncoding::Base64 => {
                base64::engine::general_purpose::STANDARD.decode(&self.payload)?
            }
        };
        Ok(NotarizationReceipt {
            tag,
            payload,
            timestamp: self.timestamp,
            attestation: self.attestation.clone(),
        })
    }
}

/// Normalized proof of a successful notarization: the decoded payload,
/// its logical timestamp, and any attestation metadata. Stored verbatim
/// under the provider's file tag; never mutated once written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotarizationReceipt {
    pub tag: ProviderTag,
    pub payload: Vec<u8>,
    pub timestamp: DateTime<Utc>,
    pub attestation: Option<AttestationEvidence>,
}

/// Terminal failure of one provider invocation. Recorded for observability
/// only: it never mutates stored proof state and is never retried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub code: i32,
    pub message: String,
}

impl ProviderFailure {
    /// Failure raised on this side of the provider boundary (stream,
    /// decode, or sink problems) rather than by the provider itself.
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            code: -1,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "provider failure {}: {}", self.code, self.message)
    }
}

/// Terminal outcome of one provider task.
#[derive(Clone, Debug, PartialEq)]
pub enum NotarizationOutcome {
    Success(NotarizationReceipt),
    Failure(ProviderFailure),
}

impl NotarizationOutcome {
    /// `true` for [`NotarizationOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use super::*;

    fn tag() -> ProviderTag {
        ProviderTag::new("ots").unwrap()
    }

    #[test]
    fn utf8_payload_decodes_verbatim() {
        let response = ProviderResponse {
            payload: "timestamp-proof".to_string(),
            encoding: PayloadEncoding::Utf8,
            timestamp: Utc::now(),
            attestation: None,
        };
        let receipt = response.decode(tag()).unwrap();
        assert_eq!(receipt.payload, b"timestamp-proof");
    }

    #[test]
    fn base64_payload_decodes_to_binary() {
        let raw = vec![0x00, 0xff, 0x10, 0x80];
        let response = ProviderResponse {
            payload: base64::engine::general_purpose::STANDARD.encode(&raw),
            encoding: PayloadEncoding::Base64,
            timestamp: Utc::now(),
            attestation: None,
        };
        let receipt = response.decode(tag()).unwrap();
        assert_eq!(receipt.payload, raw);
    }

    #[test]
    fn malformed_base64_is_decode_error() {
        let response = ProviderResponse {
            payload: "!!!not-base64!!!".to_string(),
            encoding: PayloadEncoding::Base64,
            timestamp: Utc::now(),
            attestation: None,
        };
        assert!(response.decode(tag()).is_err());
    }

    #[test]
    fn attestation_travels_with_receipt() {
        let attestation = AttestationEvidence {
            result: "pkg=abc".to_string(),
            basic_integrity: true,
            cts_match: false,
            timestamp: Utc::now(),
        };
        let response = ProviderResponse {
            payload: "p".to_string(),
            encoding: PayloadEncoding::Utf8,
            timestamp: Utc::now(),
            attestation: Some(attestation.clone()),
        };
        let receipt = response.decode(tag()).unwrap();
        assert_eq!(receipt.attestation, Some(attestation));
    }

    #[test]
    fn outcome_success_flag() {
        let failure = NotarizationOutcome::Failure(ProviderFailure::local("boom"));
        assert!(!failure.is_success());
        assert_eq!(
            format!("{}", ProviderFailure::local("boom")),
            "provider failure -1: boom"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let receipt = NotarizationReceipt {
            tag: tag(),
            payload: vec![1, 2, 3],
            timestamp: Utc::now(),
            attestation: None,
        };
        let json = serde_json::to_string(&receipt).unwrap();
        let parsed: NotarizationReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt, parsed);
    }
}
