use std::io::{self, Read};

use sha2::{Digest, Sha256};

/// Errors from signing operations.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// The message stream could not be read.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The underlying signing primitive failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Produces detached signatures over byte streams.
///
/// This is the seam to the external signing primitive. The engine only
/// schedules signing and stores the resulting detached signature bytes; it
/// never interprets them. Signer failures are non-fatal to a proof: the
/// record stays on disk unsigned for that pass.
pub trait Signer: Send + Sync {
    /// Sign an entire stream, returning the detached signature bytes.
    fn sign_stream(&self, message: &mut dyn Read) -> Result<Vec<u8>, SignerError>;

    /// Sign an in-memory message.
    fn sign_bytes(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        self.sign_stream(&mut &message[..])
    }
}

/// Reference [`Signer`] backed by an Ed25519 key.
///
/// Streams the message through SHA-256 and signs the 32-byte digest, so
/// signing memory use is independent of media size.
pub struct Ed25519Signer {
    key: ed25519_dalek::SigningKey,
}

impl Ed25519Signer {
    /// Generate a signer with a fresh random key.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self {
            key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Create a signer from a raw 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            key: ed25519_dalek::SigningKey::from_bytes(&seed),
        }
    }

    /// The public verifying key bytes.
    pub fn verifying_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }

    /// Verify a detached signature produced by [`Signer::sign_stream`].
    pub fn verify(&self, message: &mut dyn Read, signature: &[u8]) -> Result<bool, SignerError> {
        use ed25519_dalek::Verifier;
        let digest = stream_sha256(message)?;
        let sig_bytes: [u8; 64] = match signature.try_into() {
            Ok(arr) => arr,
            Err(_) => return Ok(false),
        };
        let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
        Ok(self.key.verifying_key().verify(&digest, &sig).is_ok())
    }
}

impl Signer for Ed25519Signer {
    fn sign_stream(&self, message: &mut dyn Read) -> Result<Vec<u8>, SignerError> {
        use ed25519_dalek::Signer as _;
        let digest = stream_sha256(message)?;
        Ok(self.key.sign(&digest).to_bytes().to_vec())
    }
}

fn stream_sha256(message: &mut dyn Read) -> Result<[u8; 32], SignerError> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = message.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().into())
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signer(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let signer = Ed25519Signer::generate();
        let sig = signer.sign_bytes(b"proof record contents").unwrap();
        assert!(signer
            .verify(&mut &b"proof record contents"[..], &sig)
            .unwrap());
    }

    #[test]
    fn verify_fails_on_tampered_message() {
        let signer = Ed25519Signer::generate();
        let sig = signer.sign_bytes(b"original").unwrap();
        assert!(!signer.verify(&mut &b"tampered"[..], &sig).unwrap());
    }

    #[test]
    fn verify_rejects_malformed_signature() {
        let signer = Ed25519Signer::generate();
        assert!(!signer.verify(&mut &b"message"[..], b"short").unwrap());
    }

    #[test]
    fn stream_and_bytes_signatures_agree() {
        let signer = Ed25519Signer::from_seed([9; 32]);
        let from_bytes = signer.sign_bytes(b"same message").unwrap();
        let from_stream = signer.sign_stream(&mut &b"same message"[..]).unwrap();
        assert_eq!(from_bytes, from_stream);
    }

    #[test]
    fn seeded_signer_is_deterministic() {
        let a = Ed25519Signer::from_seed([1; 32]);
        let b = Ed25519Signer::from_seed([1; 32]);
        assert_eq!(a.verifying_key(), b.verifying_key());
        assert_eq!(
            a.sign_bytes(b"msg").unwrap(),
            b.sign_bytes(b"msg").unwrap()
        );
    }

    #[test]
    fn debug_redacts_key() {
        let signer = Ed25519Signer::generate();
        assert!(format!("{signer:?}").contains("redacted"));
    }
}
