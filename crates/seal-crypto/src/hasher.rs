use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use seal_types::ContentDigest;

/// Read buffer size for streaming digests. Memory use stays constant no
/// matter how large the input is.
const BUF_SIZE: usize = 64 * 1024;

/// Errors from content hashing.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// The source file does not exist.
    #[error("source not found: {0}")]
    NotFound(PathBuf),

    /// The stream could not be read.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Hash an entire byte stream into a [`ContentDigest`].
///
/// Reads the stream to exhaustion in fixed-size chunks. The stream is
/// consumed; callers needing the content again must open a fresh stream.
pub fn digest_stream<R: Read>(mut reader: R) -> Result<ContentDigest, HashError> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(ContentDigest::from_hash(hasher.finalize().into()))
}

/// Hash a file's content into a [`ContentDigest`].
///
/// A missing file maps to [`HashError::NotFound`]; any other read failure
/// is surfaced as [`HashError::Io`].
pub fn digest_file(path: &Path) -> Result<ContentDigest, HashError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        _ => HashError::Io(e),
    })?;
    digest_stream(file)
}
