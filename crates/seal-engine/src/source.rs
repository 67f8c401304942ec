use std::fs::File;
use std::io::{self, Read};
use std::sync::Arc;

use seal_types::MediaSource;

/// Resolves a [`MediaSource`] into fresh readable byte streams.
///
/// Every call returns an independent stream positioned at the start; the
/// hasher, the signer, and each notarization provider consume their own.
pub trait ContentStreamProvider: Send + Sync {
    fn open(&self, source: &MediaSource) -> io::Result<Box<dyn Read + Send>>;
}

/// Stream provider backed by the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStreams;

impl ContentStreamProvider for FsStreams {
    fn open(&self, source: &MediaSource) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(source.path())?))
    }
}

/// Adapter binding a provider to one source, for the notarization side:
/// the orchestrator only knows "open another stream of *the* content".
pub(crate) struct SourceStreams {
    provider: Arc<dyn ContentStreamProvider>,
    source: MediaSource,
}

impl SourceStreams {
    pub(crate) fn new(provider: Arc<dyn ContentStreamProvider>, source: MediaSource) -> Self {
        Self { provider, source }
    }
}

impl seal_notary::ContentStreams for SourceStreams {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        self.provider.open(&self.source)
    }
}
