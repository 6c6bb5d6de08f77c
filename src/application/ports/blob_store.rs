use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use std::pin::Pin;
use std::time::SystemTime;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::domain::value_objects::{BlobRef, ContentDigest};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Type alias for async reader
pub type BlobReader = Pin<Box<dyn AsyncRead + Send>>;

/// Identity of a freshly ingested blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedBlob {
    pub digest: ContentDigest,
    pub rel_path: String,
    pub size_bytes: u64,
}

/// Stat result for a stored blob file
#[derive(Debug, Clone, Copy)]
pub struct BlobStat {
    pub size_bytes: u64,
    pub modified: SystemTime,
}

/// Inclusive byte window for ranged reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    pub start: u64,
    pub end: u64,
}

impl ByteWindow {
    /// Inclusive length, never zero
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// One entry of a storage scan, used by the orphan sweep
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub digest: ContentDigest,
    pub rel_path: String,
    pub size_bytes: u64,
    pub modified: SystemTime,
}

/// Port for physical blob storage operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Spool the stream to a temp file while digesting it, then move it to
    /// its content-addressed location. An already-present identical blob is
    /// the dedup case, not an error.
    async fn ingest(
        &self,
        reader: BlobReader,
        original_name: &str,
    ) -> Result<IngestedBlob, StorageError>;

    /// Stat the blob file; `NotFound` when missing
    async fn resolve(&self, blob: &BlobRef) -> Result<BlobStat, StorageError>;

    /// Open the blob for reading, optionally limited to a byte window
    async fn open(
        &self,
        blob: &BlobRef,
        window: Option<ByteWindow>,
    ) -> Result<BlobReader, StorageError>;

    /// Remove the blob file unless other documents still reference its
    /// digest. A missing file is an acceptable terminal state.
    async fn purge(&self, blob: &BlobRef, still_referenced: bool) -> Result<(), StorageError>;

    /// Scan the shard directories. Temp spool files are not included.
    async fn list_stored(&self) -> Result<Vec<StoredBlob>, StorageError>;
}
