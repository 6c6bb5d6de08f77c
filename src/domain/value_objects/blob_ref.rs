use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ContentDigest;

/// Reference from a document to its stored blob.
///
/// `rel_path` is relative to the storage root (`{shard}/{digest}{ext}`), so a
/// reference stays valid when the root is relocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    digest: ContentDigest,
    rel_path: String,
    size_bytes: u64,
    content_type: Option<String>,
}

impl BlobRef {
    pub fn new(
        digest: ContentDigest,
        rel_path: String,
        size_bytes: u64,
        content_type: Option<String>,
    ) -> Self {
        Self {
            digest,
            rel_path,
            size_bytes,
            content_type,
        }
    }

    pub fn digest(&self) -> &ContentDigest {
        &self.digest
    }

    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Extension suffix of the stored file, dot included; empty when none
    pub fn extension(&self) -> &str {
        match self.rel_path.rfind('.') {
            Some(idx) => &self.rel_path[idx..],
            None => "",
        }
    }
}
