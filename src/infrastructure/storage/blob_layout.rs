use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::value_objects::ContentDigest;

/// Maximum extension length kept on the stored filename, dot excluded
const MAX_EXT_LEN: usize = 8;

/// Utility for generating storage paths.
///
/// Layout: `{root}/{first-two-hex}/{digest}{ext}` for blobs,
/// `{root}/temp/{uuid}` for in-flight spool files.
pub struct BlobLayout {
    root: PathBuf,
}

impl BlobLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    /// Private spool path for an upload in flight
    pub fn temp_path(&self, id: Uuid) -> PathBuf {
        self.temp_dir().join(id.to_string())
    }

    /// Root-relative blob path, as persisted on document rows
    pub fn rel_path(digest: &ContentDigest, extension: &str) -> String {
        format!("{}/{}{}", digest.shard(), digest.as_hex(), extension)
    }

    pub fn abs_path(&self, rel_path: &str) -> PathBuf {
        self.root.join(rel_path)
    }
}

/// Lowercased extension of the original filename, dot included. Anything
/// unusual (missing, oversized, non-alphanumeric) collapses to the empty
/// string so the digest alone names the file.
pub fn extension_of(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext.is_empty() || ext.len() > MAX_EXT_LEN || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        String::new()
    } else {
        format!(".{ext}")
    }
}
