use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use thiserror::Error;
use tracing::warn;

use crate::application::ports::{
    BlobReader, BlobStore, ByteWindow, DocumentRepository, RepositoryError, StorageError,
};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Whether the client asked to download or to view inline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeMode {
    Download,
    View,
}

impl ServeMode {
    pub fn disposition(&self) -> &'static str {
        match self {
            ServeMode::Download => "attachment",
            ServeMode::View => "inline",
        }
    }

    pub fn cache_max_age_secs(&self) -> u32 {
        match self {
            ServeMode::Download => 3600,
            ServeMode::View => 1800,
        }
    }
}

/// How the body is delivered
pub enum ServeBody {
    /// 200 with the whole file
    Full { reader: BlobReader },
    /// 206 with one byte window
    Partial { reader: BlobReader, window: ByteWindow },
    /// 416; no body
    Unsatisfiable,
}

impl std::fmt::Debug for ServeBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeBody::Full { .. } => f.debug_struct("Full").finish_non_exhaustive(),
            ServeBody::Partial { window, .. } => {
                f.debug_struct("Partial").field("window", window).finish_non_exhaustive()
            }
            ServeBody::Unsatisfiable => f.write_str("Unsatisfiable"),
        }
    }
}

/// Everything the HTTP layer needs to write the response
#[derive(Debug)]
pub struct BlobResponse {
    pub body: ServeBody,
    pub size_bytes: u64,
    pub content_type: String,
    pub file_name: String,
    pub etag: String,
    pub disposition: &'static str,
    pub cache_max_age_secs: u32,
}

/// Use case: resolve a document to its blob and plan a streaming response
/// with byte-range support.
pub struct ServeDocumentUseCase {
    documents: Arc<dyn DocumentRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl ServeDocumentUseCase {
    pub fn new(documents: Arc<dyn DocumentRepository>, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            documents,
            blob_store,
        }
    }

    pub async fn execute(
        &self,
        id: &DocumentId,
        range_header: Option<&str>,
        mode: ServeMode,
    ) -> Result<BlobResponse, ServeError> {
        let document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServeError::NotFound(format!("document {id}")))?;
        let blob = document
            .blob()
            .ok_or_else(|| ServeError::NotFound(format!("document {id} has no stored file")))?
            .clone();

        let stat = self.blob_store.resolve(&blob).await.map_err(|e| match e {
            StorageError::NotFound(d) => ServeError::NotFound(format!("blob {d}")),
            other => ServeError::Storage(other),
        })?;
        let size = stat.size_bytes;

        let modified_secs = stat
            .modified
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let etag = format!("\"{modified_secs:x}-{size:x}\"");

        let content_type = blob
            .content_type()
            .map(str::to_string)
            .or_else(|| {
                mime_guess::from_path(blob.rel_path())
                    .first_raw()
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let file_name = format!("{}{}", sanitize_file_name(document.name()), blob.extension());

        let body = match plan_range(range_header, size) {
            RangePlan::Full => ServeBody::Full {
                reader: self.blob_store.open(&blob, None).await?,
            },
            RangePlan::Partial(window) => ServeBody::Partial {
                reader: self.blob_store.open(&blob, Some(window)).await?,
                window,
            },
            RangePlan::Unsatisfiable => ServeBody::Unsatisfiable,
        };

        // Viewing counts as a query; the bump runs detached so a slow or
        // failing write can never hold up the stream
        if mode == ServeMode::View {
            let documents = Arc::clone(&self.documents);
            let id = *id;
            tokio::spawn(async move {
                if let Err(e) = documents.record_view(&id).await {
                    warn!(document = %id, error = %e, "failed to record document view");
                }
            });
        }

        Ok(BlobResponse {
            body,
            size_bytes: size,
            content_type,
            file_name,
            etag,
            disposition: mode.disposition(),
            cache_max_age_secs: mode.cache_max_age_secs(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RangePlan {
    Full,
    Partial(ByteWindow),
    Unsatisfiable,
}

/// Decide how to answer a request for a blob of `size` bytes. A malformed
/// header is ignored rather than rejected, falling back to the full body.
pub(crate) fn plan_range(header: Option<&str>, size: u64) -> RangePlan {
    let Some(header) = header else {
        return RangePlan::Full;
    };
    let Some((start, end)) = parse_range(header) else {
        return RangePlan::Full;
    };

    if start >= size {
        return RangePlan::Unsatisfiable;
    }
    let end = end.unwrap_or(size - 1);
    if end >= size {
        return RangePlan::Unsatisfiable;
    }
    if end < start {
        return RangePlan::Full;
    }

    RangePlan::Partial(ByteWindow { start, end })
}

/// Parse `bytes={start}-{end}` with `end` optional. Only the first pair of a
/// multi-range header is honored.
fn parse_range(header: &str) -> Option<(u64, Option<u64>)> {
    let rest = header.trim().strip_prefix("bytes=")?;
    let first = rest.split(',').next()?;
    let (start, end) = first.split_once('-')?;

    let start: u64 = start.trim().parse().ok()?;
    let end = match end.trim() {
        "" => None,
        s => Some(s.parse::<u64>().ok()?),
    };

    Some((start, end))
}

static UNSAFE_FILE_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9 ._-]+").expect("valid regex"));

/// Collapse anything header-hostile out of the download filename
fn sanitize_file_name(name: &str) -> String {
    let cleaned = UNSAFE_FILE_NAME_CHARS.replace_all(name, "_");
    let cleaned = cleaned.trim().trim_matches('.');
    if cleaned.chars().any(|c| c.is_ascii_alphanumeric()) {
        cleaned.to_string()
    } else {
        "documento".to_string()
    }
}
