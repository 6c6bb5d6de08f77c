mod create_document;
mod get_document;
mod manage_containers;
mod purge_document;
mod restore_document;
mod serve_document;
mod trash_document;
mod update_document;

pub use create_document::{CreateDocumentUseCase, CreateError};
pub use get_document::{GetDocumentUseCase, GetError};
pub use manage_containers::{
    ContainerAdminError, CreateContainerUseCase, GetContainerUseCase, UpdateContainerUseCase,
};
pub use purge_document::{PurgeDocumentUseCase, PurgeError};
pub use restore_document::{RestoreDocumentUseCase, RestoreError};
pub use serve_document::{BlobResponse, ServeBody, ServeDocumentUseCase, ServeError, ServeMode};
pub use trash_document::{TrashDocumentUseCase, TrashError};
pub use update_document::{UpdateDocumentUseCase, UpdateError};

use crate::application::ports::BlobReader;

/// A file stream accompanying a create or update request
pub struct IncomingFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub reader: BlobReader,
}

/// Parse a UUID-backed id field, reporting the offending field name
pub(crate) fn parse_id<T: std::str::FromStr>(raw: &str, field: &str) -> Result<T, String> {
    raw.parse::<T>()
        .map_err(|_| format!("{field} is not a valid UUID: {raw}"))
}

/// Parse an ISO `YYYY-MM-DD` date field
pub(crate) fn parse_date(raw: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("document_date is not an ISO date: {raw}"))
}

/// Declared content type, falling back to a guess from the filename
pub(crate) fn resolve_content_type(
    declared: Option<&str>,
    original_name: &str,
) -> Option<String> {
    declared.map(str::to_string).or_else(|| {
        mime_guess::from_path(original_name)
            .first_raw()
            .map(str::to_string)
    })
}
