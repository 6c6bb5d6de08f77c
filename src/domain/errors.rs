use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid content digest: {0}")]
    InvalidDigest(String),

    #[error("Invalid folio count: {0} (must be a positive integer)")]
    InvalidFolioCount(i64),

    #[error("Document is already trashed")]
    AlreadyTrashed,

    #[error("Document is not trashed")]
    NotTrashed,

    #[error("Container name cannot be empty")]
    EmptyContainerName,
}
