use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use thiserror::Error;

use crate::domain::entities::Document;
use crate::domain::value_objects::{ContentDigest, DocumentId};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Port for document persistence operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document row
    async fn insert(&self, document: &Document) -> Result<(), RepositoryError>;

    /// Persist the current state of an existing document
    async fn save(&self, document: &Document) -> Result<(), RepositoryError>;

    /// Find by id, trashed or not
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError>;

    /// Remove the row outright (purge)
    async fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError>;

    /// Count documents other than `exclude` referencing this digest,
    /// trashed ones included — only purge severs a blob reference
    async fn count_digest_references(
        &self,
        digest: &ContentDigest,
        exclude: &DocumentId,
    ) -> Result<i64, RepositoryError>;

    /// Whether any document at all references this digest (orphan sweep)
    async fn digest_referenced(&self, digest: &ContentDigest) -> Result<bool, RepositoryError>;

    /// Bump the query counter and last-query timestamp
    async fn record_view(&self, id: &DocumentId) -> Result<(), RepositoryError>;
}
