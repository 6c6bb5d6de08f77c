use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::application::dto::DocumentDto;
use crate::application::ports::{DocumentRepository, RepositoryError};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Error)]
pub enum GetError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Use case: fetch a document for viewing. Every successful fetch bumps the
/// query counter; a failed bump is logged and never fails the fetch.
pub struct GetDocumentUseCase {
    documents: Arc<dyn DocumentRepository>,
}

impl GetDocumentUseCase {
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    pub async fn execute(&self, id: &DocumentId) -> Result<DocumentDto, GetError> {
        // Bump first so the returned counter reflects this fetch; a miss is a
        // no-op update
        if let Err(e) = self.documents.record_view(id).await {
            warn!(document = %id, error = %e, "failed to record document view");
        }

        let document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or(GetError::NotFound(*id))?;

        Ok(DocumentDto::from(document))
    }
}
