use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::application::dto::DocumentDto;
use crate::application::ledger::{ContainerLedger, LedgerError};
use crate::application::ports::{DocumentRepository, RepositoryError};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Error)]
pub enum TrashError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Use case: soft-delete a document. Its folios stop counting toward the
/// container total; the blob stays on disk.
pub struct TrashDocumentUseCase {
    documents: Arc<dyn DocumentRepository>,
    ledger: Arc<ContainerLedger>,
}

impl TrashDocumentUseCase {
    pub fn new(documents: Arc<dyn DocumentRepository>, ledger: Arc<ContainerLedger>) -> Self {
        Self { documents, ledger }
    }

    pub async fn execute(
        &self,
        id: &DocumentId,
        actor: &str,
    ) -> Result<DocumentDto, TrashError> {
        let mut document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or(TrashError::NotFound(*id))?;

        document.trash(actor)?;
        self.documents.save(&document).await?;

        // Row first, release second: a failed release leaves the total
        // reading high, which can never overshoot the capacity ceiling
        if let Some(container_id) = document.container_id().copied() {
            if let Err(e) = self
                .ledger
                .release(&container_id, document.folio_count().get())
                .await
            {
                error!(container = %container_id, document = %id, error = %e,
                    "failed to release folios while trashing document");
                return Err(e.into());
            }
        }

        Ok(DocumentDto::from(document))
    }
}
