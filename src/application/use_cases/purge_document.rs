use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::application::ledger::{ContainerLedger, LedgerError};
use crate::application::ports::{BlobStore, DocumentRepository, RepositoryError, StorageError};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Use case: hard-delete a document. The blob file is removed only when no
/// other document, trashed or not, shares its digest.
///
/// A purge normally lands on an already-trashed document whose folios were
/// subtracted when it entered the trash. Purging an active document performs
/// that same subtraction first.
pub struct PurgeDocumentUseCase {
    documents: Arc<dyn DocumentRepository>,
    ledger: Arc<ContainerLedger>,
    blob_store: Arc<dyn BlobStore>,
}

impl PurgeDocumentUseCase {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        ledger: Arc<ContainerLedger>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            documents,
            ledger,
            blob_store,
        }
    }

    pub async fn execute(&self, id: &DocumentId) -> Result<(), PurgeError> {
        let document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or(PurgeError::NotFound(*id))?;

        if !document.is_trashed() {
            if let Some(container_id) = document.container_id() {
                self.ledger
                    .release(container_id, document.folio_count().get())
                    .await?;
            }
        }

        if let Some(blob) = document.blob() {
            let other_refs = self
                .documents
                .count_digest_references(blob.digest(), id)
                .await?;
            if let Err(e) = self.blob_store.purge(blob, other_refs > 0).await {
                error!(document = %id, digest = %blob.digest(), error = %e,
                    "failed to purge blob file");
                return Err(e.into());
            }
        }

        self.documents.delete(id).await?;
        info!(document = %id, "document purged");

        Ok(())
    }
}
