use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use validator::Validate;

use crate::application::dto::{DocumentDto, UpdateDocumentRequest};
use crate::application::ledger::{ContainerLedger, LedgerError};
use crate::application::ports::{BlobStore, DocumentRepository, RepositoryError, StorageError};
use crate::application::use_cases::{
    parse_date, parse_id, resolve_content_type, IncomingFile,
};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{
    AreaId, BlobRef, ContainerId, DocumentId, DocumentStatus, FolioCount,
};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Document is trashed; restore it before editing")]
    DocumentTrashed,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Where the patch moves the container reference
enum ContainerTarget {
    Unchanged,
    Clear,
    Set(ContainerId),
}

/// Use case: patch a document, keeping container totals exact across folio
/// changes, container moves and file replacements.
pub struct UpdateDocumentUseCase {
    documents: Arc<dyn DocumentRepository>,
    ledger: Arc<ContainerLedger>,
    blob_store: Arc<dyn BlobStore>,
}

impl UpdateDocumentUseCase {
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

    pub async fn execute(
        &self,
        id: &DocumentId,
        patch: UpdateDocumentRequest,
        file: Option<IncomingFile>,
        actor: &str,
    ) -> Result<DocumentDto, UpdateError> {
        patch
            .validate()
            .map_err(|e| UpdateError::InvalidRequest(e.to_string()))?;
        if patch.clear_container && patch.container_id.is_some() {
            return Err(UpdateError::InvalidRequest(
                "container_id and clear_container are mutually exclusive".to_string(),
            ));
        }

        let mut document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or(UpdateError::NotFound(*id))?;
        if document.is_trashed() {
            return Err(UpdateError::DocumentTrashed);
        }

        let status = patch
            .status
            .as_deref()
            .map(|s| s.parse::<DocumentStatus>())
            .transpose()
            .map_err(UpdateError::InvalidRequest)?;
        let dest_area_id = patch
            .dest_area_id
            .as_deref()
            .map(|s| parse_id::<AreaId>(s, "dest_area_id"))
            .transpose()
            .map_err(UpdateError::InvalidRequest)?;
        let document_date = patch
            .document_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .map_err(UpdateError::InvalidRequest)?;
        let new_folios = patch
            .folio_count
            .map(FolioCount::new)
            .transpose()?
            .unwrap_or_else(|| document.folio_count());

        let target = if patch.clear_container {
            ContainerTarget::Clear
        } else {
            match patch.container_id.as_deref() {
                Some(raw) => {
                    let cid = parse_id::<ContainerId>(raw, "container_id")
                        .map_err(UpdateError::InvalidRequest)?;
                    // Naming the current container again is not a move
                    if document.container_id() == Some(&cid) {
                        ContainerTarget::Unchanged
                    } else {
                        ContainerTarget::Set(cid)
                    }
                }
                None => ContainerTarget::Unchanged,
            }
        };

        let old_container = document.container_id().copied();
        let old_folios = document.folio_count();

        // A replacement file is spooled ahead of the ledger work; the previous
        // blob is left on disk since other documents may share its digest
        let new_blob = match file {
            Some(file) => {
                let content_type =
                    resolve_content_type(file.content_type.as_deref(), &file.original_name);
                let ingested = self
                    .blob_store
                    .ingest(file.reader, &file.original_name)
                    .await?;
                Some(BlobRef::new(
                    ingested.digest,
                    ingested.rel_path,
                    ingested.size_bytes,
                    content_type,
                ))
            }
            None => None,
        };

        // Claim capacity up front; hand back on the old side only after the
        // row mutation commits
        let mut claimed: Option<(ContainerId, u32)> = None;
        let mut deferred_release: Option<(ContainerId, u32)> = None;

        match &target {
            ContainerTarget::Set(new_id) => {
                let container = self.ledger.find(new_id).await?;
                ContainerLedger::check_assignable(
                    &container,
                    document.area_id(),
                    document.doc_type_id(),
                )?;
                let reservation = self.ledger.reserve(new_id, new_folios.get()).await?;
                if reservation.auto_closed {
                    info!(container = %new_id, total = reservation.new_total,
                        "container reached capacity and closed");
                }
                claimed = Some((*new_id, new_folios.get()));
                if let Some(old_id) = old_container {
                    deferred_release = Some((old_id, old_folios.get()));
                }
            }
            ContainerTarget::Clear => {
                if let Some(old_id) = old_container {
                    deferred_release = Some((old_id, old_folios.get()));
                }
            }
            ContainerTarget::Unchanged => {
                if let Some(container_id) = old_container {
                    if new_folios > old_folios {
                        let delta = new_folios.get() - old_folios.get();
                        let reservation = self.ledger.reserve(&container_id, delta).await?;
                        if reservation.auto_closed {
                            info!(container = %container_id, total = reservation.new_total,
                                "container reached capacity and closed");
                        }
                        claimed = Some((container_id, delta));
                    } else if new_folios < old_folios {
                        deferred_release =
                            Some((container_id, old_folios.get() - new_folios.get()));
                    }
                }
            }
        }

        // Apply the patch to the row
        if let Some(name) = patch.name {
            document.set_name(name, actor);
        }
        if let Some(subject) = patch.subject {
            document.set_subject(Some(subject), actor);
        }
        if let Some(date) = document_date {
            document.set_document_date(Some(date), actor);
        }
        if let Some(status) = status {
            document.set_status(status, actor);
        }
        if let Some(dest) = dest_area_id {
            document.set_dest_area(Some(dest), actor);
        }
        if new_folios != old_folios {
            document.set_folio_count(new_folios, actor);
        }
        match &target {
            ContainerTarget::Set(new_id) => document.set_container(Some(*new_id), actor),
            ContainerTarget::Clear => document.set_container(None, actor),
            ContainerTarget::Unchanged => {}
        }
        if let Some(blob) = new_blob {
            document.attach_blob(blob, actor);
        }

        if let Err(e) = self.documents.save(&document).await {
            if let Some((container_id, folios)) = claimed {
                if let Err(release_err) = self.ledger.release(&container_id, folios).await {
                    error!(container = %container_id, error = %release_err,
                        "failed to release folios after aborted update");
                }
            }
            return Err(e.into());
        }

        if let Some((container_id, folios)) = deferred_release {
            if let Err(e) = self.ledger.release(&container_id, folios).await {
                error!(container = %container_id, error = %e,
                    "failed to release folios after document update");
                return Err(e.into());
            }
        }

        Ok(DocumentDto::from(document))
    }
}
