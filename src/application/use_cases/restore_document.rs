use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::application::dto::DocumentDto;
use crate::application::ledger::{ContainerLedger, LedgerError};
use crate::application::ports::{DocumentRepository, RepositoryError};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Use case: bring a document back from the trash, re-claiming its folios.
///
/// The claim goes through the full capacity discipline again: a container
/// that filled up (or closed) while the document sat in the trash rejects the
/// restore, and that rejection is the intended behavior.
pub struct RestoreDocumentUseCase {
    documents: Arc<dyn DocumentRepository>,
    ledger: Arc<ContainerLedger>,
}

impl RestoreDocumentUseCase {
    pub fn new(documents: Arc<dyn DocumentRepository>, ledger: Arc<ContainerLedger>) -> Self {
        Self { documents, ledger }
    }

    pub async fn execute(
        &self,
        id: &DocumentId,
        actor: &str,
    ) -> Result<DocumentDto, RestoreError> {
        let mut document = self
            .documents
            .find_by_id(id)
            .await?
            .ok_or(RestoreError::NotFound(*id))?;
        if !document.is_trashed() {
            return Err(DomainError::NotTrashed.into());
        }

        if let Some(container_id) = document.container_id().copied() {
            let container = self.ledger.find(&container_id).await?;
            if container.is_trashed() {
                // Restore the container first
                return Err(LedgerError::ContainerTrashed(container_id).into());
            }

            let reservation = self
                .ledger
                .reserve(&container_id, document.folio_count().get())
                .await?;
            if reservation.auto_closed {
                info!(container = %container_id, total = reservation.new_total,
                    "container reached capacity and closed");
            }

            document.restore(actor)?;
            if let Err(e) = self.documents.save(&document).await {
                if let Err(release_err) = self
                    .ledger
                    .release(&container_id, document.folio_count().get())
                    .await
                {
                    error!(container = %container_id, error = %release_err,
                        "failed to release folios after aborted restore");
                }
                return Err(e.into());
            }
        } else {
            document.restore(actor)?;
            self.documents.save(&document).await?;
        }

        Ok(DocumentDto::from(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockContainerRepository, MockDocumentRepository, ReserveOutcome,
    };
    use crate::domain::entities::{Container, Document, NewDocument};
    use crate::domain::value_objects::{AreaId, ContainerId, DocumentTypeId, FolioCount};

    fn trashed_document_in(container: &Container, folios: u32) -> Document {
        let mut doc = Document::new(
            NewDocument {
                name: "Memorando 15".to_string(),
                subject: None,
                document_date: None,
                folio_count: FolioCount::new(folios).unwrap(),
                container_id: Some(*container.id()),
                doc_type_id: *container.doc_type_id(),
                area_id: *container.area_id(),
                dest_area_id: None,
            },
            "archivero",
        );
        doc.trash("archivero").unwrap();
        doc
    }

    fn container() -> Container {
        Container::new(
            "AR-9".to_string(),
            None,
            AreaId::new(),
            DocumentTypeId::new(),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_restore_reclaims_folios() {
        let container = container();
        let doc = trashed_document_in(&container, 6);
        let doc_id = *doc.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(doc.clone())));
        documents.expect_save().times(1).returning(|_| Ok(()));

        let mut containers = MockContainerRepository::new();
        containers
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(container.clone())));
        containers.expect_reserve().times(1).returning(|_, delta, _| {
            assert_eq!(delta, 6);
            Ok(ReserveOutcome::Reserved {
                new_total: 106,
                auto_closed: false,
            })
        });

        let use_case = RestoreDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
        );

        let dto = use_case.execute(&doc_id, "archivero").await.unwrap();
        assert!(!dto.trashed);
    }

    #[tokio::test]
    async fn test_restore_blocked_by_trashed_container() {
        let mut c = container();
        c.set_trashed(true);
        let doc = trashed_document_in(&c, 6);
        let doc_id = *doc.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(doc.clone())));
        // no save: the document must stay trashed

        let mut containers = MockContainerRepository::new();
        containers
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(c.clone())));

        let use_case = RestoreDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
        );

        let err = use_case.execute(&doc_id, "x").await.unwrap_err();
        assert!(matches!(
            err,
            RestoreError::Ledger(LedgerError::ContainerTrashed(_))
        ));
    }

    #[tokio::test]
    async fn test_restore_can_fail_capacity() {
        let container = container();
        let doc = trashed_document_in(&container, 6);
        let doc_id = *doc.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(doc.clone())));

        let mut containers = MockContainerRepository::new();
        containers
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(container.clone())));
        containers
            .expect_reserve()
            .times(1)
            .returning(|_, _, _| Ok(ReserveOutcome::CapacityExceeded { current: 498 }));

        let use_case = RestoreDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
        );

        let err = use_case.execute(&doc_id, "x").await.unwrap_err();
        assert!(matches!(
            err,
            RestoreError::Ledger(LedgerError::CapacityExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn test_restore_untrashed_document_rejected() {
        let container = container();
        let mut doc = trashed_document_in(&container, 6);
        doc.restore("x").unwrap();
        let doc_id = *doc.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(doc.clone())));

        let use_case = RestoreDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(ContainerLedger::new(
                Arc::new(MockContainerRepository::new()),
                500,
            )),
        );

        let err = use_case.execute(&doc_id, "x").await.unwrap_err();
        assert!(matches!(err, RestoreError::Domain(DomainError::NotTrashed)));
    }
}
