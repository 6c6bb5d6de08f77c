use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use validator::Validate;

use crate::application::dto::{CreateDocumentRequest, DocumentDto};
use crate::application::ledger::{ContainerLedger, LedgerError};
use crate::application::ports::{BlobStore, DocumentRepository, RepositoryError, StorageError};
use crate::application::use_cases::{parse_date, parse_id, resolve_content_type, IncomingFile};
use crate::domain::entities::{Document, NewDocument};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{
    AreaId, BlobRef, ContainerId, ContainerState, DocumentTypeId, FolioCount,
};

#[derive(Debug, Error)]
pub enum CreateError {
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

/// Use case: register a document, optionally with an uploaded file, and file
/// it into a container under the capacity discipline.
pub struct CreateDocumentUseCase {
    documents: Arc<dyn DocumentRepository>,
    ledger: Arc<ContainerLedger>,
    blob_store: Arc<dyn BlobStore>,
}

impl CreateDocumentUseCase {
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
        request: CreateDocumentRequest,
        file: Option<IncomingFile>,
        actor: &str,
    ) -> Result<DocumentDto, CreateError> {
        // 1. Field validation before any transactional work
        request
            .validate()
            .map_err(|e| CreateError::InvalidRequest(e.to_string()))?;

        let doc_type_id = parse_id::<DocumentTypeId>(&request.doc_type_id, "doc_type_id")
            .map_err(CreateError::InvalidRequest)?;
        let area_id =
            parse_id::<AreaId>(&request.area_id, "area_id").map_err(CreateError::InvalidRequest)?;
        let dest_area_id = request
            .dest_area_id
            .as_deref()
            .map(|s| parse_id::<AreaId>(s, "dest_area_id"))
            .transpose()
            .map_err(CreateError::InvalidRequest)?;
        let container_id = request
            .container_id
            .as_deref()
            .map(|s| parse_id::<ContainerId>(s, "container_id"))
            .transpose()
            .map_err(CreateError::InvalidRequest)?;
        let document_date = request
            .document_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .map_err(CreateError::InvalidRequest)?;
        let folio_count = FolioCount::new(request.folio_count)?;

        // 2. Container compatibility pre-checks, before the upload is spooled
        if let Some(container_id) = &container_id {
            let container = self.ledger.find(container_id).await?;
            ContainerLedger::check_assignable(&container, &area_id, &doc_type_id)?;
            if container.state() == ContainerState::Closed {
                return Err(LedgerError::Closed(*container_id).into());
            }
        }

        // 3. Ingest ahead of the registry mutation. If the create fails later
        //    the blob stays on disk unreferenced, where the orphan sweep can
        //    reclaim it.
        let blob = match file {
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

        let mut document = Document::new(
            NewDocument {
                name: request.name,
                subject: request.subject,
                document_date,
                folio_count,
                container_id,
                doc_type_id,
                area_id,
                dest_area_id,
            },
            actor,
        );
        if let Some(blob) = blob {
            document.attach_blob(blob, actor);
        }

        // 4. Atomic capacity claim, then the insert; a failed insert hands the
        //    claimed folios back
        if let Some(container_id) = &container_id {
            let reservation = self.ledger.reserve(container_id, folio_count.get()).await?;
            if reservation.auto_closed {
                info!(container = %container_id, total = reservation.new_total,
                    "container reached capacity and closed");
            }

            if let Err(e) = self.documents.insert(&document).await {
                if let Err(release_err) =
                    self.ledger.release(container_id, folio_count.get()).await
                {
                    error!(container = %container_id, error = %release_err,
                        "failed to release folios after aborted create");
                }
                return Err(e.into());
            }
        } else {
            self.documents.insert(&document).await?;
        }

        Ok(DocumentDto::from(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ledger::ContainerLedger;
    use crate::application::ports::{
        IngestedBlob, MockBlobStore, MockContainerRepository, MockDocumentRepository,
        ReserveOutcome,
    };
    use crate::domain::entities::Container;
    use crate::domain::value_objects::ContentDigest;
    use std::str::FromStr;

    fn request(container_id: Option<String>, area: &AreaId, doc_type: &DocumentTypeId) -> CreateDocumentRequest {
        CreateDocumentRequest {
            name: "Oficio 042-2024".to_string(),
            subject: Some("Solicitud de materiales".to_string()),
            document_date: Some("2024-03-15".to_string()),
            folio_count: 8,
            container_id,
            doc_type_id: doc_type.to_string(),
            area_id: area.to_string(),
            dest_area_id: None,
            file_name: None,
            content_type: None,
        }
    }

    fn open_container(area: AreaId, doc_type: DocumentTypeId) -> Container {
        Container::new("AR-1".to_string(), None, area, doc_type, None).unwrap()
    }

    #[tokio::test]
    async fn test_create_without_container_or_file() {
        let mut documents = MockDocumentRepository::new();
        documents.expect_insert().times(1).returning(|_| Ok(()));
        let containers = MockContainerRepository::new();
        let blob_store = MockBlobStore::new();

        let area = AreaId::new();
        let doc_type = DocumentTypeId::new();
        let use_case = CreateDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
            Arc::new(blob_store),
        );

        let dto = use_case
            .execute(request(None, &area, &doc_type), None, "mesa-de-partes")
            .await
            .unwrap();

        assert_eq!(dto.folio_count, 8);
        assert_eq!(dto.status, "REGISTERED");
        assert!(dto.digest.is_none());
        assert!(!dto.trashed);
    }

    #[tokio::test]
    async fn test_create_with_file_ingests_before_insert() {
        let mut documents = MockDocumentRepository::new();
        documents.expect_insert().times(1).returning(|_| Ok(()));
        let containers = MockContainerRepository::new();

        let digest = ContentDigest::from_str(&"cd".repeat(32)).unwrap();
        let rel_path = format!("cd/{}.pdf", digest.as_hex());
        let mut blob_store = MockBlobStore::new();
        let ingested = IngestedBlob {
            digest,
            rel_path,
            size_bytes: 4096,
        };
        blob_store
            .expect_ingest()
            .times(1)
            .returning(move |_, _| Ok(ingested.clone()));

        let area = AreaId::new();
        let doc_type = DocumentTypeId::new();
        let use_case = CreateDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
            Arc::new(blob_store),
        );

        let file = IncomingFile {
            original_name: "oficio-042.pdf".to_string(),
            content_type: None,
            reader: Box::pin(std::io::Cursor::new(b"%PDF-1.4".to_vec())),
        };
        let dto = use_case
            .execute(request(None, &area, &doc_type), Some(file), "mesa-de-partes")
            .await
            .unwrap();

        assert_eq!(dto.size_bytes, Some(4096));
        assert_eq!(dto.content_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn test_create_reserves_container_capacity() {
        let area = AreaId::new();
        let doc_type = DocumentTypeId::new();
        let container = open_container(area, doc_type);
        let container_id = container.id().to_string();

        let mut documents = MockDocumentRepository::new();
        documents.expect_insert().times(1).returning(|_| Ok(()));

        let mut containers = MockContainerRepository::new();
        containers
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(container.clone())));
        containers.expect_reserve().times(1).returning(|_, delta, _| {
            assert_eq!(delta, 8);
            Ok(ReserveOutcome::Reserved {
                new_total: 8,
                auto_closed: false,
            })
        });

        let use_case = CreateDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
            Arc::new(MockBlobStore::new()),
        );

        let dto = use_case
            .execute(
                request(Some(container_id.clone()), &area, &doc_type),
                None,
                "mesa-de-partes",
            )
            .await
            .unwrap();

        assert_eq!(dto.container_id, Some(container_id));
    }

    #[tokio::test]
    async fn test_create_fails_on_capacity_without_insert() {
        let area = AreaId::new();
        let doc_type = DocumentTypeId::new();
        let container = open_container(area, doc_type);
        let container_id = container.id().to_string();

        let documents = MockDocumentRepository::new(); // no insert expected

        let mut containers = MockContainerRepository::new();
        containers
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(container.clone())));
        containers
            .expect_reserve()
            .times(1)
            .returning(|_, _, _| Ok(ReserveOutcome::CapacityExceeded { current: 495 }));

        let use_case = CreateDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
            Arc::new(MockBlobStore::new()),
        );

        let err = use_case
            .execute(request(Some(container_id), &area, &doc_type), None, "x")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CreateError::Ledger(LedgerError::CapacityExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_area_mismatch() {
        let doc_type = DocumentTypeId::new();
        let container = open_container(AreaId::new(), doc_type);
        let container_id = container.id().to_string();

        let mut containers = MockContainerRepository::new();
        containers
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(container.clone())));

        let use_case = CreateDocumentUseCase::new(
            Arc::new(MockDocumentRepository::new()),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
            Arc::new(MockBlobStore::new()),
        );

        // Different owning area than the container's
        let err = use_case
            .execute(
                request(Some(container_id), &AreaId::new(), &doc_type),
                None,
                "x",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CreateError::Ledger(LedgerError::AreaMismatch)));
    }

    #[tokio::test]
    async fn test_create_rejects_closed_container() {
        let area = AreaId::new();
        let doc_type = DocumentTypeId::new();
        let mut container = open_container(area, doc_type);
        container.set_state(ContainerState::Closed);
        let container_id = container.id().to_string();

        let mut containers = MockContainerRepository::new();
        containers
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(container.clone())));

        let use_case = CreateDocumentUseCase::new(
            Arc::new(MockDocumentRepository::new()),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
            Arc::new(MockBlobStore::new()),
        );

        let err = use_case
            .execute(request(Some(container_id), &area, &doc_type), None, "x")
            .await
            .unwrap_err();

        assert!(matches!(err, CreateError::Ledger(LedgerError::Closed(_))));
    }

    #[tokio::test]
    async fn test_create_releases_reservation_when_insert_fails() {
        let area = AreaId::new();
        let doc_type = DocumentTypeId::new();
        let container = open_container(area, doc_type);
        let container_id = container.id().to_string();

        let mut documents = MockDocumentRepository::new();
        documents.expect_insert().times(1).returning(|_| {
            Err(RepositoryError::ConstraintViolation("boom".to_string()))
        });

        let mut containers = MockContainerRepository::new();
        containers
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(container.clone())));
        containers.expect_reserve().times(1).returning(|_, _, _| {
            Ok(ReserveOutcome::Reserved {
                new_total: 8,
                auto_closed: false,
            })
        });
        containers
            .expect_release()
            .times(1)
            .returning(|_, delta| {
                assert_eq!(delta, 8);
                Ok(Some(0))
            });

        let use_case = CreateDocumentUseCase::new(
            Arc::new(documents),
            Arc::new(ContainerLedger::new(Arc::new(containers), 500)),
            Arc::new(MockBlobStore::new()),
        );

        let err = use_case
            .execute(request(Some(container_id), &area, &doc_type), None, "x")
            .await
            .unwrap_err();

        assert!(matches!(err, CreateError::Repository(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_ids() {
        let use_case = CreateDocumentUseCase::new(
            Arc::new(MockDocumentRepository::new()),
            Arc::new(ContainerLedger::new(
                Arc::new(MockContainerRepository::new()),
                500,
            )),
            Arc::new(MockBlobStore::new()),
        );

        let mut bad = request(None, &AreaId::new(), &DocumentTypeId::new());
        bad.area_id = "not-a-uuid".to_string();

        let err = use_case.execute(bad, None, "x").await.unwrap_err();
        assert!(matches!(err, CreateError::InvalidRequest(_)));
    }
}
