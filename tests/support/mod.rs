//! Shared test fixtures: in-memory repository implementations and factories.
//!
//! The in-memory repositories honor the same atomicity contract as the
//! Postgres adapters (the whole reserve decision happens under one lock), so
//! the concurrency properties of the ledger can be exercised without a
//! database.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use archiva::application::ledger::ContainerLedger;
use archiva::application::ports::{
    ContainerRepository, DocumentRepository, RepositoryError, ReserveOutcome,
};
use archiva::application::use_cases::{
    CreateDocumentUseCase, GetDocumentUseCase, PurgeDocumentUseCase, RestoreDocumentUseCase,
    ServeDocumentUseCase, TrashDocumentUseCase, UpdateDocumentUseCase,
};
use archiva::domain::entities::{Container, Document};
use archiva::domain::value_objects::{
    AreaId, ContainerId, ContainerState, ContentDigest, DocumentId, DocumentTypeId,
};
use archiva::dto::CreateDocumentRequest;
use archiva::infrastructure::storage::LocalBlobStore;

/// In-memory document repository over a mutex-held map
#[derive(Default)]
pub struct MemoryDocumentRepository {
    docs: Mutex<HashMap<DocumentId, Document>>,
}

impl MemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folio sum over non-trashed documents filed in `container_id`, the
    /// quantity the ledger total must always equal
    pub fn active_folio_sum(&self, container_id: &ContainerId) -> u32 {
        let docs = self.docs.lock().unwrap();
        docs.values()
            .filter(|d| !d.is_trashed() && d.container_id() == Some(container_id))
            .map(|d| d.folio_count().get())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocumentRepository {
    async fn insert(&self, document: &Document) -> Result<(), RepositoryError> {
        let mut docs = self.docs.lock().unwrap();
        if docs.contains_key(document.id()) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate document id {}",
                document.id()
            )));
        }
        docs.insert(*document.id(), document.clone());
        Ok(())
    }

    async fn save(&self, document: &Document) -> Result<(), RepositoryError> {
        self.docs
            .lock()
            .unwrap()
            .insert(*document.id(), document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        Ok(self.docs.lock().unwrap().get(id).cloned())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        self.docs.lock().unwrap().remove(id);
        Ok(())
    }

    async fn count_digest_references(
        &self,
        digest: &ContentDigest,
        exclude: &DocumentId,
    ) -> Result<i64, RepositoryError> {
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .values()
            .filter(|d| d.id() != exclude && d.blob().map(|b| b.digest()) == Some(digest))
            .count() as i64)
    }

    async fn digest_referenced(&self, digest: &ContentDigest) -> Result<bool, RepositoryError> {
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .values()
            .any(|d| d.blob().map(|b| b.digest()) == Some(digest)))
    }

    async fn record_view(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        let mut docs = self.docs.lock().unwrap();
        if let Some(doc) = docs.get(id) {
            let bumped = Document::reconstruct(
                *doc.id(),
                doc.name().to_string(),
                doc.subject().map(str::to_string),
                doc.document_date(),
                doc.folio_count(),
                doc.blob().cloned(),
                doc.container_id().copied(),
                *doc.doc_type_id(),
                *doc.area_id(),
                doc.dest_area_id().copied(),
                doc.status(),
                doc.is_trashed(),
                doc.trashed_at(),
                doc.trashed_by().map(str::to_string),
                doc.query_count() + 1,
                Some(Utc::now()),
                doc.created_at(),
                doc.created_by().to_string(),
                doc.updated_at(),
                doc.updated_by().to_string(),
            );
            docs.insert(*id, bumped);
        }
        Ok(())
    }
}

/// In-memory container repository; `reserve` decides and mutates under one
/// lock acquisition, mirroring the row-level atomicity of the SQL adapter
#[derive(Default)]
pub struct MemoryContainerRepository {
    containers: Mutex<HashMap<ContainerId, Container>>,
}

impl MemoryContainerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_of(&self, id: &ContainerId) -> u32 {
        self.containers
            .lock()
            .unwrap()
            .get(id)
            .map(|c| c.folio_total())
            .unwrap_or(0)
    }

    pub fn state_of(&self, id: &ContainerId) -> Option<ContainerState> {
        self.containers.lock().unwrap().get(id).map(|c| c.state())
    }
}

fn with_total(container: &Container, total: u32, state: ContainerState) -> Container {
    Container::reconstruct(
        *container.id(),
        container.name().to_string(),
        container.description().map(str::to_string),
        *container.area_id(),
        *container.doc_type_id(),
        total,
        container.location().map(str::to_string),
        state,
        container.is_trashed(),
        container.created_at(),
        Utc::now(),
    )
}

#[async_trait]
impl ContainerRepository for MemoryContainerRepository {
    async fn insert(&self, container: &Container) -> Result<(), RepositoryError> {
        let mut containers = self.containers.lock().unwrap();
        if containers.values().any(|c| c.name() == container.name()) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "container name already in use: {}",
                container.name()
            )));
        }
        containers.insert(*container.id(), container.clone());
        Ok(())
    }

    async fn save(&self, container: &Container) -> Result<(), RepositoryError> {
        let mut containers = self.containers.lock().unwrap();
        // Administrative edits never touch the running total
        let total = containers
            .get(container.id())
            .map(|c| c.folio_total())
            .unwrap_or(container.folio_total());
        containers.insert(*container.id(), with_total(container, total, container.state()));
        Ok(())
    }

    async fn find_by_id(&self, id: &ContainerId) -> Result<Option<Container>, RepositoryError> {
        Ok(self.containers.lock().unwrap().get(id).cloned())
    }

    async fn reserve(
        &self,
        id: &ContainerId,
        delta: u32,
        capacity_max: u32,
    ) -> Result<ReserveOutcome, RepositoryError> {
        let mut containers = self.containers.lock().unwrap();
        let Some(container) = containers.get(id) else {
            return Ok(ReserveOutcome::NotFound);
        };

        let current = container.folio_total();
        if container.state() == ContainerState::Closed {
            return Ok(ReserveOutcome::Closed { current });
        }
        if current + delta > capacity_max {
            return Ok(ReserveOutcome::CapacityExceeded { current });
        }

        let new_total = current + delta;
        let auto_closed = container.state() == ContainerState::Open && new_total == capacity_max;
        let new_state = if auto_closed {
            ContainerState::Closed
        } else {
            container.state()
        };
        let updated = with_total(container, new_total, new_state);
        containers.insert(*id, updated);

        Ok(ReserveOutcome::Reserved {
            new_total,
            auto_closed,
        })
    }

    async fn release(
        &self,
        id: &ContainerId,
        delta: u32,
    ) -> Result<Option<u32>, RepositoryError> {
        let mut containers = self.containers.lock().unwrap();
        let Some(container) = containers.get(id) else {
            return Ok(None);
        };

        let current = container.folio_total();
        if delta > current {
            return Err(RepositoryError::ConstraintViolation(format!(
                "release of {delta} folios would drive container {id} below zero"
            )));
        }

        let new_total = current - delta;
        let updated = with_total(container, new_total, container.state());
        containers.insert(*id, updated);

        Ok(Some(new_total))
    }
}

/// The registry wired over in-memory repositories and a real blob store
pub struct TestRegistry {
    pub documents: Arc<MemoryDocumentRepository>,
    pub containers: Arc<MemoryContainerRepository>,
    pub ledger: Arc<ContainerLedger>,
    pub blob_store: Arc<LocalBlobStore>,
    pub create: Arc<CreateDocumentUseCase>,
    pub update: Arc<UpdateDocumentUseCase>,
    pub trash: Arc<TrashDocumentUseCase>,
    pub restore: Arc<RestoreDocumentUseCase>,
    pub purge: Arc<PurgeDocumentUseCase>,
    pub get: Arc<GetDocumentUseCase>,
    pub serve: Arc<ServeDocumentUseCase>,
}

impl TestRegistry {
    pub async fn new(storage_root: std::path::PathBuf, capacity_max: u32) -> Self {
        let documents = Arc::new(MemoryDocumentRepository::new());
        let containers = Arc::new(MemoryContainerRepository::new());
        let ledger = Arc::new(ContainerLedger::new(
            Arc::clone(&containers) as Arc<dyn ContainerRepository>,
            capacity_max,
        ));

        let store = LocalBlobStore::with_durability(storage_root, false);
        store.init().await.expect("failed to init blob store");
        let blob_store = Arc::new(store);

        let documents_dyn = Arc::clone(&documents) as Arc<dyn DocumentRepository>;
        let blob_store_dyn =
            Arc::clone(&blob_store) as Arc<dyn archiva::application::ports::BlobStore>;

        Self {
            create: Arc::new(CreateDocumentUseCase::new(
                Arc::clone(&documents_dyn),
                Arc::clone(&ledger),
                Arc::clone(&blob_store_dyn),
            )),
            update: Arc::new(UpdateDocumentUseCase::new(
                Arc::clone(&documents_dyn),
                Arc::clone(&ledger),
                Arc::clone(&blob_store_dyn),
            )),
            trash: Arc::new(TrashDocumentUseCase::new(
                Arc::clone(&documents_dyn),
                Arc::clone(&ledger),
            )),
            restore: Arc::new(RestoreDocumentUseCase::new(
                Arc::clone(&documents_dyn),
                Arc::clone(&ledger),
            )),
            purge: Arc::new(PurgeDocumentUseCase::new(
                Arc::clone(&documents_dyn),
                Arc::clone(&ledger),
                Arc::clone(&blob_store_dyn),
            )),
            get: Arc::new(GetDocumentUseCase::new(Arc::clone(&documents_dyn))),
            serve: Arc::new(ServeDocumentUseCase::new(
                Arc::clone(&documents_dyn),
                Arc::clone(&blob_store_dyn),
            )),
            documents,
            containers,
            ledger,
            blob_store,
        }
    }

    /// Register an open container directly in the repository
    pub async fn seed_container(&self, name: &str, area: AreaId, doc_type: DocumentTypeId) -> Container {
        let container = Container::new(name.to_string(), None, area, doc_type, None).unwrap();
        self.containers.insert(&container).await.unwrap();
        container
    }
}

/// Factory for a create request bound to a container's area and type
pub fn create_request(
    name: &str,
    folios: u32,
    container: Option<&Container>,
    area: AreaId,
    doc_type: DocumentTypeId,
) -> CreateDocumentRequest {
    CreateDocumentRequest {
        name: name.to_string(),
        subject: None,
        document_date: None,
        folio_count: folios,
        container_id: container.map(|c| c.id().to_string()),
        doc_type_id: doc_type.to_string(),
        area_id: area.to_string(),
        dest_area_id: None,
        file_name: None,
        content_type: None,
    }
}
