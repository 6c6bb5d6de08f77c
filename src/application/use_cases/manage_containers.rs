use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use validator::Validate;

use crate::application::dto::{ContainerDto, CreateContainerRequest, UpdateContainerRequest};
use crate::application::ledger::{ContainerLedger, LedgerError};
use crate::application::ports::{ContainerRepository, RepositoryError};
use crate::application::use_cases::parse_id;
use crate::domain::entities::Container;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{AreaId, ContainerId, ContainerState, DocumentTypeId};

#[derive(Debug, Error)]
pub enum ContainerAdminError {
    #[error("Container not found: {0}")]
    NotFound(ContainerId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<LedgerError> for ContainerAdminError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(id) => ContainerAdminError::NotFound(id),
            LedgerError::Repository(e) => ContainerAdminError::Repository(e),
            other => ContainerAdminError::InvalidRequest(other.to_string()),
        }
    }
}

/// Use case: open a new container, empty and accepting folios
pub struct CreateContainerUseCase {
    containers: Arc<dyn ContainerRepository>,
    ledger: Arc<ContainerLedger>,
}

impl CreateContainerUseCase {
    pub fn new(containers: Arc<dyn ContainerRepository>, ledger: Arc<ContainerLedger>) -> Self {
        Self { containers, ledger }
    }

    pub async fn execute(
        &self,
        request: CreateContainerRequest,
    ) -> Result<ContainerDto, ContainerAdminError> {
        request
            .validate()
            .map_err(|e| ContainerAdminError::InvalidRequest(e.to_string()))?;

        let area_id = parse_id::<AreaId>(&request.area_id, "area_id")
            .map_err(ContainerAdminError::InvalidRequest)?;
        let doc_type_id = parse_id::<DocumentTypeId>(&request.doc_type_id, "doc_type_id")
            .map_err(ContainerAdminError::InvalidRequest)?;

        let container = Container::new(
            request.name,
            request.description,
            area_id,
            doc_type_id,
            request.location,
        )?;
        self.containers.insert(&container).await?;
        info!(container = %container.id(), name = container.name(), "container created");

        Ok(ContainerDto::from_container(
            container,
            self.ledger.capacity_max(),
        ))
    }
}

/// Use case: read a container's current total and state
pub struct GetContainerUseCase {
    ledger: Arc<ContainerLedger>,
}

impl GetContainerUseCase {
    pub fn new(ledger: Arc<ContainerLedger>) -> Self {
        Self { ledger }
    }

    pub async fn execute(&self, id: &ContainerId) -> Result<ContainerDto, ContainerAdminError> {
        let container = self.ledger.find(id).await?;
        Ok(ContainerDto::from_container(
            container,
            self.ledger.capacity_max(),
        ))
    }
}

/// Use case: administrative container edit. This is the only path that can
/// take a container out of the automatic Closed state.
pub struct UpdateContainerUseCase {
    containers: Arc<dyn ContainerRepository>,
    ledger: Arc<ContainerLedger>,
}

impl UpdateContainerUseCase {
    pub fn new(containers: Arc<dyn ContainerRepository>, ledger: Arc<ContainerLedger>) -> Self {
        Self { containers, ledger }
    }

    pub async fn execute(
        &self,
        id: &ContainerId,
        patch: UpdateContainerRequest,
    ) -> Result<ContainerDto, ContainerAdminError> {
        patch
            .validate()
            .map_err(|e| ContainerAdminError::InvalidRequest(e.to_string()))?;

        let mut container = self.ledger.find(id).await?;

        if let Some(name) = patch.name {
            container.set_name(name)?;
        }
        if let Some(description) = patch.description {
            container.set_description(Some(description));
        }
        if let Some(location) = patch.location {
            container.set_location(Some(location));
        }
        if let Some(state) = patch.state {
            let state: ContainerState = state
                .parse()
                .map_err(ContainerAdminError::InvalidRequest)?;
            if state != container.state() {
                info!(container = %id, from = %container.state(), to = %state,
                    "administrative container state change");
                container.set_state(state);
            }
        }
        if let Some(trashed) = patch.trashed {
            container.set_trashed(trashed);
        }

        self.containers.save(&container).await?;

        Ok(ContainerDto::from_container(
            container,
            self.ledger.capacity_max(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockContainerRepository;

    fn ledger(containers: MockContainerRepository) -> Arc<ContainerLedger> {
        Arc::new(ContainerLedger::new(Arc::new(containers), 500))
    }

    #[tokio::test]
    async fn test_create_container_starts_open() {
        let mut containers = MockContainerRepository::new();
        containers.expect_insert().times(1).returning(|_| Ok(()));

        let use_case = CreateContainerUseCase::new(
            Arc::new(containers),
            ledger(MockContainerRepository::new()),
        );
        let dto = use_case
            .execute(CreateContainerRequest {
                name: "AR-2024-007".to_string(),
                description: None,
                area_id: AreaId::new().to_string(),
                doc_type_id: DocumentTypeId::new().to_string(),
                location: Some("Depósito 2".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(dto.state, "OPEN");
        assert_eq!(dto.folio_total, 0);
        assert_eq!(dto.capacity_max, 500);
    }

    #[tokio::test]
    async fn test_admin_edit_reopens_closed_container() {
        let mut container = Container::new(
            "AR-1".to_string(),
            None,
            AreaId::new(),
            DocumentTypeId::new(),
            None,
        )
        .unwrap();
        container.set_state(ContainerState::Closed);
        let id = *container.id();

        let mut lookup = MockContainerRepository::new();
        lookup
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(container.clone())));

        let mut writer = MockContainerRepository::new();
        writer
            .expect_save()
            .times(1)
            .withf(|c| c.state() == ContainerState::Open)
            .returning(|_| Ok(()));

        let use_case = UpdateContainerUseCase::new(Arc::new(writer), ledger(lookup));

        let patch = UpdateContainerRequest {
            state: Some("OPEN".to_string()),
            ..Default::default()
        };
        let dto = use_case.execute(&id, patch).await.unwrap();
        assert_eq!(dto.state, "OPEN");
    }

    #[tokio::test]
    async fn test_get_container_not_found() {
        let mut containers = MockContainerRepository::new();
        containers.expect_find_by_id().times(1).returning(|_| Ok(None));

        let use_case = GetContainerUseCase::new(ledger(containers));
        let err = use_case.execute(&ContainerId::new()).await.unwrap_err();
        assert!(matches!(err, ContainerAdminError::NotFound(_)));
    }
}
