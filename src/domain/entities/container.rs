use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::DomainError,
    value_objects::{AreaId, ContainerId, ContainerState, DocumentTypeId},
};

/// Container ("archivador") aggregate root: a capacity-bounded physical
/// grouping of documents with an area/type affinity.
///
/// `folio_total` mirrors the sum of folio counts of all non-trashed documents
/// filed here. The running total itself is adjusted through the ledger's
/// atomic reserve/release primitives; this entity only carries the value read
/// back from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    id: ContainerId,
    name: String,
    description: Option<String>,
    area_id: AreaId,
    doc_type_id: DocumentTypeId,
    folio_total: u32,
    location: Option<String>,
    state: ContainerState,
    trashed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Container {
    pub fn new(
        name: String,
        description: Option<String>,
        area_id: AreaId,
        doc_type_id: DocumentTypeId,
        location: Option<String>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyContainerName);
        }
        let now = Utc::now();
        Ok(Self {
            id: ContainerId::new(),
            name,
            description,
            area_id,
            doc_type_id,
            folio_total: 0,
            location,
            state: ContainerState::Open,
            trashed: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstruct from storage
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: ContainerId,
        name: String,
        description: Option<String>,
        area_id: AreaId,
        doc_type_id: DocumentTypeId,
        folio_total: u32,
        location: Option<String>,
        state: ContainerState,
        trashed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            area_id,
            doc_type_id,
            folio_total,
            location,
            state,
            trashed,
            created_at,
            updated_at,
        }
    }

    /// Administrative state edit. The automatic Open -> Closed transition is
    /// owned by the ledger; everything else goes through here.
    pub fn set_state(&mut self, state: ContainerState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    pub fn set_name(&mut self, name: String) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyContainerName);
        }
        self.name = name;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
        self.updated_at = Utc::now();
    }

    pub fn set_trashed(&mut self, trashed: bool) {
        self.trashed = trashed;
        self.updated_at = Utc::now();
    }

    /// Whether a document with these attributes may be filed here
    pub fn accepts(&self, area_id: &AreaId, doc_type_id: &DocumentTypeId) -> bool {
        self.area_id == *area_id && self.doc_type_id == *doc_type_id
    }

    // Getters
    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn area_id(&self) -> &AreaId {
        &self.area_id
    }

    pub fn doc_type_id(&self) -> &DocumentTypeId {
        &self.doc_type_id
    }

    pub fn folio_total(&self) -> u32 {
        self.folio_total
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn is_trashed(&self) -> bool {
        self.trashed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_container() -> Container {
        Container::new(
            "AR-2024-001".to_string(),
            Some("Actas de sesiones 2024".to_string()),
            AreaId::new(),
            DocumentTypeId::new(),
            Some("Estante 3, fila B".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_container_opens_empty() {
        let container = test_container();
        assert_eq!(container.state(), ContainerState::Open);
        assert_eq!(container.folio_total(), 0);
        assert!(!container.is_trashed());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Container::new(
            "  ".to_string(),
            None,
            AreaId::new(),
            DocumentTypeId::new(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::EmptyContainerName));
    }

    #[test]
    fn test_accepts_matching_area_and_type() {
        let container = test_container();
        assert!(container.accepts(container.area_id(), container.doc_type_id()));
        assert!(!container.accepts(&AreaId::new(), container.doc_type_id()));
        assert!(!container.accepts(container.area_id(), &DocumentTypeId::new()));
    }

    #[test]
    fn test_admin_state_edit() {
        let mut container = test_container();
        container.set_state(ContainerState::InCustody);
        assert_eq!(container.state(), ContainerState::InCustody);
    }
}
