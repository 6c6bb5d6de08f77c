use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::application::ports::{ContainerRepository, RepositoryError, ReserveOutcome};
use crate::domain::entities::Container;
use crate::domain::value_objects::{AreaId, ContainerId, ContainerState, DocumentTypeId};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Container not found: {0}")]
    NotFound(ContainerId),

    #[error("Container {0} is closed")]
    Closed(ContainerId),

    #[error("Capacity exceeded for container {id}: {current} + {requested} > {max}")]
    CapacityExceeded {
        id: ContainerId,
        current: u32,
        max: u32,
        requested: u32,
    },

    #[error("Document area does not match the container's owning area")]
    AreaMismatch,

    #[error("Document type is not accepted by the container")]
    TypeMismatch,

    #[error("Container {0} is trashed")]
    ContainerTrashed(ContainerId),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result of a successful capacity reservation
#[derive(Debug, Clone, Copy)]
pub struct Reservation {
    pub new_total: u32,
    /// Set when this reservation filled the container to the ceiling and
    /// flipped it from Open to Closed
    pub auto_closed: bool,
}

/// Capacity bookkeeping over containers.
///
/// `reserve` and `release` are the only paths that may move a running total;
/// the repository makes each call atomic against concurrent writers, so two
/// racing reservations can never both fit into the same remaining capacity.
pub struct ContainerLedger {
    containers: Arc<dyn ContainerRepository>,
    capacity_max: u32,
}

impl ContainerLedger {
    pub fn new(containers: Arc<dyn ContainerRepository>, capacity_max: u32) -> Self {
        Self {
            containers,
            capacity_max,
        }
    }

    pub fn capacity_max(&self) -> u32 {
        self.capacity_max
    }

    pub async fn find(&self, id: &ContainerId) -> Result<Container, LedgerError> {
        self.containers
            .find_by_id(id)
            .await?
            .ok_or(LedgerError::NotFound(*id))
    }

    /// Current running total and state
    pub async fn current(&self, id: &ContainerId) -> Result<(u32, ContainerState), LedgerError> {
        let container = self.find(id).await?;
        Ok((container.folio_total(), container.state()))
    }

    /// Area/type affinity check, applied at assignment time only. Editing a
    /// container's attributes later does not re-validate documents already
    /// assigned to it.
    pub fn check_assignable(
        container: &Container,
        area_id: &AreaId,
        doc_type_id: &DocumentTypeId,
    ) -> Result<(), LedgerError> {
        if container.is_trashed() {
            return Err(LedgerError::ContainerTrashed(*container.id()));
        }
        if container.area_id() != area_id {
            return Err(LedgerError::AreaMismatch);
        }
        if container.doc_type_id() != doc_type_id {
            return Err(LedgerError::TypeMismatch);
        }
        Ok(())
    }

    /// Atomically claim `folios` of capacity on the container
    pub async fn reserve(
        &self,
        id: &ContainerId,
        folios: u32,
    ) -> Result<Reservation, LedgerError> {
        match self
            .containers
            .reserve(id, folios, self.capacity_max)
            .await?
        {
            ReserveOutcome::Reserved {
                new_total,
                auto_closed,
            } => {
                debug!(container = %id, folios, new_total, auto_closed, "reserved folios");
                Ok(Reservation {
                    new_total,
                    auto_closed,
                })
            }
            ReserveOutcome::Closed { .. } => Err(LedgerError::Closed(*id)),
            ReserveOutcome::CapacityExceeded { current } => Err(LedgerError::CapacityExceeded {
                id: *id,
                current,
                max: self.capacity_max,
                requested: folios,
            }),
            ReserveOutcome::NotFound => Err(LedgerError::NotFound(*id)),
        }
    }

    /// Return `folios` of capacity to the container. Unconditional: a release
    /// never fails a capacity check and never changes state.
    pub async fn release(&self, id: &ContainerId, folios: u32) -> Result<u32, LedgerError> {
        match self.containers.release(id, folios).await? {
            Some(new_total) => {
                debug!(container = %id, folios, new_total, "released folios");
                Ok(new_total)
            }
            None => Err(LedgerError::NotFound(*id)),
        }
    }
}
