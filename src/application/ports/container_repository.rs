use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};

use crate::domain::entities::Container;
use crate::domain::value_objects::ContainerId;

use super::RepositoryError;

/// Result of an atomic capacity reservation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// Total incremented; `auto_closed` is set when this reservation brought
    /// an Open container exactly to the ceiling
    Reserved { new_total: u32, auto_closed: bool },
    /// Container is Closed and the delta was positive
    Closed { current: u32 },
    /// `current + delta` would exceed the ceiling; nothing changed
    CapacityExceeded { current: u32 },
    NotFound,
}

/// Port for container persistence.
///
/// `reserve` is the single serialization point for capacity: implementations
/// must make the check-and-increment atomic against concurrent callers (a
/// conditional UPDATE on the row, or a mutex-held critical section).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContainerRepository: Send + Sync {
    async fn insert(&self, container: &Container) -> Result<(), RepositoryError>;

    /// Persist administrative edits (name, state, trashed flag, ...)
    async fn save(&self, container: &Container) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &ContainerId) -> Result<Option<Container>, RepositoryError>;

    /// Atomic capacity-checked increment of the running total. Flips an Open
    /// container to Closed when the new total reaches `capacity_max`.
    async fn reserve(
        &self,
        id: &ContainerId,
        delta: u32,
        capacity_max: u32,
    ) -> Result<ReserveOutcome, RepositoryError>;

    /// Unconditional decrement of the running total; returns the new total.
    /// `None` when the container does not exist.
    async fn release(&self, id: &ContainerId, delta: u32)
        -> Result<Option<u32>, RepositoryError>;
}
