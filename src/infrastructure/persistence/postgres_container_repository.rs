use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::application::ports::{ContainerRepository, RepositoryError, ReserveOutcome};
use crate::domain::entities::Container;
use crate::domain::value_objects::{AreaId, ContainerId, ContainerState, DocumentTypeId};

pub struct PostgresContainerRepository {
    pool: PgPool,
}

impl PostgresContainerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ContainerRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    area_id: Uuid,
    doc_type_id: Uuid,
    folio_total: i32,
    location: Option<String>,
    state: String,
    trashed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ContainerRow {
    fn into_domain(self) -> Result<Container, RepositoryError> {
        let state: ContainerState = self.state.parse().map_err(RepositoryError::Internal)?;

        Ok(Container::reconstruct(
            ContainerId::from_uuid(self.id),
            self.name,
            self.description,
            AreaId::from_uuid(self.area_id),
            DocumentTypeId::from_uuid(self.doc_type_id),
            self.folio_total as u32,
            self.location,
            state,
            self.trashed,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[async_trait]
impl ContainerRepository for PostgresContainerRepository {
    async fn insert(&self, container: &Container) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO containers (
                id, name, description, area_id, doc_type_id,
                folio_total, location, state, trashed, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(container.id().as_uuid())
        .bind(container.name())
        .bind(container.description())
        .bind(container.area_id().as_uuid())
        .bind(container.doc_type_id().as_uuid())
        .bind(container.folio_total() as i32)
        .bind(container.location())
        .bind(container.state().to_string())
        .bind(container.is_trashed())
        .bind(container.created_at())
        .bind(container.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::ConstraintViolation(format!(
                    "container name already in use: {}",
                    container.name()
                ))
            }
            _ => RepositoryError::Database(e),
        })?;

        Ok(())
    }

    async fn save(&self, container: &Container) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE containers SET
                name = $2, description = $3, location = $4,
                state = $5, trashed = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(container.id().as_uuid())
        .bind(container.name())
        .bind(container.description())
        .bind(container.location())
        .bind(container.state().to_string())
        .bind(container.is_trashed())
        .bind(container.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ContainerId) -> Result<Option<Container>, RepositoryError> {
        let row = sqlx::query_as::<_, ContainerRow>(
            r#"
            SELECT id, name, description, area_id, doc_type_id,
                   folio_total, location, state, trashed, created_at, updated_at
            FROM containers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.into_domain()?)),
            None => Ok(None),
        }
    }

    async fn reserve(
        &self,
        id: &ContainerId,
        delta: u32,
        capacity_max: u32,
    ) -> Result<ReserveOutcome, RepositoryError> {
        // Single conditional UPDATE: the check and the increment commit
        // together, so two racing reservations can never both pass the
        // capacity guard. Reaching the ceiling flips an Open container to
        // Closed in the same statement.
        let updated = sqlx::query_as::<_, (i32, String)>(
            r#"
            UPDATE containers
            SET folio_total = folio_total + $2,
                state = CASE
                    WHEN state = 'OPEN' AND folio_total + $2 = $3 THEN 'CLOSED'
                    ELSE state
                END,
                updated_at = NOW()
            WHERE id = $1
              AND state <> 'CLOSED'
              AND folio_total + $2 <= $3
            RETURNING folio_total, state
            "#,
        )
        .bind(id.as_uuid())
        .bind(delta as i32)
        .bind(capacity_max as i32)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((new_total, state)) = updated {
            return Ok(ReserveOutcome::Reserved {
                new_total: new_total as u32,
                auto_closed: state == "CLOSED",
            });
        }

        // The guard rejected the row; read it back to tell the caller why
        let current = sqlx::query_as::<_, (i32, String)>(
            "SELECT folio_total, state FROM containers WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match current {
            None => Ok(ReserveOutcome::NotFound),
            Some((total, state)) if state == "CLOSED" => Ok(ReserveOutcome::Closed {
                current: total as u32,
            }),
            Some((total, _)) => Ok(ReserveOutcome::CapacityExceeded {
                current: total as u32,
            }),
        }
    }

    async fn release(
        &self,
        id: &ContainerId,
        delta: u32,
    ) -> Result<Option<u32>, RepositoryError> {
        let new_total: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE containers
            SET folio_total = folio_total - $2, updated_at = NOW()
            WHERE id = $1
            RETURNING folio_total
            "#,
        )
        .bind(id.as_uuid())
        .bind(delta as i32)
        .fetch_optional(&self.pool)
        .await?;

        Ok(new_total.map(|t| t as u32))
    }
}
