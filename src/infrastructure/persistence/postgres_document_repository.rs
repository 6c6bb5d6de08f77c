use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::application::ports::{DocumentRepository, RepositoryError};
use crate::domain::entities::Document;
use crate::domain::value_objects::{
    AreaId, BlobRef, ContainerId, ContentDigest, DocumentId, DocumentStatus, DocumentTypeId,
    FolioCount,
};

pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    name: String,
    subject: Option<String>,
    document_date: Option<NaiveDate>,
    folio_count: i32,
    blob_digest: Option<String>,
    blob_path: Option<String>,
    blob_size: Option<i64>,
    content_type: Option<String>,
    container_id: Option<Uuid>,
    doc_type_id: Uuid,
    area_id: Uuid,
    dest_area_id: Option<Uuid>,
    status: String,
    trashed: bool,
    trashed_at: Option<DateTime<Utc>>,
    trashed_by: Option<String>,
    query_count: i64,
    last_queried_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
}

impl DocumentRow {
    fn into_domain(self) -> Result<Document, RepositoryError> {
        let blob = match (self.blob_digest, self.blob_path, self.blob_size) {
            (Some(digest), Some(path), Some(size)) => {
                let digest = ContentDigest::from_hex(digest)
                    .map_err(|e| RepositoryError::Internal(e.to_string()))?;
                Some(BlobRef::new(
                    digest,
                    path,
                    size as u64,
                    self.content_type,
                ))
            }
            _ => None,
        };

        let status: DocumentStatus = self
            .status
            .parse()
            .map_err(RepositoryError::Internal)?;
        let folio_count = FolioCount::from_i64(self.folio_count as i64)
            .map_err(|e| RepositoryError::Internal(e.to_string()))?;

        Ok(Document::reconstruct(
            DocumentId::from_uuid(self.id),
            self.name,
            self.subject,
            self.document_date,
            folio_count,
            blob,
            self.container_id.map(ContainerId::from_uuid),
            DocumentTypeId::from_uuid(self.doc_type_id),
            AreaId::from_uuid(self.area_id),
            self.dest_area_id.map(AreaId::from_uuid),
            status,
            self.trashed,
            self.trashed_at,
            self.trashed_by,
            self.query_count,
            self.last_queried_at,
            self.created_at,
            self.created_by,
            self.updated_at,
            self.updated_by,
        ))
    }
}

const SELECT_COLUMNS: &str = r#"
    id, name, subject, document_date, folio_count,
    blob_digest, blob_path, blob_size, content_type,
    container_id, doc_type_id, area_id, dest_area_id,
    status, trashed, trashed_at, trashed_by,
    query_count, last_queried_at,
    created_at, created_by, updated_at, updated_by
"#;

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn insert(&self, document: &Document) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, name, subject, document_date, folio_count,
                blob_digest, blob_path, blob_size, content_type,
                container_id, doc_type_id, area_id, dest_area_id,
                status, trashed, trashed_at, trashed_by,
                query_count, last_queried_at,
                created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.name())
        .bind(document.subject())
        .bind(document.document_date())
        .bind(document.folio_count().get() as i32)
        .bind(document.blob().map(|b| b.digest().as_hex().to_string()))
        .bind(document.blob().map(|b| b.rel_path().to_string()))
        .bind(document.blob().map(|b| b.size_bytes() as i64))
        .bind(document.blob().and_then(|b| b.content_type().map(String::from)))
        .bind(document.container_id().map(|c| *c.as_uuid()))
        .bind(document.doc_type_id().as_uuid())
        .bind(document.area_id().as_uuid())
        .bind(document.dest_area_id().map(|a| *a.as_uuid()))
        .bind(document.status().to_string())
        .bind(document.is_trashed())
        .bind(document.trashed_at())
        .bind(document.trashed_by())
        .bind(document.query_count())
        .bind(document.last_queried_at())
        .bind(document.created_at())
        .bind(document.created_by())
        .bind(document.updated_at())
        .bind(document.updated_by())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, document: &Document) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE documents SET
                name = $2, subject = $3, document_date = $4, folio_count = $5,
                blob_digest = $6, blob_path = $7, blob_size = $8, content_type = $9,
                container_id = $10, doc_type_id = $11, area_id = $12, dest_area_id = $13,
                status = $14, trashed = $15, trashed_at = $16, trashed_by = $17,
                updated_at = $18, updated_by = $19
            WHERE id = $1
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.name())
        .bind(document.subject())
        .bind(document.document_date())
        .bind(document.folio_count().get() as i32)
        .bind(document.blob().map(|b| b.digest().as_hex().to_string()))
        .bind(document.blob().map(|b| b.rel_path().to_string()))
        .bind(document.blob().map(|b| b.size_bytes() as i64))
        .bind(document.blob().and_then(|b| b.content_type().map(String::from)))
        .bind(document.container_id().map(|c| *c.as_uuid()))
        .bind(document.doc_type_id().as_uuid())
        .bind(document.area_id().as_uuid())
        .bind(document.dest_area_id().map(|a| *a.as_uuid()))
        .bind(document.status().to_string())
        .bind(document.is_trashed())
        .bind(document.trashed_at())
        .bind(document.trashed_by())
        .bind(document.updated_at())
        .bind(document.updated_by())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.into_domain()?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count_digest_references(
        &self,
        digest: &ContentDigest,
        exclude: &DocumentId,
    ) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM documents WHERE blob_digest = $1 AND id <> $2",
        )
        .bind(digest.as_hex())
        .bind(exclude.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn digest_referenced(&self, digest: &ContentDigest) -> Result<bool, RepositoryError> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM documents WHERE blob_digest = $1)",
        )
        .bind(digest.as_hex())
        .fetch_one(&self.pool)
        .await?;

        Ok(referenced)
    }

    async fn record_view(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE documents SET query_count = query_count + 1, last_queried_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
