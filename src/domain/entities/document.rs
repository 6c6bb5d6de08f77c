use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::DomainError,
    value_objects::{
        AreaId, BlobRef, ContainerId, DocumentId, DocumentStatus, DocumentTypeId, FolioCount,
    },
};

/// Document aggregate root: a logical registry record that may carry a blob
/// reference and may be filed into a container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    name: String,
    subject: Option<String>,
    document_date: Option<NaiveDate>,
    folio_count: FolioCount,
    blob: Option<BlobRef>,
    container_id: Option<ContainerId>,
    doc_type_id: DocumentTypeId,
    area_id: AreaId,
    dest_area_id: Option<AreaId>,
    status: DocumentStatus,
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

/// Metadata needed to register a new document
pub struct NewDocument {
    pub name: String,
    pub subject: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub folio_count: FolioCount,
    pub container_id: Option<ContainerId>,
    pub doc_type_id: DocumentTypeId,
    pub area_id: AreaId,
    pub dest_area_id: Option<AreaId>,
}

impl Document {
    pub fn new(meta: NewDocument, actor: &str) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new(),
            name: meta.name,
            subject: meta.subject,
            document_date: meta.document_date,
            folio_count: meta.folio_count,
            blob: None,
            container_id: meta.container_id,
            doc_type_id: meta.doc_type_id,
            area_id: meta.area_id,
            dest_area_id: meta.dest_area_id,
            status: DocumentStatus::Registered,
            trashed: false,
            trashed_at: None,
            trashed_by: None,
            query_count: 0,
            last_queried_at: None,
            created_at: now,
            created_by: actor.to_string(),
            updated_at: now,
            updated_by: actor.to_string(),
        }
    }

    /// Reconstruct from storage
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: DocumentId,
        name: String,
        subject: Option<String>,
        document_date: Option<NaiveDate>,
        folio_count: FolioCount,
        blob: Option<BlobRef>,
        container_id: Option<ContainerId>,
        doc_type_id: DocumentTypeId,
        area_id: AreaId,
        dest_area_id: Option<AreaId>,
        status: DocumentStatus,
        trashed: bool,
        trashed_at: Option<DateTime<Utc>>,
        trashed_by: Option<String>,
        query_count: i64,
        last_queried_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        created_by: String,
        updated_at: DateTime<Utc>,
        updated_by: String,
    ) -> Self {
        Self {
            id,
            name,
            subject,
            document_date,
            folio_count,
            blob,
            container_id,
            doc_type_id,
            area_id,
            dest_area_id,
            status,
            trashed,
            trashed_at,
            trashed_by,
            query_count,
            last_queried_at,
            created_at,
            created_by,
            updated_at,
            updated_by,
        }
    }

    pub fn attach_blob(&mut self, blob: BlobRef, actor: &str) {
        self.blob = Some(blob);
        self.touch(actor);
    }

    pub fn set_name(&mut self, name: String, actor: &str) {
        self.name = name;
        self.touch(actor);
    }

    pub fn set_subject(&mut self, subject: Option<String>, actor: &str) {
        self.subject = subject;
        self.touch(actor);
    }

    pub fn set_document_date(&mut self, date: Option<NaiveDate>, actor: &str) {
        self.document_date = date;
        self.touch(actor);
    }

    pub fn set_status(&mut self, status: DocumentStatus, actor: &str) {
        self.status = status;
        self.touch(actor);
    }

    pub fn set_dest_area(&mut self, dest: Option<AreaId>, actor: &str) {
        self.dest_area_id = dest;
        self.touch(actor);
    }

    pub fn set_folio_count(&mut self, folio_count: FolioCount, actor: &str) {
        self.folio_count = folio_count;
        self.touch(actor);
    }

    pub fn set_container(&mut self, container_id: Option<ContainerId>, actor: &str) {
        self.container_id = container_id;
        self.touch(actor);
    }

    /// Move to the trash. Folio bookkeeping is the registry's responsibility.
    pub fn trash(&mut self, actor: &str) -> Result<(), DomainError> {
        if self.trashed {
            return Err(DomainError::AlreadyTrashed);
        }
        self.trashed = true;
        self.trashed_at = Some(Utc::now());
        self.trashed_by = Some(actor.to_string());
        self.touch(actor);
        Ok(())
    }

    pub fn restore(&mut self, actor: &str) -> Result<(), DomainError> {
        if !self.trashed {
            return Err(DomainError::NotTrashed);
        }
        self.trashed = false;
        self.trashed_at = None;
        self.trashed_by = None;
        self.touch(actor);
        Ok(())
    }

    fn touch(&mut self, actor: &str) {
        self.updated_at = Utc::now();
        self.updated_by = actor.to_string();
    }

    // Getters
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn document_date(&self) -> Option<NaiveDate> {
        self.document_date
    }

    pub fn folio_count(&self) -> FolioCount {
        self.folio_count
    }

    pub fn blob(&self) -> Option<&BlobRef> {
        self.blob.as_ref()
    }

    pub fn container_id(&self) -> Option<&ContainerId> {
        self.container_id.as_ref()
    }

    pub fn doc_type_id(&self) -> &DocumentTypeId {
        &self.doc_type_id
    }

    pub fn area_id(&self) -> &AreaId {
        &self.area_id
    }

    pub fn dest_area_id(&self) -> Option<&AreaId> {
        self.dest_area_id.as_ref()
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn is_trashed(&self) -> bool {
        self.trashed
    }

    pub fn trashed_at(&self) -> Option<DateTime<Utc>> {
        self.trashed_at
    }

    pub fn trashed_by(&self) -> Option<&str> {
        self.trashed_by.as_deref()
    }

    pub fn query_count(&self) -> i64 {
        self.query_count
    }

    pub fn last_queried_at(&self) -> Option<DateTime<Utc>> {
        self.last_queried_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn updated_by(&self) -> &str {
        &self.updated_by
    }
}
