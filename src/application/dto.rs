use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::entities::{Container, Document};

/// DTO for document metadata responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentDto {
    pub id: String,
    pub name: String,
    pub subject: Option<String>,
    pub document_date: Option<String>,
    pub folio_count: u32,
    pub digest: Option<String>,
    pub size_bytes: Option<u64>,
    pub content_type: Option<String>,
    pub container_id: Option<String>,
    pub doc_type_id: String,
    pub area_id: String,
    pub dest_area_id: Option<String>,
    pub status: String,
    pub trashed: bool,
    pub trashed_at: Option<String>,
    pub trashed_by: Option<String>,
    pub query_count: i64,
    pub last_queried_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl From<Document> for DocumentDto {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id().to_string(),
            name: doc.name().to_string(),
            subject: doc.subject().map(|s| s.to_string()),
            document_date: doc.document_date().map(|d| d.to_string()),
            folio_count: doc.folio_count().get(),
            digest: doc.blob().map(|b| b.digest().to_string()),
            size_bytes: doc.blob().map(|b| b.size_bytes()),
            content_type: doc
                .blob()
                .and_then(|b| b.content_type().map(|c| c.to_string())),
            container_id: doc.container_id().map(|c| c.to_string()),
            doc_type_id: doc.doc_type_id().to_string(),
            area_id: doc.area_id().to_string(),
            dest_area_id: doc.dest_area_id().map(|a| a.to_string()),
            status: doc.status().to_string(),
            trashed: doc.is_trashed(),
            trashed_at: doc.trashed_at().map(|t| t.to_rfc3339()),
            trashed_by: doc.trashed_by().map(|a| a.to_string()),
            query_count: doc.query_count(),
            last_queried_at: doc.last_queried_at().map(|t| t.to_rfc3339()),
            created_at: doc.created_at().to_rfc3339(),
            created_by: doc.created_by().to_string(),
            updated_at: doc.updated_at().to_rfc3339(),
            updated_by: doc.updated_by().to_string(),
        }
    }
}

/// DTO for registering a document. Identifier fields are raw strings here;
/// parsing happens in the use case before any transactional work.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub subject: Option<String>,
    /// ISO date (YYYY-MM-DD)
    pub document_date: Option<String>,
    #[validate(range(min = 1))]
    pub folio_count: u32,
    pub container_id: Option<String>,
    pub doc_type_id: String,
    pub area_id: String,
    pub dest_area_id: Option<String>,
    /// Original filename of the uploaded blob, extension included. Presence
    /// marks the request body as a file stream.
    #[validate(length(min = 1, max = 255))]
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Patch DTO for document updates. Absent fields stay unchanged;
/// `clear_container` removes the container reference explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub subject: Option<String>,
    pub document_date: Option<String>,
    #[validate(range(min = 1))]
    pub folio_count: Option<u32>,
    pub container_id: Option<String>,
    #[serde(default)]
    pub clear_container: bool,
    pub status: Option<String>,
    pub dest_area_id: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// DTO for container responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContainerDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub area_id: String,
    pub doc_type_id: String,
    pub folio_total: u32,
    pub capacity_max: u32,
    pub location: Option<String>,
    pub state: String,
    pub trashed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ContainerDto {
    pub fn from_container(container: Container, capacity_max: u32) -> Self {
        Self {
            id: container.id().to_string(),
            name: container.name().to_string(),
            description: container.description().map(|d| d.to_string()),
            area_id: container.area_id().to_string(),
            doc_type_id: container.doc_type_id().to_string(),
            folio_total: container.folio_total(),
            capacity_max,
            location: container.location().map(|l| l.to_string()),
            state: container.state().to_string(),
            trashed: container.is_trashed(),
            created_at: container.created_at().to_rfc3339(),
            updated_at: container.updated_at().to_rfc3339(),
        }
    }
}

/// DTO for creating a container
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateContainerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub area_id: String,
    pub doc_type_id: String,
    #[validate(length(max = 255))]
    pub location: Option<String>,
}

/// Administrative patch for a container. State changes made here are the only
/// way out of the automatic Closed state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateContainerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub state: Option<String>,
    pub trashed: Option<bool>,
}
