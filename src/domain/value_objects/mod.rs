mod blob_ref;
mod container_id;
mod container_state;
mod content_digest;
mod document_id;
mod document_status;
mod folio_count;
mod refs;

pub use blob_ref::BlobRef;
pub use container_id::ContainerId;
pub use container_state::ContainerState;
pub use content_digest::ContentDigest;
pub use document_id::DocumentId;
pub use document_status::DocumentStatus;
pub use folio_count::FolioCount;
pub use refs::{AreaId, DocumentTypeId};
