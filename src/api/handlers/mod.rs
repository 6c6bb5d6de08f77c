pub mod containers;
pub mod documents;
pub mod health;
pub mod serve;

pub use containers::{create_container_handler, get_container_handler, update_container_handler};
pub use documents::{
    create_document_handler, get_document_handler, purge_document_handler,
    restore_document_handler, trash_document_handler, update_document_handler,
};
pub use health::{health_handler, readiness_handler};
pub use serve::{download_document_handler, view_document_handler};

use axum::http::HeaderMap;

/// Actor id supplied by the authentication collaborator
pub(crate) fn actor_from(headers: &HeaderMap) -> String {
    headers
        .get("x-actor-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("system")
        .to_string()
}
