use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::{
    create_container_handler, create_document_handler, download_document_handler,
    get_container_handler, get_document_handler, health_handler, purge_document_handler,
    readiness_handler, restore_document_handler, trash_document_handler,
    update_container_handler, update_document_handler, view_document_handler,
};
use crate::api::openapi::ApiDoc;
use crate::application::use_cases::{
    CreateContainerUseCase, CreateDocumentUseCase, GetContainerUseCase, GetDocumentUseCase,
    PurgeDocumentUseCase, RestoreDocumentUseCase, ServeDocumentUseCase, TrashDocumentUseCase,
    UpdateContainerUseCase, UpdateDocumentUseCase,
};

/// Application state container
pub struct AppState {
    pub pool: Arc<PgPool>,
    pub create_document: Arc<CreateDocumentUseCase>,
    pub get_document: Arc<GetDocumentUseCase>,
    pub update_document: Arc<UpdateDocumentUseCase>,
    pub trash_document: Arc<TrashDocumentUseCase>,
    pub restore_document: Arc<RestoreDocumentUseCase>,
    pub purge_document: Arc<PurgeDocumentUseCase>,
    pub serve_document: Arc<ServeDocumentUseCase>,
    pub create_container: Arc<CreateContainerUseCase>,
    pub get_container: Arc<GetContainerUseCase>,
    pub update_container: Arc<UpdateContainerUseCase>,
    pub max_upload_bytes: usize,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health checks (no body limit concerns)
        .route("/health", get(health_handler))
        .route(
            "/health/ready",
            get(readiness_handler).with_state(Arc::clone(&state.pool)),
        )
        // Document registry
        .route(
            "/v1/documents",
            post(create_document_handler).with_state(Arc::clone(&state.create_document)),
        )
        .route(
            "/v1/documents/{id}",
            get(get_document_handler).with_state(Arc::clone(&state.get_document)),
        )
        .route(
            "/v1/documents/{id}",
            patch(update_document_handler).with_state(Arc::clone(&state.update_document)),
        )
        .route(
            "/v1/documents/{id}",
            delete(trash_document_handler).with_state(Arc::clone(&state.trash_document)),
        )
        .route(
            "/v1/documents/{id}/restore",
            post(restore_document_handler).with_state(Arc::clone(&state.restore_document)),
        )
        .route(
            "/v1/documents/{id}/permanent",
            delete(purge_document_handler).with_state(Arc::clone(&state.purge_document)),
        )
        // Streaming gateway
        .route(
            "/v1/documents/{id}/download",
            get(download_document_handler).with_state(Arc::clone(&state.serve_document)),
        )
        .route(
            "/v1/documents/{id}/view",
            get(view_document_handler).with_state(Arc::clone(&state.serve_document)),
        )
        // Container ledger
        .route(
            "/v1/containers",
            post(create_container_handler).with_state(Arc::clone(&state.create_container)),
        )
        .route(
            "/v1/containers/{id}",
            get(get_container_handler).with_state(Arc::clone(&state.get_container)),
        )
        .route(
            "/v1/containers/{id}",
            patch(update_container_handler).with_state(Arc::clone(&state.update_container)),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(RequestBodyLimitLayer::new(state.max_upload_bytes))
        .layer(CorsLayer::permissive())
}
