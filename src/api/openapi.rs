use utoipa::OpenApi;

use crate::application::dto::{
    ContainerDto, CreateContainerRequest, CreateDocumentRequest, DocumentDto,
    UpdateContainerRequest, UpdateDocumentRequest,
};

/// OpenAPI specification for the document registry
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Archiva API",
        version = "0.1.0",
        description = "Municipal document blob storage with container capacity accounting and byte-range streaming"
    ),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::health::readiness_handler,
        crate::api::handlers::documents::create_document_handler,
        crate::api::handlers::documents::get_document_handler,
        crate::api::handlers::documents::update_document_handler,
        crate::api::handlers::documents::trash_document_handler,
        crate::api::handlers::documents::restore_document_handler,
        crate::api::handlers::documents::purge_document_handler,
        crate::api::handlers::serve::download_document_handler,
        crate::api::handlers::serve::view_document_handler,
        crate::api::handlers::containers::create_container_handler,
        crate::api::handlers::containers::get_container_handler,
        crate::api::handlers::containers::update_container_handler,
    ),
    components(schemas(
        DocumentDto,
        CreateDocumentRequest,
        UpdateDocumentRequest,
        ContainerDto,
        CreateContainerRequest,
        UpdateContainerRequest,
    ))
)]
pub struct ApiDoc;
