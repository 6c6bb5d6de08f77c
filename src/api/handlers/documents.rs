use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use futures_util::StreamExt;
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::api::handlers::actor_from;
use crate::application::dto::{CreateDocumentRequest, DocumentDto, UpdateDocumentRequest};
use crate::application::use_cases::{
    CreateDocumentUseCase, GetDocumentUseCase, IncomingFile, PurgeDocumentUseCase,
    RestoreDocumentUseCase, TrashDocumentUseCase, UpdateDocumentUseCase,
};
use crate::domain::value_objects::DocumentId;

fn parse_document_id(raw: &str) -> Result<DocumentId, ApiError> {
    raw.parse::<DocumentId>()
        .map_err(|e| ApiError::bad_request(format!("Invalid document ID: {}", e)))
}

/// Wrap the raw request body as the uploaded file when the request names one
fn incoming_file(
    file_name: Option<&str>,
    content_type: Option<&str>,
    body: Body,
) -> Option<IncomingFile> {
    let file_name = file_name?;
    let stream = body.into_data_stream();
    let reader = Box::pin(tokio_util::io::StreamReader::new(
        stream.map(|result| result.map_err(std::io::Error::other)),
    ));
    Some(IncomingFile {
        original_name: file_name.to_string(),
        content_type: content_type.map(str::to_string),
        reader,
    })
}

/// POST /v1/documents
/// Register a document; the body is the file stream when `file_name` is set
#[utoipa::path(
    post,
    path = "/v1/documents",
    params(CreateDocumentRequest),
    responses(
        (status = 201, description = "Document registered", body = DocumentDto),
        (status = 400, description = "Malformed request"),
        (status = 409, description = "Container closed or out of capacity"),
        (status = 422, description = "Incompatible container"),
    )
)]
pub async fn create_document_handler(
    State(use_case): State<Arc<CreateDocumentUseCase>>,
    Query(request): Query<CreateDocumentRequest>,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, Json<DocumentDto>), ApiError> {
    let actor = actor_from(&headers);
    let file = incoming_file(
        request.file_name.as_deref(),
        request.content_type.as_deref(),
        body,
    );

    let document = use_case.execute(request, file, &actor).await?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /v1/documents/{id}
/// Fetch document metadata; bumps the query counter
#[utoipa::path(
    get,
    path = "/v1/documents/{id}",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document metadata", body = DocumentDto),
        (status = 404, description = "Document not found"),
    )
)]
pub async fn get_document_handler(
    State(use_case): State<Arc<GetDocumentUseCase>>,
    Path(id): Path<String>,
) -> Result<Json<DocumentDto>, ApiError> {
    let id = parse_document_id(&id)?;
    let document = use_case.execute(&id).await?;
    Ok(Json(document))
}

/// PATCH /v1/documents/{id}
/// Patch a document; the body is the replacement file when `file_name` is set
#[utoipa::path(
    patch,
    path = "/v1/documents/{id}",
    params(("id" = String, Path, description = "Document ID"), UpdateDocumentRequest),
    responses(
        (status = 200, description = "Document updated", body = DocumentDto),
        (status = 404, description = "Document not found"),
        (status = 409, description = "Container closed or out of capacity"),
        (status = 422, description = "Incompatible container"),
    )
)]
pub async fn update_document_handler(
    State(use_case): State<Arc<UpdateDocumentUseCase>>,
    Path(id): Path<String>,
    Query(patch): Query<UpdateDocumentRequest>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<DocumentDto>, ApiError> {
    let id = parse_document_id(&id)?;
    let actor = actor_from(&headers);
    let file = incoming_file(patch.file_name.as_deref(), patch.content_type.as_deref(), body);

    let document = use_case.execute(&id, patch, file, &actor).await?;

    Ok(Json(document))
}

/// DELETE /v1/documents/{id}
/// Move a document to the trash, freeing its container folios
#[utoipa::path(
    delete,
    path = "/v1/documents/{id}",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document trashed", body = DocumentDto),
        (status = 404, description = "Document not found"),
        (status = 409, description = "Document already trashed"),
    )
)]
pub async fn trash_document_handler(
    State(use_case): State<Arc<TrashDocumentUseCase>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DocumentDto>, ApiError> {
    let id = parse_document_id(&id)?;
    let actor = actor_from(&headers);
    let document = use_case.execute(&id, &actor).await?;
    Ok(Json(document))
}

/// POST /v1/documents/{id}/restore
/// Bring a document back from the trash, re-claiming its folios
#[utoipa::path(
    post,
    path = "/v1/documents/{id}/restore",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document restored", body = DocumentDto),
        (status = 404, description = "Document not found"),
        (status = 409, description = "Container filled up or closed meanwhile"),
        (status = 422, description = "Container is trashed"),
    )
)]
pub async fn restore_document_handler(
    State(use_case): State<Arc<RestoreDocumentUseCase>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DocumentDto>, ApiError> {
    let id = parse_document_id(&id)?;
    let actor = actor_from(&headers);
    let document = use_case.execute(&id, &actor).await?;
    Ok(Json(document))
}

/// DELETE /v1/documents/{id}/permanent
/// Hard-delete a document; removes the blob when this was its last reference
#[utoipa::path(
    delete,
    path = "/v1/documents/{id}/permanent",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document purged"),
        (status = 404, description = "Document not found"),
    )
)]
pub async fn purge_document_handler(
    State(use_case): State<Arc<PurgeDocumentUseCase>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_document_id(&id)?;
    use_case.execute(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
