use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::api::errors::ApiError;
use crate::application::use_cases::{BlobResponse, ServeBody, ServeDocumentUseCase, ServeMode};
use crate::domain::value_objects::DocumentId;

/// GET /v1/documents/{id}/download
/// Stream the document's file as an attachment, honoring byte ranges
#[utoipa::path(
    get,
    path = "/v1/documents/{id}/download",
    params(
        ("id" = String, Path, description = "Document ID"),
        ("Range" = Option<String>, Header, description = "Optional byte range, `bytes={start}-{end}`"),
    ),
    responses(
        (status = 200, description = "Full content"),
        (status = 206, description = "Requested byte window"),
        (status = 404, description = "Document or file not found"),
        (status = 416, description = "Range outside the file"),
    )
)]
pub async fn download_document_handler(
    State(use_case): State<Arc<ServeDocumentUseCase>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    serve(use_case, &id, &headers, ServeMode::Download).await
}

/// GET /v1/documents/{id}/view
/// Stream the document's file inline; counts as a query
#[utoipa::path(
    get,
    path = "/v1/documents/{id}/view",
    params(
        ("id" = String, Path, description = "Document ID"),
        ("Range" = Option<String>, Header, description = "Optional byte range, `bytes={start}-{end}`"),
    ),
    responses(
        (status = 200, description = "Full content"),
        (status = 206, description = "Requested byte window"),
        (status = 404, description = "Document or file not found"),
        (status = 416, description = "Range outside the file"),
    )
)]
pub async fn view_document_handler(
    State(use_case): State<Arc<ServeDocumentUseCase>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    serve(use_case, &id, &headers, ServeMode::View).await
}

async fn serve(
    use_case: Arc<ServeDocumentUseCase>,
    id: &str,
    headers: &HeaderMap,
    mode: ServeMode,
) -> Result<Response, ApiError> {
    let id = id
        .parse::<DocumentId>()
        .map_err(|e| ApiError::bad_request(format!("Invalid document ID: {}", e)))?;

    let range_header = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());

    let reply = use_case.execute(&id, range_header, mode).await?;

    build_response(reply).map_err(|e| ApiError::internal_error(format!("Failed to build response: {}", e)))
}

fn build_response(reply: BlobResponse) -> Result<Response, axum::http::Error> {
    let size = reply.size_bytes;
    let builder = Response::builder()
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_TYPE, reply.content_type.as_str())
        .header(header::ETAG, reply.etag.as_str())
        .header(
            header::CACHE_CONTROL,
            format!("private, max-age={}", reply.cache_max_age_secs),
        )
        .header(
            header::CONTENT_DISPOSITION,
            format!("{}; filename=\"{}\"", reply.disposition, reply.file_name),
        );

    match reply.body {
        ServeBody::Full { reader } => builder
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, size.to_string())
            .body(Body::from_stream(ReaderStream::new(reader))),
        ServeBody::Partial { reader, window } => builder
            .status(StatusCode::PARTIAL_CONTENT)
            .header(
                header::CONTENT_RANGE,
                format!("bytes {}-{}/{}", window.start, window.end, size),
            )
            .header(header::CONTENT_LENGTH, window.len().to_string())
            .body(Body::from_stream(ReaderStream::new(reader))),
        ServeBody::Unsatisfiable => builder
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{}", size))
            .body(Body::empty()),
    }
}
