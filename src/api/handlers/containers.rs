use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::application::dto::{ContainerDto, CreateContainerRequest, UpdateContainerRequest};
use crate::application::use_cases::{
    CreateContainerUseCase, GetContainerUseCase, UpdateContainerUseCase,
};
use crate::domain::value_objects::ContainerId;

fn parse_container_id(raw: &str) -> Result<ContainerId, ApiError> {
    raw.parse::<ContainerId>()
        .map_err(|e| ApiError::bad_request(format!("Invalid container ID: {}", e)))
}

/// POST /v1/containers
#[utoipa::path(
    post,
    path = "/v1/containers",
    request_body = CreateContainerRequest,
    responses(
        (status = 201, description = "Container created", body = ContainerDto),
        (status = 400, description = "Malformed request"),
    )
)]
pub async fn create_container_handler(
    State(use_case): State<Arc<CreateContainerUseCase>>,
    Json(request): Json<CreateContainerRequest>,
) -> Result<(StatusCode, Json<ContainerDto>), ApiError> {
    let container = use_case.execute(request).await?;
    Ok((StatusCode::CREATED, Json(container)))
}

/// GET /v1/containers/{id}
/// Current running total and state
#[utoipa::path(
    get,
    path = "/v1/containers/{id}",
    params(("id" = String, Path, description = "Container ID")),
    responses(
        (status = 200, description = "Container with its running total", body = ContainerDto),
        (status = 404, description = "Container not found"),
    )
)]
pub async fn get_container_handler(
    State(use_case): State<Arc<GetContainerUseCase>>,
    Path(id): Path<String>,
) -> Result<Json<ContainerDto>, ApiError> {
    let id = parse_container_id(&id)?;
    let container = use_case.execute(&id).await?;
    Ok(Json(container))
}

/// PATCH /v1/containers/{id}
/// Administrative edit; the only way out of the automatic Closed state
#[utoipa::path(
    patch,
    path = "/v1/containers/{id}",
    request_body = UpdateContainerRequest,
    params(("id" = String, Path, description = "Container ID")),
    responses(
        (status = 200, description = "Container updated", body = ContainerDto),
        (status = 404, description = "Container not found"),
    )
)]
pub async fn update_container_handler(
    State(use_case): State<Arc<UpdateContainerUseCase>>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateContainerRequest>,
) -> Result<Json<ContainerDto>, ApiError> {
    let id = parse_container_id(&id)?;
    let container = use_case.execute(&id, patch).await?;
    Ok(Json(container))
}
