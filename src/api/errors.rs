use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::ledger::LedgerError;
use crate::application::use_cases::{
    ContainerAdminError, CreateError, GetError, PurgeError, RestoreError, ServeError, TrashError,
    UpdateError,
};

/// API error response
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
        }));

        (self.status, body).into_response()
    }
}

// Convert use case errors to API errors

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match &err {
            LedgerError::NotFound(_) => ApiError::not_found(err.to_string()),
            LedgerError::Closed(_) => ApiError::conflict(err.to_string()),
            LedgerError::CapacityExceeded { .. } => ApiError::conflict(err.to_string()),
            LedgerError::AreaMismatch
            | LedgerError::TypeMismatch
            | LedgerError::ContainerTrashed(_) => ApiError::unprocessable(err.to_string()),
            LedgerError::Repository(e) => {
                ApiError::internal_error(format!("Repository error: {}", e))
            }
        }
    }
}

impl From<CreateError> for ApiError {
    fn from(err: CreateError) -> Self {
        match err {
            CreateError::InvalidRequest(msg) => ApiError::bad_request(msg),
            CreateError::Domain(e) => ApiError::unprocessable(e.to_string()),
            CreateError::Ledger(e) => e.into(),
            CreateError::Repository(e) => {
                ApiError::internal_error(format!("Repository error: {}", e))
            }
            CreateError::Storage(e) => ApiError::internal_error(format!("Storage error: {}", e)),
        }
    }
}

impl From<UpdateError> for ApiError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::NotFound(id) => ApiError::not_found(format!("Document not found: {id}")),
            UpdateError::DocumentTrashed => {
                ApiError::conflict("Document is trashed; restore it before editing")
            }
            UpdateError::InvalidRequest(msg) => ApiError::bad_request(msg),
            UpdateError::Domain(e) => ApiError::unprocessable(e.to_string()),
            UpdateError::Ledger(e) => e.into(),
            UpdateError::Repository(e) => {
                ApiError::internal_error(format!("Repository error: {}", e))
            }
            UpdateError::Storage(e) => ApiError::internal_error(format!("Storage error: {}", e)),
        }
    }
}

impl From<TrashError> for ApiError {
    fn from(err: TrashError) -> Self {
        match err {
            TrashError::NotFound(id) => ApiError::not_found(format!("Document not found: {id}")),
            TrashError::Domain(e) => ApiError::conflict(e.to_string()),
            TrashError::Ledger(e) => e.into(),
            TrashError::Repository(e) => {
                ApiError::internal_error(format!("Repository error: {}", e))
            }
        }
    }
}

impl From<RestoreError> for ApiError {
    fn from(err: RestoreError) -> Self {
        match err {
            RestoreError::NotFound(id) => ApiError::not_found(format!("Document not found: {id}")),
            RestoreError::Domain(e) => ApiError::conflict(e.to_string()),
            RestoreError::Ledger(e) => e.into(),
            RestoreError::Repository(e) => {
                ApiError::internal_error(format!("Repository error: {}", e))
            }
        }
    }
}

impl From<PurgeError> for ApiError {
    fn from(err: PurgeError) -> Self {
        match err {
            PurgeError::NotFound(id) => ApiError::not_found(format!("Document not found: {id}")),
            PurgeError::Ledger(e) => e.into(),
            PurgeError::Repository(e) => {
                ApiError::internal_error(format!("Repository error: {}", e))
            }
            PurgeError::Storage(e) => ApiError::internal_error(format!("Storage error: {}", e)),
        }
    }
}

impl From<GetError> for ApiError {
    fn from(err: GetError) -> Self {
        match err {
            GetError::NotFound(id) => ApiError::not_found(format!("Document not found: {id}")),
            GetError::Repository(e) => {
                ApiError::internal_error(format!("Repository error: {}", e))
            }
        }
    }
}

impl From<ServeError> for ApiError {
    fn from(err: ServeError) -> Self {
        match err {
            ServeError::NotFound(msg) => ApiError::not_found(msg),
            ServeError::Repository(e) => {
                ApiError::internal_error(format!("Repository error: {}", e))
            }
            ServeError::Storage(e) => ApiError::internal_error(format!("Storage error: {}", e)),
        }
    }
}

impl From<ContainerAdminError> for ApiError {
    fn from(err: ContainerAdminError) -> Self {
        match err {
            ContainerAdminError::NotFound(id) => {
                ApiError::not_found(format!("Container not found: {id}"))
            }
            ContainerAdminError::InvalidRequest(msg) => ApiError::bad_request(msg),
            ContainerAdminError::Domain(e) => ApiError::unprocessable(e.to_string()),
            ContainerAdminError::Repository(e) => {
                ApiError::internal_error(format!("Repository error: {}", e))
            }
        }
    }
}
