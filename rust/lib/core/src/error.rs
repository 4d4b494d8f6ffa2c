use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these,
// never on the human-readable message string.

/// Stable error code constants.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNSUPPORTED_MEDIA_TYPE: &str = "UNSUPPORTED_MEDIA_TYPE";
    pub const INTERNAL: &str = "INTERNAL";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

/// Reason keys for rejected requests. They end up in the `errorKey`
/// field of the body and in the `X-{app}-error` header as `error.{key}`.
pub mod error_key {
    pub const ID_EXISTS: &str = "idexists";
    pub const ID_NULL: &str = "idnull";
    pub const ID_INVALID: &str = "idinvalid";
    pub const ID_NOT_FOUND: &str = "idnotfound";
    pub const VALIDATION: &str = "validation";
    pub const BAD_PAGING: &str = "badpaging";
    pub const BAD_SORT: &str = "badsort";
    pub const BAD_BODY: &str = "badbody";
}

/// One rejected field of an entity payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub object_name: String,
    pub field: String,
    /// Constraint that failed: `NotNull` or `Size`.
    pub message: String,
}

impl FieldError {
    pub fn new(object_name: &str, field: &str, message: &str) -> Self {
        Self {
            object_name: object_name.to_string(),
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error type.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status code. Caller errors carry the entity name so the API layer
/// can build alert headers from them.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Resource does not exist. HTTP 404, empty body.
    #[error("{0}")]
    NotFound(String),

    /// Request is inconsistent with the addressed entity. HTTP 400.
    #[error("{message}")]
    BadRequest {
        entity: String,
        key: &'static str,
        message: String,
    },

    /// Field constraints failed. HTTP 400.
    #[error("{entity}: {} invalid field(s)", .errors.len())]
    Validation {
        entity: String,
        errors: Vec<FieldError>,
    },

    /// Body content type is not accepted. HTTP 415.
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn bad_request(entity: &str, key: &'static str, message: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            entity: entity.to_string(),
            key,
            message: message.into(),
        }
    }

    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::BadRequest { .. } => error_code::BAD_REQUEST,
            ServiceError::Validation { .. } => error_code::VALIDATION_FAILED,
            ServiceError::UnsupportedMediaType(_) => error_code::UNSUPPORTED_MEDIA_TYPE,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServiceError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Entity name and reason key, for caller errors that have them.
    pub fn alert(&self) -> Option<(&str, &str)> {
        match self {
            ServiceError::BadRequest { entity, key, .. } => Some((entity, key)),
            ServiceError::Validation { entity, .. } => Some((entity, error_key::VALIDATION)),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ServiceError::NotFound(_) => return status.into_response(),
            ServiceError::BadRequest { entity, key, message } => serde_json::json!({
                "code": self.error_code(),
                "entityName": entity,
                "errorKey": key,
                "message": message,
            }),
            ServiceError::Validation { entity, errors } => serde_json::json!({
                "code": self.error_code(),
                "entityName": entity,
                "errorKey": error_key::VALIDATION,
                "message": "error.validation",
                "fieldErrors": errors,
            }),
            _ => serde_json::json!({
                "code": self.error_code(),
                "message": self.to_string(),
            }),
        };
        (status, axum::Json(body)).into_response()
    }
}
