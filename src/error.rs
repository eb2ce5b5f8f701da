use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// DomainError
///
/// The typed failure taxonomy raised by the application core. Each variant maps to
/// exactly one transport-level status at the boundary; anything the core cannot
/// classify (storage faults, signing faults) surfaces as a 500 with the cause
/// logged server-side and a generic message on the wire.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The addressed entity does not exist in the store.
    #[error("{entity} with id \"{id}\" not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A uniqueness rule was violated (duplicate email/username).
    #[error("{0}")]
    Conflict(String),

    /// Missing or failed credentials. Login failures carry an identical message
    /// for the unknown-email and wrong-password cases.
    #[error("{0}")]
    Unauthorized(String),

    /// The principal is authenticated but lacks the rights for this action.
    #[error("{0}")]
    Forbidden(String),

    /// An entity invariant was violated at construction time.
    #[error("{0}")]
    Validation(String),

    /// Uninterpreted persistence fault, propagated as-is from sqlx.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Infrastructure fault inside the core (hashing, token signing).
    #[error("{0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl IntoResponse for DomainError {
    /// Translates a domain failure into its HTTP shape:
    /// NotFound→404, Conflict→409, Unauthorized→401, Forbidden→403,
    /// Validation→400, everything else→500.
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            DomainError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Storage(e) => {
                tracing::error!("storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            DomainError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        // Server faults keep their cause out of the response body.
        let message = if status.is_server_error() {
            "An internal error occurred".to_string()
        } else {
            tracing::warn!("[{}] {}", error_type, self);
            self.to_string()
        };

        (
            status,
            Json(json!({
                "error": {
                    "type": error_type,
                    "message": message
                }
            })),
        )
            .into_response()
    }
}
