use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use catalog_common::validation::FieldError;

/// Error taxonomy for the HTTP boundary. Repository and unit-of-work
/// failures arrive here unmodified as `Persistence`; the client gets a
/// generic message while the details go to the log only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    /// Credential mismatch. One message for every failure mode, so
    /// callers can't tell an unknown account from a wrong password.
    #[error("Invalid email or password")]
    Auth,

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }

    pub fn not_found(what: &str, id: i32) -> Self {
        ApiError::NotFound(format!("{what} with id = {id} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "validation failed", "fields": errors})),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({"error": message}))).into_response()
            }
            ApiError::Auth => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid email or password"})),
            )
                .into_response(),
            ApiError::Persistence(e) => {
                tracing::error!("Persistence error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = ApiError::validation(vec![FieldError::new("name", "name is required")])
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_message_includes_id() {
        let err = ApiError::not_found("Category", 7);
        assert_eq!(err.to_string(), "Category with id = 7 not found");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_auth_maps_to_401() {
        assert_eq!(
            ApiError::Auth.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_persistence_maps_to_500() {
        let err = ApiError::from(anyhow::anyhow!("constraint violated"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
