use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use user_service_core::UserServiceError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing or invalid credentials".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetails {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        if err.is_business() {
            tracing::debug!(error = %err, "Request rejected");
        }

        match err {
            UserServiceError::Conflict(username) => {
                ApiError::Conflict(format!("User already exists: {}", username))
            }
            UserServiceError::NotFound(username) => {
                ApiError::NotFound(format!("User not found: {}", username))
            }
            UserServiceError::Unauthorized | UserServiceError::MalformedToken(_) => {
                ApiError::Unauthorized
            }
            UserServiceError::InvalidInput(msg) => ApiError::InvalidRequest(msg),
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: UserServiceError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_business_errors_map_to_client_statuses() {
        assert_eq!(status_of(UserServiceError::Conflict("a".into())), StatusCode::CONFLICT);
        assert_eq!(status_of(UserServiceError::NotFound("a".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(UserServiceError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(UserServiceError::InvalidInput("bad".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_operational_errors_are_generic_500() {
        assert_eq!(
            status_of(UserServiceError::StoreUnavailable("disk gone".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(UserServiceError::SigningFailure("bad key".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(UserServiceError::NotReady),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
