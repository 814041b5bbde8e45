use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::handlers::dto::Envelope;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure a request can end in
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    /// Malformed body or a value outside the accepted set
    #[error("{0}")]
    InvalidInput(String),

    /// Missing, malformed or unknown bearer token
    #[error("{0}")]
    Unauthenticated(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The resource exists but belongs to another user
    #[error("Access denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),
}

impl ApiError {
    pub fn invalid_body() -> Self {
        Self::InvalidInput("Invalid request body".to_string())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        (status, Json(Envelope::<()>::failure(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::invalid_body().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("Card").status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::not_found("Credit card").to_string(), "Credit card not found");
        assert_eq!(ApiError::Forbidden.to_string(), "Access denied");
        assert_eq!(ApiError::invalid_body().to_string(), "Invalid request body");
    }

    #[tokio::test]
    async fn test_into_response_uses_envelope() {
        let response = ApiError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "message": "Access denied"}));
    }
}
