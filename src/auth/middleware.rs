use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::Caller;
use crate::{app_state::AppState, error::ApiError};

/// Extract the token from an `Authorization: Bearer <token>` header value
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

/// Reject requests without a live session and attach the resolved
/// [`Caller`] to the request for the handlers behind it.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        return ApiError::Unauthenticated("Authorization header required".to_string())
            .into_response();
    };

    let Some(token) = header.to_str().ok().and_then(bearer_token) else {
        return ApiError::Unauthenticated("Invalid authorization header format".to_string())
            .into_response();
    };

    match state.sessions.resolve(token) {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(path = %request.uri().path(), "Rejected unknown session token");
            err.into_response()
        }
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthenticated("Authorization header required".to_string()))
    }
}
