use axum::{Json, extract::State};

use super::dto::{JsonBody, LoginRequest, LoginResponse};
use crate::{app_state::AppState, error::ApiResult};

/// POST /auth/login
/// Exchanges credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .sessions
        .login(&req.user_id, &req.password)
        .inspect_err(|_| tracing::info!(user_id = %req.user_id, "Login failed"))?;

    tracing::info!(user_id = %user.user_id, "User logged in");
    Ok(Json(user.into()))
}
