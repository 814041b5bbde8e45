use axum::{Json, extract::State};

use super::{
    Reply,
    dto::{Envelope, JsonBody},
};
use crate::{
    app_state::AppState,
    auth::Caller,
    defaults::settings::{
        self, AuthenticationPatch, DefaultCardsPatch, GlobalLimitsPatch, NotificationPatch,
        PinPatch, SecurityPatch, SettingsPatch, StatementPatch,
    },
    store::models::CardSettings,
};

/// GET /api/cards/settings
pub async fn get_settings(State(state): State<AppState>, caller: Caller) -> Reply<CardSettings> {
    Ok(Json(Envelope::data(settings::read_settings(
        &state.store,
        &caller.user_id,
    ))))
}

fn apply(state: &AppState, caller: &Caller, patch: impl SettingsPatch, message: &str) -> Reply<()> {
    settings::update_settings(&state.store, &caller.user_id, patch);
    tracing::debug!(user_id = %caller.user_id, "{message}");
    Ok(Json(Envelope::message(message)))
}

/// PUT /api/cards/settings/default
pub async fn update_default_cards(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(patch): JsonBody<DefaultCardsPatch>,
) -> Reply<()> {
    apply(&state, &caller, patch, "Default cards updated successfully")
}

/// PUT /api/cards/settings/security
pub async fn update_security(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(patch): JsonBody<SecurityPatch>,
) -> Reply<()> {
    apply(&state, &caller, patch, "Security settings updated successfully")
}

/// PUT /api/cards/settings/global-limits
pub async fn update_global_limits(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(patch): JsonBody<GlobalLimitsPatch>,
) -> Reply<()> {
    apply(
        &state,
        &caller,
        patch,
        "Global transaction limits updated successfully",
    )
}

/// PUT /api/cards/settings/notifications
pub async fn update_notifications(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(patch): JsonBody<NotificationPatch>,
) -> Reply<()> {
    apply(
        &state,
        &caller,
        patch,
        "Notification preferences updated successfully",
    )
}

/// PUT /api/cards/settings/statement
pub async fn update_statement(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(patch): JsonBody<StatementPatch>,
) -> Reply<()> {
    apply(&state, &caller, patch, "Statement preferences updated successfully")
}

/// PUT /api/cards/settings/pin
pub async fn update_pin(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(patch): JsonBody<PinPatch>,
) -> Reply<()> {
    apply(&state, &caller, patch, "PIN preferences updated successfully")
}

/// PUT /api/cards/settings/authentication
pub async fn update_authentication(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(patch): JsonBody<AuthenticationPatch>,
) -> Reply<()> {
    apply(
        &state,
        &caller,
        patch,
        "Authentication settings updated successfully",
    )
}
