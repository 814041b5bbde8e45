use axum::{
    Json,
    extract::{Path, State},
};

use super::{
    Reply,
    dto::{DeferredBody, Envelope, JsonBody, ScopedLimitsPayload, ScopedLimitsRequest},
};
use crate::{
    access::authorize_any_card,
    app_state::AppState,
    auth::Caller,
    defaults::limits::{self, LimitScope, LimitsView},
};

/// GET /api/cards/{cardId}/limits
/// Works for any card kind; cards without stored limits get the defaults
pub async fn get_limits(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
) -> Reply<LimitsView> {
    let owner = authorize_any_card(&state.store, &card_id, &caller)?;
    tracing::debug!(card_id = %card_id, kind = owner.kind.label(), "Reading card limits");
    Ok(Json(Envelope::data(limits::read_limits(&state.store, &card_id))))
}

fn update_scope(
    state: AppState,
    caller: Caller,
    card_id: String,
    scope: LimitScope,
    body: DeferredBody<ScopedLimitsRequest>,
) -> Reply<ScopedLimitsPayload> {
    let owner = authorize_any_card(&state.store, &card_id, &caller)?;
    let JsonBody(req) = body?;
    let stored = limits::replace_scope(&state.store, &card_id, scope, req.limits);
    tracing::info!(card_id = %card_id, kind = owner.kind.label(), scope = ?scope, "Card limits replaced");

    let (payload, message) = match scope {
        LimitScope::Domestic => (
            ScopedLimitsPayload {
                card_id,
                domestic_limits: Some(stored.domestic_limits),
                international_limits: None,
            },
            "Domestic limits updated successfully",
        ),
        LimitScope::International => (
            ScopedLimitsPayload {
                card_id,
                domestic_limits: None,
                international_limits: Some(stored.international_limits),
            },
            "International limits updated successfully",
        ),
    };
    Ok(Json(Envelope::with_message(payload, message)))
}

/// PUT /api/cards/{cardId}/limits/domestic
pub async fn update_domestic(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<ScopedLimitsRequest>,
) -> Reply<ScopedLimitsPayload> {
    update_scope(state, caller, card_id, LimitScope::Domestic, body)
}

/// PUT /api/cards/{cardId}/limits/international
pub async fn update_international(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<ScopedLimitsRequest>,
) -> Reply<ScopedLimitsPayload> {
    update_scope(state, caller, card_id, LimitScope::International, body)
}
