use axum::{
    Json,
    extract::{Path, State},
};

use super::{
    Reply,
    dto::{
        CardsPayload, DebitCardView, DeferredBody, Envelope, JsonBody, LimitsPayload,
        PinUpdateRequest,
    },
};
use crate::{
    access::authorize,
    app_state::AppState,
    auth::Caller,
    defaults::limits,
    error::ApiResult,
    store::models::{CardKind, CardLimits, DebitCard},
};

fn owned_card(state: &AppState, card_id: &str, caller: &Caller) -> ApiResult<DebitCard> {
    authorize(
        state.store.get::<DebitCard>(card_id),
        caller,
        CardKind::Debit.label(),
    )
}

/// GET /api/cards/debit
pub async fn list_cards(
    State(state): State<AppState>,
    caller: Caller,
) -> Reply<CardsPayload<DebitCardView>> {
    let cards = state
        .store
        .list_by_user::<DebitCard>(&caller.user_id)
        .into_iter()
        .map(DebitCardView::summary)
        .collect();
    Ok(Json(Envelope::data(CardsPayload { cards })))
}

/// GET /api/cards/debit/{cardId}
pub async fn get_card(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
) -> Reply<DebitCardView> {
    let card = owned_card(&state, &card_id, &caller)?;
    Ok(Json(Envelope::data(DebitCardView::detail(card))))
}

/// PUT /api/cards/debit/{cardId}/limits
pub async fn update_limits(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<CardLimits>,
) -> Reply<LimitsPayload> {
    owned_card(&state, &card_id, &caller)?;
    let JsonBody(req) = body?;
    let stored = limits::replace_all(&state.store, &card_id, req);
    Ok(Json(Envelope::with_message(
        LimitsPayload {
            card_id,
            limits: stored,
        },
        "Debit card limits updated successfully",
    )))
}

/// POST /api/cards/debit/{cardId}/pin
pub async fn update_pin(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<PinUpdateRequest>,
) -> Reply<()> {
    owned_card(&state, &card_id, &caller)?;
    let JsonBody(req) = body?;
    req.validate()?;
    Ok(Json(Envelope::message("PIN updated successfully")))
}
