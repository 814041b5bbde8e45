use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Duration, SecondsFormat, Utc};

use super::{
    Reply,
    dto::{
        AddonCardRequest, AddonRequestPayload, AutopayRequest, CardsPayload, CreditCardView,
        DeferredBody, Envelope, JsonBody, LimitsPayload, PinUpdateRequest,
    },
};
use crate::{
    access::authorize,
    app_state::AppState,
    auth::Caller,
    defaults::limits,
    error::{ApiError, ApiResult},
    store::models::{Autopay, CardKind, CardLimits, CreditCard},
};

/// Days between an add-on request and its promised delivery
const ADDON_DELIVERY_DAYS: i64 = 14;

fn owned_card(state: &AppState, card_id: &str, caller: &Caller) -> ApiResult<CreditCard> {
    authorize(
        state.store.get::<CreditCard>(card_id),
        caller,
        CardKind::Credit.label(),
    )
}

/// GET /api/cards/credit
pub async fn list_cards(
    State(state): State<AppState>,
    caller: Caller,
) -> Reply<CardsPayload<CreditCardView>> {
    let cards = state
        .store
        .list_by_user::<CreditCard>(&caller.user_id)
        .into_iter()
        .map(CreditCardView::summary)
        .collect();
    Ok(Json(Envelope::data(CardsPayload { cards })))
}

/// GET /api/cards/credit/{cardId}
pub async fn get_card(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
) -> Reply<CreditCardView> {
    let card = owned_card(&state, &card_id, &caller)?;
    Ok(Json(Envelope::data(CreditCardView::detail(card))))
}

/// PUT /api/cards/credit/{cardId}/limits
/// Replaces both limit halves at once
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
        "Card limits updated successfully",
    )))
}

/// GET /api/cards/credit/{cardId}/autopay
pub async fn get_autopay(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
) -> Reply<Autopay> {
    owned_card(&state, &card_id, &caller)?;
    let autopay = state
        .store
        .get::<Autopay>(&card_id)
        .ok_or_else(|| ApiError::not_found("Autopay"))?;
    Ok(Json(Envelope::data(autopay)))
}

/// POST /api/cards/credit/{cardId}/autopay
/// Creates the card's autopay, replacing any previous one under a new id
pub async fn enable_autopay(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<AutopayRequest>,
) -> Reply<Autopay> {
    owned_card(&state, &card_id, &caller)?;
    let JsonBody(req) = body?;

    let autopay = Autopay {
        id: state.generator.record_id(),
        card_id,
        amount_option: req.amount_option,
        linked_account_id: req.linked_account_id,
        auto_pay_enabled: req.auto_pay_enabled,
        activation_date: Utc::now(),
        user_id: caller.user_id,
    };
    state.store.put(autopay.clone());

    tracing::info!(card_id = %autopay.card_id, autopay_id = %autopay.id, "Autopay enabled");
    Ok(Json(Envelope::with_message(
        autopay,
        "Autopay enabled successfully",
    )))
}

/// PUT /api/cards/credit/{cardId}/autopay
pub async fn update_autopay(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<AutopayRequest>,
) -> Reply<()> {
    owned_card(&state, &card_id, &caller)?;
    let mut autopay = state
        .store
        .get::<Autopay>(&card_id)
        .ok_or_else(|| ApiError::not_found("Autopay"))?;
    let JsonBody(req) = body?;

    autopay.amount_option = req.amount_option;
    autopay.linked_account_id = req.linked_account_id;
    // An update can switch autopay on but never off; DELETE does that
    if req.auto_pay_enabled {
        autopay.auto_pay_enabled = true;
    }
    state.store.put(autopay);

    Ok(Json(Envelope::message("Autopay settings updated successfully")))
}

/// DELETE /api/cards/credit/{cardId}/autopay
pub async fn disable_autopay(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
) -> Reply<()> {
    owned_card(&state, &card_id, &caller)?;
    if state.store.delete::<Autopay>(&card_id) {
        tracing::info!(card_id = %card_id, "Autopay disabled");
    }
    Ok(Json(Envelope::message("Autopay disabled successfully")))
}

/// POST /api/cards/credit/{cardId}/pin
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

/// POST /api/cards/credit/{cardId}/addon
/// Acknowledges an add-on card request; nothing is stored
pub async fn request_addon_card(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<AddonCardRequest>,
) -> Reply<AddonRequestPayload> {
    owned_card(&state, &card_id, &caller)?;
    let JsonBody(req) = body?;

    let request_id = state.generator.record_id();
    tracing::info!(
        card_id = %card_id,
        request_id = %request_id,
        customer_id = %req.customer_id,
        name_on_card = %req.name_on_card,
        date_of_birth = %req.date_of_birth,
        relationship = %req.relationship,
        "Add-on card requested"
    );

    let delivery = Utc::now() + Duration::days(ADDON_DELIVERY_DAYS);
    Ok(Json(Envelope::with_message(
        AddonRequestPayload {
            request_id,
            estimated_delivery_date: delivery.to_rfc3339_opts(SecondsFormat::Secs, true),
        },
        "Add-on card request submitted successfully",
    )))
}
