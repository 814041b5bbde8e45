use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};

use super::{
    Reply,
    dto::{
        CardsPayload, DeferredBody, Envelope, JsonBody, Pagination, RegeneratedPayload,
        SpendingLimitPayload, SpendingLimitRequest, StatusPayload, StatusRequest,
        TransactionQuery, TransactionsPayload, VirtualCardCreateRequest,
        VirtualCardUpdateRequest, VirtualCardView,
    },
};
use crate::{
    access::authorize,
    app_state::AppState,
    auth::Caller,
    error::{ApiError, ApiResult},
    store::models::{CardKind, Transaction, User, VirtualCard, VirtualCardStatus},
};

const DEFAULT_PAGE: usize = 1;
const DEFAULT_PAGE_SIZE: usize = 20;

fn owned_card(state: &AppState, card_id: &str, caller: &Caller) -> ApiResult<VirtualCard> {
    authorize(
        state.store.get::<VirtualCard>(card_id),
        caller,
        CardKind::Virtual.label(),
    )
}

/// Validity in months for an `expiryPeriod` label; unknown labels get 3
fn validity_months(period: &str) -> u32 {
    match period {
        "6 Months" => 6,
        "12 Months" => 12,
        _ => 3,
    }
}

fn expiry_date(req: &VirtualCardCreateRequest, now: DateTime<Utc>) -> DateTime<Utc> {
    req.custom_expiry_date.unwrap_or_else(|| {
        now.checked_add_months(Months::new(validity_months(&req.expiry_period)))
            .unwrap_or(now)
    })
}

/// GET /api/cards/virtual
pub async fn list_cards(
    State(state): State<AppState>,
    caller: Caller,
) -> Reply<CardsPayload<VirtualCardView>> {
    let cards = state
        .store
        .list_by_user::<VirtualCard>(&caller.user_id)
        .into_iter()
        .map(VirtualCardView::masked)
        .collect();
    Ok(Json(Envelope::data(CardsPayload { cards })))
}

/// POST /api/cards/virtual
/// Issues a new card; the response is the only place its CVV is shown
pub async fn create_card(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(req): JsonBody<VirtualCardCreateRequest>,
) -> Reply<VirtualCardView> {
    let now = Utc::now();
    let expires = expiry_date(&req, now);
    let cardholder_name = state
        .store
        .get::<User>(&caller.user_id)
        .map(|user| user.full_name)
        .unwrap_or_default();

    let card = VirtualCard {
        id: state.generator.record_id(),
        card_number: state.generator.card_number(),
        cvv: state.generator.cvv(),
        expiry_month: expires.month(),
        expiry_year: expires.year(),
        cardholder_name,
        card_type: req.card_type,
        nickname: req.nickname,
        spending_limit: req.spending_limit,
        remaining_balance: req.spending_limit,
        created_at: now,
        status: VirtualCardStatus::Active,
        linked_account_id: req.linked_account_id,
        user_id: caller.user_id,
    };
    state.store.put(card.clone());

    tracing::info!(card_id = %card.id, user_id = %card.user_id, "Virtual card created");
    Ok(Json(Envelope::with_message(
        VirtualCardView::revealed(card),
        "Virtual card created successfully",
    )))
}

/// GET /api/cards/virtual/{cardId}
pub async fn get_card(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
) -> Reply<VirtualCardView> {
    let card = owned_card(&state, &card_id, &caller)?;
    Ok(Json(Envelope::data(VirtualCardView::masked(card))))
}

/// PUT /api/cards/virtual/{cardId}
pub async fn update_card(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<VirtualCardUpdateRequest>,
) -> Reply<VirtualCardView> {
    let mut card = owned_card(&state, &card_id, &caller)?;
    let JsonBody(req) = body?;
    if let Some(nickname) = req.nickname {
        card.nickname = nickname;
    }
    state.store.put(card.clone());

    Ok(Json(Envelope::with_message(
        VirtualCardView::masked(card),
        "Virtual card updated successfully",
    )))
}

/// DELETE /api/cards/virtual/{cardId}
pub async fn delete_card(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
) -> Reply<()> {
    owned_card(&state, &card_id, &caller)?;
    state.store.delete::<VirtualCard>(&card_id);

    tracing::info!(card_id = %card_id, user_id = %caller.user_id, "Virtual card deleted");
    Ok(Json(Envelope::message("Virtual card deleted successfully")))
}

/// PUT /api/cards/virtual/{cardId}/spending-limit
/// Sets the limit; the remaining balance is left as it is
pub async fn update_spending_limit(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<SpendingLimitRequest>,
) -> Reply<SpendingLimitPayload> {
    let mut card = owned_card(&state, &card_id, &caller)?;
    let JsonBody(req) = body?;
    card.spending_limit = req.spending_limit;
    state.store.put(card.clone());

    Ok(Json(Envelope::with_message(
        SpendingLimitPayload {
            card_id,
            spending_limit: card.spending_limit,
            remaining_balance: card.remaining_balance,
        },
        "Spending limit updated successfully",
    )))
}

/// PUT /api/cards/virtual/{cardId}/status
pub async fn update_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    body: DeferredBody<StatusRequest>,
) -> Reply<StatusPayload> {
    let mut card = owned_card(&state, &card_id, &caller)?;
    let JsonBody(req) = body?;
    let status = req.status.parse::<VirtualCardStatus>().map_err(|_| {
        ApiError::InvalidInput("Invalid status. Must be Active, Frozen, or Cancelled".to_string())
    })?;
    card.status = status;
    state.store.put(card);

    tracing::info!(card_id = %card_id, status = %status, "Virtual card status changed");
    Ok(Json(Envelope::with_message(
        StatusPayload { card_id, status },
        "Card status updated successfully",
    )))
}

/// POST /api/cards/virtual/{cardId}/regenerate
/// Issues a new number and CVV; expiry is kept
pub async fn regenerate_card(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
) -> Reply<RegeneratedPayload> {
    let mut card = owned_card(&state, &card_id, &caller)?;
    card.card_number = state.generator.card_number();
    card.cvv = state.generator.cvv();
    state.store.put(card.clone());

    tracing::info!(card_id = %card_id, "Virtual card number regenerated");
    Ok(Json(Envelope::with_message(
        RegeneratedPayload {
            card_id,
            new_card_number: card.card_number,
            new_cvv: card.cvv,
            expiry_month: card.expiry_month,
            expiry_year: card.expiry_year,
        },
        "Card number regenerated successfully",
    )))
}

/// GET /api/cards/virtual/{cardId}/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    caller: Caller,
    Path(card_id): Path<String>,
    Query(query): Query<TransactionQuery>,
) -> Reply<TransactionsPayload> {
    owned_card(&state, &card_id, &caller)?;
    let transactions = state.store.transactions_for_card(&card_id);
    Ok(Json(Envelope::data(paginate(transactions, &query))))
}

/// Positive integer query value, or `fallback` when absent or malformed
fn positive_or(raw: Option<&str>, fallback: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(fallback)
}

/// Midnight UTC of a `YYYY-MM-DD` date; malformed dates disable the bound
fn day_start(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw?, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Filter by date range and cut out one page.
///
/// The end date covers its whole day. Pages past the end are empty but still
/// report the totals.
fn paginate(transactions: Vec<Transaction>, query: &TransactionQuery) -> TransactionsPayload {
    let page = positive_or(query.page.as_deref(), DEFAULT_PAGE);
    let limit = positive_or(query.limit.as_deref(), DEFAULT_PAGE_SIZE);
    let from = day_start(query.start_date.as_deref());
    let until = day_start(query.end_date.as_deref()).map(|end| end + Duration::days(1));

    let filtered: Vec<Transaction> = transactions
        .into_iter()
        .filter(|txn| from.is_none_or(|from| txn.date >= from))
        .filter(|txn| until.is_none_or(|until| txn.date <= until))
        .collect();

    let total = filtered.len();
    let transactions = filtered
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    TransactionsPayload {
        transactions,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    }
}
