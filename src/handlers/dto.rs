use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    error::ApiError,
    store::models::{
        CardLimits, CreditCard, DebitCard, Transaction, TransactionLimit, User, VirtualCard,
        VirtualCardStatus,
    },
};

/// Replacement for the CVV on every card read
pub const CVV_MASK: &str = "***";

/// Response wrapper shared by every endpoint except login
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// JSON request body. Any read or decode failure becomes a 400 envelope,
/// whatever the request's content type.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::invalid_body())?;
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|_| ApiError::invalid_body())
    }
}

/// Request body whose decode failure is held back, so that the handler can
/// answer 403 or 404 for the card in the path before a 400 for the body.
pub type DeferredBody<T> = Result<JsonBody<T>, ApiError>;

/// Outward form of a stored CVV; a card without one shows none
pub fn mask_cvv(cvv: &str) -> String {
    if cvv.is_empty() {
        String::new()
    } else {
        CVV_MASK.to_string()
    }
}

fn non_zero(value: f64) -> Option<f64> {
    (value != 0.0).then_some(value)
}

#[derive(Debug, Serialize)]
pub struct CardsPayload<T> {
    pub cards: Vec<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardView {
    pub id: String,
    pub card_number: String,
    pub cvv: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cardholder_name: String,
    pub card_type: String,
    pub rewards_points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_credit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_credit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outstanding_balance: Option<f64>,
}

impl CreditCardView {
    /// Listing entry, without balances
    pub fn summary(card: CreditCard) -> Self {
        Self {
            cvv: mask_cvv(&card.cvv),
            id: card.id,
            card_number: card.card_number,
            expiry_month: card.expiry_month,
            expiry_year: card.expiry_year,
            cardholder_name: card.cardholder_name,
            card_type: card.card_type,
            rewards_points: card.rewards_points,
            available_credit: None,
            total_credit: None,
            outstanding_balance: None,
        }
    }

    pub fn detail(card: CreditCard) -> Self {
        let balances = (
            non_zero(card.available_credit),
            non_zero(card.total_credit),
            non_zero(card.outstanding_balance),
        );
        Self {
            available_credit: balances.0,
            total_credit: balances.1,
            outstanding_balance: balances.2,
            ..Self::summary(card)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitCardView {
    pub id: String,
    pub card_number: String,
    pub cvv: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cardholder_name: String,
    pub card_type: String,
    pub account_number: String,
    pub bank_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_balance: Option<f64>,
}

impl DebitCardView {
    pub fn summary(card: DebitCard) -> Self {
        Self {
            cvv: mask_cvv(&card.cvv),
            id: card.id,
            card_number: card.card_number,
            expiry_month: card.expiry_month,
            expiry_year: card.expiry_year,
            cardholder_name: card.cardholder_name,
            card_type: card.card_type,
            account_number: card.account_number,
            bank_name: card.bank_name,
            account_balance: None,
        }
    }

    pub fn detail(card: DebitCard) -> Self {
        let account_balance = non_zero(card.account_balance);
        Self {
            account_balance,
            ..Self::summary(card)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualCardView {
    pub id: String,
    pub card_number: String,
    pub cvv: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cardholder_name: String,
    pub card_type: String,
    pub nickname: String,
    pub spending_limit: f64,
    pub remaining_balance: f64,
    pub created_at: DateTime<Utc>,
    pub status: VirtualCardStatus,
    pub linked_account_id: String,
}

impl VirtualCardView {
    pub fn masked(card: VirtualCard) -> Self {
        Self {
            cvv: mask_cvv(&card.cvv),
            ..Self::revealed(card)
        }
    }

    /// Carries the real CVV; only used right after the card is issued
    pub fn revealed(card: VirtualCard) -> Self {
        Self {
            id: card.id,
            card_number: card.card_number,
            cvv: card.cvv,
            expiry_month: card.expiry_month,
            expiry_year: card.expiry_year,
            cardholder_name: card.cardholder_name,
            card_type: card.card_type,
            nickname: card.nickname,
            spending_limit: card.spending_limit,
            remaining_balance: card.remaining_balance,
            created_at: card.created_at,
            status: card.status,
            linked_account_id: card.linked_account_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub password: String,
}

/// Login answers with the user snapshot itself, outside the envelope
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "expiryDate", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(rename = "requiresPIN")]
    pub requires_pin: bool,
    #[serde(rename = "requiresOTP")]
    pub requires_otp: bool,
}

impl From<User> for LoginResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            full_name: user.full_name,
            email: user.email,
            token: user.token,
            expiry_date: user.expiry_date,
            requires_pin: user.requires_pin,
            requires_otp: user.requires_otp,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutopayRequest {
    pub amount_option: String,
    pub linked_account_id: String,
    pub auto_pay_enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PinUpdateRequest {
    #[serde(rename = "newPIN")]
    pub new_pin: String,
    #[serde(rename = "confirmPIN")]
    pub confirm_pin: String,
    #[serde(rename = "termsAccepted")]
    pub terms_accepted: bool,
}

impl PinUpdateRequest {
    /// Shape checks only; no PIN is stored
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.new_pin != self.confirm_pin {
            return Err(ApiError::InvalidInput("PINs do not match".to_string()));
        }
        if !self.terms_accepted {
            return Err(ApiError::InvalidInput("Terms must be accepted".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddonCardRequest {
    #[serde(rename = "customerID")]
    pub customer_id: String,
    #[serde(rename = "nameOnCard")]
    pub name_on_card: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: String,
    pub relationship: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonRequestPayload {
    pub request_id: String,
    pub estimated_delivery_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsPayload {
    pub card_id: String,
    pub limits: CardLimits,
}

/// Body of the per-scope limit updates
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScopedLimitsRequest {
    pub limits: Vec<TransactionLimit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedLimitsPayload {
    pub card_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domestic_limits: Option<Vec<TransactionLimit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_limits: Option<Vec<TransactionLimit>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualCardCreateRequest {
    pub nickname: String,
    pub spending_limit: f64,
    pub card_type: String,
    pub expiry_period: String,
    pub custom_expiry_date: Option<DateTime<Utc>>,
    pub linked_account_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VirtualCardUpdateRequest {
    pub nickname: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpendingLimitRequest {
    pub spending_limit: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingLimitPayload {
    pub card_id: String,
    pub spending_limit: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub card_id: String,
    pub status: VirtualCardStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegeneratedPayload {
    pub card_id: String,
    pub new_card_number: String,
    #[serde(rename = "newCVV")]
    pub new_cvv: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
}

/// Query string of the transaction listing. Values are kept raw so that
/// malformed ones fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct TransactionsPayload {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
}
