use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub token: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub requires_pin: bool,
    pub requires_otp: bool,
}

/// The three card families a card id can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Credit,
    Debit,
    Virtual,
}

impl CardKind {
    /// Probe order used whenever a bare card id has to be resolved
    pub const PROBE_ORDER: [CardKind; 3] = [CardKind::Credit, CardKind::Debit, CardKind::Virtual];

    pub fn label(&self) -> &'static str {
        match self {
            CardKind::Credit => "Credit card",
            CardKind::Debit => "Debit card",
            CardKind::Virtual => "Virtual card",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreditCard {
    pub id: String,
    pub card_number: String,
    pub cvv: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cardholder_name: String,
    pub card_type: String,
    pub rewards_points: i64,
    pub available_credit: f64,
    pub total_credit: f64,
    pub outstanding_balance: f64,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct DebitCard {
    pub id: String,
    pub card_number: String,
    pub cvv: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cardholder_name: String,
    pub card_type: String,
    pub account_number: String,
    pub bank_name: String,
    pub account_balance: f64,
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VirtualCardStatus {
    Active,
    Frozen,
    Cancelled,
}

impl FromStr for VirtualCardStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Frozen" => Ok(Self::Frozen),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown virtual card status: {other}")),
        }
    }
}

impl fmt::Display for VirtualCardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "Active",
            Self::Frozen => "Frozen",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub struct VirtualCard {
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
    pub user_id: String,
}

/// Autopay configuration, at most one per credit card
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Autopay {
    #[serde(rename = "autopayId")]
    pub id: String,
    pub card_id: String,
    pub amount_option: String,
    pub linked_account_id: String,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_pay_enabled: bool,
    pub activation_date: DateTime<Utc>,
    #[serde(skip)]
    pub user_id: String,
}

/// A single limit category on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLimit {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub limit_type: String,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub current_limit: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_limit: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub can_set_limit: bool,
}

/// Stored limits for one card. Doubles as the body of a whole-record replace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLimits {
    #[serde(skip)]
    pub card_id: String,
    #[serde(default)]
    pub domestic_limits: Vec<TransactionLimit>,
    #[serde(default)]
    pub international_limits: Vec<TransactionLimit>,
}

/// Account-wide card preferences for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSettings {
    pub default_credit_card_id: String,
    pub default_debit_card_id: String,
    pub default_virtual_card_id: String,
    pub transaction_notifications_enabled: bool,
    pub notification_preferences: Vec<String>,
    pub transaction_amount_threshold: f64,
    pub international_transaction_alerts: bool,
    pub contactless_payments_enabled: bool,
    pub international_usage_enabled: bool,
    pub online_transactions_enabled: bool,
    pub atm_withdrawals_enabled: bool,
    pub default_daily_limit: f64,
    pub default_monthly_limit: f64,
    pub statement_delivery: String,
    pub statement_frequency: String,
    pub e_statement_enabled: bool,
    pub biometric_authentication_enabled: bool,
    pub two_factor_authentication_enabled: bool,
    pub transaction_authentication_required: bool,
    pub pin_for_contactless_enabled: bool,
    #[serde(skip)]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub card_id: String,
    pub amount: f64,
    pub merchant: String,
    pub date: DateTime<Utc>,
    pub status: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
}
