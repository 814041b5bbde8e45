//! Per-user card settings with field-level partial updates.

use serde::Deserialize;

use crate::store::{MemoryStore, models::CardSettings};

/// Zero-value settings tagged with the owning user
pub fn baseline(user_id: &str) -> CardSettings {
    CardSettings {
        user_id: user_id.to_string(),
        ..Default::default()
    }
}

/// Stored settings, persisting the zero-value baseline on first read
pub fn read_settings(store: &MemoryStore, user_id: &str) -> CardSettings {
    store.get_or_insert_with(user_id, || baseline(user_id))
}

/// A group of optional fields; only the fields present overwrite.
pub trait SettingsPatch {
    fn apply(self, settings: &mut CardSettings);
}

/// Apply `patch` atomically, starting from the baseline when nothing is
/// stored yet, and persist the result.
pub fn update_settings(
    store: &MemoryStore,
    user_id: &str,
    patch: impl SettingsPatch,
) -> CardSettings {
    store.modify(user_id, || baseline(user_id), |settings| patch.apply(settings))
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultCardsPatch {
    pub default_credit_card_id: Option<String>,
    pub default_debit_card_id: Option<String>,
    pub default_virtual_card_id: Option<String>,
}

impl SettingsPatch for DefaultCardsPatch {
    fn apply(self, settings: &mut CardSettings) {
        set(&mut settings.default_credit_card_id, self.default_credit_card_id);
        set(&mut settings.default_debit_card_id, self.default_debit_card_id);
        set(&mut settings.default_virtual_card_id, self.default_virtual_card_id);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPatch {
    pub contactless_payments_enabled: Option<bool>,
    pub international_usage_enabled: Option<bool>,
    pub online_transactions_enabled: Option<bool>,
    pub atm_withdrawals_enabled: Option<bool>,
}

impl SettingsPatch for SecurityPatch {
    fn apply(self, settings: &mut CardSettings) {
        set(&mut settings.contactless_payments_enabled, self.contactless_payments_enabled);
        set(&mut settings.international_usage_enabled, self.international_usage_enabled);
        set(&mut settings.online_transactions_enabled, self.online_transactions_enabled);
        set(&mut settings.atm_withdrawals_enabled, self.atm_withdrawals_enabled);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLimitsPatch {
    pub default_daily_limit: Option<f64>,
    pub default_monthly_limit: Option<f64>,
}

impl SettingsPatch for GlobalLimitsPatch {
    fn apply(self, settings: &mut CardSettings) {
        set(&mut settings.default_daily_limit, self.default_daily_limit);
        set(&mut settings.default_monthly_limit, self.default_monthly_limit);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPatch {
    pub transaction_notifications_enabled: Option<bool>,
    pub notification_preferences: Option<Vec<String>>,
    pub transaction_amount_threshold: Option<f64>,
    pub international_transaction_alerts: Option<bool>,
}

impl SettingsPatch for NotificationPatch {
    fn apply(self, settings: &mut CardSettings) {
        set(
            &mut settings.transaction_notifications_enabled,
            self.transaction_notifications_enabled,
        );
        set(&mut settings.notification_preferences, self.notification_preferences);
        set(&mut settings.transaction_amount_threshold, self.transaction_amount_threshold);
        set(
            &mut settings.international_transaction_alerts,
            self.international_transaction_alerts,
        );
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPatch {
    pub statement_delivery: Option<String>,
    pub statement_frequency: Option<String>,
    pub e_statement_enabled: Option<bool>,
}

impl SettingsPatch for StatementPatch {
    fn apply(self, settings: &mut CardSettings) {
        set(&mut settings.statement_delivery, self.statement_delivery);
        set(&mut settings.statement_frequency, self.statement_frequency);
        set(&mut settings.e_statement_enabled, self.e_statement_enabled);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinPatch {
    pub pin_for_contactless_enabled: Option<bool>,
}

impl SettingsPatch for PinPatch {
    fn apply(self, settings: &mut CardSettings) {
        set(&mut settings.pin_for_contactless_enabled, self.pin_for_contactless_enabled);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationPatch {
    pub biometric_authentication_enabled: Option<bool>,
    pub two_factor_authentication_enabled: Option<bool>,
    pub transaction_authentication_required: Option<bool>,
}

impl SettingsPatch for AuthenticationPatch {
    fn apply(self, settings: &mut CardSettings) {
        set(
            &mut settings.biometric_authentication_enabled,
            self.biometric_authentication_enabled,
        );
        set(
            &mut settings.two_factor_authentication_enabled,
            self.two_factor_authentication_enabled,
        );
        set(
            &mut settings.transaction_authentication_required,
            self.transaction_authentication_required,
        );
    }
}
