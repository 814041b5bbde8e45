use chrono::{Duration, Utc};

use super::MemoryStore;
use super::models::{
    CardSettings, CreditCard, DebitCard, Transaction, User, VirtualCard, VirtualCardStatus,
};
use crate::generator::CredentialGenerator;

const DEMO_MERCHANTS: [(&str, f64); 6] = [
    ("Netflix", 649.0),
    ("Spotify", 119.0),
    ("Amazon", 1299.5),
    ("Uber", 342.75),
    ("Netflix", 649.0),
    ("Apple", 99.0),
];

fn demo_user(user_id: &str, password: &str, full_name: &str, email: &str) -> User {
    User {
        user_id: user_id.to_string(),
        password: password.to_string(),
        full_name: full_name.to_string(),
        email: email.to_string(),
        token: None,
        expiry_date: None,
        requires_pin: false,
        requires_otp: false,
    }
}

/// Load the demo users and their cards
pub fn load_demo_data(store: &MemoryStore, ids: &dyn CredentialGenerator) {
    let bruce = demo_user("testuser", "password123", "Bruce Wayne", "bruce.wayne@example.com");

    let platinum = CreditCard {
        id: ids.record_id(),
        card_number: "4532123456789012".to_string(),
        cvv: "417".to_string(),
        expiry_month: 12,
        expiry_year: 2026,
        cardholder_name: bruce.full_name.clone(),
        card_type: "Visa Platinum".to_string(),
        rewards_points: 5000,
        available_credit: 500_000.0,
        total_credit: 1_000_000.0,
        outstanding_balance: 0.0,
        user_id: bruce.user_id.clone(),
    };
    let world = CreditCard {
        id: ids.record_id(),
        card_number: "5412751234567890".to_string(),
        cvv: "902".to_string(),
        expiry_month: 6,
        expiry_year: 2029,
        cardholder_name: bruce.full_name.clone(),
        card_type: "Mastercard World".to_string(),
        rewards_points: 2500,
        available_credit: 250_000.0,
        total_credit: 500_000.0,
        outstanding_balance: 0.0,
        user_id: bruce.user_id.clone(),
    };
    let rupay = DebitCard {
        id: ids.record_id(),
        card_number: "6529251234567890".to_string(),
        cvv: "638".to_string(),
        expiry_month: 10,
        expiry_year: 2028,
        cardholder_name: bruce.full_name.clone(),
        card_type: "Rupay".to_string(),
        account_number: "50123456789012".to_string(),
        bank_name: "HDFC Bank".to_string(),
        account_balance: 50_000.0,
        user_id: bruce.user_id.clone(),
    };
    let subscription = VirtualCard {
        id: ids.record_id(),
        card_number: "4532123456789012".to_string(),
        cvv: "255".to_string(),
        expiry_month: 3,
        expiry_year: 2025,
        cardholder_name: bruce.full_name.clone(),
        card_type: "Visa".to_string(),
        nickname: "Netflix Subscription".to_string(),
        spending_limit: 5000.0,
        remaining_balance: 3200.0,
        created_at: Utc::now(),
        status: VirtualCardStatus::Active,
        linked_account_id: "account-uuid".to_string(),
        user_id: bruce.user_id.clone(),
    };

    let settings = CardSettings {
        default_credit_card_id: platinum.id.clone(),
        default_debit_card_id: rupay.id.clone(),
        default_virtual_card_id: subscription.id.clone(),
        transaction_notifications_enabled: true,
        notification_preferences: vec!["Push Notification".to_string(), "Email".to_string()],
        transaction_amount_threshold: 1000.0,
        international_transaction_alerts: true,
        contactless_payments_enabled: true,
        international_usage_enabled: true,
        online_transactions_enabled: true,
        atm_withdrawals_enabled: true,
        default_daily_limit: 50_000.0,
        default_monthly_limit: 200_000.0,
        statement_delivery: "Email".to_string(),
        statement_frequency: "Monthly".to_string(),
        e_statement_enabled: true,
        biometric_authentication_enabled: true,
        two_factor_authentication_enabled: false,
        transaction_authentication_required: true,
        pin_for_contactless_enabled: false,
        user_id: bruce.user_id.clone(),
    };

    let now = Utc::now();
    for (days_ago, (merchant, amount)) in DEMO_MERCHANTS.iter().enumerate().rev() {
        store.append_transaction(Transaction {
            id: ids.record_id(),
            card_id: subscription.id.clone(),
            amount: *amount,
            merchant: merchant.to_string(),
            date: now - Duration::days(days_ago as i64 * 5),
            status: "Completed".to_string(),
            transaction_type: "Purchase".to_string(),
        });
    }

    let diana = demo_user("demouser", "password456", "Diana Prince", "diana.prince@example.com");
    let signature = CreditCard {
        id: ids.record_id(),
        card_number: "4111111111111111".to_string(),
        cvv: "771".to_string(),
        expiry_month: 8,
        expiry_year: 2030,
        cardholder_name: diana.full_name.clone(),
        card_type: "Visa Signature".to_string(),
        rewards_points: 1200,
        available_credit: 150_000.0,
        total_credit: 300_000.0,
        outstanding_balance: 12_500.0,
        user_id: diana.user_id.clone(),
    };
    let savings = DebitCard {
        id: ids.record_id(),
        card_number: "5105105105105100".to_string(),
        cvv: "049".to_string(),
        expiry_month: 4,
        expiry_year: 2029,
        cardholder_name: diana.full_name.clone(),
        card_type: "Mastercard".to_string(),
        account_number: "60987654321098".to_string(),
        bank_name: "ICICI Bank".to_string(),
        account_balance: 82_000.0,
        user_id: diana.user_id.clone(),
    };

    store.put(platinum);
    store.put(world);
    store.put(rupay);
    store.put(subscription);
    store.put(settings);
    store.put(bruce);

    store.put(signature);
    store.put(savings);
    store.put(diana);

    tracing::debug!("Loaded demo data for testuser and demouser");
}
