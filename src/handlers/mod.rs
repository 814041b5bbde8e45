pub mod auth;
pub mod credit;
pub mod debit;
pub mod dto;
pub mod limits;
pub mod settings;
pub mod virtual_cards;

use axum::{
    Json, Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{app_state::AppState, auth::middleware::require_session, error::ApiResult};
use dto::Envelope;

/// Handler result wrapped in the standard envelope
pub type Reply<T> = ApiResult<Json<Envelope<T>>>;

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

/// Every route the server exposes. Everything under `/api` needs a session.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Credit cards
        .route("/cards/credit", get(credit::list_cards))
        .route("/cards/credit/{card_id}", get(credit::get_card))
        .route("/cards/credit/{card_id}/limits", put(credit::update_limits))
        .route(
            "/cards/credit/{card_id}/autopay",
            get(credit::get_autopay)
                .post(credit::enable_autopay)
                .put(credit::update_autopay)
                .delete(credit::disable_autopay),
        )
        .route("/cards/credit/{card_id}/pin", post(credit::update_pin))
        .route("/cards/credit/{card_id}/addon", post(credit::request_addon_card))
        // Debit cards
        .route("/cards/debit", get(debit::list_cards))
        .route("/cards/debit/{card_id}", get(debit::get_card))
        .route("/cards/debit/{card_id}/limits", put(debit::update_limits))
        .route("/cards/debit/{card_id}/pin", post(debit::update_pin))
        // Virtual cards
        .route(
            "/cards/virtual",
            get(virtual_cards::list_cards).post(virtual_cards::create_card),
        )
        .route(
            "/cards/virtual/{card_id}",
            get(virtual_cards::get_card)
                .put(virtual_cards::update_card)
                .delete(virtual_cards::delete_card),
        )
        .route(
            "/cards/virtual/{card_id}/spending-limit",
            put(virtual_cards::update_spending_limit),
        )
        .route("/cards/virtual/{card_id}/status", put(virtual_cards::update_status))
        .route(
            "/cards/virtual/{card_id}/regenerate",
            post(virtual_cards::regenerate_card),
        )
        .route(
            "/cards/virtual/{card_id}/transactions",
            get(virtual_cards::list_transactions),
        )
        // Settings
        .route("/cards/settings", get(settings::get_settings))
        .route("/cards/settings/default", put(settings::update_default_cards))
        .route("/cards/settings/security", put(settings::update_security))
        .route("/cards/settings/global-limits", put(settings::update_global_limits))
        .route("/cards/settings/notifications", put(settings::update_notifications))
        .route("/cards/settings/statement", put(settings::update_statement))
        .route("/cards/settings/pin", put(settings::update_pin))
        .route("/cards/settings/authentication", put(settings::update_authentication))
        // Limits for a card of any kind
        .route("/cards/{card_id}/limits", get(limits::get_limits))
        .route("/cards/{card_id}/limits/domestic", put(limits::update_domestic))
        .route(
            "/cards/{card_id}/limits/international",
            put(limits::update_international),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/auth/login", post(auth::login))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use chrono::Duration;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::{
        generator::ClockSeededGenerator,
        store::{
            MemoryStore,
            models::CardSettings,
            seed::load_demo_data,
            test_support::{credit_card, debit_card, user, virtual_card},
        },
    };

    fn app_with(store: MemoryStore) -> Router {
        let state = AppState::new(
            Arc::new(store),
            Arc::new(ClockSeededGenerator),
            Duration::hours(24),
        );
        router(state)
    }

    /// alice and bob, each holding one card of every kind
    fn two_user_app() -> Router {
        let store = MemoryStore::new();
        for owner in ["alice", "bob"] {
            store.put(user(owner, "secret"));
            store.put(credit_card(&format!("c-{owner}"), owner));
            store.put(debit_card(&format!("d-{owner}"), owner));
            store.put(virtual_card(&format!("v-{owner}"), owner));
        }
        app_with(store)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                request = request.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn login(app: &Router, user_id: &str, password: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"userID": user_id, "password": password})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_login_then_list_seeded_credit_cards() {
        let store = MemoryStore::new();
        load_demo_data(&store, &ClockSeededGenerator);
        let app = app_with(store);

        let (status, body) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"userID": "testuser", "password": "password123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userID"], "testuser");
        assert_eq!(body["fullName"], "Bruce Wayne");
        assert!(body.get("success").is_none());
        assert!(body.get("password").is_none());
        let token = body["token"].as_str().unwrap();

        let (status, body) = send(&app, "GET", "/api/cards/credit", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let cards = body["data"]["cards"].as_array().unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|card| card["cvv"] == "***"));
        let mut numbers: Vec<&str> = cards
            .iter()
            .map(|card| card["cardNumber"].as_str().unwrap())
            .collect();
        numbers.sort();
        assert_eq!(numbers, vec!["4532123456789012", "5412751234567890"]);
    }

    #[tokio::test]
    async fn test_login_failures() {
        let app = two_user_app();

        let (status, body) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"userID": "alice", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"success": false, "message": "Invalid credentials"}));

        let (status, _) = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({"userID": "nobody", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(&app, "POST", "/auth/login", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_session_required() {
        let app = two_user_app();

        let (status, body) = send(&app, "GET", "/api/cards/debit", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Authorization header required");

        let request = Request::builder()
            .uri("/api/cards/debit")
            .header(AUTHORIZATION, "Token abc")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Invalid authorization header format");

        let (status, body) = send(&app, "GET", "/api/cards/debit", Some("nope"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_relogin_retires_previous_token() {
        let app = two_user_app();
        let first = login(&app, "alice", "secret").await;
        let second = login(&app, "alice", "secret").await;
        assert_ne!(first, second);

        let (status, _) = send(&app, "GET", "/api/cards/debit", Some(&first), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, body) = send(&app, "GET", "/api/cards/debit", Some(&second), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cards"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ownership_per_card_kind() {
        let app = two_user_app();
        let token = login(&app, "alice", "secret").await;

        for (path, label) in [
            ("credit/c-bob", "Credit card"),
            ("debit/d-bob", "Debit card"),
            ("virtual/v-bob", "Virtual card"),
        ] {
            let (status, body) =
                send(&app, "GET", &format!("/api/cards/{path}"), Some(&token), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
            assert_eq!(body, json!({"success": false, "message": "Access denied"}));

            let kind = path.split('/').next().unwrap();
            let (status, body) = send(
                &app,
                "GET",
                &format!("/api/cards/{kind}/missing"),
                Some(&token),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["message"], format!("{label} not found"));
        }

        let (status, body) =
            send(&app, "GET", "/api/cards/missing/limits", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Card not found");

        let (status, _) = send(&app, "GET", "/api/cards/d-bob/limits", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    async fn send_raw(app: &Router, method: &str, uri: &str, token: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ownership_checked_before_body() {
        let app = two_user_app();
        let token = login(&app, "alice", "secret").await;

        for (method, uri, body, expected) in [
            ("POST", "/api/cards/credit/c-bob/pin", "not json", StatusCode::FORBIDDEN),
            ("POST", "/api/cards/credit/missing/pin", "not json", StatusCode::NOT_FOUND),
            ("PUT", "/api/cards/v-bob/limits/domestic", r#"{"limits":5}"#, StatusCode::FORBIDDEN),
            ("PUT", "/api/cards/missing/limits/international", "{", StatusCode::NOT_FOUND),
            ("PUT", "/api/cards/debit/d-bob/limits", "[]", StatusCode::FORBIDDEN),
            ("PUT", "/api/cards/virtual/v-bob/status", "", StatusCode::FORBIDDEN),
            ("POST", "/api/cards/credit/c-bob/addon", "nope", StatusCode::FORBIDDEN),
        ] {
            let (status, _) = send_raw(&app, method, uri, &token, body).await;
            assert_eq!(status, expected, "{method} {uri}");
        }

        // own card with no autopay: the missing autopay wins over the bad body
        let (status, body) =
            send_raw(&app, "PUT", "/api/cards/credit/c-alice/autopay", &token, "oops").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Autopay not found");

        // once ownership passes, the body is still validated
        let (status, body) =
            send_raw(&app, "POST", "/api/cards/credit/c-alice/pin", &token, "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_card_detail_masks_cvv() {
        let app = two_user_app();
        let token = login(&app, "alice", "secret").await;

        let (status, body) =
            send(&app, "GET", "/api/cards/credit/c-alice", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cvv"], "***");
        assert_eq!(body["data"]["cardNumber"], "4532000011112222");
        assert_eq!(body["data"]["availableCredit"], 1000.0);
        assert!(body["data"].get("outstandingBalance").is_none());
    }

    #[tokio::test]
    async fn test_autopay_lifecycle() {
        let app = two_user_app();
        let token = login(&app, "alice", "secret").await;
        let uri = "/api/cards/credit/c-alice/autopay";

        let (status, body) = send(&app, "PUT", uri, Some(&token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Autopay not found");

        let request = json!({
            "amountOption": "Minimum Due",
            "linkedAccountId": "acct-1",
            "autoPayEnabled": true
        });
        let (status, body) = send(&app, "POST", uri, Some(&token), Some(request.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Autopay enabled successfully");
        assert_eq!(body["data"]["cardId"], "c-alice");
        assert_eq!(body["data"]["amountOption"], "Minimum Due");
        let first_id = body["data"]["autopayId"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "PUT",
            uri,
            Some(&token),
            Some(json!({"amountOption": "Total Due", "linkedAccountId": "acct-2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("data").is_none());

        let (_, body) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(body["data"]["amountOption"], "Total Due");
        assert_eq!(body["data"]["linkedAccountId"], "acct-2");
        assert_eq!(body["data"]["autoPayEnabled"], true);
        assert_eq!(body["data"]["autopayId"], first_id.as_str());

        let (status, body) = send(&app, "DELETE", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Autopay disabled successfully");

        let (status, _) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, "POST", uri, Some(&token), Some(request)).await;
        assert_ne!(body["data"]["autopayId"], first_id.as_str());

        let (status, _) = send(
            &app,
            "DELETE",
            "/api/cards/credit/c-bob/autopay",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_pin_and_addon_requests() {
        let app = two_user_app();
        let token = login(&app, "alice", "secret").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/cards/debit/d-alice/pin",
            Some(&token),
            Some(json!({"newPIN": "1234", "confirmPIN": "9999", "termsAccepted": true})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "PINs do not match");

        let (status, body) = send(
            &app,
            "POST",
            "/api/cards/credit/c-alice/pin",
            Some(&token),
            Some(json!({"newPIN": "1234", "confirmPIN": "1234", "termsAccepted": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "PIN updated successfully");

        let (status, body) = send(
            &app,
            "POST",
            "/api/cards/credit/c-alice/addon",
            Some(&token),
            Some(json!({"customerID": "cust", "nameOnCard": "Kid", "relationship": "Child"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["requestId"].as_str().is_some());
        let delivery = body["data"]["estimatedDeliveryDate"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(delivery).is_ok());
    }

    #[tokio::test]
    async fn test_limits_defaults_and_scoped_update() {
        let app = two_user_app();
        let token = login(&app, "alice", "secret").await;
        let uri = "/api/cards/v-alice/limits";

        let (status, first) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["data"]["cardId"], "v-alice");
        assert_eq!(first["data"]["domesticLimits"].as_array().unwrap().len(), 4);
        assert_eq!(first["data"]["domesticLimits"][0]["currentLimit"], 50000.0);
        assert_eq!(first["data"]["internationalLimits"][0]["isEnabled"], false);
        let (_, second) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(first, second);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/cards/v-alice/limits/domestic",
            Some(&token),
            Some(json!({"limits": [{"type": "Online", "isEnabled": true, "currentLimit": 42.0}]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Domestic limits updated successfully");
        assert_eq!(body["data"]["domesticLimits"][0]["currentLimit"], 42.0);
        assert!(body["data"].get("internationalLimits").is_none());

        let (_, body) = send(&app, "GET", uri, Some(&token), None).await;
        let domestic = &body["data"]["domesticLimits"][0];
        assert_eq!(domestic["maxLimit"], 42.0);
        assert_eq!(domestic["canSetLimit"], true);
        assert!(domestic["id"].as_str().is_some());
        assert!(body["data"].get("internationalLimits").is_none());

        let (status, body) = send(
            &app,
            "PUT",
            "/api/cards/v-alice/limits/international",
            Some(&token),
            Some(json!({"nope": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["internationalLimits"], json!([]));
    }

    #[tokio::test]
    async fn test_whole_record_limits_replace() {
        let app = two_user_app();
        let token = login(&app, "alice", "secret").await;

        let limits = json!({
            "domesticLimits": [{"id": "l1", "type": "ATM Cash Withdrawal", "isEnabled": true, "currentLimit": 10.0, "maxLimit": 20.0}],
            "internationalLimits": [{"type": "Online", "isEnabled": false, "currentLimit": 0.0}]
        });
        let (status, body) = send(
            &app,
            "PUT",
            "/api/cards/credit/c-alice/limits",
            Some(&token),
            Some(limits),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Card limits updated successfully");
        assert_eq!(body["data"]["cardId"], "c-alice");
        assert_eq!(body["data"]["limits"]["domesticLimits"][0]["id"], "l1");

        let (_, body) = send(&app, "GET", "/api/cards/c-alice/limits", Some(&token), None).await;
        assert_eq!(body["data"]["domesticLimits"][0]["id"], "l1");
        assert_eq!(body["data"]["internationalLimits"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/cards/debit/d-alice/limits",
            Some(&token),
            Some(json!({"domesticLimits": "bad"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_settings_partial_update() {
        let app = two_user_app();
        let token = login(&app, "alice", "secret").await;

        let (status, body) = send(&app, "GET", "/api/cards/settings", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let baseline = serde_json::to_value(CardSettings::default()).unwrap();
        assert_eq!(body["data"], baseline);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/cards/settings/security",
            Some(&token),
            Some(json!({"contactlessPaymentsEnabled": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "Security settings updated successfully"}));

        let (status, _) = send(
            &app,
            "PUT",
            "/api/cards/settings/statement",
            Some(&token),
            Some(json!({"statementFrequency": "Monthly"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/api/cards/settings", Some(&token), None).await;
        assert_eq!(body["data"]["contactlessPaymentsEnabled"], true);
        assert_eq!(body["data"]["statementFrequency"], "Monthly");
        assert_eq!(body["data"]["internationalUsageEnabled"], false);
        assert!(body["data"].get("userId").is_none());

        let bob = login(&app, "bob", "secret").await;
        let (_, body) = send(&app, "GET", "/api/cards/settings", Some(&bob), None).await;
        assert_eq!(body["data"]["contactlessPaymentsEnabled"], false);
    }

    #[tokio::test]
    async fn test_virtual_card_lifecycle() {
        let app = two_user_app();
        let token = login(&app, "alice", "secret").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/cards/virtual",
            Some(&token),
            Some(json!({
                "nickname": "Groceries",
                "spendingLimit": 250.0,
                "cardType": "Visa",
                "expiryPeriod": "6 Months",
                "linkedAccountId": "acct-9"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Virtual card created successfully");
        let card = &body["data"];
        let card_id = card["id"].as_str().unwrap().to_string();
        let cvv = card["cvv"].as_str().unwrap();
        assert_eq!(cvv.len(), 3);
        assert!(cvv.chars().all(|c| c.is_ascii_digit()));
        assert!(card["cardNumber"].as_str().unwrap().starts_with("4532"));
        assert_eq!(card["cardholderName"], "alice name");
        assert_eq!(card["remainingBalance"], 250.0);
        assert_eq!(card["status"], "Active");

        let uri = format!("/api/cards/virtual/{card_id}");
        let (_, body) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(body["data"]["cvv"], "***");

        let (_, body) = send(&app, "GET", "/api/cards/virtual", Some(&token), None).await;
        assert_eq!(body["data"]["cards"].as_array().unwrap().len(), 2);

        let (_, body) = send(
            &app,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({"nickname": "Food"})),
        )
        .await;
        assert_eq!(body["data"]["nickname"], "Food");
        assert_eq!(body["data"]["cvv"], "***");

        let (_, body) = send(
            &app,
            "PUT",
            &format!("{uri}/spending-limit"),
            Some(&token),
            Some(json!({"spendingLimit": 900.0})),
        )
        .await;
        assert_eq!(body["data"]["spendingLimit"], 900.0);
        assert_eq!(body["data"]["remainingBalance"], 250.0);

        let (status, body) = send(
            &app,
            "PUT",
            &format!("{uri}/status"),
            Some(&token),
            Some(json!({"status": "Paused"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Invalid status. Must be Active, Frozen, or Cancelled"
        );

        let (status, body) = send(
            &app,
            "PUT",
            &format!("{uri}/status"),
            Some(&token),
            Some(json!({"status": "Frozen"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({"cardId": card_id, "status": "Frozen"}));

        let (status, body) = send(
            &app,
            "POST",
            &format!("{uri}/regenerate"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["newCardNumber"].as_str().unwrap().starts_with("4532"));
        assert_eq!(body["data"]["newCVV"].as_str().unwrap().len(), 3);

        let (status, body) = send(
            &app,
            "GET",
            &format!("{uri}/transactions?page=1&limit=5"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["pagination"]["total"], 0);
        assert_eq!(body["data"]["pagination"]["limit"], 5);

        let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Virtual card not found");
    }

    #[tokio::test]
    async fn test_seeded_transactions_are_paginated() {
        let store = MemoryStore::new();
        load_demo_data(&store, &ClockSeededGenerator);
        let app = app_with(store);
        let token = login(&app, "testuser", "password123").await;

        let (_, body) = send(&app, "GET", "/api/cards/virtual", Some(&token), None).await;
        let card_id = body["data"]["cards"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/cards/virtual/{card_id}/transactions?limit=4&page=2"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(
            body["data"]["pagination"],
            json!({"page": 2, "limit": 4, "total": 6, "totalPages": 2})
        );

        let demo = login(&app, "demouser", "password456").await;
        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/cards/virtual/{card_id}/transactions"),
            Some(&demo),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
