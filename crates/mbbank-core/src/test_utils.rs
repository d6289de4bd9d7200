//! Test utilities for mbbank-core
//!
//! This module provides a mock banking gateway that speaks the same JSON
//! shapes as the real one, so `MbBankClient` can be exercised over HTTP.

use std::net::SocketAddr;

use axum::{extract::Json, routing::post, Router};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::client::http::{
    ACCOUNT_HISTORY_PATH, BALANCE_PATH, CARD_HISTORY_PATH, CARD_LIST_PATH, INTEREST_RATE_PATH,
    LOGIN_PATH, SAVING_DETAIL_PATH, SAVING_LIST_PATH,
};
use crate::client::mock;
use crate::models::RateCurrency;

/// Username the mock gateway accepts
pub const MOCK_USERNAME: &str = "0912345678";

/// Password the mock gateway accepts
pub const MOCK_PASSWORD: &str = "correct-horse";

/// Session id handed out on successful login
pub const MOCK_SESSION_ID: &str = "mock-session-7f3a";

/// Mock banking gateway for testing
pub struct MockBankServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockBankServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route(LOGIN_PATH, post(handle_login))
            .route(BALANCE_PATH, post(handle_balance))
            .route(ACCOUNT_HISTORY_PATH, post(handle_account_history))
            .route(CARD_LIST_PATH, post(handle_card_list))
            .route(CARD_HISTORY_PATH, post(handle_card_history))
            .route(SAVING_LIST_PATH, post(handle_saving_list))
            .route(SAVING_DETAIL_PATH, post(handle_saving_detail))
            .route(INTEREST_RATE_PATH, post(handle_interest_rate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockBankServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn rejected(code: &str, message: &str) -> Json<Value> {
    Json(json!({
        "result": { "ok": false, "responseCode": code, "message": message }
    }))
}

async fn handle_login(Json(body): Json<Value>) -> Json<Value> {
    let user = body.get("userId").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);

    if user == Some(MOCK_USERNAME) && password == Some(MOCK_PASSWORD) {
        Json(json!({
            "sessionId": MOCK_SESSION_ID,
            "result": { "ok": true, "responseCode": "00", "message": "OK" }
        }))
    } else {
        rejected("GW283", "Invalid username or password")
    }
}

/// Check the session, build the payload, and echo the call's arguments back
fn respond(body: &Value, build: impl FnOnce(&Value) -> Value) -> Json<Value> {
    if body.get("sessionId").and_then(Value::as_str) != Some(MOCK_SESSION_ID) {
        return rejected("GW200", "Session expired");
    }

    let mut payload = build(body);
    if let Value::Object(map) = &mut payload {
        let mut echo = body.as_object().cloned().unwrap_or_default();
        echo.remove("sessionId");
        echo.remove("refNo");
        map.insert("echo".to_string(), Value::Object(echo));
    }
    Json(payload)
}

fn arg<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

async fn handle_balance(Json(body): Json<Value>) -> Json<Value> {
    respond(&body, |_| mock::balance_payload())
}

async fn handle_account_history(Json(body): Json<Value>) -> Json<Value> {
    respond(&body, |b| mock::account_history_payload(arg(b, "accountNo")))
}

async fn handle_card_list(Json(body): Json<Value>) -> Json<Value> {
    respond(&body, |_| mock::card_list_payload())
}

async fn handle_card_history(Json(body): Json<Value>) -> Json<Value> {
    respond(&body, |_| mock::card_history_payload())
}

async fn handle_saving_list(Json(body): Json<Value>) -> Json<Value> {
    respond(&body, |_| mock::saving_list_payload())
}

async fn handle_saving_detail(Json(body): Json<Value>) -> Json<Value> {
    respond(&body, |b| mock::saving_detail_payload(arg(b, "accNo")))
}

async fn handle_interest_rate(Json(body): Json<Value>) -> Json<Value> {
    respond(&body, |b| {
        let currency = arg(b, "currency").parse().unwrap_or(RateCurrency::Vnd);
        mock::interest_rate_payload(currency)
    })
}
