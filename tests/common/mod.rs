//! Shared helpers for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kgiton::clock::Clock;
use kgiton::{HttpClient, Kgiton};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::MockServer;

/// A clock that advances only when something sleeps on it.
///
/// Every sleep is recorded and returns immediately after moving virtual time
/// forward, so backoff schedules and poll loops run without real waiting.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        })
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.elapsed.lock().unwrap() += duration;
        tokio::task::yield_now().await;
    }
}

/// A gateway pointed at `server` with a manual clock and 100 ms base backoff.
pub fn http_client(server: &MockServer, clock: &Arc<ManualClock>) -> HttpClient {
    HttpClient::builder()
        .base_url(server.uri())
        .unwrap()
        .retry_delay(Duration::from_millis(100))
        .clock(clock.clone())
        .build()
        .unwrap()
}

/// Like [`http_client`] but wrapped in the SDK root.
pub fn sdk(server: &MockServer, clock: &Arc<ManualClock>) -> Kgiton {
    Kgiton::from_client(http_client(server, clock))
}

/// Wraps `data` in a successful envelope.
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// An error envelope as the server sends it.
pub fn error_body(message: &str) -> Value {
    json!({ "success": false, "error": message })
}

pub fn user_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Budi Santoso",
        "email": "budi@example.com",
        "role": "user",
        "referral_code": "BUDI01",
        "referred_by": null,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

pub fn license_json(key: &str, status: &str, token_balance: u64) -> Value {
    json!({
        "id": format!("lk-{}", key),
        "key": key,
        "price_per_token": 250.0,
        "token_balance": token_balance,
        "status": status,
        "assigned_to": "u-1",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

pub fn validation_json(key: &str, status: &str, is_valid: bool, token_balance: u64) -> Value {
    json!({
        "license_key": key,
        "exists": true,
        "is_valid": is_valid,
        "is_assigned": true,
        "assigned_to_user_id": "u-1",
        "status": status,
        "token_balance": token_balance,
        "price_per_token": 250.0,
        "trial_expires_at": "2026-12-31T00:00:00Z"
    })
}

pub fn transaction_status_json(id: &str, status: &str) -> Value {
    json!({
        "transaction_id": id,
        "amount": 250000.0,
        "tokens_added": 1000,
        "status": status,
        "created_at": "2026-01-05T10:00:00Z"
    })
}
