//! Shared fakes and fixtures for controller integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use hubigr_api::{ApiGateway, ApiRequest, ApiTransport, RawResponse, TransportError};
use hubigr_app::{ControllerConfig, ProfileController};
use hubigr_core::Clock;
use hubigr_session::TokenStore;
use serde_json::{Value, json};

/// Transport replaying queued responses and recording every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    #[allow(dead_code)]
    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().expect("sent lock should work").clone()
    }

    #[allow(dead_code)]
    pub fn sent_urls(&self) -> Vec<String> {
        self.sent().into_iter().map(|request| request.url).collect()
    }
}

impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        self.sent.lock().expect("sent lock should work").push(request);
        self.responses
            .lock()
            .expect("response lock should work")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_string())))
    }
}

/// Clock moved by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    #[allow(dead_code)]
    pub fn set(&self, now_ms: u64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub const API_BASE: &str = "http://api.example.test/api/v1";

pub type TestController<S> = ProfileController<ScriptedTransport, S, ManualClock>;

/// Builds a controller replaying `responses`, with its clock at 1_000 ms.
#[allow(dead_code)]
pub fn controller<S: TokenStore>(
    responses: Vec<Result<RawResponse, TransportError>>,
    store: S,
    config: ControllerConfig,
) -> (TestController<S>, ManualClock) {
    let transport = ScriptedTransport {
        responses: Mutex::new(responses.into()),
        sent: Mutex::new(Vec::new()),
    };
    let gateway = ApiGateway::new(API_BASE, transport).expect("gateway should build");
    let clock = ManualClock::default();
    clock.set(1_000);
    (
        ProfileController::new(gateway, store, clock.clone(), config),
        clock,
    )
}

#[allow(dead_code)]
pub fn ok(body: Value) -> Result<RawResponse, TransportError> {
    Ok(RawResponse::json(200, &body))
}

#[allow(dead_code)]
pub fn status(code: u16, body: Value) -> Result<RawResponse, TransportError> {
    Ok(RawResponse::json(code, &body))
}

#[allow(dead_code)]
pub fn alice_profile() -> Value {
    json!({
        "email": "a@b.com",
        "nick": "Alice",
        "bio": "Makes tiny games",
        "avatar": "/avatars/alice.png"
    })
}

#[allow(dead_code)]
pub fn two_submissions() -> Value {
    json!({
        "submissions": [
            {"game_title": "Moth", "jam_title": "Spring Jam", "submitted_at": "2024-03-05T10:00:00Z"},
            {"game_title": "Lanterns", "jam_title": "Night Jam", "submitted_at": "2024-06-01T21:30:00+03:00"}
        ]
    })
}
