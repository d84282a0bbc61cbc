//! Shared fakes for gateway integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use hubigr_api::{ApiRequest, ApiTransport, RawResponse, TransportError};
use hubigr_core::{NotificationSink, Severity};

/// Transport replaying queued responses and recording every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    #[allow(dead_code)]
    pub fn replying(responses: Vec<Result<RawResponse, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().expect("sent lock should work").clone()
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

/// Sink collecting notifications in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub messages: Vec<(String, Severity)>,
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.messages.push((message.to_string(), severity));
    }
}
