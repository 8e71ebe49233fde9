//! Shared fixtures for unit tests: a scripted transport and a fully wired
//! client state around it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::net::request::ApiRequest;
use crate::net::transport::{RawResponse, Transport, TransportError};
use crate::state::ClientState;
use crate::storage::{MemoryTokenStore, TokenStore};

type Reply = Result<RawResponse, TransportError>;

/// Transport that records every request and answers from a script.
/// Once the script runs out it answers `200 {}`.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.push(Ok(json_response(status, &body)));
    }

    pub(crate) fn push_failure(&self, message: &str) {
        self.push(Err(TransportError { message: message.to_owned() }));
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json_response(200, &serde_json::json!({}))))
    }
}

pub(crate) fn json_response(status: u16, body: &Value) -> RawResponse {
    RawResponse {
        status,
        status_text: reason(status).to_owned(),
        body: serde_json::to_vec(body).unwrap(),
    }
}

pub(crate) fn envelope(data: Value) -> Value {
    serde_json::json!({ "status": 200, "message": "ok", "data": data })
}

pub(crate) fn user_json() -> Value {
    serde_json::json!({ "id": "u1", "email": "ana@example.com", "name": "Ana", "role": "user" })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// Client state over a mock transport and an in-memory token slot.
pub(crate) fn test_state(token: Option<&str>) -> (ClientState, Arc<MockTransport>) {
    let transport = MockTransport::new();
    let tokens: Arc<dyn TokenStore> = match token {
        Some(token) => Arc::new(MemoryTokenStore::with_token(token)),
        None => Arc::new(MemoryTokenStore::new()),
    };
    let state = ClientState::with_parts(transport.clone(), tokens);
    (state, transport)
}
