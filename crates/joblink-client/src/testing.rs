//! Scripted transport for tests and offline development.
//!
//! Responses are queued ahead of time and served in order; every request
//! the pipeline issues is recorded for assertion. Panics on a drained
//! script only via an explicit error response, never implicitly.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};

type ScriptedResponse = (Result<TransportResponse, TransportError>, Option<Duration>);

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and JSON body.
    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_raw(status, body.to_string().into_bytes());
    }

    /// Queue a response that is held for `delay` before returning, for
    /// tests that need overlapping in-flight requests.
    pub fn push_json_delayed(&self, status: u16, body: serde_json::Value, delay: Duration) {
        self.responses
            .lock()
            .expect("mock transport lock")
            .push_back((
                Ok(TransportResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string().into_bytes(),
                }),
                Some(delay),
            ));
    }

    /// Queue a response with raw body bytes.
    pub fn push_raw(&self, status: u16, body: Vec<u8>) {
        self.responses
            .lock()
            .expect("mock transport lock")
            .push_back((
                Ok(TransportResponse {
                    status,
                    headers: Vec::new(),
                    body,
                }),
                None,
            ));
    }

    /// Queue a transport-level fault.
    pub fn push_error(&self, error: TransportError) {
        self.responses
            .lock()
            .expect("mock transport lock")
            .push_back((Err(error), None));
    }

    /// All requests executed so far, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().expect("mock transport lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock transport lock").len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests
            .lock()
            .expect("mock transport lock")
            .push(request);
        let (response, delay) = self
            .responses
            .lock()
            .expect("mock transport lock")
            .pop_front()
            .unwrap_or_else(|| {
                (
                    Err(TransportError::Other("no scripted response".to_string())),
                    None,
                )
            });
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }
}
