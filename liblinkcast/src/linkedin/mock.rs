//! Scripted transport for exercising the publication protocol
//!
//! Replays a queue of canned responses and records every request it was
//! handed, so tests can assert both what went over the wire and how many
//! calls each step made. Available for all builds (not just `cfg(test)`)
//! so integration tests outside this crate can use it.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::transport::{HttpTransport, WireRequest, WireResponse};
use crate::error::{PublishError, Result};

/// Transport double that replays scripted responses in order.
///
/// When the script runs dry, further sends fail with a network error —
/// a loud signal that the code under test made more calls than the
/// scenario allowed.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<WireResponse>>,
    requests: Mutex<Vec<WireRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transport preloaded with responses, served in order
    pub fn with_script(responses: Vec<WireResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Append a response to the script
    pub fn enqueue(&self, response: WireResponse) {
        self.script.lock().unwrap().push_back(response);
    }

    /// Every request sent so far, in order
    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests sent so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// A response with a JSON body and no headers
    pub fn json_response(status: u16, body: serde_json::Value) -> WireResponse {
        WireResponse {
            status,
            headers: vec![],
            body: body.to_string(),
        }
    }

    /// A response with a plain text body and no headers
    pub fn text_response(status: u16, body: &str) -> WireResponse {
        WireResponse {
            status,
            headers: vec![],
            body: body.to_string(),
        }
    }

    /// A response carrying headers
    pub fn response_with_headers(
        status: u16,
        headers: &[(&str, &str)],
        body: &str,
    ) -> WireResponse {
        WireResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PublishError::Network("mock transport script exhausted".to_string()).into())
    }
}
