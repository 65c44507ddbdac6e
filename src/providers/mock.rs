/*!
 * Mock transport for testing.
 *
 * This module provides a transport that answers AnkiConnect requests without a
 * running Anki:
 * - `MockTransport::online()` - Every action succeeds
 * - `MockTransport::offline()` - Every request fails with a connection error
 * - `MockTransport::with_handler()` - Custom answer per request
 *
 * Every request body is recorded so tests can assert on what was sent.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{RawResponse, Transport};

type Handler = Box<dyn Fn(&Value) -> Result<RawResponse, ProviderError> + Send + Sync>;

/// Scripted transport recording every request it receives
pub struct MockTransport {
    handler: Handler,
    requests: Mutex<Vec<(Value, Option<Duration>)>>,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("requests", &self.requests.lock().len())
            .finish()
    }
}

/// Action name of a request body, or an empty string
pub fn action_of(body: &Value) -> &str {
    body.get("action").and_then(Value::as_str).unwrap_or_default()
}

/// Success body in AnkiConnect's envelope
pub fn ok_body(result: Value) -> String {
    json!({ "result": result, "error": null }).to_string()
}

/// Error body in AnkiConnect's envelope
pub fn error_body(message: &str) -> String {
    json!({ "result": null, "error": message }).to_string()
}

impl MockTransport {
    /// Create a transport answering with the given handler
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&Value) -> Result<RawResponse, ProviderError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// An AnkiConnect that accepts every deck and note
    pub fn online() -> Self {
        let next_note_id = AtomicU64::new(1_700_000_000_000);
        Self::with_handler(move |body| {
            let result = match action_of(body) {
                "version" => json!(6),
                "addNote" => json!(next_note_id.fetch_add(1, Ordering::SeqCst)),
                "createDeck" => json!(1),
                _ => Value::Null,
            };
            Ok(RawResponse::new(200, ok_body(result)))
        })
    }

    /// An endpoint nobody is listening on
    pub fn offline() -> Self {
        Self::with_handler(|_| {
            Err(ProviderError::ConnectionError("connection refused".to_string()))
        })
    }

    /// All recorded request bodies, oldest first
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().iter().map(|(body, _)| body.clone()).collect()
    }

    /// Timeouts requested alongside each body, oldest first
    pub fn timeouts(&self) -> Vec<Option<Duration>> {
        self.requests.lock().iter().map(|(_, timeout)| *timeout).collect()
    }

    /// Action names of the recorded requests, oldest first
    pub fn actions(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|(body, _)| action_of(body).to_string())
            .collect()
    }

    /// Number of recorded requests for an action
    pub fn count(&self, action: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|(body, _)| action_of(body) == action)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(
        &self,
        body: &Value,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, ProviderError> {
        self.requests.lock().push((body.clone(), timeout));
        (self.handler)(body)
    }
}
