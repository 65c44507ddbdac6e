/*!
 * Transport layer for the AnkiConnect endpoint.
 *
 * This module contains:
 * - `Transport`: the seam between the AnkiConnect client and the wire
 * - `anki_connect`: the AnkiConnect client and its HTTP transport
 * - `mock`: a scripted transport used by the tests
 */

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use std::time::Duration;

use crate::errors::ProviderError;

/// Status code and body of an HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Common trait for anything that can deliver an AnkiConnect request
///
/// Implementations post the JSON body to the endpoint and hand back the raw
/// response; interpreting it is left to the client.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Post a JSON body
    ///
    /// # Arguments
    /// * `body` - The request body
    /// * `timeout` - Per-request timeout; `None` uses the transport default
    ///
    /// # Returns
    /// * `Result<RawResponse, ProviderError>` - The response, or a transport error
    async fn post_json(
        &self,
        body: &Value,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, ProviderError>;
}

pub mod anki_connect;
pub mod mock;
