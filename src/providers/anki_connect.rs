use async_trait::async_trait;
use log::{debug, trace, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::providers::{RawResponse, Transport};

/// Envelope for every AnkiConnect request
#[derive(Debug, Serialize)]
pub struct ApiRequest<P: Serialize> {
    /// Action name, e.g. `version` or `addNote`
    pub action: String,
    /// API version the request targets
    pub version: u32,
    /// Action parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<P>,
}

/// Envelope for every AnkiConnect response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateDeckParams {
    pub deck: String,
}

#[derive(Debug, Serialize)]
pub struct AddNoteParams {
    pub note: NoteSpec,
}

/// A note as `addNote` expects it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSpec {
    pub deck_name: String,
    pub model_name: String,
    pub fields: NoteFields,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NoteFields {
    #[serde(rename = "Front")]
    pub front: String,
    #[serde(rename = "Back")]
    pub back: String,
}

/// Result of a single `addNote` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    Failure(String),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Turn an `addNote` response into an outcome.
///
/// A non-null `result` wins; otherwise the `error` text is used.
pub fn interpret_add_note(response: &RawResponse) -> SubmissionOutcome {
    if !response.is_ok() {
        return SubmissionOutcome::Failure(format!("HTTP error: {}", response.status));
    }

    match serde_json::from_str::<ApiResponse<Value>>(&response.body) {
        Ok(ApiResponse {
            result: Some(result),
            ..
        }) => {
            trace!("addNote result: {}", result);
            SubmissionOutcome::Success
        }
        Ok(parsed) => {
            SubmissionOutcome::Failure(parsed.error.unwrap_or_else(|| "Unknown error".to_string()))
        }
        Err(e) => SubmissionOutcome::Failure(ProviderError::ParseError(e.to_string()).to_string()),
    }
}

/// HTTP transport posting to a fixed AnkiConnect URL
#[derive(Debug)]
pub struct HttpTransport {
    /// Endpoint URL
    endpoint: String,
    /// HTTP client for making requests
    client: Client,
}

impl HttpTransport {
    /// Create a transport for the endpoint; `timeout` bounds requests that do not set their own
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        body: &Value,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, ProviderError> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

/// AnkiConnect client
#[derive(Debug)]
pub struct AnkiConnect<T: Transport> {
    transport: T,
    api_version: u32,
    probe_timeout: Duration,
    model_name: String,
    tags: Vec<String>,
}

impl AnkiConnect<HttpTransport> {
    /// Create a client talking HTTP to the configured endpoint
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let transport = HttpTransport::new(config.endpoint_url.clone(), config.request_timeout())?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> AnkiConnect<T> {
    /// Create a client over an arbitrary transport
    pub fn with_transport(transport: T, config: &Config) -> Self {
        Self {
            transport,
            api_version: config.api_version,
            probe_timeout: config.probe_timeout(),
            model_name: config.note.model_name.clone(),
            tags: config.note.tags.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn request_body<P: Serialize>(
        &self,
        action: &str,
        params: Option<P>,
    ) -> Result<Value, ProviderError> {
        let request = ApiRequest {
            action: action.to_string(),
            version: self.api_version,
            params,
        };
        serde_json::to_value(&request).map_err(|e| ProviderError::RequestFailed(e.to_string()))
    }

    /// Check that AnkiConnect answers.
    ///
    /// Any transport failure counts as unavailable; only HTTP 200 counts as available.
    pub async fn probe(&self) -> bool {
        let body = match self.request_body::<()>("version", None) {
            Ok(body) => body,
            Err(e) => {
                warn!("Could not build version request: {}", e);
                return false;
            }
        };

        match self.transport.post_json(&body, Some(self.probe_timeout)).await {
            Ok(response) => {
                debug!("version probe answered with HTTP {}", response.status);
                response.is_ok()
            }
            Err(e) => {
                debug!("version probe failed: {}", e);
                false
            }
        }
    }

    /// Create the deck if it does not exist.
    ///
    /// `Ok(true)` on HTTP 200 whether or not the deck already existed. Transport
    /// errors are returned to the caller.
    pub async fn ensure_deck(&self, deck_name: &str) -> Result<bool, ProviderError> {
        let body = self.request_body(
            "createDeck",
            Some(CreateDeckParams {
                deck: deck_name.to_string(),
            }),
        )?;

        let response = self.transport.post_json(&body, None).await?;
        debug!("createDeck '{}' answered with HTTP {}", deck_name, response.status);
        Ok(response.is_ok())
    }

    /// Submit one note. Never fails: transport errors become a failed outcome.
    pub async fn add_note(&self, front: &str, back: &str, deck_name: &str) -> SubmissionOutcome {
        let params = AddNoteParams {
            note: NoteSpec {
                deck_name: deck_name.to_string(),
                model_name: self.model_name.clone(),
                fields: NoteFields {
                    front: front.to_string(),
                    back: back.to_string(),
                },
                tags: self.tags.clone(),
            },
        };

        let body = match self.request_body("addNote", Some(params)) {
            Ok(body) => body,
            Err(e) => return SubmissionOutcome::Failure(e.to_string()),
        };

        match self.transport.post_json(&body, None).await {
            Ok(response) => interpret_add_note(&response),
            Err(e) => SubmissionOutcome::Failure(e.to_string()),
        }
    }
}
