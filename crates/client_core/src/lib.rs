use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{ConvertQuery, ConvertResponse, CONVERT_PATH};
use tracing::{debug, warn};
use url::Url;

pub mod config;
pub mod error;

pub use config::Settings;
pub use error::{ConversionError, FailureKind};

/// Outcome of one conversion attempt, consumed once by whoever issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    Success { text: String },
    Failure { reason: String },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The string to show in place of output, whichever way the attempt went.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Success { text } => text,
            Self::Failure { reason } => reason,
        }
    }

    pub fn into_display_text(self) -> String {
        match self {
            Self::Success { text } => text,
            Self::Failure { reason } => reason,
        }
    }
}

impl From<Result<String, ConversionError>> for ConversionResult {
    fn from(value: Result<String, ConversionError>) -> Self {
        match value {
            Ok(text) => Self::Success { text },
            Err(err) => Self::Failure {
                reason: err.to_string(),
            },
        }
    }
}

#[async_trait]
pub trait ConversionClient: Send + Sync {
    /// One request, no retries. Never panics and never returns early without a result.
    async fn convert(&self, input: &str) -> ConversionResult;
}

/// Stand-in used when no real client could be built; every call fails with `reason`.
pub struct UnavailableConversionClient {
    reason: String,
}

impl UnavailableConversionClient {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<ConversionError> for UnavailableConversionClient {
    fn from(err: ConversionError) -> Self {
        Self::new(err.to_string())
    }
}

#[async_trait]
impl ConversionClient for UnavailableConversionClient {
    async fn convert(&self, _input: &str) -> ConversionResult {
        ConversionResult::Failure {
            reason: self.reason.clone(),
        }
    }
}

pub struct HttpConversionClient {
    http: Client,
    endpoint: Url,
    request_timeout: Option<Duration>,
}

impl HttpConversionClient {
    pub fn new(server_url: &str) -> Result<Self, ConversionError> {
        Ok(Self {
            http: Client::new(),
            endpoint: convert_endpoint(server_url)?,
            request_timeout: None,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConversionError> {
        Ok(Self::new(&settings.server_url)?.with_timeout(settings.request_timeout()))
    }

    pub fn with_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request_text(&self, input: &str) -> Result<String, ConversionError> {
        let mut request = self.http.get(self.endpoint.clone()).query(&ConvertQuery {
            text: input.to_string(),
        });
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| self.classify(err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConversionError::Status { status });
        }

        let body = response.bytes().await.map_err(|err| self.classify(err))?;
        let parsed: ConvertResponse =
            serde_json::from_slice(&body).map_err(|err| ConversionError::MalformedResponse {
                detail: err.to_string(),
            })?;
        Ok(parsed.text)
    }

    fn classify(&self, err: reqwest::Error) -> ConversionError {
        match self.request_timeout {
            Some(timeout) if err.is_timeout() => ConversionError::Timeout {
                after_ms: timeout.as_millis(),
            },
            _ => ConversionError::Transport { source: err },
        }
    }
}

#[async_trait]
impl ConversionClient for HttpConversionClient {
    async fn convert(&self, input: &str) -> ConversionResult {
        debug!(endpoint = %self.endpoint, input_len = input.len(), "requesting conversion");
        let outcome = self.request_text(input).await;
        if let Err(err) = &outcome {
            warn!(kind = ?err.kind(), "conversion request failed: {err}");
        }
        outcome.into()
    }
}

/// Resolves `<server_url>/convert`, keeping any path prefix the base URL carries.
pub fn convert_endpoint(server_url: &str) -> Result<Url, ConversionError> {
    let invalid = |detail: String| ConversionError::InvalidServerUrl {
        url: server_url.to_string(),
        detail,
    };

    let mut base = Url::parse(server_url.trim()).map_err(|err| invalid(err.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("url cannot be used as a base".to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(CONVERT_PATH)
        .map_err(|err| invalid(err.to_string()))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
