use thiserror::Error;

/// Coarse classification of a failed conversion, attached to failure logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    Transport,
    Status,
    Timeout,
    MalformedResponse,
}

/// Everything that can go wrong between submitting text and receiving a `text` field.
///
/// The `Display` output is what ends up in the output area, so each message
/// starts with the status word the user would have seen from a browser client
/// (`error`, `timeout`, `parsererror`).
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("error: invalid server url '{url}': {detail}")]
    InvalidServerUrl { url: String, detail: String },
    #[error("error: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("error: server responded with {status}")]
    Status { status: reqwest::StatusCode },
    #[error("timeout: no response within {after_ms} ms")]
    Timeout { after_ms: u128 },
    #[error("parsererror: {detail}")]
    MalformedResponse { detail: String },
}

impl ConversionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidServerUrl { .. } => FailureKind::Configuration,
            Self::Transport { .. } => FailureKind::Transport,
            Self::Status { .. } => FailureKind::Status,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::MalformedResponse { .. } => FailureKind::MalformedResponse,
        }
    }
}
