//! Error types for the Alinka core crate.

use thiserror::Error;

/// Coarse classification of a failure, used to pick log severity and
/// recovery in the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Upstream is overloaded or warming up; a later attempt may succeed.
    TransientUpstream,
    /// Upstream rejected the request outright.
    HardFailure,
    /// Anything else (network, parsing, delivery).
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransientUpstream => write!(f, "transient_upstream"),
            Self::HardFailure => write!(f, "hard_failure"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Errors that can occur while routing a message.
#[derive(Debug, Error)]
pub enum BotError {
    /// Required environment variable missing or blank.
    #[error("{0} not set")]
    MissingEnv(&'static str),

    /// Environment variable present but unusable.
    #[error("invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// Completion API answered with a non-success status.
    #[error("completion API error {status}: {body}")]
    CompletionStatus {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// Completion API answered but produced no text.
    #[error("completion returned no text: {0}")]
    EmptyCompletion(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body could not be decoded.
    #[error("failed to parse response: {0}")]
    ResponseParse(String),

    /// The chat transport failed to deliver something.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl BotError {
    /// Classify this error for recovery and logging.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CompletionStatus { status, .. } => match *status {
                429 | 500 | 502 | 503 | 504 => ErrorKind::TransientUpstream,
                _ => ErrorKind::HardFailure,
            },
            Self::EmptyCompletion(_) => ErrorKind::HardFailure,
            Self::MissingEnv(_)
            | Self::InvalidEnv { .. }
            | Self::Http(_)
            | Self::ResponseParse(_)
            | Self::Delivery(_) => ErrorKind::Unknown,
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        BotError::Http(e.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, BotError>;
