use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum EsflowError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Service error ({status}): {error_type}: {reason}")]
    Api {
        status: StatusCode,
        error_type: String,
        reason: String,
    },

    #[error("{operation} on index '{index}' was not acknowledged")]
    Unacknowledged { operation: String, index: String },

    #[error("Unexpected write result for document {id}: {result}")]
    UnexpectedWriteResult { id: String, result: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Bulk load incomplete: {succeeded}/{expected} succeeded, {failed} failed (first failure: {first_reason})")]
    BulkPartialFailure {
        expected: usize,
        succeeded: usize,
        failed: usize,
        first_reason: String,
    },

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, EsflowError>;

/// Failure categories of a workflow run. Every kind is fatal to the run
/// that produced it; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    /// The host answered but the exchange broke down (redirects, body reads).
    Transport,
    Unacknowledged,
    WriteResult,
    MalformedResponse,
    PartialBulk,
    Service,
    Assertion,
    Configuration,
}

impl From<reqwest::Error> for EsflowError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            EsflowError::Connection(e.to_string())
        } else if e.is_decode() {
            EsflowError::MalformedResponse(e.to_string())
        } else if e.is_builder() {
            EsflowError::Config(e.to_string())
        } else {
            EsflowError::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for EsflowError {
    fn from(e: serde_json::Error) -> Self {
        EsflowError::Json(e.to_string())
    }
}

impl EsflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EsflowError::Connection(_) => ErrorKind::Connectivity,
            EsflowError::Http(_) => ErrorKind::Transport,
            EsflowError::Api { .. } => ErrorKind::Service,
            EsflowError::Unacknowledged { .. } => ErrorKind::Unacknowledged,
            EsflowError::UnexpectedWriteResult { .. } => ErrorKind::WriteResult,
            EsflowError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            EsflowError::Json(_) => ErrorKind::MalformedResponse,
            EsflowError::BulkPartialFailure { .. } => ErrorKind::PartialBulk,
            EsflowError::Assertion(_) => ErrorKind::Assertion,
            EsflowError::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Status code reported by the service, when the failure came from one.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            EsflowError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn assertion(msg: impl Into<String>) -> Self {
        EsflowError::Assertion(msg.into())
    }
}
