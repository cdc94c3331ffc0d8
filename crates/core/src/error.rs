//! Unified error types for vinlookup.

use std::fmt;

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Why a resolution ended without a record.
///
/// Callers see every cause as the same `NotFound` outcome; the cause is kept
/// for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissCause {
    /// Network failure, timeout, or a non-200 response from the decoder page.
    Transport,
    /// The page was fetched but held no usable label/value table.
    ExtractionMiss,
}

impl fmt::Display for MissCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissCause::Transport => "transport failure",
            MissCause::ExtractionMiss => "no usable data table",
        };
        f.write_str(label)
    }
}

/// Unified error types for vinlookup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty VIN).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The VIN could not be resolved, locally or remotely.
    #[error("NOT_FOUND: {vin} ({cause})")]
    NotFound { vin: String, cause: MissCause },

    /// HTTP error response or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Field extraction could not run (e.g., an invalid structural marker).
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    pub fn not_found(vin: impl Into<String>, cause: MissCause) -> Self {
        Error::NotFound { vin: vin.into(), cause }
    }

    /// True for the single public "no record" outcome, whatever its cause.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// The cause behind a `NotFound`, if this is one.
    pub fn miss_cause(&self) -> Option<MissCause> {
        match self {
            Error::NotFound { cause, .. } => Some(*cause),
            _ => None,
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::ExtractFailed(_) => -32000,
            Error::NotFound { .. } => -32001,
            Error::Database(_) | Error::MigrationFailed(_) => -32002,
            Error::InvalidUrl(_) => -32003,
            Error::FetchTimeout(_) => -32006,
            Error::HttpError(_) => -32008,
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
