//! Error types for the site runtime.
//!
//! Every failure here is absorbed locally by the caller (logged, then replaced
//! by fallback markup or skipped); nothing is surfaced to the reader.

use thiserror::Error;
use uro_events::MessageError;

/// Primary error type for site operations.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Fragment request completed with a non-success HTTP status.
    #[error("fetch of '{path}' returned HTTP {status}")]
    FetchStatus {
        /// Requested path.
        path: String,
        /// Response status code.
        status: u16,
    },
    /// Fragment request failed before a response arrived.
    #[error("fetch of '{path}' failed: {message}")]
    Network {
        /// Requested path.
        path: String,
        /// Transport failure description.
        message: String,
    },
    /// A DOM element the operation targets is not on the page.
    #[error("element #{id} not found")]
    MissingElement {
        /// Element identifier that was looked up.
        id: String,
    },
    /// Local storage rejected a write (quota, private mode).
    #[error("storage write to '{key}' failed: {message}")]
    Storage {
        /// Storage key being written.
        key: String,
        /// Browser-provided failure description.
        message: String,
    },
    /// The in-page event could not be dispatched.
    #[error("dispatch of '{event}' failed: {message}")]
    Dispatch {
        /// Event name.
        event: String,
        /// Browser-provided failure description.
        message: String,
    },
    /// Configuration overrides were unreadable or invalid.
    #[error("invalid site configuration field '{field}': {reason}")]
    InvalidConfig {
        /// Field that failed validation.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
    /// Message codec failure.
    #[error(transparent)]
    Message(#[from] MessageError),
}

/// Result alias for site operations.
pub type SiteResult<T> = Result<T, SiteError>;
