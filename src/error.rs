//! Error types for ticketsafi-client.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the client.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem error (config load/save).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        /// Response status code.
        status: u16,
        /// Request URL.
        url: String,
    },

    /// An identifier cannot be used as a URL path segment.
    #[error("invalid {kind} {value:?}")]
    InvalidIdentifier {
        /// What the identifier names, e.g. "payment reference".
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The API body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Ticket scanner failure.
    #[error("scanner error: {0}")]
    Scanner(String),

    /// The caller's role may not perform the operation.
    #[error("access denied for role {0}")]
    Unauthorized(String),

    /// A poll task terminated abnormally.
    #[error("poll task failed: {0}")]
    Task(String),
}
