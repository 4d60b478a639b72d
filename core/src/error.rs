//! Error types for the Sendy client.
//!
//! # Design
//! Only failures that prevent a response body from being classified are
//! errors. Anything the service itself says (including its own error
//! strings) comes back as an `Outcome`, so a call that reached the service
//! always yields `Ok`.

/// Errors returned by `Sendy` operations and `Transport` implementations.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The request never produced a response: connection refused, DNS
    /// failure, timeout, too many redirects, malformed URL.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status. The body is kept for
    /// debugging but is not classified.
    #[error("unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Problems building a `Config`.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("unknown transport mode '{0}', expected 'direct' or 'curl'")]
    InvalidTransportMode(String),

    #[error("unknown response format '{0}', expected 'plain' or 'html'")]
    InvalidResponseFormat(String),
}
