//! Error types for the fetch engine.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Failure modes of the HTTP transaction engine.
///
/// Component-level failures propagate unchanged up to the invocation
/// boundary; there is no local recovery or retry anywhere in the chain.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The input could not be turned into a usable http(s) URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// DNS resolution, TCP connect, or socket I/O failed.
    #[error("connection to {host}:{port} failed")]
    ConnectionError {
        /// Host the connection was directed at.
        host: String,
        /// Port the connection was directed at.
        port: u16,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// TLS handshake or certificate validation failed.
    #[error("TLS session with {host} could not be established")]
    TlsError {
        /// Host named during the handshake.
        host: String,
        /// Underlying handshake error.
        #[source]
        source: std::io::Error,
    },

    /// The response status line, or a JSON body that was required, could not
    /// be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The search endpoint was unreachable or answered with a non-2xx status.
    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    /// A network operation exceeded its deadline.
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        /// Which operation hit the deadline.
        operation: &'static str,
        /// The deadline that was exceeded.
        seconds: u64,
    },
}
