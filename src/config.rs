//! Constants and command-line configuration.

use clap::{Parser, ValueEnum};

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// Full-response read timeout in seconds
pub const READ_TIMEOUT_SECS: u64 = 10;

/// User-Agent header value identifying this tool.
pub const USER_AGENT: &str = concat!("webfetch/", env!("CARGO_PKG_VERSION"));

// Response framing
/// Maximum response size in bytes (2MB)
/// Reads past this point are truncated so a single response cannot exhaust memory
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

// Redirect handling
/// Maximum number of redirect hops to follow
/// A chain still redirecting after this many hops is returned as-is
pub const MAX_REDIRECT_HOPS: usize = 5;

/// Host of the DuckDuckGo Instant Answer API, the fixed search endpoint.
pub const SEARCH_ENDPOINT_HOST: &str = "api.duckduckgo.com";

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace). Used with the `--log-level` CLI option.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages and above
    Info,
    /// Debug messages and above
    Debug,
    /// Everything
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored
    Plain,
    /// One JSON object per line
    Json,
}

/// Command-line options.
///
/// This struct is automatically generated by `clap` from the field attributes.
/// The two modes are mutually exclusive: either a URL to fetch or a search
/// term to resolve.
///
/// # Examples
///
/// ```bash
/// # Fetch a page
/// webfetch example.com/some/path
///
/// # Search instead
/// webfetch --search "rust programming language"
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "webfetch",
    about = "Fetches a URL or resolves a search term, printing the result as terminal text."
)]
pub struct Opt {
    /// URL to fetch (scheme optional, http assumed)
    #[arg(value_parser, required_unless_present = "search", conflicts_with = "search")]
    pub url: Option<String>,

    /// Search term to resolve instead of fetching a URL
    #[arg(long)]
    pub search: Option<String>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-request read timeout in seconds
    #[arg(long, default_value_t = READ_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}
