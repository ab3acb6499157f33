//! webfetch library: minimal HTTP client engine
//!
//! Performs GET requests directly over raw sockets (TLS included), follows
//! redirects, renders response bodies for terminal display, and resolves
//! search queries through the DuckDuckGo Instant Answer API. Rendered
//! responses are cached per normalized URL for the lifetime of the process.
//!
//! # Example
//!
//! ```no_run
//! use webfetch::Client;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::new();
//! let text = client.fetch("example.com").await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod cache;
mod client;
pub mod config;
mod error_handling;
pub mod initialization;
mod redirect;
mod render;
mod request;
mod response;
mod search;
mod transport;
mod url;

// Re-export public API
pub use client::Client;
pub use config::{LogFormat, LogLevel, Opt};
pub use error_handling::{FetchError, InitializationError};
pub use response::HttpResponse;
pub use search::SearchResult;
pub use transport::{TcpTransport, Transport};
pub use url::{normalize, NormalizedUrl, Scheme};
