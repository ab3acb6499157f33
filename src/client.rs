//! High-level client tying the engine together.

use std::time::Duration;

use log::info;

use crate::cache::ResponseCache;
use crate::error_handling::FetchError;
use crate::redirect;
use crate::render::render;
use crate::search;
use crate::transport::{TcpTransport, Transport};
use crate::url::normalize;

/// HTTP client with a read-through response cache.
///
/// One `Client` value serves one process invocation; the cache it carries
/// never outlives it. Requests are issued strictly one at a time.
pub struct Client<T: Transport = TcpTransport> {
    transport: T,
    cache: ResponseCache,
}

impl Client<TcpTransport> {
    /// Client over the default TCP/TLS transport.
    pub fn new() -> Self {
        Client::with_transport(TcpTransport::default())
    }

    /// Client with a custom read deadline on the default transport.
    pub fn with_read_timeout(read_timeout: Duration) -> Self {
        Client::with_transport(TcpTransport::new(read_timeout))
    }
}

impl Default for Client<TcpTransport> {
    fn default() -> Self {
        Client::new()
    }
}

impl<T: Transport> Client<T> {
    /// Client over any transport implementation.
    pub fn with_transport(transport: T) -> Self {
        Client {
            transport,
            cache: ResponseCache::new(),
        }
    }

    /// Fetches a URL and returns its rendered text.
    ///
    /// The cache is consulted first; on a miss the full redirect chain runs
    /// and the rendered result is stored under the canonical URL before
    /// returning.
    ///
    /// # Errors
    ///
    /// Propagates any failure from normalization, transport, or response
    /// parsing.
    pub async fn fetch(&mut self, raw_url: &str) -> Result<String, FetchError> {
        let start = normalize(raw_url)?;
        let key = start.canonical();

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.to_string());
        }

        let (final_url, response) = redirect::resolve(&self.transport, start).await?;
        info!("Fetched {final_url} (status {})", response.status);

        let rendered = render(&response);
        self.cache.put(key, rendered.clone());
        Ok(rendered)
    }

    /// Resolves a free-text query against the search endpoint.
    ///
    /// # Errors
    ///
    /// Returns `SearchUnavailable` or `MalformedResponse` per the search
    /// resolver's contract.
    pub async fn search(&self, query: &str) -> Result<String, FetchError> {
        search::search(&self.transport, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedTransport;

    fn html_response(body: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn test_second_fetch_of_same_url_is_served_from_cache() {
        let transport = ScriptedTransport::new(vec![html_response("<p>cached page</p>")]);
        let mut client = Client::with_transport(transport);

        let first = client.fetch("http://example.com/").await.unwrap();
        let second = client.fetch("http://example.com/").await.unwrap();

        assert_eq!(first, "cached page");
        assert_eq!(first, second);
        assert_eq!(client.transport.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_equivalent_spellings_share_a_cache_entry() {
        let transport = ScriptedTransport::new(vec![html_response("<p>one</p>")]);
        let mut client = Client::with_transport(transport);

        client.fetch("http://example.com/").await.unwrap();
        let second = client.fetch("example.com").await.unwrap();

        assert_eq!(second, "one");
        assert_eq!(client.transport.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_distinct_urls_fetch_separately() {
        let transport = ScriptedTransport::new(vec![
            html_response("<p>a</p>"),
            html_response("<p>b</p>"),
        ]);
        let mut client = Client::with_transport(transport);

        assert_eq!(client.fetch("http://example.com/a").await.unwrap(), "a");
        assert_eq!(client.fetch("http://example.com/b").await.unwrap(), "b");
        assert_eq!(client.transport.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url_before_any_round_trip() {
        let transport = ScriptedTransport::new(vec![]);
        let mut client = Client::with_transport(transport);

        let result = client.fetch("").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
        assert_eq!(client.transport.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_redirected_fetch_caches_under_the_requested_url() {
        let transport = ScriptedTransport::new(vec![
            b"HTTP/1.1 301 Moved Permanently\r\nLocation: /moved\r\n\r\n".to_vec(),
            html_response("<p>destination</p>"),
        ]);
        let mut client = Client::with_transport(transport);

        let first = client.fetch("http://example.com/old").await.unwrap();
        let second = client.fetch("http://example.com/old").await.unwrap();

        assert_eq!(first, "destination");
        assert_eq!(second, "destination");
        assert_eq!(client.transport.calls.get(), 2);
    }
}
