//! Redirect chain resolution.
//!
//! Follows a bounded chain of redirect responses to a terminal response,
//! issuing exactly one transport round trip per hop. The chain is strictly
//! sequential.

use log::{debug, warn};

use crate::config::MAX_REDIRECT_HOPS;
use crate::error_handling::FetchError;
use crate::request::build_request;
use crate::response::HttpResponse;
use crate::transport::Transport;
use crate::url::NormalizedUrl;

/// Follows redirects from `start` until a terminal response is reached,
/// returning the final URL alongside the response.
///
/// A response is terminal when its status is not a redirect, when a
/// redirect status arrives without a Location header, or when the hop
/// budget is spent. In the latter two cases the redirect response itself is
/// returned rather than an error.
///
/// # Errors
///
/// Returns an error when a transport round trip fails, a response cannot be
/// parsed, or a Location header cannot be resolved against the current URL.
pub async fn resolve<T: Transport>(
    transport: &T,
    start: NormalizedUrl,
) -> Result<(NormalizedUrl, HttpResponse), FetchError> {
    let mut current = start;
    let mut hops_left = MAX_REDIRECT_HOPS;

    loop {
        let request = build_request(&current);
        let raw = transport.round_trip(&current, request.as_bytes()).await?;
        let response = HttpResponse::parse(&raw)?;

        if !response.is_redirect() {
            return Ok((current, response));
        }
        if hops_left == 0 {
            warn!("Redirect limit reached at {current}, returning redirect response as final");
            return Ok((current, response));
        }
        let next = match response.location() {
            Some(location) => current.join(location)?,
            None => {
                warn!(
                    "Redirect status {} from {current} without a Location header",
                    response.status
                );
                return Ok((current, response));
            }
        };

        debug!("Redirect {current} -> {next} ({hops_left} hops left)");
        hops_left -= 1;
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedTransport;
    use crate::url::normalize;

    fn redirect_to(location: &str) -> Vec<u8> {
        format!("HTTP/1.1 302 Found\r\nLocation: {location}\r\n\r\n").into_bytes()
    }

    fn ok_with_body(body: &str) -> Vec<u8> {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn test_redirect_chain_stops_at_hop_budget() {
        let responses = (1..=6)
            .map(|i| redirect_to(&format!("http://example.com/hop{i}")))
            .collect();
        let transport = ScriptedTransport::new(responses);

        let start = normalize("http://example.com/").unwrap();
        let (final_url, response) = resolve(&transport, start).await.unwrap();

        assert_eq!(transport.calls.get(), 6);
        assert_eq!(response.status, 302);
        assert_eq!(final_url.path, "/hop5");
    }

    #[tokio::test]
    async fn test_single_redirect_then_success() {
        let transport = ScriptedTransport::new(vec![
            redirect_to("http://example.com/moved"),
            ok_with_body("landed"),
        ]);

        let start = normalize("http://example.com/").unwrap();
        let (final_url, response) = resolve(&transport, start).await.unwrap();

        assert_eq!(transport.calls.get(), 2);
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"landed");
        assert_eq!(final_url.path, "/moved");
    }

    #[tokio::test]
    async fn test_non_redirect_is_terminal_immediately() {
        let transport = ScriptedTransport::new(vec![ok_with_body("direct")]);

        let start = normalize("http://example.com/").unwrap();
        let (_, response) = resolve(&transport, start).await.unwrap();

        assert_eq!(transport.calls.get(), 1);
        assert_eq!(response.body, b"direct");
    }

    #[tokio::test]
    async fn test_redirect_without_location_is_terminal() {
        let transport =
            ScriptedTransport::new(vec![b"HTTP/1.1 301 Moved Permanently\r\n\r\n".to_vec()]);

        let start = normalize("http://example.com/").unwrap();
        let (final_url, response) = resolve(&transport, start).await.unwrap();

        assert_eq!(transport.calls.get(), 1);
        assert_eq!(response.status, 301);
        assert_eq!(final_url.path, "/");
    }

    #[tokio::test]
    async fn test_relative_location_reuses_scheme_host_port() {
        let transport = ScriptedTransport::new(vec![
            redirect_to("/next?x=1"),
            ok_with_body("relative"),
        ]);

        let start = normalize("http://example.com:8080/start").unwrap();
        let (final_url, _) = resolve(&transport, start).await.unwrap();

        assert_eq!(
            transport.requested.borrow().as_slice(),
            [
                "http://example.com:8080/start".to_string(),
                "http://example.com:8080/next?x=1".to_string(),
            ]
        );
        assert_eq!(final_url.port, 8080);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = ScriptedTransport::new(vec![redirect_to("http://example.com/next")]);

        let start = normalize("http://example.com/").unwrap();
        let result = resolve(&transport, start).await;

        assert!(matches!(result, Err(FetchError::ConnectionError { .. })));
    }
}
