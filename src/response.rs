//! HTTP response parsing.
//!
//! Splits a raw response byte buffer into status line, header mapping, and
//! body. The transport hands over the complete buffer once the peer closes
//! the connection, so parsing never touches the network.

use std::borrow::Cow;

use crate::error_handling::FetchError;

/// Status codes the redirect resolver follows.
const REDIRECT_STATUSES: [u16; 4] = [301, 302, 303, 307];

/// A parsed HTTP response.
///
/// Constructed once per transport round trip and immutable thereafter.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Decoded status code from the status line.
    pub status: u16,
    headers: Vec<(String, String)>,
    /// Body bytes, untouched.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Parses raw response bytes into status, headers, and body.
    ///
    /// The first blank-line sequence (`\r\n\r\n` or `\n\n`) separates the
    /// header block from the body. Header lines split on the first colon and
    /// are trimmed; lookups are case-insensitive with the last occurrence
    /// winning on duplicates.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MalformedResponse` when the status line does not
    /// yield an integer status code.
    pub fn parse(raw: &[u8]) -> Result<Self, FetchError> {
        let (head, body) = split_head_body(raw);
        let head_text = String::from_utf8_lossy(head);

        let mut lines = head_text.lines();
        let status = parse_status_line(lines.next().unwrap_or(""))?;

        let mut headers = Vec::new();
        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }
        }

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    /// Case-insensitive header lookup. When a header occurs more than once
    /// the last occurrence wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Content-Type header value; empty when absent, which downstream
    /// rendering treats as plain text.
    pub fn content_type(&self) -> &str {
        self.header("Content-Type").unwrap_or("")
    }

    /// Location header value, when present.
    pub fn location(&self) -> Option<&str> {
        self.header("Location")
    }

    /// Whether the status instructs the client to fetch a different location.
    pub fn is_redirect(&self) -> bool {
        REDIRECT_STATUSES.contains(&self.status)
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Lossy UTF-8 view of the body for rendering.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Splits the buffer at the first blank line. When no blank line exists the
/// whole buffer is treated as the header block.
fn split_head_body(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
        return (&raw[..pos], &raw[pos + 4..]);
    }
    if let Some(pos) = raw.windows(2).position(|w| w == b"\n\n") {
        return (&raw[..pos], &raw[pos + 2..]);
    }
    (raw, &[])
}

fn parse_status_line(line: &str) -> Result<u16, FetchError> {
    let mut parts = line.split_whitespace();
    let version = parts.next().unwrap_or("");
    let code = parts.next().unwrap_or("");

    if !version.starts_with("HTTP/") {
        return Err(FetchError::MalformedResponse(format!(
            "unrecognized status line '{line}'"
        )));
    }

    code.parse::<u16>().map_err(|_| {
        FetchError::MalformedResponse(format!("status code '{code}' is not an integer"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_synthetic_response() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nX-Custom: abc\r\n\r\n<p>hi</p>";
        let response = HttpResponse::parse(raw).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.header("X-CUSTOM"), Some("abc"));
        assert_eq!(response.body, b"<p>hi</p>");
    }

    #[test]
    fn test_parse_accepts_bare_newline_separator() {
        let raw = b"HTTP/1.0 404 Not Found\nContent-Type: text/plain\n\nmissing";
        let response = HttpResponse::parse(raw).unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.body, b"missing");
    }

    #[test]
    fn test_duplicate_header_last_occurrence_wins() {
        let raw = b"HTTP/1.1 200 OK\r\nX-Thing: first\r\nX-Thing: second\r\n\r\n";
        let response = HttpResponse::parse(raw).unwrap();
        assert_eq!(response.header("x-thing"), Some("second"));
    }

    #[test]
    fn test_parse_preserves_binary_body() {
        let mut raw = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0x00, 0xff, 0x7f, 0x80]);
        let response = HttpResponse::parse(&raw).unwrap();
        assert_eq!(response.body, vec![0x00, 0xff, 0x7f, 0x80]);
    }

    #[test]
    fn test_parse_without_blank_line_yields_empty_body() {
        let raw = b"HTTP/1.1 204 No Content\r\nServer: x\r\n";
        let response = HttpResponse::parse(raw).unwrap();
        assert_eq!(response.status, 204);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_integer_status() {
        let raw = b"HTTP/1.1 abc OK\r\n\r\n";
        assert!(matches!(
            HttpResponse::parse(raw),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_http_preamble() {
        let raw = b"SSH-2.0-OpenSSH_9.0\r\n\r\n";
        assert!(matches!(
            HttpResponse::parse(raw),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_content_type_defaults_to_empty() {
        let raw = b"HTTP/1.1 200 OK\r\n\r\nbody";
        let response = HttpResponse::parse(raw).unwrap();
        assert_eq!(response.content_type(), "");
    }

    #[test]
    fn test_redirect_statuses() {
        for status in [301u16, 302, 303, 307] {
            let raw = format!("HTTP/1.1 {status} Moved\r\nLocation: /next\r\n\r\n");
            let response = HttpResponse::parse(raw.as_bytes()).unwrap();
            assert!(response.is_redirect(), "{status} should redirect");
            assert_eq!(response.location(), Some("/next"));
        }
        let raw = b"HTTP/1.1 308 Permanent Redirect\r\nLocation: /next\r\n\r\n";
        let response = HttpResponse::parse(raw).unwrap();
        assert!(!response.is_redirect());
    }
}
