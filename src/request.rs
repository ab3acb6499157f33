//! HTTP request serialization.

use crate::config::USER_AGENT;
use crate::url::NormalizedUrl;

/// Builds the complete HTTP/1.1 GET request message for a URL.
///
/// The message always asks the server to close the connection so that
/// end-of-stream marks the end of the response body.
pub fn build_request(url: &NormalizedUrl) -> String {
    format!(
        "GET {target} HTTP/1.1\r\nHost: {host}\r\nUser-Agent: {agent}\r\nAccept: */*\r\nConnection: close\r\n\r\n",
        target = url.request_target(),
        host = url.host_header(),
        agent = USER_AGENT,
    )
}
