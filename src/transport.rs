//! Socket and TLS transport.
//!
//! Opens one connection per request, writes the serialized request, and
//! reads the full response into memory. Every request carries
//! `Connection: close`, so end-of-stream terminates the read; when the
//! server provides a Content-Length the read stops as soon as that many
//! body bytes have arrived.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{
    MAX_RESPONSE_BODY_SIZE, READ_TIMEOUT_SECS, TCP_CONNECT_TIMEOUT_SECS,
    TLS_HANDSHAKE_TIMEOUT_SECS,
};
use crate::error_handling::FetchError;
use crate::url::{NormalizedUrl, Scheme};

/// One HTTP round trip: connect, write the request, read the raw response.
///
/// The seam exists so the redirect resolver and the search path can be
/// driven by scripted responses in tests.
#[allow(async_fn_in_trait)] // callers stay within this crate's single-threaded model
pub trait Transport {
    /// Performs one request/response exchange against `url`.
    async fn round_trip(&self, url: &NormalizedUrl, request: &[u8])
        -> Result<Vec<u8>, FetchError>;
}

/// Production transport: TCP with a TLS layer for https targets.
///
/// The socket (and TLS session) acquired for a round trip is owned by the
/// call and dropped on every exit path. No retries; the first failure
/// propagates.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    connect_timeout: Duration,
    handshake_timeout: Duration,
    read_timeout: Duration,
}

impl Default for TcpTransport {
    fn default() -> Self {
        TcpTransport {
            connect_timeout: Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            handshake_timeout: Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

impl TcpTransport {
    /// Transport with a custom read deadline.
    pub fn new(read_timeout: Duration) -> Self {
        TcpTransport {
            read_timeout,
            ..TcpTransport::default()
        }
    }

    async fn exchange<S>(
        &self,
        mut stream: S,
        url: &NormalizedUrl,
        request: &[u8],
    ) -> Result<Vec<u8>, FetchError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        stream
            .write_all(request)
            .await
            .map_err(|e| FetchError::ConnectionError {
                host: url.host.clone(),
                port: url.port,
                source: e,
            })?;

        match tokio::time::timeout(self.read_timeout, read_response(&mut stream)).await {
            Ok(read) => read.map_err(|e| FetchError::ConnectionError {
                host: url.host.clone(),
                port: url.port,
                source: e,
            }),
            Err(_) => Err(FetchError::Timeout {
                operation: "read",
                seconds: self.read_timeout.as_secs(),
            }),
        }
    }
}

impl Transport for TcpTransport {
    async fn round_trip(
        &self,
        url: &NormalizedUrl,
        request: &[u8],
    ) -> Result<Vec<u8>, FetchError> {
        debug!("Connecting to {}:{}", url.host, url.port);

        let sock = match tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((url.host.as_str(), url.port)),
        )
        .await
        {
            Ok(Ok(sock)) => sock,
            Ok(Err(e)) => {
                return Err(FetchError::ConnectionError {
                    host: url.host.clone(),
                    port: url.port,
                    source: e,
                })
            }
            Err(_) => {
                return Err(FetchError::Timeout {
                    operation: "connect",
                    seconds: self.connect_timeout.as_secs(),
                })
            }
        };

        match url.scheme {
            Scheme::Http => self.exchange(sock, url, request).await,
            Scheme::Https => {
                let connector = TlsConnector::from(Arc::new(tls_client_config()));
                let server_name = ServerName::try_from(url.host.clone())
                    .map_err(|_| FetchError::InvalidUrl(url.host.clone()))?;

                let tls_stream = match tokio::time::timeout(
                    self.handshake_timeout,
                    connector.connect(server_name, sock),
                )
                .await
                {
                    Ok(Ok(stream)) => stream,
                    Ok(Err(e)) => {
                        return Err(FetchError::TlsError {
                            host: url.host.clone(),
                            source: e,
                        })
                    }
                    Err(_) => {
                        return Err(FetchError::Timeout {
                            operation: "TLS handshake",
                            seconds: self.handshake_timeout.as_secs(),
                        })
                    }
                };

                self.exchange(tls_stream, url, request).await
            }
        }
    }
}

fn tls_client_config() -> ClientConfig {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

/// Reads a full HTTP response from `stream`.
///
/// Reads until the peer closes the connection. Once the header block has
/// arrived, a Content-Length header bounds the remaining body read so
/// servers that keep the socket open after the body do not stall the
/// client. Reads are capped at `MAX_RESPONSE_BODY_SIZE`.
pub(crate) async fn read_response<S>(stream: &mut S) -> std::io::Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut response = Vec::with_capacity(8 * 1024);
    let mut chunk = [0u8; 4096];
    let mut expected_total: Option<usize> = None;

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        response.extend_from_slice(&chunk[..n]);

        if expected_total.is_none() {
            if let Some(body_start) = find_header_end(&response) {
                expected_total =
                    content_length(&response[..body_start]).map(|len| body_start + len);
            }
        }

        if let Some(total) = expected_total {
            if response.len() >= total {
                response.truncate(total);
                break;
            }
        }

        if response.len() >= MAX_RESPONSE_BODY_SIZE {
            warn!("Response exceeded {MAX_RESPONSE_BODY_SIZE} bytes, truncating read");
            break;
        }
    }

    Ok(response)
}

/// Index of the first body byte, once the blank-line separator has arrived.
fn find_header_end(buf: &[u8]) -> Option<usize> {
    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
        return Some(pos + 4);
    }
    buf.windows(2).position(|w| w == b"\n\n").map(|pos| pos + 2)
}

/// Content-Length value from a header block, when present and numeric.
fn content_length(head: &[u8]) -> Option<usize> {
    let head = String::from_utf8_lossy(head);
    for line in head.lines().skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                return value.trim().parse().ok();
            }
        }
    }
    None
}
