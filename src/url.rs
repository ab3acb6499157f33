//! URL validation and normalization.
//!
//! Turns user-supplied strings like `example.com/path` into a fully
//! qualified scheme/host/port/path/query form, the canonical unit of work
//! for the rest of the engine.

use std::fmt;

use crate::error_handling::FetchError;

/// URL scheme supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain TCP.
    Http,
    /// TLS over TCP.
    Https,
}

impl Scheme {
    /// Default port for the scheme.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    /// Scheme name as it appears in a URL.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// A URL decomposed into the pieces the transport needs, with defaults
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// http or https.
    pub scheme: Scheme,
    /// Lowercase, non-empty host.
    pub host: String,
    /// Explicit port, or the scheme default.
    pub port: u16,
    /// Absolute path, `/` when the input had none.
    pub path: String,
    /// Query string as given, without the leading `?`.
    pub query: Option<String>,
}

/// Parses and repairs a user-supplied URL string.
///
/// Prepends `http://` when no scheme separator is present, applies the
/// default port and path, and lowercases the host. The query string is
/// preserved as given.
///
/// # Errors
///
/// Returns `FetchError::InvalidUrl` when no host can be determined or the
/// scheme is not http/https.
pub fn normalize(raw: &str) -> Result<NormalizedUrl, FetchError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    let parsed =
        url::Url::parse(&candidate).map_err(|_| FetchError::InvalidUrl(raw.to_string()))?;

    let scheme = match parsed.scheme() {
        "http" => Scheme::Http,
        "https" => Scheme::Https,
        _ => return Err(FetchError::InvalidUrl(raw.to_string())),
    };

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.to_ascii_lowercase(),
        _ => return Err(FetchError::InvalidUrl(raw.to_string())),
    };

    let port = parsed.port().unwrap_or_else(|| scheme.default_port());

    let path = if parsed.path().is_empty() {
        "/".to_string()
    } else {
        parsed.path().to_string()
    };

    let query = parsed.query().map(str::to_string);

    Ok(NormalizedUrl {
        scheme,
        host,
        port,
        path,
        query,
    })
}

impl NormalizedUrl {
    /// Canonical string form, used as the cache key.
    ///
    /// The port is always explicit so `http://example.com/` and
    /// `http://example.com:80/` map to the same entry.
    pub fn canonical(&self) -> String {
        let mut out = format!(
            "{}://{}:{}{}",
            self.scheme.as_str(),
            self.host,
            self.port,
            self.path
        );
        if let Some(query) = &self.query {
            out.push('?');
            out.push_str(query);
        }
        out
    }

    /// Value for the Host header: the port appears only when it differs from
    /// the scheme default.
    pub fn host_header(&self) -> String {
        if self.port == self.scheme.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Request target: path plus query string when present.
    pub fn request_target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    /// Resolves a redirect Location against this URL.
    ///
    /// Absolute locations are used as-is; relative ones are joined against
    /// the current scheme/host/port.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` when the location resolves to
    /// something that is not a usable http(s) URL.
    pub fn join(&self, location: &str) -> Result<NormalizedUrl, FetchError> {
        let resolved = url::Url::parse(location)
            .or_else(|_| url::Url::parse(&self.to_string()).and_then(|base| base.join(location)));

        match resolved {
            Ok(url) => normalize(url.as_str()),
            Err(_) => Err(FetchError::InvalidUrl(location.to_string())),
        }
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}{}",
            self.scheme.as_str(),
            self.host_header(),
            self.path
        )?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}
