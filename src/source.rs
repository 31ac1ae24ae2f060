//! Turning a URL into text
//!
//! The engine never parses HTML. [`HttpFetcher`] accepts plain-text (and
//! markdown) responses only; anything richer needs an extraction service
//! plugged in through [`SourceFetcher`].

use std::time::Duration;
use tracing::debug;
use ureq::http::Uri;

use crate::error::{EngineError, EngineResult};

/// Default request timeout
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const TEXT_CONTENT_TYPES: &[&str] = &["text/plain", "text/markdown", "text/x-markdown"];

/// Resolves a URL to article text
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> EngineResult<String>;
}

impl<F> SourceFetcher for F
where
    F: Fn(&str) -> EngineResult<String> + Send + Sync,
{
    fn fetch(&self, url: &str) -> EngineResult<String> {
        self(url)
    }
}

/// Sync HTTP fetcher for plain-text sources
pub struct HttpFetcher {
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: make_agent(timeout),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> EngineResult<String> {
        let unreachable = |reason: String| EngineError::UnreachableSource {
            url: url.to_string(),
            reason,
        };

        host_of(url).ok_or_else(|| unreachable("not an http(s) URL".to_string()))?;

        debug!("Fetching {}", url);
        let response = self
            .agent
            .get(url)
            .header("Accept", "text/plain, text/markdown;q=0.9")
            .call()
            .map_err(|e| unreachable(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(unreachable(format!("HTTP status {}", status)));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or_default().trim().to_lowercase());

        if let Some(ct) = content_type.as_deref() {
            if !TEXT_CONTENT_TYPES.contains(&ct) {
                return Err(EngineError::MalformedResponse(format!(
                    "unsupported content type '{}' from {} (plain text required)",
                    ct, url
                )));
            }
        }

        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| EngineError::MalformedResponse(format!("unreadable body: {}", e)))?;

        if body.trim().is_empty() {
            return Err(EngineError::MalformedResponse(format!("empty body from {}", url)));
        }
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Host part of an http(s) URL, lowercase and without port or credentials.
/// `None` unless the URL parses as an absolute http(s) URI with a valid port.
pub fn host_of(url: &str) -> Option<String> {
    let uri: Uri = url.trim().parse().ok()?;
    let scheme = uri.scheme_str()?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }
    let authority = uri.authority()?;
    let host = authority.host();

    // `port()` hides an unparsable port; anything after the host must be one
    let host_port = authority.as_str().rsplit('@').next().unwrap_or_default();
    if host_port.len() > host.len() && authority.port_u16().is_none() {
        return None;
    }

    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return None;
    }
    Some(host.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://News.Example.com/a/b?c=1").as_deref(), Some("news.example.com"));
        assert_eq!(host_of("http://user:pw@example.org:8080").as_deref(), Some("example.org"));
        assert_eq!(host_of("http://[::1]:3000/x").as_deref(), Some("::1"));
        assert!(host_of("ftp://example.org/file").is_none());
        assert!(host_of("example.org").is_none());
        assert!(host_of("https:///path").is_none());
    }

    #[test]
    fn test_host_of_rejects_malformed_authority() {
        assert!(host_of("http://a.com:notaport/x").is_none());
        assert!(host_of("https://exa mple.com").is_none());
        assert!(host_of("http://a.com:99999/").is_none());
        assert_eq!(host_of("  https://a.com:443/x  ").as_deref(), Some("a.com"));
    }

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |url: &str| -> EngineResult<String> { Ok(format!("text from {}", url)) };
        assert_eq!(fetcher.fetch("https://a.b").unwrap(), "text from https://a.b");
    }

    #[test]
    fn test_invalid_url_is_unreachable() {
        let err = HttpFetcher::new().fetch("not a url").unwrap_err();
        assert_eq!(err.kind(), "UnreachableSourceError");
    }
}
