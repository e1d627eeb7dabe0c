//! Per-destination envelope delivery over HTTP.
//!
//! A [`Dsn`] parses the `scheme://authKey@host/projectPath` credential
//! string into the ingest endpoint and auth key once, at construction —
//! malformed credentials fail fast instead of at send time. A
//! [`DestinationSender`] owns the parsed pair plus a clone of the shared
//! HTTP client and performs the actual POST. There is no internal queue:
//! `flush` and `close` are bookkeeping no-ops.

use std::time::Duration;

use http_body_util::BodyExt;
use url::Url;

use crate::envelope::Envelope;
use crate::error::PatchbayError;
use crate::server::HttpClient;

const USER_AGENT: &str = concat!("patchbay/", env!("CARGO_PKG_VERSION"));
const CONTENT_TYPE: &str = "application/x-sentry-envelope";

/// Replace the auth key portion of a DSN with `***` for log lines.
#[must_use]
pub fn mask_dsn(dsn: &str) -> String {
    match (dsn.find("://"), dsn.find('@')) {
        (Some(scheme_end), Some(at)) if scheme_end + 3 < at => {
            format!("{}://***{}", &dsn[..scheme_end], &dsn[at..])
        }
        _ => dsn.to_string(),
    }
}

/// Parsed DSN: ingest URL plus auth key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    api_url: String,
    auth_key: String,
}

impl Dsn {
    /// Parse `scheme://authKey@host/projectPath` into
    /// `scheme://host/api/projectPath/envelope/` and the key. Any deviation
    /// (missing `://`, missing key, missing project path) is a
    /// configuration error.
    pub fn parse(dsn: &str) -> Result<Self, PatchbayError> {
        let invalid = |reason: &str| PatchbayError::InvalidDsn {
            masked: mask_dsn(dsn),
            reason: reason.to_string(),
        };

        let url = Url::parse(dsn)
            .map_err(|e| invalid(&format!("not a valid URL ({e}), expected scheme://key@host/project")))?;

        let auth_key = url.username();
        if auth_key.is_empty() {
            return Err(invalid("missing auth key before '@'"));
        }

        let host = url.host_str().ok_or_else(|| invalid("missing host"))?;

        let project = url.path().trim_matches('/');
        if project.is_empty() {
            return Err(invalid("missing project path after host"));
        }

        let port = url
            .port()
            .map_or_else(String::new, |p| format!(":{p}"));

        Ok(Self {
            api_url: format!("{}://{host}{port}/api/{project}/envelope/", url.scheme()),
            auth_key: auth_key.to_string(),
        })
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }
}

/// One reusable sender per distinct destination, shared by every caller
/// targeting that project.
pub struct DestinationSender {
    masked_dsn: String,
    api_uri: hyper::Uri,
    auth_header: String,
    client: HttpClient,
}

impl DestinationSender {
    /// Parse the DSN and pre-build the ingest URI and auth header.
    pub fn new(dsn: &str, client: HttpClient) -> Result<Self, PatchbayError> {
        let parsed = Dsn::parse(dsn)?;

        let api_uri: hyper::Uri =
            parsed
                .api_url()
                .parse()
                .map_err(|e: http::uri::InvalidUri| PatchbayError::UriParse {
                    source: Box::new(e),
                })?;

        let auth_header = format!(
            "Sentry sentry_version=7, sentry_client={USER_AGENT}, sentry_key={}",
            parsed.auth_key()
        );

        Ok(Self {
            masked_dsn: mask_dsn(dsn),
            api_uri,
            auth_header,
            client,
        })
    }

    #[must_use]
    pub fn masked_dsn(&self) -> &str {
        &self.masked_dsn
    }

    /// Deliver one envelope. Non-2xx responses are logged with the response
    /// body and swallowed (fire-and-forget telemetry semantics); transport
    /// level failures surface as [`PatchbayError::Delivery`].
    pub async fn send(&self, envelope: &Envelope) -> Result<(), PatchbayError> {
        let body = envelope.to_wire();

        let request = hyper::Request::builder()
            .method(hyper::Method::POST)
            .uri(self.api_uri.clone())
            .header(hyper::header::CONTENT_TYPE, CONTENT_TYPE)
            .header(hyper::header::USER_AGENT, USER_AGENT)
            .header("X-Sentry-Auth", &self.auth_header)
            .body(http_body_util::Full::new(body))
            .map_err(|e| PatchbayError::Delivery {
                destination: self.masked_dsn.clone(),
                source: Box::new(e),
            })?;

        let response =
            self.client
                .request(request)
                .await
                .map_err(|e| PatchbayError::Delivery {
                    destination: self.masked_dsn.clone(),
                    source: Box::new(e),
                })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                destination = %self.masked_dsn,
                status = status.as_u16(),
                "envelope accepted"
            );
            return Ok(());
        }

        // Backend rejection is not retried and not surfaced to the caller
        let body = match response.into_body().collect().await {
            Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
            Err(e) => format!("<unreadable response body: {e}>"),
        };
        tracing::warn!(
            destination = %self.masked_dsn,
            status = status.as_u16(),
            response = %body,
            "ingest endpoint rejected envelope"
        );
        Ok(())
    }

    /// No internal queue to drain.
    pub fn flush(&self, _timeout: Duration) {}

    /// Connection pooling is owned by the shared client; nothing to tear down.
    pub fn close(&self) {
        tracing::debug!(destination = %self.masked_dsn, "sender closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsn_round_trip() {
        let dsn = Dsn::parse("https://KEY@host.example/42").unwrap();
        assert_eq!(dsn.api_url(), "https://host.example/api/42/envelope/");
        assert_eq!(dsn.auth_key(), "KEY");
    }

    #[test]
    fn dsn_preserves_port_and_nested_project_path() {
        let dsn = Dsn::parse("http://abc123@localhost:9000/sentry/7").unwrap();
        assert_eq!(dsn.api_url(), "http://localhost:9000/api/sentry/7/envelope/");
        assert_eq!(dsn.auth_key(), "abc123");
    }

    #[test]
    fn dsn_missing_scheme_fails() {
        assert!(matches!(
            Dsn::parse("KEY@host.example/42"),
            Err(PatchbayError::InvalidDsn { .. })
        ));
    }

    #[test]
    fn dsn_missing_key_fails() {
        assert!(matches!(
            Dsn::parse("https://host.example/42"),
            Err(PatchbayError::InvalidDsn { .. })
        ));
    }

    #[test]
    fn dsn_missing_project_path_fails() {
        assert!(matches!(
            Dsn::parse("https://KEY@host.example"),
            Err(PatchbayError::InvalidDsn { .. })
        ));
        assert!(matches!(
            Dsn::parse("https://KEY@host.example/"),
            Err(PatchbayError::InvalidDsn { .. })
        ));
    }

    #[test]
    fn mask_hides_only_the_key() {
        assert_eq!(
            mask_dsn("https://SECRET@host.example/42"),
            "https://***@host.example/42"
        );
        // Nothing to mask in a DSN with no key
        assert_eq!(mask_dsn("https://host.example/42"), "https://host.example/42");
        assert_eq!(mask_dsn("garbage"), "garbage");
    }

    #[test]
    fn invalid_dsn_error_is_masked() {
        let err = Dsn::parse("https://TOPSECRET@host.example").unwrap_err();
        let text = err.to_string();
        assert!(!text.contains("TOPSECRET"));
        assert!(text.contains("***"));
    }
}
