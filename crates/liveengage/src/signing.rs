//! Request signing
//!
//! Every request to LiveEngage carries OAuth 1.0a credentials signed with
//! HMAC-SHA1. The signer is a seam: [`RequestSigner`] can be swapped for a
//! different scheme without touching the executor.

use crate::config::Credentials;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use http::{HeaderMap, HeaderValue, Method, header::AUTHORIZATION};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use secrecy::ExposeSecret;
use sha1::Sha1;
use std::fmt;
use thiserror::Error;
use url::Url;

/// RFC 3986 unreserved characters stay literal, everything else is encoded.
pub(crate) const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Errors raised while signing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// One of the four OAuth1 credentials is absent or empty.
    #[error("missing OAuth1 credential: {0}")]
    MissingCredential(&'static str),

    /// The computed header could not be represented as an HTTP header value.
    #[error("invalid authorization header: {0}")]
    InvalidHeader(String),
}

/// Produces the transport headers that authenticate one request.
///
/// Implementations must be pure apart from their timestamp and nonce source.
pub trait RequestSigner: Send + Sync + fmt::Debug {
    /// Sign `method url` and return the headers to attach.
    ///
    /// `body` is the serialized payload, if any. OAuth1 ignores non-form
    /// bodies, but other schemes may hash it.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::MissingCredential`] when the credentials are incomplete.
    fn sign(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&[u8]>,
        credentials: &Credentials,
    ) -> Result<HeaderMap, SigningError>;
}

#[derive(Debug, Clone)]
enum Entropy {
    System,
    Fixed { timestamp: i64, nonce: String },
}

impl Entropy {
    fn draw(&self) -> (String, String) {
        match self {
            Entropy::System => (
                chrono::Utc::now().timestamp().to_string(),
                uuid::Uuid::new_v4().simple().to_string(),
            ),
            Entropy::Fixed { timestamp, nonce } => (timestamp.to_string(), nonce.clone()),
        }
    }
}

/// OAuth 1.0a HMAC-SHA1 signer.
///
/// # Example
///
/// ```rust
/// use liveengage::config::Credentials;
/// use liveengage::signing::{OAuth1Signer, RequestSigner};
/// use http::Method;
///
/// let credentials = Credentials::new("key", "secret", "token", "token-secret");
/// let signer = OAuth1Signer::fixed(1_700_000_000, "nonce");
/// let url = "https://example.com/search?limit=50".parse().unwrap();
///
/// let headers = signer.sign(&Method::POST, &url, None, &credentials).unwrap();
/// assert!(headers["authorization"].to_str().unwrap().starts_with("OAuth "));
/// ```
#[derive(Debug, Clone)]
pub struct OAuth1Signer {
    entropy: Entropy,
}

impl OAuth1Signer {
    /// Signer that uses the system clock and a random nonce.
    pub fn new() -> Self {
        Self {
            entropy: Entropy::System,
        }
    }

    /// Signer with a pinned timestamp and nonce, producing reproducible headers.
    pub fn fixed(timestamp: i64, nonce: impl Into<String>) -> Self {
        Self {
            entropy: Entropy::Fixed {
                timestamp,
                nonce: nonce.into(),
            },
        }
    }

    /// Compute the base64 HMAC-SHA1 signature for a request.
    fn signature(
        method: &Method,
        url: &Url,
        oauth_params: &[(&str, &str)],
        consumer_secret: &str,
        token_secret: &str,
    ) -> Result<String, SigningError> {
        let base = signature_base_string(method, url, oauth_params);
        let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));

        let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
            .map_err(|e| SigningError::InvalidHeader(e.to_string()))?;
        mac.update(base.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

impl Default for OAuth1Signer {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSigner for OAuth1Signer {
    fn sign(
        &self,
        method: &Method,
        url: &Url,
        _body: Option<&[u8]>,
        credentials: &Credentials,
    ) -> Result<HeaderMap, SigningError> {
        let consumer_key = required(credentials.consumer_key.as_deref(), "consumer_key")?;
        let consumer_secret = required(
            credentials.consumer_secret.as_ref().map(|s| s.expose_secret()),
            "consumer_secret",
        )?;
        let token = required(credentials.token.as_deref(), "token")?;
        let token_secret = required(
            credentials.token_secret.as_ref().map(|s| s.expose_secret()),
            "token_secret",
        )?;

        let (timestamp, nonce) = self.entropy.draw();
        let mut oauth_params = vec![
            ("oauth_consumer_key", consumer_key),
            ("oauth_nonce", nonce.as_str()),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", token),
            ("oauth_version", "1.0"),
        ];

        let signature =
            Self::signature(method, url, &oauth_params, consumer_secret, token_secret)?;
        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort_unstable();

        let header = format!(
            "OAuth {}",
            oauth_params
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, encode(v)))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let value = HeaderValue::from_str(&header)
            .map_err(|e| SigningError::InvalidHeader(e.to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, SigningError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SigningError::MissingCredential(name)),
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// `METHOD&enc(base-url)&enc(sorted-params)` per RFC 5849 section 3.4.1.
fn signature_base_string(method: &Method, url: &Url, oauth_params: &[(&str, &str)]) -> String {
    let mut base_url = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        base_url.push_str(&format!(":{port}"));
    }
    base_url.push_str(url.path());

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
        .collect();
    params.sort();

    let normalized = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_ascii_uppercase(),
        encode(&base_url),
        encode(&normalized)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn credentials() -> Credentials {
        Credentials::new("ck", "cs", "tk", "ts")
    }

    fn search_url() -> Url {
        "https://va.enghist.liveperson.net/interaction_history/api/account/12345/interactions/search?limit=50&offset=0"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_base_string_layout() {
        let base = signature_base_string(
            &Method::POST,
            &search_url(),
            &[("oauth_nonce", "n"), ("oauth_timestamp", "1")],
        );
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fva.enghist.liveperson.net%2Finteraction_history%2Fapi%2Faccount%2F12345%2Finteractions%2Fsearch&limit%3D50%26oauth_nonce%3Dn%26oauth_timestamp%3D1%26offset%3D0"
        );
    }

    #[test]
    fn test_base_string_keeps_non_default_port() {
        let url: Url = "http://127.0.0.1:8080/a/b?x=1".parse().unwrap();
        let base = signature_base_string(&Method::GET, &url, &[]);
        assert!(base.starts_with("GET&http%3A%2F%2F127.0.0.1%3A8080%2Fa%2Fb&"));
    }

    #[test]
    fn test_encode_unreserved() {
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(encode("a b&c=d/é"), "a%20b%26c%3Dd%2F%C3%A9");
    }

    #[test]
    fn test_fixed_signer_matches_reference_signature() {
        let signer = OAuth1Signer::fixed(1_700_000_000, "abc123");
        let headers = signer
            .sign(&Method::POST, &search_url(), None, &credentials())
            .unwrap();

        let header = headers[AUTHORIZATION].to_str().unwrap();
        assert_eq!(
            header,
            "OAuth oauth_consumer_key=\"ck\", oauth_nonce=\"abc123\", \
             oauth_signature=\"uuRiE3%2Fr7E04qKGRXVmnky0XBBQ%3D\", \
             oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1700000000\", \
             oauth_token=\"tk\", oauth_version=\"1.0\""
        );
    }

    #[test]
    fn test_fixed_signer_is_deterministic() {
        let signer = OAuth1Signer::fixed(42, "n");
        let a = signer
            .sign(&Method::GET, &search_url(), None, &credentials())
            .unwrap();
        let b = signer
            .sign(&Method::GET, &search_url(), Some(b"{}"), &credentials())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_system_signer_varies_nonce() {
        let signer = OAuth1Signer::new();
        let a = signer
            .sign(&Method::GET, &search_url(), None, &credentials())
            .unwrap();
        let b = signer
            .sign(&Method::GET, &search_url(), None, &credentials())
            .unwrap();
        assert_ne!(a[AUTHORIZATION], b[AUTHORIZATION]);
    }

    #[test]
    fn test_missing_credential_is_named() {
        let mut creds = credentials();
        creds.token_secret = None;
        let err = OAuth1Signer::new()
            .sign(&Method::GET, &search_url(), None, &creds)
            .unwrap_err();
        assert_eq!(err, SigningError::MissingCredential("token_secret"));

        let mut creds = credentials();
        creds.consumer_key = Some(String::new());
        let err = OAuth1Signer::new()
            .sign(&Method::GET, &search_url(), None, &creds)
            .unwrap_err();
        assert_eq!(err, SigningError::MissingCredential("consumer_key"));
    }
}
