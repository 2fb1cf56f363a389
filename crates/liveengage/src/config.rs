//! Configuration for a LiveEngage session

use liveengage_core::retry::{BackoffStrategy, FixedBackoff, RetryLimit};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

/// The four OAuth1 secrets that sign every request.
///
/// Fields are optional so that partially configured sessions can be built;
/// the signer rejects incomplete credentials when a request is made.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// OAuth consumer key
    pub consumer_key: Option<String>,
    /// OAuth consumer secret
    pub consumer_secret: Option<SecretString>,
    /// OAuth access token
    pub token: Option<String>,
    /// OAuth access token secret
    pub token_secret: Option<SecretString>,
}

impl Credentials {
    /// Create a complete credential set.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: Some(consumer_key.into()),
            consumer_secret: Some(SecretString::new(consumer_secret.into().into_boxed_str())),
            token: Some(token.into()),
            token_secret: Some(SecretString::new(token_secret.into().into_boxed_str())),
        }
    }

    /// Whether all four secrets are present and non-empty.
    pub fn is_complete(&self) -> bool {
        use secrecy::ExposeSecret;

        let present = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.is_empty());
        let present_secret =
            |s: &Option<SecretString>| s.as_ref().is_some_and(|v| !v.expose_secret().is_empty());

        present(&self.consumer_key)
            && present_secret(&self.consumer_secret)
            && present(&self.token)
            && present_secret(&self.token_secret)
    }
}

/// Configuration for one LiveEngage session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// LiveEngage account (site) id
    pub account_id: String,

    /// Pre-resolved service domain. When `None`, the domain is discovered on first use.
    pub domain: Option<String>,

    /// API version sent to the discovery endpoint
    pub api_version: String,

    /// Records requested per history page
    pub page_size: u32,

    /// Default skill filter applied to history searches
    pub skill_ids: Vec<String>,

    /// Retries a query may spend after its initial attempt
    pub retry_limit: RetryLimit,

    /// Pause before each retry
    pub backoff: Arc<dyn BackoffStrategy>,

    /// Request signing secrets
    pub credentials: Credentials,

    /// Per-request timeout
    pub timeout: Duration,

    /// Base URL of the domain discovery service
    pub discovery_url: String,

    /// Scheme used to reach resolved domains (`https` in production)
    pub scheme: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            domain: None,
            api_version: crate::DEFAULT_API_VERSION.to_string(),
            page_size: crate::DEFAULT_PAGE_SIZE,
            skill_ids: Vec::new(),
            retry_limit: RetryLimit::default(),
            backoff: Arc::new(FixedBackoff::default()),
            credentials: Credentials::default(),
            timeout: Duration::from_secs(30),
            discovery_url: crate::DEFAULT_DISCOVERY_URL.to_string(),
            scheme: "https".to_string(),
        }
    }
}

impl SessionConfig {
    /// Create a configuration for an account, with defaults for everything else.
    pub fn for_account(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    /// Check the invariants a session relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an empty account id, a zero page
    /// size, an empty API version, or a scheme other than `http`/`https`, and
    /// [`Error::InvalidUrl`] for an unparsable discovery URL.
    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(Error::InvalidConfig("account id cannot be empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(Error::InvalidConfig(
                "page size must be greater than zero".to_string(),
            ));
        }
        if self.api_version.trim().is_empty() {
            return Err(Error::InvalidConfig("API version cannot be empty".to_string()));
        }
        match self.scheme.as_str() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::InvalidConfig(format!(
                    "Invalid scheme '{}'. Only 'http' and 'https' are supported.",
                    scheme
                )));
            }
        }
        let discovery: url::Url = self
            .discovery_url
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("discovery URL: {}", e)))?;
        match discovery.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::InvalidUrl(format!(
                "Invalid discovery URL scheme '{}'. Only 'http' and 'https' are supported.",
                scheme
            ))),
        }
    }

    /// Load configuration from `LIVEENGAGE_*` environment variables.
    ///
    /// Equivalent to [`from_env_profile("default")`](Self::from_env_profile).
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_env_profile("default")
    }

    /// Load configuration for a named service profile from the environment.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    /// The `default` profile reads `LIVEENGAGE_<NAME>`; any other profile
    /// reads `LIVEENGAGE_<PROFILE>_<NAME>`, with the profile upper-cased and
    /// `-` replaced by `_`. Recognized names:
    ///
    /// - `ACCOUNT` (required), `DOMAIN`, `VERSION`
    /// - `KEY`, `SECRET`, `TOKEN`, `TOKEN_SECRET`
    /// - `PAGE_SIZE`, `SKILLS` (comma separated), `RETRY_LIMIT` (`-1` = unlimited)
    /// - `TIMEOUT` (seconds)
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or a numeric value does not parse.
    #[cfg(feature = "env")]
    pub fn from_env_profile(profile: &str) -> Result<Self> {
        use std::env;

        let _ = dotenvy::dotenv();

        let prefix = if profile == "default" {
            "LIVEENGAGE_".to_string()
        } else {
            format!("LIVEENGAGE_{}_", profile.to_ascii_uppercase().replace('-', "_"))
        };
        let var = |name: &str| {
            env::var(format!("{prefix}{name}"))
                .ok()
                .filter(|v| !v.trim().is_empty())
        };

        let account_id = var("ACCOUNT").ok_or_else(|| {
            Error::InvalidConfig(format!("{prefix}ACCOUNT is not set for profile '{profile}'"))
        })?;
        let mut config = Self::for_account(account_id);

        config.domain = var("DOMAIN");
        if let Some(version) = var("VERSION") {
            config.api_version = version;
        }

        config.credentials = Credentials {
            consumer_key: var("KEY"),
            consumer_secret: var("SECRET").map(|s| SecretString::new(s.into_boxed_str())),
            token: var("TOKEN"),
            token_secret: var("TOKEN_SECRET").map(|s| SecretString::new(s.into_boxed_str())),
        };

        if let Some(page_size) = var("PAGE_SIZE") {
            config.page_size = page_size.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{prefix}PAGE_SIZE is not a number: {page_size}"))
            })?;
        }

        if let Some(skills) = var("SKILLS") {
            config.skill_ids = skills
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(limit) = var("RETRY_LIMIT") {
            config.retry_limit = limit.parse()?;
        }

        if let Some(timeout) = var("TIMEOUT") {
            let secs: u64 = timeout.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!(
                    "{prefix}TIMEOUT is not a number of seconds: {timeout}"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::for_account("12345");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.api_version, "1.0");
        assert_eq!(config.retry_limit, RetryLimit::Limited(5));
        assert!(config.skill_ids.is_empty());
        assert!(config.domain.is_none());
        assert_eq!(config.discovery_url, "https://api.liveperson.net");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = SessionConfig {
            page_size: 0,
            ..SessionConfig::for_account("12345")
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_account_rejected() {
        let config = SessionConfig::for_account("  ");
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_scheme_rejected() {
        let config = SessionConfig {
            scheme: "ftp".to_string(),
            ..SessionConfig::for_account("12345")
        };
        match config.validate() {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("ftp")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_discovery_url_rejected() {
        let config = SessionConfig {
            discovery_url: "not a url".to_string(),
            ..SessionConfig::for_account("12345")
        };
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_credentials_completeness() {
        assert!(Credentials::new("k", "s", "t", "ts").is_complete());
        assert!(!Credentials::default().is_complete());
        assert!(!Credentials::new("k", "", "t", "ts").is_complete());
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_variables() {
        temp_env::with_vars(
            [
                ("LIVEENGAGE_ACCOUNT", Some("12345")),
                ("LIVEENGAGE_DOMAIN", Some("va.enghist.liveperson.net")),
                ("LIVEENGAGE_VERSION", Some("2.0")),
                ("LIVEENGAGE_KEY", Some("ck")),
                ("LIVEENGAGE_SECRET", Some("cs")),
                ("LIVEENGAGE_TOKEN", Some("tk")),
                ("LIVEENGAGE_TOKEN_SECRET", Some("ts")),
                ("LIVEENGAGE_PAGE_SIZE", Some("25")),
                ("LIVEENGAGE_SKILLS", Some("11, 12,,13")),
                ("LIVEENGAGE_RETRY_LIMIT", Some("-1")),
                ("LIVEENGAGE_TIMEOUT", Some("5")),
            ],
            || {
                let config = SessionConfig::from_env().expect("config should load");
                assert_eq!(config.account_id, "12345");
                assert_eq!(config.domain.as_deref(), Some("va.enghist.liveperson.net"));
                assert_eq!(config.api_version, "2.0");
                assert!(config.credentials.is_complete());
                assert_eq!(config.page_size, 25);
                assert_eq!(config.skill_ids, vec!["11", "12", "13"]);
                assert_eq!(config.retry_limit, RetryLimit::Unlimited);
                assert_eq!(config.timeout, Duration::from_secs(5));
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_named_profile() {
        temp_env::with_vars(
            [
                ("LIVEENGAGE_SANDBOX_ACCOUNT", Some("999")),
                ("LIVEENGAGE_SANDBOX_RETRY_LIMIT", Some("2")),
            ],
            || {
                let config = SessionConfig::from_env_profile("sandbox").unwrap();
                assert_eq!(config.account_id, "999");
                assert_eq!(config.retry_limit, RetryLimit::Limited(2));
                assert!(!config.credentials.is_complete());
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_requires_account() {
        temp_env::with_vars([("LIVEENGAGE_MISSING_ACCOUNT", None::<&str>)], || {
            let result = SessionConfig::from_env_profile("missing");
            assert!(matches!(result, Err(Error::InvalidConfig(_))));
        });
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_rejects_bad_timeout() {
        temp_env::with_vars(
            [
                ("LIVEENGAGE_SLOW_ACCOUNT", Some("1")),
                ("LIVEENGAGE_SLOW_TIMEOUT", Some("30s")),
            ],
            || match SessionConfig::from_env_profile("slow") {
                Err(Error::InvalidConfig(msg)) => assert!(msg.contains("LIVEENGAGE_SLOW_TIMEOUT")),
                other => panic!("Expected InvalidConfig, got {:?}", other),
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_rejects_bad_retry_limit() {
        temp_env::with_vars(
            [
                ("LIVEENGAGE_BROKEN_ACCOUNT", Some("1")),
                ("LIVEENGAGE_BROKEN_RETRY_LIMIT", Some("-7")),
            ],
            || {
                let result = SessionConfig::from_env_profile("broken");
                assert!(matches!(result, Err(Error::RetryLimit(_))));
            },
        );
    }
}
