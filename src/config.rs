//! Client configuration and the default-value table applied at construction.

use crate::credentials::Credentials;
use crate::retry::RetryPolicy;
use std::collections::HashMap;
use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.kgiton.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Default total number of tries per call.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default delay after the first failed attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Full configuration of a client.
///
/// # Examples
///
/// ```
/// use kgiton::Config;
/// use std::time::Duration;
///
/// let config = Config {
///     api_key: Some("kgiton_xxx".to_string()),
///     retry_attempts: 5,
///     ..Config::default()
/// };
///
/// assert_eq!(config.base_url, "https://api.kgiton.com");
/// assert_eq!(config.timeout, Duration::from_secs(30));
/// ```
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Base URL every request path is appended to.
    pub base_url: String,

    /// API key, sent as `x-api-key`. Wins over `access_token` when both are set.
    pub api_key: Option<String>,

    /// Bearer token, sent as `Authorization: Bearer <token>`.
    pub access_token: Option<String>,

    /// Timeout applied to each individual attempt.
    pub timeout: Duration,

    /// Trace every request and response through `tracing` at info level.
    pub debug: bool,

    /// Extra headers sent with every request.
    pub headers: HashMap<String, String>,

    /// Total number of tries per call, including the first.
    pub retry_attempts: u32,

    /// Delay after the first failed attempt; doubles on each further failure.
    pub retry_delay: Duration,

    /// Upper bound for a single backoff delay. `None` leaves it uncapped.
    pub max_retry_delay: Option<Duration>,

    /// Randomize each backoff delay between 50% and 100% of its value.
    pub retry_jitter: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .field("headers", &self.headers)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("max_retry_delay", &self.max_retry_delay)
            .field("retry_jitter", &self.retry_jitter)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
            debug: false,
            headers: HashMap::new(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retry_delay: None,
            retry_jitter: false,
        }
    }
}

impl Config {
    /// Creates a configuration for the given base URL with default values.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Returns the retry policy described by this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_delay: self.max_retry_delay,
            jitter: self.retry_jitter,
            ..RetryPolicy::new(self.retry_attempts, self.retry_delay)
        }
    }

    /// Returns the credential slot of this configuration.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            api_key: self.api_key.clone(),
            access_token: self.access_token.clone(),
        }
    }

    /// Shallow-merges `update` into this configuration.
    ///
    /// Fields set to `Some` overwrite; `None` fields leave the current value
    /// alone. Extra headers are replaced as a whole, not merged key by key.
    pub fn merge(&mut self, update: ConfigUpdate) {
        let ConfigUpdate {
            base_url,
            api_key,
            access_token,
            timeout,
            debug,
            headers,
            retry_attempts,
            retry_delay,
            max_retry_delay,
            retry_jitter,
        } = update;

        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(api_key) = api_key {
            self.api_key = Some(api_key);
        }
        if let Some(access_token) = access_token {
            self.access_token = Some(access_token);
        }
        if let Some(timeout) = timeout {
            self.timeout = timeout;
        }
        if let Some(debug) = debug {
            self.debug = debug;
        }
        if let Some(headers) = headers {
            self.headers = headers;
        }
        if let Some(retry_attempts) = retry_attempts {
            self.retry_attempts = retry_attempts.max(1);
        }
        if let Some(retry_delay) = retry_delay {
            self.retry_delay = retry_delay;
        }
        if let Some(max_retry_delay) = max_retry_delay {
            self.max_retry_delay = Some(max_retry_delay);
        }
        if let Some(retry_jitter) = retry_jitter {
            self.retry_jitter = retry_jitter;
        }
    }
}

/// A partial configuration for [`Config::merge`].
///
/// # Examples
///
/// ```
/// use kgiton::{Config, ConfigUpdate};
///
/// let mut config = Config::default();
/// config.merge(ConfigUpdate {
///     access_token: Some("jwt".to_string()),
///     debug: Some(true),
///     ..ConfigUpdate::default()
/// });
///
/// assert_eq!(config.access_token.as_deref(), Some("jwt"));
/// assert!(config.debug);
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct ConfigUpdate {
    /// New base URL.
    pub base_url: Option<String>,
    /// New API key.
    pub api_key: Option<String>,
    /// New access token.
    pub access_token: Option<String>,
    /// New per-attempt timeout.
    pub timeout: Option<Duration>,
    /// New debug flag.
    pub debug: Option<bool>,
    /// Replacement set of extra headers.
    pub headers: Option<HashMap<String, String>>,
    /// New total number of tries.
    pub retry_attempts: Option<u32>,
    /// New base backoff delay.
    pub retry_delay: Option<Duration>,
    /// New backoff cap.
    pub max_retry_delay: Option<Duration>,
    /// New jitter setting.
    pub retry_jitter: Option<bool>,
}

impl std::fmt::Debug for ConfigUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigUpdate")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .field("headers", &self.headers)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("max_retry_delay", &self.max_retry_delay)
            .field("retry_jitter", &self.retry_jitter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert!(!config.debug);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert!(config.max_retry_delay.is_none());
        assert!(config.api_key.is_none());
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_merge_none_never_clears() {
        let mut config = Config {
            api_key: Some("key".to_string()),
            access_token: Some("token".to_string()),
            ..Config::default()
        };

        config.merge(ConfigUpdate::default());
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.access_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_merge_later_values_win() {
        let mut config = Config::new("http://localhost:1");
        config.merge(ConfigUpdate {
            base_url: Some("http://localhost:2".to_string()),
            retry_attempts: Some(0),
            timeout: Some(Duration::from_secs(5)),
            ..ConfigUpdate::default()
        });

        assert_eq!(config.base_url, "http://localhost:2");
        assert_eq!(config.retry_attempts, 1);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = Config {
            retry_attempts: 4,
            retry_delay: Duration::from_millis(50),
            max_retry_delay: Some(Duration::from_millis(120)),
            ..Config::default()
        };

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(50));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(120));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = Config {
            api_key: Some("kgiton_secret".to_string()),
            access_token: Some("jwt-secret".to_string()),
            ..Config::default()
        };

        let printed = format!("{:?}", config);
        assert!(!printed.contains("kgiton_secret"));
        assert!(!printed.contains("jwt-secret"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("https://api.kgiton.com"));

        let update = ConfigUpdate {
            api_key: Some("kgiton_secret".to_string()),
            ..ConfigUpdate::default()
        };
        assert!(!format!("{:?}", update).contains("kgiton_secret"));

        let unset = format!("{:?}", Config::default());
        assert!(unset.contains("api_key: None"));
    }
}
