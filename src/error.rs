//! Error types for KGiTON API calls.
//!
//! Every failure that leaves the client is an [`Error`]. Each variant maps to a
//! stable [`ErrorKind`] and carries the originating HTTP status (`0` when no
//! response was received), so callers can branch on the kind without matching
//! on message text.

use crate::rate_limit::RateLimitInfo;
use http::StatusCode;
use serde_json::Value;

/// The discriminant of the error taxonomy.
///
/// # Examples
///
/// ```
/// use kgiton::{Error, ErrorKind};
///
/// let err = Error::NotFound { message: "not found".to_string() };
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.kind().code(), "NOT_FOUND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was received (DNS, connect or timeout failure).
    Network,
    /// HTTP 400.
    Validation,
    /// HTTP 401.
    Authentication,
    /// HTTP 403.
    Authorization,
    /// HTTP 404.
    NotFound,
    /// HTTP 429.
    RateLimit,
    /// Any other non-2xx status.
    Api,
    /// Errors raised by the client itself rather than by the server.
    Sdk,
}

impl ErrorKind {
    /// Returns the machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Authentication => "AUTHENTICATION_ERROR",
            ErrorKind::Authorization => "AUTHORIZATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::RateLimit => "RATE_LIMIT_EXCEEDED",
            ErrorKind::Api => "API_ERROR",
            ErrorKind::Sdk => "KGITON_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The main error type for KGiTON API calls.
///
/// # Examples
///
/// ```no_run
/// use kgiton::{Error, Kgiton};
///
/// # async fn example() -> Result<(), Error> {
/// let sdk = Kgiton::builder()
///     .base_url("https://api.kgiton.com")?
///     .api_key("kgiton_xxx")
///     .build()?;
///
/// match sdk.license().validate("ABCDE-12345").await {
///     Ok(validation) => println!("valid: {}", validation.is_valid),
///     Err(Error::NotFound { message }) => eprintln!("unknown license: {}", message),
///     Err(Error::RateLimit { rate_limit_info, .. }) => {
///         eprintln!("slow down, retry after {:?}", rate_limit_info.and_then(|i| i.retry_after));
///     }
///     Err(e) => eprintln!("{} ({}): {}", e.kind(), e.status(), e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No response was received: DNS lookup, connection or timeout failure.
    #[error("Network error: {message}")]
    Network {
        /// Description of the transport failure.
        message: String,
        /// Whether the failure was a timeout.
        timeout: bool,
    },

    /// The server rejected the request as invalid (HTTP 400).
    #[error("{message}")]
    Validation {
        /// Message from the response body.
        message: String,
        /// The parsed response body, if it was JSON.
        details: Option<Value>,
    },

    /// Missing or invalid credentials (HTTP 401).
    #[error("{message}")]
    Authentication {
        /// Message from the response body.
        message: String,
    },

    /// Credentials are valid but lack permission (HTTP 403).
    #[error("{message}")]
    Authorization {
        /// Message from the response body.
        message: String,
    },

    /// The requested resource does not exist (HTTP 404).
    #[error("{message}")]
    NotFound {
        /// Message from the response body.
        message: String,
    },

    /// Too many requests (HTTP 429).
    #[error("{message}")]
    RateLimit {
        /// Message from the response body.
        message: String,
        /// Rate limit headers sent with the response, if any.
        rate_limit_info: Option<RateLimitInfo>,
    },

    /// Any other non-2xx response.
    #[error("API error {status}: {message}")]
    Api {
        /// Message from the response body.
        message: String,
        /// The HTTP status code.
        status: StatusCode,
        /// The parsed response body, if it was JSON.
        details: Option<Value>,
    },

    /// A 2xx response body did not match the expected envelope.
    #[error("Failed to decode response (status {status}): {serde_error}")]
    Decode {
        /// The raw response body.
        raw_response: String,
        /// The serde error message.
        serde_error: String,
        /// The HTTP status code.
        status: StatusCode,
    },

    /// A successful envelope had no `data` field where one was required.
    #[error("Response from {path} contained no data")]
    MissingData {
        /// The request path.
        path: String,
    },

    /// A license ownership check failed and the caller asked for an error.
    #[error("{0}")]
    Ownership(String),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// Invalid configuration was provided (bad header name or value, etc.).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An invalid base URL or path was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Builds the error for a completed non-2xx response.
    ///
    /// The message is taken from the body's `error` field, then its `message`
    /// field, then a fallback for the kind.
    pub(crate) fn from_response(
        status: StatusCode,
        raw_body: &str,
        rate_limit_info: Option<RateLimitInfo>,
    ) -> Self {
        let details = serde_json::from_str::<Value>(raw_body).ok();
        let body_message = details.as_ref().and_then(|body| {
            ["error", "message"].iter().find_map(|field| {
                body.get(field)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        });
        let message = |fallback: &str| body_message.clone().unwrap_or_else(|| fallback.to_string());

        match status.as_u16() {
            400 => Error::Validation {
                message: message("Validation failed"),
                details,
            },
            401 => Error::Authentication {
                message: message("Authentication failed"),
            },
            403 => Error::Authorization {
                message: message("Access denied"),
            },
            404 => Error::NotFound {
                message: message("Resource not found"),
            },
            429 => Error::RateLimit {
                message: message("Rate limit exceeded"),
                rate_limit_info,
            },
            _ => Error::Api {
                message: message("An error occurred"),
                status,
                details,
            },
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network { .. } => ErrorKind::Network,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::Authorization { .. } => ErrorKind::Authorization,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::RateLimit { .. } => ErrorKind::RateLimit,
            Error::Api { .. } => ErrorKind::Api,
            Error::Decode { .. }
            | Error::MissingData { .. }
            | Error::Ownership(_)
            | Error::Serialization(_)
            | Error::Configuration(_)
            | Error::InvalidUrl(_) => ErrorKind::Sdk,
        }
    }

    /// Returns the HTTP status carried by this error.
    ///
    /// Network failures and client-side errors report `0`.
    pub fn status(&self) -> u16 {
        match self {
            Error::Validation { .. } => 400,
            Error::Authentication { .. } => 401,
            Error::Authorization { .. } => 403,
            Error::NotFound { .. } => 404,
            Error::RateLimit { .. } => 429,
            Error::Api { status, .. } | Error::Decode { status, .. } => status.as_u16(),
            _ => 0,
        }
    }

    /// Returns the human-readable message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Network { message, .. }
            | Error::Validation { message, .. }
            | Error::Authentication { message }
            | Error::Authorization { message }
            | Error::NotFound { message }
            | Error::RateLimit { message, .. }
            | Error::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Returns the parsed response body for errors that keep it.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Error::Validation { details, .. } | Error::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` if another attempt could succeed.
    ///
    /// Client errors (4xx other than 429) are final. Network failures, 429 and
    /// 5xx responses are retryable. Errors raised by the client itself never
    /// are.
    ///
    /// # Examples
    ///
    /// ```
    /// use kgiton::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Api {
    ///     message: "boom".to_string(),
    ///     status: StatusCode::INTERNAL_SERVER_ERROR,
    ///     details: None,
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::Authentication { message: "bad token".to_string() };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            ErrorKind::Network | ErrorKind::RateLimit => true,
            ErrorKind::Sdk => false,
            _ => {
                let status = self.status();
                !(400..500).contains(&status)
            }
        }
    }

    /// Returns rate limit information if the server sent any.
    pub fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        match self {
            Error::RateLimit {
                rate_limit_info, ..
            } => rate_limit_info.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network {
            message: err.to_string(),
            timeout: err.is_timeout(),
        }
    }
}

/// A specialized `Result` type for KGiTON API calls.
pub type Result<T> = std::result::Result<T, Error>;
