//! Per-request metadata and overrides.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::time::Duration;

/// Metadata for an individual HTTP request.
///
/// Headers and the timeout set here apply to this request only and sit on top
/// of the client's configuration. They can never replace the auth header.
///
/// # Examples
///
/// ```
/// use kgiton::metadata::RequestMetadata;
/// use http::Method;
/// use std::time::Duration;
///
/// let metadata = RequestMetadata::new(Method::GET, "/api/topup/history")
///     .with_header("x-request-id", "abc-123")
///     .unwrap()
///     .with_query_param("page", "2")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(metadata.query_params.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method.
    pub method: Method,

    /// The request path, relative to the base URL. Path segments holding user
    /// data must already be percent-encoded.
    pub path: String,

    /// Additional headers for this request.
    pub headers: HeaderMap,

    /// Query parameters, appended in order.
    pub query_params: Vec<(String, String)>,

    /// Timeout for each attempt of this request, overriding the client's.
    pub timeout: Option<Duration>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            timeout: None,
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    /// Sets the per-attempt timeout for this request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}

/// Percent-encodes a single path segment.
///
/// Everything except ASCII alphanumerics and `*-._` is escaped, and spaces
/// become `%20`.
///
/// # Examples
///
/// ```
/// use kgiton::metadata::encode_segment;
///
/// assert_eq!(encode_segment("ABCDE-12345"), "ABCDE-12345");
/// assert_eq!(encode_segment("a b/c?d"), "a%20b%2Fc%3Fd");
/// ```
pub fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_segment_escapes_reserved() {
        assert_eq!(encode_segment("key+plus"), "key%2Bplus");
        assert_eq!(encode_segment("100%"), "100%25");
        assert_eq!(encode_segment("é"), "%C3%A9");
    }

    #[test]
    fn test_invalid_header_is_configuration_error() {
        let result = RequestMetadata::new(Method::GET, "/").with_header("bad header", "x");
        assert!(matches!(result, Err(crate::Error::Configuration(_))));
    }
}
