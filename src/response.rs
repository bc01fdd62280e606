//! The response envelope every endpoint returns, plus transport metadata.

use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The `{success, message, data, error}` wrapper returned by every endpoint.
///
/// `data` may be absent even on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the server considers the call successful.
    #[serde(default)]
    pub success: bool,

    /// Optional human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The payload.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Optional error description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Returns the payload, or [`Error::MissingData`](crate::Error::MissingData)
    /// naming `path` when the envelope has none.
    ///
    /// # Examples
    ///
    /// ```
    /// use kgiton::ApiResponse;
    ///
    /// let response: ApiResponse<u32> =
    ///     serde_json::from_str(r#"{"success":true,"data":7}"#).unwrap();
    /// assert_eq!(response.into_data("/api/count").unwrap(), 7);
    ///
    /// let empty: ApiResponse<u32> = serde_json::from_str(r#"{"success":true}"#).unwrap();
    /// assert!(empty.into_data("/api/count").is_err());
    /// ```
    pub fn into_data(self, path: &str) -> crate::Result<T> {
        self.data.ok_or_else(|| crate::Error::MissingData {
            path: path.to_string(),
        })
    }
}

/// A successful response with transport details.
///
/// Returned by [`HttpClient::call`](crate::HttpClient::call); the verb
/// methods hand back only the [`ApiResponse`].
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The parsed envelope.
    pub envelope: ApiResponse<T>,

    /// The raw response body.
    pub raw_body: String,

    /// The HTTP status code.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from the first attempt until this response arrived, backoff
    /// included.
    pub latency: Duration,

    /// Number of attempts it took. `1` means no retries.
    pub attempts: u32,
}

impl<T> Response<T> {
    /// Returns `true` if the request required retries.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = ApiResponse<T>;

    fn deref(&self) -> &Self::Target {
        &self.envelope
    }
}
