//! The credential slot consulted on every request.

use http::{header::AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

/// Name of the API key header.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The API key / access token pair held by a client.
///
/// Both may be set at once; [`Credentials::auth_header`] decides which one is
/// sent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// API key for backend-to-backend calls.
    pub api_key: Option<String>,
    /// Bearer token obtained from a login.
    pub access_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// The authentication header a request will carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthHeader {
    /// `x-api-key: <key>`
    ApiKey(String),
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// Unauthenticated.
    None,
}

impl Credentials {
    /// Picks the effective credential: the API key first, then the token.
    ///
    /// Empty strings count as unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use kgiton::credentials::{AuthHeader, Credentials};
    ///
    /// let creds = Credentials {
    ///     api_key: Some("key".to_string()),
    ///     access_token: Some("jwt".to_string()),
    /// };
    /// assert_eq!(creds.auth_header(), AuthHeader::ApiKey("key".to_string()));
    /// ```
    pub fn auth_header(&self) -> AuthHeader {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        if let Some(api_key) = non_empty(&self.api_key) {
            AuthHeader::ApiKey(api_key)
        } else if let Some(token) = non_empty(&self.access_token) {
            AuthHeader::Bearer(token)
        } else {
            AuthHeader::None
        }
    }

    /// Returns `true` if any credential is set.
    pub fn is_authenticated(&self) -> bool {
        self.auth_header() != AuthHeader::None
    }
}

impl AuthHeader {
    /// Writes this header into `headers`, removing any competing auth header.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential contains characters that are not
    /// valid in a header value.
    pub fn apply(&self, headers: &mut HeaderMap) -> crate::Result<()> {
        let api_key_header = HeaderName::from_static(API_KEY_HEADER);
        headers.remove(&api_key_header);
        headers.remove(AUTHORIZATION);

        let invalid = |e: http::header::InvalidHeaderValue| {
            crate::Error::Configuration(format!("Invalid credential header value: {}", e))
        };

        match self {
            AuthHeader::ApiKey(key) => {
                let mut value = HeaderValue::from_str(key).map_err(invalid)?;
                value.set_sensitive(true);
                headers.insert(api_key_header, value);
            }
            AuthHeader::Bearer(token) => {
                let mut value =
                    HeaderValue::from_str(&format!("Bearer {}", token)).map_err(invalid)?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            AuthHeader::None => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_used_when_no_api_key() {
        let creds = Credentials {
            api_key: None,
            access_token: Some("jwt".to_string()),
        };
        assert_eq!(creds.auth_header(), AuthHeader::Bearer("jwt".to_string()));
    }

    #[test]
    fn test_empty_values_are_unauthenticated() {
        let creds = Credentials {
            api_key: Some(String::new()),
            access_token: None,
        };
        assert_eq!(creds.auth_header(), AuthHeader::None);
        assert!(!creds.is_authenticated());
    }

    #[test]
    fn test_apply_replaces_caller_auth_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("spoofed"));

        AuthHeader::ApiKey("real".to_string())
            .apply(&mut headers)
            .unwrap();

        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "real");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_apply_bearer() {
        let mut headers = HeaderMap::new();
        AuthHeader::Bearer("jwt".to_string())
            .apply(&mut headers)
            .unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer jwt");
        assert!(headers.get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials {
            api_key: Some("super-secret".to_string()),
            access_token: None,
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
