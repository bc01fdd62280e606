//! The top-level entry point tying the gateway and the resource façades
//! together.

use crate::{
    api::{AuthApi, LicenseApi, PaymentApi, TopupApi, UserApi},
    clock::Clock,
    types::{LicenseBalance, LicenseValidation, TopupResponse, UseTokenRequest, UseTokenResponse},
    ClientBuilder, Config, ConfigUpdate, HttpClient, Result,
};
use std::sync::Arc;
use std::time::Duration;

/// A KGiTON API client.
///
/// All façades share one [`HttpClient`], so logging in through
/// [`auth()`](Self::auth) authenticates every other façade as well. Cloning
/// is cheap and clones share credentials.
///
/// # Examples
///
/// ```no_run
/// use kgiton::{Config, Kgiton};
///
/// # async fn example() -> Result<(), kgiton::Error> {
/// let sdk = Kgiton::new(Config {
///     api_key: Some("kgiton_xxx".to_string()),
///     ..Config::default()
/// })?;
///
/// if sdk.license().has_sufficient_tokens("ABCDE-12345", 1).await {
///     let used = sdk.use_token("ABCDE-12345", None).await?;
///     println!("balance now {}", used.new_balance);
/// } else {
///     let topup = sdk.request_topup("ABCDE-12345", 1000).await?;
///     println!("top up at {:?}", topup.payment_url);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Kgiton {
    client: HttpClient,
}

impl Kgiton {
    /// Creates a client from a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or an extra header is invalid.
    pub fn new(config: Config) -> Result<Self> {
        HttpClient::new(config).map(Self::from_client)
    }

    /// Creates a new `KgitonBuilder` for configuring a client.
    pub fn builder() -> KgitonBuilder {
        KgitonBuilder::new()
    }

    /// Wraps an existing gateway.
    pub fn from_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// Returns the underlying gateway for endpoints without a façade.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Login, registration and local credentials.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.client)
    }

    /// License validation and lookup.
    pub fn license(&self) -> LicenseApi<'_> {
        LicenseApi::new(&self.client)
    }

    /// Profile, balances, token usage and API keys.
    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(&self.client)
    }

    /// Token top-ups and their transactions.
    pub fn topup(&self) -> TopupApi<'_> {
        TopupApi::new(&self.client)
    }

    /// Partner payments (QRIS and checkout pages).
    pub fn payment(&self) -> PaymentApi<'_> {
        PaymentApi::new(&self.client)
    }

    /// Shallow-merges `update` into the configuration.
    pub fn update_config(&self, update: ConfigUpdate) {
        self.client.update_config(update);
    }

    /// Installs an API key on the shared gateway.
    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.client.set_api_key(api_key);
    }

    /// Installs an access token on the shared gateway.
    pub fn set_access_token(&self, access_token: impl Into<String>) {
        self.client.set_access_token(access_token);
    }

    /// Removes both the API key and the access token.
    pub fn clear_auth(&self) {
        self.client.clear_auth();
    }

    /// Shortcut for [`LicenseApi::validate`].
    pub async fn validate_license(&self, license_key: &str) -> Result<LicenseValidation> {
        self.license().validate(license_key).await
    }

    /// Shortcut for [`UserApi::use_token`].
    pub async fn use_token(
        &self,
        license_key: &str,
        request: Option<UseTokenRequest>,
    ) -> Result<UseTokenResponse> {
        self.user().use_token(license_key, request).await
    }

    /// Shortcut for [`LicenseApi::token_balance`].
    pub async fn license_token_balance(&self, license_key: &str) -> Result<LicenseBalance> {
        self.license().token_balance(license_key).await
    }

    /// Shortcut for [`TopupApi::request_checkout`].
    pub async fn request_topup(
        &self,
        license_key: &str,
        token_count: u64,
    ) -> Result<TopupResponse> {
        self.topup().request_checkout(license_key, token_count).await
    }
}

impl From<HttpClient> for Kgiton {
    fn from(client: HttpClient) -> Self {
        Self::from_client(client)
    }
}

/// Builder for [`Kgiton`]. Mirrors [`ClientBuilder`].
#[derive(Default)]
pub struct KgitonBuilder {
    inner: ClientBuilder,
}

impl KgitonBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(self, config: Config) -> Self {
        Self {
            inner: self.inner.config(config),
        }
    }

    /// Sets the base URL for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(self, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            inner: self.inner.base_url(url)?,
        })
    }

    /// Sets the API key.
    pub fn api_key(self, api_key: impl Into<String>) -> Self {
        Self {
            inner: self.inner.api_key(api_key),
        }
    }

    /// Sets the access token.
    pub fn access_token(self, access_token: impl Into<String>) -> Self {
        Self {
            inner: self.inner.access_token(access_token),
        }
    }

    /// Sets the per-attempt timeout.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            inner: self.inner.timeout(timeout),
        }
    }

    /// Enables request/response tracing.
    pub fn debug(self, debug: bool) -> Self {
        Self {
            inner: self.inner.debug(debug),
        }
    }

    /// Adds an extra header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            inner: self.inner.header(name, value)?,
        })
    }

    /// Sets the total number of tries per call.
    pub fn retry_attempts(self, attempts: u32) -> Self {
        Self {
            inner: self.inner.retry_attempts(attempts),
        }
    }

    /// Sets the delay after the first failed attempt.
    pub fn retry_delay(self, delay: Duration) -> Self {
        Self {
            inner: self.inner.retry_delay(delay),
        }
    }

    /// Caps each backoff delay.
    pub fn max_retry_delay(self, max_delay: Duration) -> Self {
        Self {
            inner: self.inner.max_retry_delay(max_delay),
        }
    }

    /// Randomizes backoff delays.
    pub fn retry_jitter(self, jitter: bool) -> Self {
        Self {
            inner: self.inner.retry_jitter(jitter),
        }
    }

    /// Sets the clock used for backoff and polling.
    pub fn clock(self, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: self.inner.clock(clock),
        }
    }

    /// Uses a preconfigured `reqwest::Client`.
    pub fn http_client(self, http_client: reqwest::Client) -> Self {
        Self {
            inner: self.inner.http_client(http_client),
        }
    }

    /// Builds the configured `Kgiton`.
    ///
    /// # Errors
    ///
    /// See [`ClientBuilder::build`].
    pub fn build(self) -> Result<Kgiton> {
        self.inner.build().map(Kgiton::from_client)
    }
}
