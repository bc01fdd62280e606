use crate::{
    metadata::{encode_segment, RequestMetadata},
    types::{
        ApiKeyResponse, LicenseKey, LicenseStatus, LicenseTokenUsageResponse,
        TokenBalanceResponse, TokenUsageStats, UseTokenRequest, UseTokenResponse, UserProfile,
    },
    HttpClient, Result,
};
use http::Method;
use serde_json::{json, Value};

/// Default page for [`UserApi::license_token_usage`].
pub const DEFAULT_USAGE_PAGE: u32 = 1;

/// Default page size for [`UserApi::license_token_usage`].
pub const DEFAULT_USAGE_LIMIT: u32 = 20;

/// The authenticated user's profile, balances and API key.
#[derive(Debug, Clone, Copy)]
pub struct UserApi<'a> {
    client: &'a HttpClient,
}

impl<'a> UserApi<'a> {
    /// Creates the façade over `client`.
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Returns the user together with all of their license keys.
    pub async fn profile(&self) -> Result<UserProfile> {
        const PATH: &str = "/api/user/profile";
        self.client.get(PATH).await?.into_data(PATH)
    }

    /// Returns the balance of every license key and their total.
    pub async fn token_balance(&self) -> Result<TokenBalanceResponse> {
        const PATH: &str = "/api/user/token-balance";
        self.client.get(PATH).await?.into_data(PATH)
    }

    /// Returns usage totals for the last week across all licenses.
    pub async fn token_usage_stats(&self) -> Result<TokenUsageStats> {
        const PATH: &str = "/api/user/token-usage-stats";
        self.client.get(PATH).await?.into_data(PATH)
    }

    /// Returns usage for one license with a page of its history.
    ///
    /// `page` and `limit` default to [`DEFAULT_USAGE_PAGE`] and
    /// [`DEFAULT_USAGE_LIMIT`].
    pub async fn license_token_usage(
        &self,
        license_key: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<LicenseTokenUsageResponse> {
        let path = format!("/api/user/license/{}/usage", encode_segment(license_key));
        let metadata = RequestMetadata::new(Method::GET, &path)
            .with_query_param("page", page.unwrap_or(DEFAULT_USAGE_PAGE))
            .with_query_param("limit", limit.unwrap_or(DEFAULT_USAGE_LIMIT));

        self.client
            .request::<Value, _>(metadata, None)
            .await?
            .into_data(&path)
    }

    /// Consumes one token from `license_key`.
    ///
    /// Without a request an empty JSON object is sent.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kgiton::types::UseTokenRequest;
    ///
    /// # async fn example(sdk: kgiton::Kgiton) -> Result<(), kgiton::Error> {
    /// let result = sdk
    ///     .user()
    ///     .use_token("ABCDE-12345", Some(UseTokenRequest::with_purpose("Weight measurement")))
    ///     .await?;
    /// println!("remaining: {}", result.new_balance);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn use_token(
        &self,
        license_key: &str,
        request: Option<UseTokenRequest>,
    ) -> Result<UseTokenResponse> {
        let path = format!(
            "/api/user/license-keys/{}/use-token",
            encode_segment(license_key)
        );
        let body = request.unwrap_or_default();
        self.client.post(&path, &body).await?.into_data(&path)
    }

    /// Assigns an unowned license key to the user.
    pub async fn assign_license(&self, license_key: &str) -> Result<LicenseKey> {
        const PATH: &str = "/api/user/assign-license";
        self.client
            .post(PATH, &json!({ "license_key": license_key }))
            .await?
            .into_data(PATH)
    }

    /// Issues a new API key. The previous key stops working immediately and
    /// the new one is only returned in full this once.
    pub async fn regenerate_api_key(&self) -> Result<ApiKeyResponse> {
        const PATH: &str = "/api/user/regenerate-api-key";
        self.client.post_empty(PATH).await?.into_data(PATH)
    }

    /// Revokes the current API key without issuing a new one.
    pub async fn revoke_api_key(&self) -> Result<()> {
        self.client
            .post_empty::<Value>("/api/user/revoke-api-key")
            .await?;
        Ok(())
    }

    /// Sum of the balances of all the user's licenses.
    pub async fn total_token_balance(&self) -> Result<u64> {
        Ok(self.token_balance().await?.total_balance)
    }

    /// The user's license keys, taken from the profile.
    pub async fn license_keys(&self) -> Result<Vec<LicenseKey>> {
        Ok(self.profile().await?.license_keys)
    }

    /// Returns `true` if at least one of the user's licenses is active.
    pub async fn has_active_license(&self) -> Result<bool> {
        Ok(self
            .license_keys()
            .await?
            .iter()
            .any(|license| license.status == LicenseStatus::Active))
    }

    /// Returns the first active license key holding at least `required`
    /// tokens, if any.
    pub async fn available_license_key(&self, required: u64) -> Result<Option<String>> {
        Ok(self
            .license_keys()
            .await?
            .into_iter()
            .find(|license| {
                license.status == LicenseStatus::Active && license.token_balance >= required
            })
            .map(|license| license.key))
    }
}
