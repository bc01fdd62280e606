use crate::{
    types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    HttpClient, Result,
};
use serde_json::{json, Value};

/// Login, registration and local credential management.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a HttpClient,
}

impl<'a> AuthApi<'a> {
    /// Creates the façade over `client`. Usually reached through
    /// [`Kgiton::auth`](crate::Kgiton::auth).
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Logs in with email and password.
    ///
    /// On success the returned access token is installed on the client, so
    /// every following request is authenticated with it (unless an API key is
    /// also set, which takes precedence).
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        const PATH: &str = "/api/auth/login";

        let login: LoginResponse = self.client.post(PATH, credentials).await?.into_data(PATH)?;
        self.client.set_access_token(login.access_token.clone());

        tracing::debug!(user_id = %login.user.id, "Logged in");
        Ok(login)
    }

    /// Creates a new account.
    ///
    /// Registration does not log in; call [`login`](Self::login) afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        const PATH: &str = "/api/auth/register";
        self.client.post(PATH, request).await?.into_data(PATH)
    }

    /// Asks the server to send a password reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.client
            .post::<_, Value>("/api/auth/forgot-password", &json!({ "email": email }))
            .await?;
        Ok(())
    }

    /// Clears local credentials. No request is made.
    pub fn logout(&self) {
        self.client.clear_auth();
    }

    /// Installs an access token obtained elsewhere, e.g. from a stored session.
    pub fn set_access_token(&self, token: impl Into<String>) {
        self.client.set_access_token(token);
    }

    /// Installs an API key. It wins over any access token.
    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.client.set_api_key(api_key);
    }
}
