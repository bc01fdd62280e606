//! The request gateway every API call goes through.
//!
//! [`HttpClient`] applies credentials, traces requests when debug is on,
//! normalizes failures into [`Error`] and retries according to the configured
//! [`RetryPolicy`](crate::RetryPolicy). Use [`ClientBuilder`] to create one.

use crate::{
    clock::{Clock, TokioClock},
    config::{Config, ConfigUpdate},
    credentials::Credentials,
    metadata::RequestMetadata,
    rate_limit::RateLimitInfo,
    response::{ApiResponse, Response},
    Error, Result,
};
use http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use std::time::Duration;
use url::Url;

/// The HTTP gateway to the KGiTON API.
///
/// Cloning is cheap and clones share configuration, so a credential installed
/// through one clone is used by all of them on their next request.
///
/// # Examples
///
/// ```no_run
/// use kgiton::{ApiResponse, HttpClient};
/// use serde_json::Value;
///
/// # async fn example() -> Result<(), kgiton::Error> {
/// let client = HttpClient::builder()
///     .base_url("https://api.kgiton.com")?
///     .api_key("kgiton_xxx")
///     .build()?;
///
/// let profile: ApiResponse<Value> = client.get("/api/user/profile").await?;
/// println!("{:?}", profile.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    config: RwLock<Config>,
    clock: Arc<dyn Clock>,
}

/// Everything one attempt needs, copied out of the config lock.
struct PreparedRequest {
    url: Url,
    headers: HeaderMap,
    timeout: Duration,
    debug: bool,
}

/// A completed 2xx attempt.
struct Received<T> {
    envelope: ApiResponse<T>,
    raw_body: String,
    status: StatusCode,
    headers: HeaderMap,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = self.read_config();
        f.debug_struct("HttpClient")
            .field("base_url", &config.base_url)
            .field("credentials", &config.credentials())
            .field("debug", &config.debug)
            .finish()
    }
}

impl HttpClient {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or an extra header is invalid.
    pub fn new(config: Config) -> Result<Self> {
        ClientBuilder::new().config(config).build()
    }

    /// Makes a request and returns the envelope with transport details.
    ///
    /// This is the single path every verb goes through. Each attempt rebuilds
    /// its headers from the current configuration, so credential changes
    /// apply to the very next attempt.
    pub async fn call<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let policy = self.read_config().retry_policy();
        let clock = &self.inner.clock;
        let start = clock.now();
        let mut attempt: u32 = 0;

        loop {
            match self.attempt::<Res>(&metadata, body.as_ref(), attempt).await {
                Ok(received) => {
                    return Ok(Response {
                        envelope: received.envelope,
                        raw_body: received.raw_body,
                        status: received.status,
                        headers: received.headers,
                        latency: clock.now().saturating_duration_since(start),
                        attempts: attempt + 1,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        kind = %e.kind(),
                        status = e.status(),
                        attempt = attempt + 1,
                        method = %metadata.method,
                        path = %metadata.path,
                        "Request failed"
                    );

                    let Some(delay) = policy.next_delay(&e, attempt) else {
                        return Err(e);
                    };

                    tracing::info!(
                        delay_ms = delay.as_millis() as u64,
                        attempt = attempt + 1,
                        max_attempts = policy.max_attempts,
                        "Retrying request after delay"
                    );

                    clock.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Makes a request with per-call overrides and returns the envelope.
    pub async fn request<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<ApiResponse<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.call(metadata, body).await.map(|r| r.envelope)
    }

    /// Makes a GET request to the specified path.
    pub async fn get<Res>(&self, path: impl Into<String>) -> Result<ApiResponse<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::GET, path);
        self.request::<Value, Res>(metadata, None).await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
    ) -> Result<ApiResponse<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::POST, path);
        self.request(metadata, Some(body)).await
    }

    /// Makes a POST request without a body.
    pub async fn post_empty<Res>(&self, path: impl Into<String>) -> Result<ApiResponse<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::POST, path);
        self.request::<Value, Res>(metadata, None).await
    }

    /// Makes a PUT request with a JSON body.
    pub async fn put<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
    ) -> Result<ApiResponse<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::PUT, path);
        self.request(metadata, Some(body)).await
    }

    /// Makes a PATCH request with a JSON body.
    pub async fn patch<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
    ) -> Result<ApiResponse<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::PATCH, path);
        self.request(metadata, Some(body)).await
    }

    /// Makes a DELETE request to the specified path.
    pub async fn delete<Res>(&self, path: impl Into<String>) -> Result<ApiResponse<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::DELETE, path);
        self.request::<Value, Res>(metadata, None).await
    }

    /// Sets the API key. The access token, if any, is kept.
    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.write_config().api_key = Some(api_key.into());
    }

    /// Sets the access token. The API key, if any, is kept and still wins.
    pub fn set_access_token(&self, access_token: impl Into<String>) {
        self.write_config().access_token = Some(access_token.into());
    }

    /// Removes both credentials.
    pub fn clear_auth(&self) {
        let mut config = self.write_config();
        config.api_key = None;
        config.access_token = None;
    }

    /// Shallow-merges `update` into the configuration.
    ///
    /// See [`Config::merge`].
    pub fn update_config(&self, update: ConfigUpdate) {
        self.write_config().merge(update);
    }

    /// Returns a snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.read_config().clone()
    }

    /// Returns a snapshot of the current credentials.
    pub fn credentials(&self) -> Credentials {
        self.read_config().credentials()
    }

    /// Returns the clock used for backoff and polling.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }

    fn read_config(&self) -> RwLockReadGuard<'_, Config> {
        self.inner
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_config(&self) -> std::sync::RwLockWriteGuard<'_, Config> {
        self.inner
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds URL, headers and timeout from the current configuration.
    ///
    /// Header layers, later ones winning: JSON defaults, configured extra
    /// headers, per-call headers, then the auth header.
    fn prepare(&self, metadata: &RequestMetadata) -> Result<PreparedRequest> {
        let config = self.read_config();

        let mut url = join_url(&config.base_url, &metadata.path)?;
        if !metadata.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(
                metadata
                    .query_params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &config.headers {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }

        for (name, value) in &metadata.headers {
            headers.insert(name.clone(), value.clone());
        }

        config.credentials().auth_header().apply(&mut headers)?;

        Ok(PreparedRequest {
            url,
            headers,
            timeout: metadata.timeout.unwrap_or(config.timeout),
            debug: config.debug,
        })
    }

    /// Executes a single attempt and classifies its outcome.
    async fn attempt<Res>(
        &self,
        metadata: &RequestMetadata,
        body: Option<&Value>,
        attempt: u32,
    ) -> Result<Received<Res>>
    where
        Res: DeserializeOwned,
    {
        let prepared = self.prepare(metadata)?;

        tracing::debug!(
            method = %metadata.method,
            url = %prepared.url,
            attempt = attempt + 1,
            "Executing HTTP request"
        );

        if prepared.debug {
            match body {
                Some(body) => tracing::info!(
                    method = %metadata.method,
                    path = %metadata.path,
                    body = %body,
                    "Sending request"
                ),
                None => tracing::info!(
                    method = %metadata.method,
                    path = %metadata.path,
                    "Sending request"
                ),
            }
        }

        let mut request = self
            .inner
            .http_client
            .request(metadata.method.clone(), prepared.url)
            .headers(prepared.headers)
            .timeout(prepared.timeout);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let raw_body = response.text().await?;

        if prepared.debug {
            tracing::info!(status = status.as_u16(), body = %raw_body, "Received response");
        }

        if !status.is_success() {
            let rate_limit_info = if status == StatusCode::TOO_MANY_REQUESTS {
                RateLimitInfo::from_headers(&headers)
            } else {
                None
            };
            return Err(Error::from_response(status, &raw_body, rate_limit_info));
        }

        let envelope = if raw_body.trim().is_empty() {
            ApiResponse {
                success: true,
                message: None,
                data: None,
                error: None,
            }
        } else {
            serde_json::from_str::<ApiResponse<Res>>(&raw_body).map_err(|e| {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to decode response envelope"
                );
                Error::Decode {
                    raw_response: raw_body.clone(),
                    serde_error: e.to_string(),
                    status,
                }
            })?
        };

        Ok(Received {
            envelope,
            raw_body,
            status,
            headers,
        })
    }
}

/// Appends `path` to `base_url`, keeping any path prefix of the base.
fn join_url(base_url: &str, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(Url::parse(&joined)?)
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::try_from(name)
        .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
    Ok((name, value))
}

/// Builder for configuring and creating an [`HttpClient`].
///
/// Unset fields take the defaults from [`Config::default`].
///
/// # Examples
///
/// ```no_run
/// use kgiton::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), kgiton::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://api.kgiton.com")?
///     .access_token("jwt")
///     .timeout(Duration::from_secs(10))
///     .retry_attempts(5)
///     .retry_delay(Duration::from_millis(200))
///     .header("User-Agent", "my-app/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: Config,
    clock: Option<Arc<dyn Clock>>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            clock: None,
            http_client: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the base URL for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        Url::parse(url.as_ref())?;
        self.config.base_url = url.as_ref().to_string();
        Ok(self)
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Sets the access token.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.config.access_token = Some(access_token.into());
        self
    }

    /// Sets the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enables request/response tracing.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Adds an extra header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        parse_header(name.as_ref(), value.as_ref())?;
        self.config
            .headers
            .insert(name.as_ref().to_string(), value.as_ref().to_string());
        Ok(self)
    }

    /// Sets the total number of tries per call. Values below 1 become 1.
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.config.retry_attempts = attempts.max(1);
        self
    }

    /// Sets the delay after the first failed attempt.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Caps each backoff delay.
    pub fn max_retry_delay(mut self, max_delay: Duration) -> Self {
        self.config.max_retry_delay = Some(max_delay);
        self
    }

    /// Randomizes each backoff delay between 50% and 100% of its value.
    pub fn retry_jitter(mut self, jitter: bool) -> Self {
        self.config.retry_jitter = jitter;
        self
    }

    /// Sets the clock used for backoff and polling.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Uses a preconfigured `reqwest::Client` (proxies, TLS roots, ...).
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Builds the configured `HttpClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or an extra header is invalid, or if
    /// the underlying HTTP client cannot be created.
    pub fn build(self) -> Result<HttpClient> {
        Url::parse(&self.config.base_url)?;
        for (name, value) in &self.config.headers {
            parse_header(name, value)?;
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        let mut config = self.config;
        config.retry_attempts = config.retry_attempts.max(1);

        Ok(HttpClient {
            inner: Arc::new(ClientInner {
                http_client,
                config: RwLock::new(config),
                clock: self.clock.unwrap_or_else(|| Arc::new(TokioClock)),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        /// The request/response trace lines written so far.
        fn trace_lines(&self) -> Vec<String> {
            let output = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
            output
                .lines()
                .filter(|line| {
                    line.contains("Sending request") || line.contains("Received response")
                })
                .map(str::to_owned)
                .collect()
        }
    }

    async fn traced_get(server: &MockServer, debug: bool, request_path: &str) -> Vec<String> {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = HttpClient::builder()
            .base_url(server.uri())
            .unwrap()
            .debug(debug)
            .retry_attempts(1)
            .build()
            .unwrap();
        let _ = client.get::<Value>(request_path).await;

        logs.trace_lines()
    }

    async fn trace_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ok"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"success": false, "error": "gone"})),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_debug_traces_request_and_response() {
        let server = trace_server().await;

        let lines = traced_get(&server, true, "/api/ok").await;
        assert_eq!(lines.len(), 2, "{:?}", lines);
        assert!(lines[0].contains("Sending request"));
        assert!(lines[0].contains("method=GET"));
        assert!(lines[0].contains("path=/api/ok"));
        assert!(lines[1].contains("Received response"));
        assert!(lines[1].contains("status=200"));

        let lines = traced_get(&server, true, "/api/missing").await;
        assert_eq!(lines.len(), 2, "{:?}", lines);
        assert!(lines[0].contains("path=/api/missing"));
        assert!(lines[1].contains("status=404"));
        assert!(lines[1].contains("gone"));
    }

    #[tokio::test]
    async fn test_no_trace_without_debug() {
        let server = trace_server().await;

        assert!(traced_get(&server, false, "/api/ok").await.is_empty());
        assert!(traced_get(&server, false, "/api/missing").await.is_empty());
    }

    #[test]
    fn test_join_url_keeps_base_prefix() {
        let url = join_url("https://api.kgiton.com/v1/", "/api/user/profile").unwrap();
        assert_eq!(url.as_str(), "https://api.kgiton.com/v1/api/user/profile");
    }

    #[test]
    fn test_join_url_keeps_encoded_segments() {
        let url = join_url("http://localhost:8080", "/api/license/key/a%20b").unwrap();
        assert_eq!(url.path(), "/api/license/key/a%20b");
    }

    #[test]
    fn test_prepare_header_layers() {
        let client = HttpClient::builder()
            .base_url("http://localhost:8080")
            .unwrap()
            .header("x-tenant", "acme")
            .unwrap()
            .api_key("key")
            .build()
            .unwrap();

        let metadata = RequestMetadata::new(Method::GET, "/api/user/profile")
            .with_header("x-api-key", "override-attempt")
            .unwrap()
            .with_header("accept", "text/plain")
            .unwrap()
            .with_query_param("page", 2);

        let prepared = client.prepare(&metadata).unwrap();
        assert_eq!(prepared.headers.get("x-tenant").unwrap(), "acme");
        assert_eq!(prepared.headers.get("x-api-key").unwrap(), "key");
        assert_eq!(prepared.headers.get("accept").unwrap(), "text/plain");
        assert_eq!(prepared.headers.get("content-type").unwrap(), "application/json");
        assert_eq!(prepared.url.query(), Some("page=2"));
        assert_eq!(prepared.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_prepare_uses_per_call_timeout() {
        let client = HttpClient::new(Config::new("http://localhost:8080")).unwrap();
        let metadata = RequestMetadata::new(Method::GET, "/")
            .with_timeout(Duration::from_millis(250));

        let prepared = client.prepare(&metadata).unwrap();
        assert_eq!(prepared.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_build_rejects_bad_base_url() {
        let result = HttpClient::new(Config::new("not a url"));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_credential_updates_are_shared_between_clones() {
        let client = HttpClient::new(Config::new("http://localhost:8080")).unwrap();
        let clone = client.clone();

        clone.set_access_token("jwt");
        assert_eq!(client.credentials().access_token.as_deref(), Some("jwt"));

        client.clear_auth();
        assert!(!clone.credentials().is_authenticated());
    }
}
