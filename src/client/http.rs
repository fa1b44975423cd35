//! HTTP client implementation for the GoCardless API.

use std::sync::Arc;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use url::Url;

use crate::api::CreditorBankAccountsService;
use crate::{Environment, Error, Result};

use super::config::ClientConfig;
use super::envelope::{decode_envelope, take_page, take_resource, Envelope, Resource};
use super::idempotency::{IdempotencyKeyGenerator, UuidKeyGenerator};
use super::options::RequestOptions;
use super::paginated::ListPage;
use super::retry::retry;

const GOCARDLESS_VERSION: HeaderName = HeaderName::from_static("gocardless-version");
const GOCARDLESS_CLIENT_LIBRARY: HeaderName = HeaderName::from_static("gocardless-client-library");
const GOCARDLESS_CLIENT_VERSION: HeaderName = HeaderName::from_static("gocardless-client-version");
const IDEMPOTENCY_KEY: HeaderName = HeaderName::from_static("idempotency-key");

/// The main client for interacting with the GoCardless API.
///
/// This client provides access to all API services through method calls
/// that return service structs. The client owns the access token, the
/// reusable HTTP transport and the configuration shared by every request.
/// Cloning is cheap and clones share the same transport.
///
/// # Example
///
/// ```no_run
/// use gocardless_rs::{GoCardlessClient, Environment, CreditorBankAccountId};
///
/// # async fn example() -> gocardless_rs::Result<()> {
/// let client = GoCardlessClient::new("your-access-token", Environment::Sandbox)?;
///
/// let account = client
///     .creditor_bank_accounts()
///     .get(&CreditorBankAccountId::new("BA123"), None)
///     .await?;
/// println!("{:?}", account.bank_name);
/// # Ok(())
/// # }
/// ```
pub struct GoCardlessClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) access_token: SecretString,
    pub(crate) base_url: Url,
    pub(crate) config: ClientConfig,
    pub(crate) key_generator: Arc<dyn IdempotencyKeyGenerator>,
}

impl GoCardlessClient {
    /// Create a client with the default configuration.
    pub fn new(access_token: impl Into<String>, env: Environment) -> Result<Self> {
        Self::builder(access_token).environment(env).build()
    }

    /// Create a client with a custom configuration.
    pub fn with_config(
        access_token: impl Into<String>,
        env: Environment,
        config: ClientConfig,
    ) -> Result<Self> {
        Self::builder(access_token)
            .environment(env)
            .config(config)
            .build()
    }

    /// Create a client from environment variables.
    ///
    /// Reads `GOCARDLESS_ACCESS_TOKEN` (required) and
    /// `GOCARDLESS_ENVIRONMENT` (`live` or `sandbox`, defaults to sandbox).
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GOCARDLESS_ACCESS_TOKEN")
            .map_err(|_| Error::Config("GOCARDLESS_ACCESS_TOKEN must be set".to_string()))?;

        let env = match std::env::var("GOCARDLESS_ENVIRONMENT") {
            Ok(value) => value.parse()?,
            Err(_) => Environment::Sandbox,
        };

        Self::new(token, env)
    }

    /// Start building a client with full control over its collaborators.
    ///
    /// Like [`from_env`](Self::from_env), the builder targets
    /// [`Environment::Sandbox`] unless told otherwise.
    pub fn builder(access_token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(access_token)
    }

    /// Get the creditor bank accounts service.
    pub fn creditor_bank_accounts(&self) -> CreditorBankAccountsService {
        CreditorBankAccountsService::new(self.inner.clone())
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// The configuration applied to every request.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

/// Builder for [`GoCardlessClient`].
///
/// # Example
///
/// ```
/// use gocardless_rs::{GoCardlessClient, ClientConfig, Environment};
///
/// let client = GoCardlessClient::builder("token")
///     .environment(Environment::Sandbox)
///     .config(ClientConfig::default().with_user_agent("my-app/1.0"))
///     .http_client(reqwest::Client::new())
///     .build()
///     .expect("valid client");
/// assert_eq!(client.base_url(), "https://api-sandbox.gocardless.com/");
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    access_token: SecretString,
    environment: Environment,
    config: ClientConfig,
    http: Option<reqwest::Client>,
    key_generator: Option<Arc<dyn IdempotencyKeyGenerator>>,
}

impl ClientBuilder {
    fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            environment: Environment::Sandbox,
            config: ClientConfig::default(),
            http: None,
            key_generator: None,
        }
    }

    /// Select the API environment. Defaults to [`Environment::Sandbox`].
    pub fn environment(mut self, env: Environment) -> Self {
        self.environment = env;
        self
    }

    /// Replace the configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Send requests to this base URL instead of the environment's.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Use an existing transport. Its own timeout and user agent settings
    /// apply; the configured `User-Agent` is still sent as a header.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Use a custom idempotency key generator.
    pub fn key_generator(mut self, generator: Arc<dyn IdempotencyKeyGenerator>) -> Self {
        self.key_generator = Some(generator);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GoCardlessClient> {
        if self.access_token.expose_secret().trim().is_empty() {
            return Err(Error::Config("access token must not be empty".to_string()));
        }

        let base = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| self.environment.api_base_url().to_string());
        let base_url = Url::parse(&base)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid base URL: {}", base)));
        }

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .timeout(self.config.timeout)
                .user_agent(&self.config.user_agent)
                .build()?,
        };

        tracing::debug!(
            environment = %self.environment,
            base_url = %base_url,
            api_version = %self.config.api_version,
            "GoCardless client configured"
        );

        Ok(GoCardlessClient {
            inner: Arc::new(ClientInner {
                http,
                access_token: self.access_token,
                base_url,
                config: self.config,
                key_generator: self
                    .key_generator
                    .unwrap_or_else(|| Arc::new(UuidKeyGenerator)),
            }),
        })
    }
}

impl ClientInner {
    /// Build the URL for a path given as segments; each segment is
    /// percent-encoded on its own.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build request headers. Mutating calls pass their idempotency key and
    /// also get a JSON content type.
    pub(crate) fn build_headers(
        &self,
        options: Option<&RequestOptions>,
        idempotency_key: Option<&str>,
    ) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!(
            "Bearer {}",
            self.access_token.expose_secret()
        ))
        .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        headers.insert(GOCARDLESS_VERSION, header_value(self.config.api_version.as_str())?);
        headers.insert(GOCARDLESS_CLIENT_LIBRARY, header_value(&self.config.client_library)?);
        headers.insert(GOCARDLESS_CLIENT_VERSION, header_value(&self.config.client_version)?);
        headers.insert(USER_AGENT, header_value(&self.config.user_agent)?);

        if let Some(key) = idempotency_key {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(IDEMPOTENCY_KEY, header_value(key)?);
        }

        for (name, value) in options.into_iter().flat_map(RequestOptions::headers) {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidInput(format!("Invalid header name: {}", name)))?;
            headers.insert(name, header_value(value)?);
        }

        Ok(headers)
    }

    /// Make a GET request for a single resource.
    pub(crate) async fn get<T: Resource>(
        &self,
        segments: &[&str],
        options: Option<&RequestOptions>,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        let headers = self.build_headers(options, None)?;

        let request = self.http.get(url).headers(headers).build()?;

        self.execute(request, options, take_resource::<T>).await
    }

    /// Make a GET request for one page of a list endpoint.
    pub(crate) async fn list<T: Resource, Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
        options: Option<&RequestOptions>,
    ) -> Result<ListPage<T>> {
        let url = self.endpoint(segments)?;
        let headers = self.build_headers(options, None)?;

        let request = self.http.get(url).headers(headers).query(query).build()?;

        self.execute(request, options, take_page::<T>).await
    }

    /// Make a POST request for a create or action call.
    ///
    /// A body is wrapped in the resource's envelope key. The idempotency key
    /// is fixed before the first attempt so every retry carries the same key.
    pub(crate) async fn post<T: Resource, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;

        let idempotency_key = options
            .and_then(RequestOptions::idempotency_key)
            .map(str::to_string)
            .unwrap_or_else(|| self.key_generator.generate());
        let headers = self.build_headers(options, Some(&idempotency_key))?;

        let mut builder = self.http.post(url).headers(headers);
        if let Some(body) = body {
            let mut wrapped = Envelope::new();
            wrapped.insert(T::ENVELOPE_KEY.to_string(), serde_json::to_value(body)?);
            builder = builder.body(serde_json::to_vec(&wrapped)?);
        }
        let request = builder.build()?;

        tracing::debug!(idempotency_key = %idempotency_key, "prepared mutating request");

        self.execute(request, options, take_resource::<T>).await
    }

    /// Send a prepared request under the retry policy and extract the
    /// payload from the decoded envelope.
    async fn execute<R, F>(
        &self,
        request: reqwest::Request,
        options: Option<&RequestOptions>,
        extract: F,
    ) -> Result<R>
    where
        F: Fn(&mut Envelope) -> Result<R>,
    {
        let retries = options
            .and_then(RequestOptions::retries)
            .unwrap_or(self.config.retry.max_retries);
        let method: Method = request.method().clone();
        let path = request.url().path().to_string();
        // A streaming body fails here, before any attempt is made.
        replay(&request)?;
        let (request, method, path, extract) = (&request, &method, &path, &extract);

        retry(&self.config.retry, retries, || async move {
            let attempt = replay(request)?;

            tracing::debug!(method = %method, path = %path, "sending request");

            let response = self.http.execute(attempt).await?;
            let status = response.status();
            let body = response.bytes().await?;

            tracing::debug!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                "received response"
            );

            let mut envelope = decode_envelope(status, &body)?;
            extract(&mut envelope)
        })
        .await
    }
}

/// Copy a prepared request for one attempt. Only buffered bodies can be copied.
fn replay(request: &reqwest::Request) -> Result<reqwest::Request> {
    request
        .try_clone()
        .ok_or_else(|| Error::InvalidInput("Request body cannot be replayed".to_string()))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::InvalidInput(format!("Invalid header value: {}", value)))
}

impl Clone for GoCardlessClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for GoCardlessClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoCardlessClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("config", &self.inner.config)
            .finish()
    }
}
