//! Pictor API client.

use std::{sync::Arc, time::Duration};

use super::{
    attribution::AttributionService,
    error::{Error, Result},
    http::HttpClient,
    image::ImageService,
};

/// Default image generation API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default attribution endpoint.
pub const DEFAULT_ATTRIBUTION_URL: &str = "http://localhost:8000/api/attribution";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default maximum number of retries. Requests are not retried unless asked.
pub const DEFAULT_MAX_RETRIES: u32 = 0;

/// Environment variables read by [`ClientBuilder::from_env`].
pub mod env {
    pub const API_KEY: &str = "PICTOR_API_KEY";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const BASE_URL: &str = "PICTOR_BASE_URL";
    pub const ATTRIBUTION_URL: &str = "PICTOR_ATTRIBUTION_URL";
}

/// Pictor API client.
///
/// Built once at startup and handed to whatever needs the services; there is
/// no global instance.
///
/// # Example
///
/// ```rust,no_run
/// use pictor_studio::{Client, GenerationRequest};
///
/// # async fn run() -> pictor_studio::Result<()> {
/// let client = Client::new("your-api-key")?;
/// let images = client.image().generate(&GenerationRequest::new("a red fox")).await?;
/// let credits = client.attribution().lookup(&images[0].url).await;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    images: Arc<HttpClient>,
    attribution: Arc<HttpClient>,
    config: ClientConfig,
}

/// Client configuration.
#[derive(Clone)]
struct ClientConfig {
    api_key: String,
    base_url: String,
    attribution_url: String,
}

impl Client {
    /// Creates a new client with default endpoints.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Returns the configured API key.
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Returns the configured image API base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the configured attribution endpoint.
    pub fn attribution_url(&self) -> &str {
        &self.config.attribution_url
    }

    /// Returns the image generation service.
    pub fn image(&self) -> ImageService {
        ImageService::new(self.images.clone())
    }

    /// Returns the attribution lookup service.
    pub fn attribution(&self) -> AttributionService {
        AttributionService::new(self.attribution.clone())
    }
}

/// Builder for creating a Pictor API client.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    attribution_url: String,
    timeout: Duration,
    max_retries: u32,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            attribution_url: DEFAULT_ATTRIBUTION_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Creates a builder from the process environment.
    ///
    /// A missing key leaves the builder with an empty key, which `build`
    /// rejects.
    pub fn from_env() -> Self {
        Self::new("").env_overrides(|key| std::env::var(key).ok())
    }

    /// Overrides settings with any non-blank variables found by `lookup`.
    ///
    /// `PICTOR_API_KEY` takes precedence over `OPENAI_API_KEY`.
    pub fn env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(env::API_KEY).or_else(|| get(env::OPENAI_API_KEY)) {
            self = self.api_key(key);
        }
        if let Some(url) = get(env::BASE_URL) {
            self = self.base_url(url);
        }
        if let Some(url) = get(env::ATTRIBUTION_URL) {
            self = self.attribution_url(url);
        }
        self
    }

    /// Replaces the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Sets a custom base URL for the image API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the attribution endpoint.
    pub fn attribution_url(mut self, url: impl Into<String>) -> Self {
        self.attribution_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of retries for transient errors.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Returns true if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(Error::Config("api_key must be non-empty".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url must be non-empty".to_string()));
        }

        let images = HttpClient::new(
            self.base_url.clone(),
            Some(self.api_key.clone()),
            self.timeout,
            self.max_retries,
        )?;
        let attribution = self.attribution_http()?;

        Ok(Client {
            images: Arc::new(images),
            attribution,
            config: ClientConfig {
                api_key: self.api_key,
                base_url: self.base_url,
                attribution_url: self.attribution_url,
            },
        })
    }

    /// Builds only the attribution service. No API key is needed.
    pub fn build_attribution(&self) -> Result<AttributionService> {
        Ok(AttributionService::new(self.attribution_http()?))
    }

    // The attribution endpoint is a third party; it never sees the key.
    fn attribution_http(&self) -> Result<Arc<HttpClient>> {
        if self.attribution_url.is_empty() {
            return Err(Error::Config("attribution_url must be non-empty".to_string()));
        }
        let http = HttpClient::new(
            self.attribution_url.clone(),
            None,
            self.timeout,
            self.max_retries,
        )?;
        Ok(Arc::new(http))
    }
}
