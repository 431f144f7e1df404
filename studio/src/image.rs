//! Image generation service.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{
    error::{Error, Result},
    http::HttpClient,
};

/// Number of images requested per prompt.
pub const DEFAULT_IMAGE_COUNT: u32 = 4;

/// Size of each generated image.
pub const DEFAULT_IMAGE_SIZE: &str = "512x512";

const GENERATIONS_PATH: &str = "/v1/images/generations";

/// Anything that can turn a prompt into image URLs.
///
/// The session controller talks to the generation API through this trait so
/// tests can swap in a fake.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<ImageData>>;
}

/// Image generation service.
pub struct ImageService {
    http: Arc<HttpClient>,
}

impl ImageService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Generates images from a text prompt.
    ///
    /// The prompt must be non-empty after trimming; it is sent unchanged.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use pictor_studio::{Client, GenerationRequest};
    /// # async fn run(client: Client) -> pictor_studio::Result<()> {
    /// let request = GenerationRequest::new("a cat astronaut");
    /// let images = client.image().generate(&request).await?;
    /// println!("first image: {}", images[0].url);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<ImageData>> {
        #[derive(Deserialize)]
        struct ApiResponse {
            #[serde(default)]
            data: Vec<ImageData>,
        }

        if request.prompt.trim().is_empty() {
            return Err(Error::InvalidRequest("prompt must be non-empty".to_string()));
        }

        tracing::debug!(n = request.n, size = %request.size, "generating images");

        let resp: ApiResponse = self
            .http
            .request(Method::POST, GENERATIONS_PATH, Some(request))
            .await?;

        Ok(resp.data)
    }
}

#[async_trait]
impl ImageGenerator for ImageService {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<ImageData>> {
        ImageService::generate(self, request).await
    }
}

// ==================== Request/Response Types ====================

/// Request for image generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Image description.
    pub prompt: String,

    /// Number of images to generate.
    #[serde(default = "default_count")]
    pub n: u32,

    /// Image size as `WxH`.
    #[serde(default = "default_size")]
    pub size: String,
}

fn default_count() -> u32 {
    DEFAULT_IMAGE_COUNT
}

fn default_size() -> String {
    DEFAULT_IMAGE_SIZE.to_string()
}

impl GenerationRequest {
    /// Creates a request with the default count and size.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            n: DEFAULT_IMAGE_COUNT,
            size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }
}

/// A single generated (or directly supplied) image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// Image URL.
    pub url: String,
}

impl ImageData {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = GenerationRequest::new("a cat astronaut");
        assert_eq!(req.n, 4);
        assert_eq!(req.size, "512x512");

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"prompt": "a cat astronaut", "n": 4, "size": "512x512"})
        );
    }

    #[test]
    fn test_request_deserialize_fills_defaults() {
        let req: GenerationRequest = serde_json::from_str(r#"{"prompt":"a fox"}"#).unwrap();
        assert_eq!(req, GenerationRequest::new("a fox"));

        let req: GenerationRequest =
            serde_json::from_str(r#"{"prompt":"a fox","n":2,"size":"1024x1024"}"#).unwrap();
        assert_eq!(req.n, 2);
        assert_eq!(req.size, "1024x1024");
    }
}
