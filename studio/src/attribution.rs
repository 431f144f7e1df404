//! Attribution lookup service.
//!
//! Attribution is supplementary: a failed lookup is logged and reported as an
//! empty list so the image can still be shown.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{error::Result, http::HttpClient};

/// Anything that can look up attribution guesses for an image.
#[async_trait]
pub trait AttributionLookup: Send + Sync {
    /// Returns attribution entries for `image_url`, or an empty list when
    /// none are available.
    async fn lookup(&self, image_url: &str) -> Vec<AttributionEntry>;
}

/// Attribution lookup service.
pub struct AttributionService {
    http: Arc<HttpClient>,
}

impl AttributionService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Looks up attribution entries, returning any failure to the caller.
    pub async fn try_lookup(&self, image_url: &str) -> Result<Vec<AttributionEntry>> {
        #[derive(Serialize)]
        struct ApiRequest<'a> {
            image_url: &'a str,
        }

        #[derive(Deserialize)]
        struct ApiResponse {
            #[serde(default)]
            data: Vec<AttributionEntry>,
        }

        let resp: ApiResponse = self
            .http
            .request(Method::POST, "", Some(&ApiRequest { image_url }))
            .await?;

        Ok(resp.data)
    }

    /// Looks up attribution entries. Failures yield an empty list.
    pub async fn lookup(&self, image_url: &str) -> Vec<AttributionEntry> {
        match self.try_lookup(image_url).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    endpoint = self.http.base_url(),
                    image_url,
                    error = %e,
                    "attribution lookup failed"
                );
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl AttributionLookup for AttributionService {
    async fn lookup(&self, image_url: &str) -> Vec<AttributionEntry> {
        AttributionService::lookup(self, image_url).await
    }
}

/// A candidate artist match for an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributionEntry {
    /// Artist name.
    pub name: String,

    /// Match percentage, 0-100.
    pub percentage: f64,
}

impl std::fmt::Display for AttributionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}%", self.name, self.percentage)
    }
}
