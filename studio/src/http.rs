//! HTTP client shared by the generation and attribution services.

use std::time::Duration;

use reqwest::{
    Client as ReqwestClient, Method, Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, de::DeserializeOwned, Serialize};

use super::error::{Error, Result};

const USER_AGENT_VALUE: &str = "pictor-studio-rust/1.0";

/// HTTP client bound to one upstream endpoint.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    api_key: Option<String>,
    max_retries: u32,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// When `api_key` is `None` no `Authorization` header is sent.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
            max_retries,
        })
    }

    /// Returns the endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes an HTTP request to the API with retry support.
    pub async fn request<T, R>(&self, method: Method, path: &str, body: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let backoff = Duration::from_secs(1 << (attempt - 1));
                tracing::debug!(attempt, ?backoff, "retrying request");
                tokio::time::sleep(backoff).await;
            }

            match self.do_request(method.clone(), path, body).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if e.is_retryable() {
                        last_err = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Other("max retries exceeded".to_string())))
    }

    /// Performs a single HTTP request.
    async fn do_request<T, R>(&self, method: Method, path: &str, body: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "sending request");

        let mut request = self
            .client
            .request(method, &url)
            .headers(self.default_headers()?);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Returns default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .map_err(|e| Error::Config(format!("api key is not a valid header: {}", e)))?,
            );
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Handles the API response.
    async fn handle_response<R>(&self, response: Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(parse_error(&body, status.as_u16()));
        }

        serde_json::from_slice(&body).map_err(Error::from)
    }
}

/// Error envelope used by OpenAI-compatible APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

/// Parses an error response body.
fn parse_error(body: &[u8], status: u16) -> Error {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        let code = match envelope.error.code {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        return Error::api_with_type(
            status,
            envelope.error.message,
            envelope.error.error_type.unwrap_or_default(),
            code,
        );
    }

    Error::api(status, String::from_utf8_lossy(body).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_openai_error() {
        let body = br#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        match parse_error(body, 401) {
            Error::Api {
                status,
                message,
                error_type,
                code,
            } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
                assert_eq!(error_type, "invalid_request_error");
                assert_eq!(code, "invalid_api_key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_plain_error() {
        let err = parse_error(b"upstream exploded", 502);
        assert!(err.is_server_error());
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[test]
    fn test_parse_null_code() {
        let body = br#"{"error":{"message":"Rate limit reached","type":"requests","code":null}}"#;
        let err = parse_error(body, 429);
        assert!(err.is_rate_limit());
        match err {
            Error::Api { code, .. } => assert!(code.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_headers_without_key() {
        let http = HttpClient::new(
            "http://localhost".to_string(),
            None,
            Duration::from_secs(1),
            0,
        )
        .unwrap();
        let headers = http.default_headers().unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(USER_AGENT).unwrap(), USER_AGENT_VALUE);
    }

    #[test]
    fn test_headers_with_key() {
        let http = HttpClient::new(
            "http://localhost".to_string(),
            Some("sk-test".to_string()),
            Duration::from_secs(1),
            0,
        )
        .unwrap();
        let headers = http.default_headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer sk-test");
    }
}
