//! Image generation through the Hugging Face inference API.
//!
//! Hosted models go to sleep when idle and answer `503` while loading. The
//! [`ImageClient`] waits those out with a fixed budget: at most
//! `max_attempts` requests, a constant `backoff` sleep after every `503`, no
//! jitter. Any other non-`200` status ends the attempt immediately. Both
//! outcomes surface as `Ok(None)`; only the log tells them apart.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::error::Result;
use crate::prompts::image_prompt;

/// Status the inference API returns while the model is loading.
const MODEL_LOADING_STATUS: u16 = 503;

/// Default number of requests before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default sleep after a loading response.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// Body of an image generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest {
    /// Full prompt, style suffix included.
    pub inputs: String,
}

impl ImageRequest {
    /// Use `prompt` as-is.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            inputs: prompt.into(),
        }
    }

    /// Build the request for a director idea, adding the house style.
    pub fn styled(user_text: &str) -> Self {
        Self::new(image_prompt(user_text))
    }
}

/// Raw answer from the image endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body: image bytes on success, usually JSON otherwise.
    pub body: Vec<u8>,
}

/// One round trip to an image generation endpoint.
#[async_trait]
pub trait ImageTransport: Send + Sync {
    /// Submit the request and return whatever came back.
    ///
    /// Non-success statuses are not errors here; only failing to get a
    /// response at all is.
    async fn post(&self, request: &ImageRequest) -> Result<ImageResponse>;
}

/// reqwest-backed transport for the Hugging Face inference API.
#[derive(Clone)]
pub struct HuggingFaceTransport {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HuggingFaceTransport {
    /// Create a transport for the model at `url`.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token: token.into(),
        }
    }

    /// Create a transport from resolved configuration.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(&config.hf_api_url, &config.huggingface_token)
    }
}

#[async_trait]
impl ImageTransport for HuggingFaceTransport {
    async fn post(&self, request: &ImageRequest) -> Result<ImageResponse> {
        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(ImageResponse { status, body })
    }
}

/// Fixed retry budget for model warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of requests.
    pub max_attempts: u32,
    /// Sleep after each loading response.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

/// Image generator with warm-up retries.
#[derive(Clone)]
pub struct ImageClient {
    transport: Arc<dyn ImageTransport>,
    policy: RetryPolicy,
}

impl ImageClient {
    /// Create a client with the default retry policy.
    pub fn new(transport: Arc<dyn ImageTransport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current retry policy.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Generate an image.
    ///
    /// Returns `Ok(Some(bytes))` on success and `Ok(None)` when the model
    /// stayed unavailable or rejected the request. Transport failures are
    /// returned as errors.
    pub async fn generate(&self, request: &ImageRequest) -> Result<Option<Vec<u8>>> {
        let mut attempts = 0;

        while attempts < self.policy.max_attempts {
            let response = self.transport.post(request).await?;

            match response.status {
                200 => {
                    debug!(bytes = response.body.len(), attempts = attempts + 1, "Image generated");
                    return Ok(Some(response.body));
                }
                MODEL_LOADING_STATUS => {
                    attempts += 1;
                    info!(
                        attempt = attempts,
                        max_attempts = self.policy.max_attempts,
                        "Image model loading, waiting {:?}",
                        self.policy.backoff
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                }
                status => {
                    warn!(
                        status,
                        body = %String::from_utf8_lossy(&response.body),
                        "Image generation failed"
                    );
                    return Ok(None);
                }
            }
        }

        warn!(attempts, "Image model still loading, giving up");
        Ok(None)
    }
}
