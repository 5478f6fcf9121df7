//! Chat completion client for the Gemini API.
//!
//! The router only sees the [`CompletionClient`] trait: given the prior turns
//! of a chat and a new user message, produce the model's reply. The
//! production implementation talks to Gemini's `generateContent` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::session::{Role, Turn};

/// Gemini REST API base.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Something that can continue a conversation.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Produce the model's reply to `text`, given the earlier `history`.
    async fn complete(&self, history: &[Turn], text: &str) -> Result<String>;
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client for `model`.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Create a client from resolved configuration.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(&config.google_api_key, &config.gemini_model)
    }

    /// Point the client at a different API base (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model this client sends requests to.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, history: &[Turn], text: &str) -> Result<String> {
        let request = GenerateContentRequest::from_turns(history, text);
        trace!("Sending generateContent request: {:?}", request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::CompletionStatus {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BotError::ResponseParse(e.to_string()))?;

        let reply = response.into_text()?;
        debug!(model = %self.model, chars = reply.len(), "Completion received");
        Ok(reply)
    }
}

/// `generateContent` request body.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Conversation so far, ending with the new user message.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Build a request from prior turns plus the new user message.
    pub fn from_turns(history: &[Turn], text: &str) -> Self {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content::text(turn.role, &turn.text))
            .collect();
        contents.push(Content::text(Role::User, text));
        Self { contents }
    }
}

/// One message in Gemini's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Message parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Single text part from the given role.
    pub fn text(role: Role, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

/// A content part. Only text parts are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// `generateContent` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Present when the prompt itself was rejected.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<Content>,

    /// Why generation stopped (`STOP`, `SAFETY`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn into_text(self) -> Result<String> {
        let block_reason = self
            .prompt_feedback
            .and_then(|f| f.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(BotError::EmptyCompletion(
                block_reason.unwrap_or_else(|| "no candidates".to_string()),
            ));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(BotError::EmptyCompletion(
                candidate
                    .finish_reason
                    .unwrap_or_else(|| "empty content".to_string()),
            ));
        }

        Ok(text)
    }
}
