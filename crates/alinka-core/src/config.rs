//! Environment configuration for the bot.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `GOOGLE_API_KEY`: Gemini API key
//! - `HUGGINGFACE_TOKEN`: Hugging Face inference token
//!
//! Optional:
//! - `PORT`: Health server port (default: 8080)
//! - `GEMINI_MODEL`: Completion model (default: gemini-2.5-flash)
//! - `HF_API_URL`: Image model endpoint (default: FLUX.1-dev)

use crate::error::{BotError, Result};

/// Environment variable for the Telegram bot token.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";

/// Environment variable for the Gemini API key.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Environment variable for the Hugging Face token.
pub const HUGGINGFACE_TOKEN_ENV: &str = "HUGGINGFACE_TOKEN";

/// Environment variable for the health server port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable for the completion model override.
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";

/// Environment variable for the image endpoint override.
pub const HF_API_URL_ENV: &str = "HF_API_URL";

/// Default health server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default completion model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default image model endpoint.
pub const DEFAULT_HF_API_URL: &str =
    "https://api-inference.huggingface.co/models/black-forest-labs/FLUX.1-dev";

/// Runtime configuration resolved from the environment.
#[derive(Clone)]
pub struct BotConfig {
    /// Telegram bot token.
    pub telegram_token: String,
    /// Gemini API key.
    pub google_api_key: String,
    /// Hugging Face bearer token.
    pub huggingface_token: String,
    /// Port for the health server.
    pub port: u16,
    /// Gemini model name.
    pub gemini_model: String,
    /// Image generation endpoint.
    pub hf_api_url: String,
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(BotError::MissingEnv(name))
        };
        let optional = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match optional(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| BotError::InvalidEnv {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            telegram_token: required(TELEGRAM_TOKEN_ENV)?,
            google_api_key: required(GOOGLE_API_KEY_ENV)?,
            huggingface_token: required(HUGGINGFACE_TOKEN_ENV)?,
            port,
            gemini_model: optional(GEMINI_MODEL_ENV)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            hf_api_url: optional(HF_API_URL_ENV).unwrap_or_else(|| DEFAULT_HF_API_URL.to_string()),
        })
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("telegram_token", &"***")
            .field("google_api_key", &"***")
            .field("huggingface_token", &"***")
            .field("port", &self.port)
            .field("gemini_model", &self.gemini_model)
            .field("hf_api_url", &self.hf_api_url)
            .finish()
    }
}
