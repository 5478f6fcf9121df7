//! Telegram bot interface for Alinka.
//!
//! This crate wires the [`alinka_core`] router to Telegram through teloxide
//! and runs the small health endpoint hosting platforms probe.
//!
//! # Features
//!
//! - Director mode: video concept + English visual prompt from Gemini, then an
//!   illustration from FLUX.1-dev
//! - Casual chat with per-chat memory
//! - Reply keyboard for switching modes and clearing memory
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
//! - `HF_API_URL`: Image model endpoint
//!
//! # Example
//!
//! ```no_run
//! use alinka_core::BotConfig;
//! use alinka_telegram::AlinkaBot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::from_env()?;
//!     let bot = AlinkaBot::new(&config);
//!     bot.start_polling().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start` - Welcome message, keyboard, fresh memory
//! - `/help` - Same as `/start`

pub mod bot;
pub mod error;
pub mod handlers;
pub mod health;
pub mod transport;

pub use bot::AlinkaBot;
pub use error::{Result, TelegramError};
pub use transport::TelegramMessenger;
