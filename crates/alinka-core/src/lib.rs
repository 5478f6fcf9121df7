//! Alinka Core - routing and upstream clients for the Alinka director bot.
//!
//! This crate holds everything that does not depend on Telegram itself:
//!
//! - **config**: Environment configuration (tokens, model, port)
//! - **session**: Per-chat conversation memory and its store
//! - **intent**: Button labels, director keywords and intent classification
//! - **prompts**: Fixed product texts and the director prompt template
//! - **completion**: Gemini chat completion client
//! - **image**: Hugging Face image generation with a fixed retry budget
//! - **messenger**: The contract a chat transport must fulfil
//! - **router**: Per-message orchestration of the above
//!
//! The Telegram binding lives in `alinka-telegram` and implements
//! [`Messenger`] on top of teloxide.

pub mod completion;
pub mod config;
pub mod error;
pub mod image;
pub mod intent;
pub mod messenger;
pub mod prompts;
pub mod router;
pub mod session;

pub use completion::{CompletionClient, GeminiClient};
pub use config::BotConfig;
pub use error::{BotError, ErrorKind, Result};
pub use image::{HuggingFaceTransport, ImageClient, ImageRequest, ImageResponse, ImageTransport, RetryPolicy};
pub use intent::{classify, route, Action, Button, Intent};
pub use messenger::{ChatAction, IncomingMessage, Messenger};
pub use router::{MessageRouter, Outcome};
pub use session::{ChatSession, Role, SessionHandle, SessionStore, Turn};
