//! Chat transport contract.
//!
//! The router never talks to Telegram directly. It receives an
//! [`IncomingMessage`] and answers through a [`Messenger`], which the
//! Telegram crate implements on top of teloxide.

use async_trait::async_trait;

use crate::error::Result;

/// A text message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Chat the message came from.
    pub chat_id: i64,
    /// Transport id of the message, used for replies.
    pub message_id: i32,
    /// Sender's display name.
    pub sender_name: String,
    /// Raw message text.
    pub text: String,
}

impl IncomingMessage {
    /// Create a new incoming message.
    pub fn new(
        chat_id: i64,
        message_id: i32,
        sender_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            chat_id,
            message_id,
            sender_name: sender_name.into(),
            text: text.into(),
        }
    }
}

/// Activity indicator shown in the chat header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    /// "typing..."
    Typing,
    /// "sending photo..."
    UploadPhoto,
}

/// Outgoing side of a chat transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Reply to `to`, quoting it. Returns the new message's id.
    async fn reply(&self, to: &IncomingMessage, text: &str) -> Result<i32>;

    /// Reply to `to` and attach the bot's reply keyboard.
    async fn reply_with_menu(&self, to: &IncomingMessage, text: &str) -> Result<i32>;

    /// Send a plain message to a chat. Returns the new message's id.
    async fn send(&self, chat_id: i64, text: &str) -> Result<i32>;

    /// Send an image with a caption.
    async fn send_photo(&self, chat_id: i64, image: Vec<u8>, caption: &str) -> Result<()>;

    /// Show an activity indicator.
    async fn send_chat_action(&self, chat_id: i64, action: ChatAction) -> Result<()>;

    /// Delete a message previously sent by the bot.
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()>;
}
