//! teloxide implementation of the core [`Messenger`] contract.

use alinka_core::{BotError, Button, ChatAction, IncomingMessage, Messenger};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatAction as TgChatAction, InputFile, KeyboardButton, KeyboardMarkup, MessageId,
    ReplyParameters,
};

/// Sends the router's output to Telegram.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    /// Wrap a teloxide bot.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// The two-row reply keyboard shown after `/start`.
pub fn menu_keyboard() -> KeyboardMarkup {
    let rows = Button::menu_rows().into_iter().map(|row| {
        row.into_iter()
            .map(|button| KeyboardButton::new(button.label()))
            .collect::<Vec<_>>()
    });
    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Convert a Telegram message into the router's input.
///
/// Returns `None` for messages without text.
pub fn incoming_from(msg: &Message) -> Option<IncomingMessage> {
    let text = msg.text()?;
    let sender_name = msg
        .from
        .as_ref()
        .map(|u| u.first_name.clone())
        .unwrap_or_default();
    Some(IncomingMessage::new(msg.chat.id.0, msg.id.0, sender_name, text))
}

fn delivery(e: teloxide::RequestError) -> BotError {
    BotError::Delivery(e.to_string())
}

fn tg_action(action: ChatAction) -> TgChatAction {
    match action {
        ChatAction::Typing => TgChatAction::Typing,
        ChatAction::UploadPhoto => TgChatAction::UploadPhoto,
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn reply(&self, to: &IncomingMessage, text: &str) -> alinka_core::Result<i32> {
        let sent = self
            .bot
            .send_message(ChatId(to.chat_id), text)
            .reply_parameters(ReplyParameters::new(MessageId(to.message_id)))
            .await
            .map_err(delivery)?;
        Ok(sent.id.0)
    }

    async fn reply_with_menu(&self, to: &IncomingMessage, text: &str) -> alinka_core::Result<i32> {
        let sent = self
            .bot
            .send_message(ChatId(to.chat_id), text)
            .reply_parameters(ReplyParameters::new(MessageId(to.message_id)))
            .reply_markup(menu_keyboard())
            .await
            .map_err(delivery)?;
        Ok(sent.id.0)
    }

    async fn send(&self, chat_id: i64, text: &str) -> alinka_core::Result<i32> {
        let sent = self
            .bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(delivery)?;
        Ok(sent.id.0)
    }

    async fn send_photo(&self, chat_id: i64, image: Vec<u8>, caption: &str) -> alinka_core::Result<()> {
        self.bot
            .send_photo(ChatId(chat_id), InputFile::memory(image).file_name("alinka.png"))
            .caption(caption)
            .await
            .map_err(delivery)?;
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: i64, action: ChatAction) -> alinka_core::Result<()> {
        self.bot
            .send_chat_action(ChatId(chat_id), tg_action(action))
            .await
            .map_err(delivery)?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> alinka_core::Result<()> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map_err(delivery)?;
        Ok(())
    }
}
