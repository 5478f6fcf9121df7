//! Per-message orchestration.
//!
//! Each incoming text goes through:
//!
//! ```text
//! Start -> Classified -> CompletionRequested -> (ImageRequested) -> Delivered
//!                              \                      \
//!                               +-------> Errored <----+
//! ```
//!
//! The reset and director buttons short-circuit after classification.
//! Failures are contained per branch: director mode reports the error text
//! and keeps the conversation, casual chat silently starts a new
//! conversation and asks the user to repeat themselves.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::completion::CompletionClient;
use crate::error::{BotError, ErrorKind, Result};
use crate::image::{ImageClient, ImageRequest};
use crate::intent::{route, Action};
use crate::messenger::{ChatAction, IncomingMessage, Messenger};
use crate::prompts::{
    director_failure, director_prompt, truncate_chars, welcome, CASUAL_APOLOGY, DIRECTOR_INTRO,
    IMAGE_BUSY, IMAGE_CAPTION, MAX_REPLY_CHARS, MEMORY_CLEARED, PAINTING_STATUS,
};
use crate::session::SessionStore;

#[cfg(test)]
mod tests;

/// How a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `/start` or `/help`: memory cleared, welcome sent.
    Welcomed,
    /// Reset button: memory cleared.
    MemoryCleared,
    /// Director button alone: asked for an idea.
    DirectorIntro,
    /// Director request answered.
    Director {
        /// Whether an image reached the chat.
        image_delivered: bool,
    },
    /// Casual message answered.
    Casual,
    /// Director request failed; the error was reported.
    DirectorFailed(ErrorKind),
    /// Casual message failed; the conversation was restarted.
    CasualRecovered(ErrorKind),
}

/// Routes incoming messages to the completion and image backends.
pub struct MessageRouter {
    sessions: Arc<SessionStore>,
    completion: Arc<dyn CompletionClient>,
    images: ImageClient,
}

impl MessageRouter {
    /// Create a router over an existing session store.
    pub fn new(
        sessions: Arc<SessionStore>,
        completion: Arc<dyn CompletionClient>,
        images: ImageClient,
    ) -> Self {
        Self {
            sessions,
            completion,
            images,
        }
    }

    /// The session store this router reads and writes.
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Handle `/start` and `/help`.
    pub async fn handle_start(
        &self,
        msg: &IncomingMessage,
        messenger: &dyn Messenger,
    ) -> Result<Outcome> {
        self.sessions.reset(msg.chat_id);
        messenger
            .reply_with_menu(msg, &welcome(&msg.sender_name))
            .await?;
        info!(chat_id = msg.chat_id, user = %msg.sender_name, "User started bot");
        Ok(Outcome::Welcomed)
    }

    /// Handle a regular text message.
    ///
    /// Upstream failures are absorbed here. An `Err` means even the error
    /// reply could not be delivered.
    pub async fn handle_message(
        &self,
        msg: &IncomingMessage,
        messenger: &dyn Messenger,
    ) -> Result<Outcome> {
        match route(&msg.text) {
            Action::Reset => {
                self.sessions.replace(msg.chat_id);
                messenger.reply(msg, MEMORY_CLEARED).await?;
                info!(chat_id = msg.chat_id, "Memory cleared on request");
                Ok(Outcome::MemoryCleared)
            }
            Action::DirectorIntro => {
                messenger.reply(msg, DIRECTOR_INTRO).await?;
                Ok(Outcome::DirectorIntro)
            }
            Action::Director => match self.direct(msg, messenger).await {
                Ok(image_delivered) => Ok(Outcome::Director { image_delivered }),
                Err(e) => {
                    let kind = e.kind();
                    log_failure(msg.chat_id, "director", &e);
                    messenger.reply(msg, &director_failure(&e)).await?;
                    Ok(Outcome::DirectorFailed(kind))
                }
            },
            Action::Casual => match self.chat(msg, messenger).await {
                Ok(()) => Ok(Outcome::Casual),
                Err(e) => {
                    let kind = e.kind();
                    log_failure(msg.chat_id, "casual", &e);
                    self.sessions.replace(msg.chat_id);
                    messenger.reply(msg, CASUAL_APOLOGY).await?;
                    Ok(Outcome::CasualRecovered(kind))
                }
            },
        }
    }

    /// Director mode: concept text first, then an illustration.
    ///
    /// Returns whether an image was delivered.
    async fn direct(&self, msg: &IncomingMessage, messenger: &dyn Messenger) -> Result<bool> {
        let chat_id = msg.chat_id;
        messenger.send_chat_action(chat_id, ChatAction::Typing).await?;

        let reply = {
            let session = self.sessions.get_or_create(chat_id);
            let mut session = session.lock().await;
            session
                .send_message(self.completion.as_ref(), &director_prompt(&msg.text))
                .await?
        };

        match truncate_chars(&reply, MAX_REPLY_CHARS) {
            Some(cut) => {
                debug!(chat_id, chars = reply.chars().count(), "Director reply truncated");
                messenger.send(chat_id, cut).await?;
            }
            None => {
                messenger.reply(msg, &reply).await?;
            }
        }

        messenger
            .send_chat_action(chat_id, ChatAction::UploadPhoto)
            .await?;
        let status_id = messenger.send(chat_id, PAINTING_STATUS).await?;

        let image = match self.images.generate(&ImageRequest::styled(&msg.text)).await {
            Ok(image) => image,
            Err(e) => {
                // Status message would otherwise linger above the error reply.
                if let Err(cleanup) = messenger.delete_message(chat_id, status_id).await {
                    warn!(chat_id, error = %cleanup, "Failed to delete status message");
                }
                return Err(e);
            }
        };

        match image {
            Some(bytes) => {
                messenger.send_photo(chat_id, bytes, IMAGE_CAPTION).await?;
                messenger.delete_message(chat_id, status_id).await?;
                info!(chat_id, "Director concept and image delivered");
                Ok(true)
            }
            None => {
                messenger.delete_message(chat_id, status_id).await?;
                messenger.send(chat_id, IMAGE_BUSY).await?;
                info!(chat_id, "Director concept delivered without image");
                Ok(false)
            }
        }
    }

    /// Casual chat: one completion round trip, reply verbatim.
    async fn chat(&self, msg: &IncomingMessage, messenger: &dyn Messenger) -> Result<()> {
        messenger
            .send_chat_action(msg.chat_id, ChatAction::Typing)
            .await?;

        let reply = {
            let session = self.sessions.get_or_create(msg.chat_id);
            let mut session = session.lock().await;
            session
                .send_message(self.completion.as_ref(), &msg.text)
                .await?
        };

        messenger.reply(msg, &reply).await?;
        Ok(())
    }
}

fn log_failure(chat_id: i64, branch: &str, e: &BotError) {
    match e.kind() {
        ErrorKind::TransientUpstream => {
            warn!(chat_id, branch, kind = %e.kind(), error = %e, "Upstream temporarily unavailable")
        }
        ErrorKind::HardFailure | ErrorKind::Unknown => {
            error!(chat_id, branch, kind = %e.kind(), error = %e, "Message handling failed")
        }
    }
}
