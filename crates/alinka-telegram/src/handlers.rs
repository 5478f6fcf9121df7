//! Command and message handlers for the Telegram bot.

use std::sync::Arc;

use alinka_core::MessageRouter;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::transport::{incoming_from, TelegramMessenger};

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and clear memory")]
    Start,

    #[command(description = "Show the welcome message and keyboard")]
    Help,
}

/// Handle a recognized command.
///
/// `/start` and `/help` behave identically: fresh memory, welcome, keyboard.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    router: Arc<MessageRouter>,
) -> ResponseResult<()> {
    let Some(incoming) = incoming_from(&msg) else {
        return Ok(());
    };
    debug!(chat_id = %msg.chat.id, command = ?cmd, "Command received");

    let messenger = TelegramMessenger::new(bot);
    if let Err(e) = router.handle_start(&incoming, &messenger).await {
        warn!(chat_id = %msg.chat.id, error = %e, "Failed to send welcome");
    }
    Ok(())
}

/// Handle a regular text message.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    router: Arc<MessageRouter>,
) -> ResponseResult<()> {
    let Some(incoming) = incoming_from(&msg) else {
        return Ok(());
    };

    let messenger = TelegramMessenger::new(bot);
    match router.handle_message(&incoming, &messenger).await {
        Ok(outcome) => {
            info!(chat_id = %msg.chat.id, outcome = ?outcome, "Message handled");
        }
        Err(e) => {
            // Even the error reply failed; nothing more to tell the user.
            warn!(chat_id = %msg.chat.id, error = %e, "Failed to deliver reply");
        }
    }
    Ok(())
}
