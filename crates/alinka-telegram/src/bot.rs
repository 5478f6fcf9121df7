//! Main Telegram bot implementation.

use std::sync::Arc;

use alinka_core::{
    BotConfig, GeminiClient, HuggingFaceTransport, ImageClient, MessageRouter, SessionStore,
};
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use tracing::{error, info, warn};

use crate::error::{Result, TelegramError};
use crate::handlers::{handle_command, handle_message, Command};
use crate::health;

/// The Alinka Telegram bot.
pub struct AlinkaBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Router shared across handlers.
    router: Arc<MessageRouter>,
    /// Health server port.
    port: u16,
}

impl AlinkaBot {
    /// Create a bot wired to the Gemini and Hugging Face backends.
    pub fn new(config: &BotConfig) -> Self {
        let router = MessageRouter::new(
            Arc::new(SessionStore::new()),
            Arc::new(GeminiClient::from_config(config)),
            ImageClient::new(Arc::new(HuggingFaceTransport::from_config(config))),
        );
        Self::with_router(Bot::new(&config.telegram_token), Arc::new(router), config.port)
    }

    /// Create a bot around an existing router (custom backends).
    pub fn with_router(bot: Bot, router: Arc<MessageRouter>, port: u16) -> Self {
        Self { bot, router, port }
    }

    /// Health server port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Start the health server and long-poll Telegram until Ctrl+C.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        let port = self.port;
        tokio::spawn(async move {
            if let Err(e) = health::serve(port).await {
                error!(port, error = %e, "Health server stopped");
            }
        });

        let router_for_commands = Arc::clone(&self.router);
        let router_for_messages = Arc::clone(&self.router);

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let router = Arc::clone(&router_for_commands);
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, router).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| msg.text().is_some())
                    .endpoint(move |bot: Bot, msg: Message| {
                        let router = Arc::clone(&router_for_messages);
                        info!(chat_id = %msg.chat.id, "Text message received");
                        async move { handle_message(bot, msg, router).await }
                    }),
            );

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|upd| async move {
                warn!("Unhandled update: {:?}", upd.kind);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Bot stopped");
        Ok(())
    }
}
