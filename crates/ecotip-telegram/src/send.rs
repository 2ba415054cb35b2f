//! Outbound delivery over the Telegram transport.

use async_trait::async_trait;
use teloxide::prelude::*;

use ecotip_core::{DeliveryError, TipSender};

/// [`TipSender`] backed by a teloxide `Bot`. Cloning the `Bot` is cheap; the
/// scheduler holds this for the lifetime of the process.
pub struct BotSender {
    bot: Bot,
}

impl BotSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl TipSender for BotSender {
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), DeliveryError> {
        // Stored user ids are Telegram chat ids rendered as text.
        let chat_id: i64 = recipient_id
            .parse()
            .map_err(|_| DeliveryError::InvalidRecipient(recipient_id.to_string()))?;
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(())
    }
}
