//! Telegram channel adapter.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` and drives the long-polling event
//! loop until the process exits. Long polling — no public URL required.

use std::sync::Arc;

use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use crate::commands::{self, Command};
use crate::context::BotContext;
use crate::dialog::{self, PrefState};

pub struct TelegramAdapter {
    bot: Bot,
    ctx: Arc<BotContext>,
}

impl TelegramAdapter {
    pub fn new(bot: Bot, ctx: Arc<BotContext>) -> Self {
        Self { bot, ctx }
    }

    /// Connect to Telegram and drive the long-polling loop.
    ///
    /// Never returns — runs for the lifetime of the process.
    pub async fn run(self) {
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "failed to publish command list");
        }

        info!("Telegram: starting long-polling dispatcher");

        let handler = dialogue::enter::<Update, InMemStorage<PrefState>, PrefState, _>()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(commands::handle_command),
            )
            .branch(Update::filter_callback_query().endpoint(dialog::handle_callback))
            .branch(
                Update::filter_message().branch(
                    dptree::case![PrefState::AwaitingCustomTime { timezone }]
                        .endpoint(dialog::handle_custom_time),
                ),
            );

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.ctx, InMemStorage::<PrefState>::new()])
            .default_handler(|_upd| async {})
            .build()
            .dispatch()
            .await;
    }
}
