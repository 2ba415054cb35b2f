//! Bot commands and their handlers.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::warn;

use crate::context::BotContext;
use crate::dialog::{timezone_keyboard, PrefDialogue, PrefState};
use crate::HandlerResult;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "EcoHelper commands:")]
pub enum Command {
    #[command(description = "meet the bot")]
    Start,
    #[command(description = "choose when to receive your daily tip")]
    Tips,
    #[command(description = "stop receiving daily tips")]
    Stop,
    #[command(description = "what global warming is")]
    Globalwarming,
    #[command(description = "consequences of climate change")]
    What,
    #[command(description = "causes of climate change")]
    Why,
}

const START_TEXT: &str = "🍵 Hi, I'm EcoHelper 🕊️ — your personal eco assistant. \
I can tell you about global warming and what can be done about it, and every day \
I'll send you one simple tip. Ready to make the world a little greener? Use /tips to begin.";

const GLOBALWARMING_TEXT: &str = "🌍 Global warming is the rise of the average \
temperature of Earth's climate system. Learn more: /what";

const WHAT_TEXT: &str = "🔥 Consequences of climate change:\n\
- Severe droughts and water shortages\n\
- Rising sea levels\n\
- Catastrophic weather events\n\
- Loss of biodiversity\n\
Causes: /why";

const WHY_TEXT: &str = "📈 Main causes of global warming:\n\
1. Greenhouse gas emissions (CO2, methane)\n\
2. Burning fossil fuels\n\
3. Deforestation\n\
4. Industrial processes\n\
5. Landfills (they release methane)\n\n\
💡 Everyone can help — start small with /tips";

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: PrefDialogue,
    ctx: Arc<BotContext>,
) -> HandlerResult {
    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, START_TEXT).await?;
        }
        Command::Tips => {
            bot.send_message(msg.chat.id, "First, choose your timezone:")
                .reply_markup(timezone_keyboard())
                .await?;
            dialogue.update(PrefState::SelectingTimezone).await?;
        }
        Command::Stop => {
            let user_id = msg.chat.id.0.to_string();
            // Cancel first so an in-flight timer cannot observe the row
            // after we confirm; the fire-time re-check covers the rest.
            ctx.engine.cancel(&user_id);
            if let Err(e) = ctx.store.remove(&user_id) {
                warn!(%user_id, error = %e, "failed to remove preference");
                bot.send_message(msg.chat.id, "Something went wrong — please try again later.")
                    .await?;
                return Ok(());
            }
            // Clear any half-finished dialog; exit() errors when nothing is
            // stored, so check first.
            if dialogue.get().await?.is_some() {
                dialogue.exit().await?;
            }
            bot.send_message(
                msg.chat.id,
                "Daily tips are off. Come back any time with /tips.",
            )
            .await?;
        }
        Command::Globalwarming => {
            bot.send_message(msg.chat.id, GLOBALWARMING_TEXT).await?;
        }
        Command::What => {
            bot.send_message(msg.chat.id, WHAT_TEXT).await?;
        }
        Command::Why => {
            bot.send_message(msg.chat.id, WHY_TEXT).await?;
        }
    }
    Ok(())
}
