//! The preference dialog: timezone first, then a delivery time.
//!
//! Only a completed dialog touches the store; a rejected input re-prompts
//! and leaves any previously stored preference untouched.

use std::sync::Arc;

use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;

use ecotip_store::StoreError;

use crate::context::BotContext;
use crate::HandlerResult;

/// Conversation state, keyed by chat. Lives in teloxide's in-memory dialogue
/// storage; nothing here survives a restart (the durable preference does).
#[derive(Clone, Default)]
pub enum PrefState {
    #[default]
    Idle,
    SelectingTimezone,
    SelectingTime {
        timezone: String,
    },
    AwaitingCustomTime {
        timezone: String,
    },
}

pub type PrefDialogue = Dialogue<PrefState, InMemStorage<PrefState>>;

/// Timezone presets offered in the dialog. Any IANA name typed by other
/// front ends is accepted by the store; these are just the buttons.
const TIMEZONE_PRESETS: &[(&str, &str)] = &[
    ("Moscow (UTC+3)", "Europe/Moscow"),
    ("London (UTC+1)", "Europe/London"),
    ("New York (UTC-4)", "America/New_York"),
    ("Tokyo (UTC+9)", "Asia/Tokyo"),
];

pub fn timezone_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        TIMEZONE_PRESETS
            .iter()
            .map(|(label, tz)| vec![InlineKeyboardButton::callback(*label, format!("tz:{tz}"))]),
    )
}

fn time_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("08:00", "time:8:0"),
            InlineKeyboardButton::callback("12:00", "time:12:0"),
            InlineKeyboardButton::callback("18:00", "time:18:0"),
        ],
        vec![InlineKeyboardButton::callback("Another time", "time:custom")],
    ])
}

/// Parse a `time:H:M` callback payload.
fn parse_time_callback(data: &str) -> Option<(u8, u8)> {
    let rest = data.strip_prefix("time:")?;
    let (h, m) = rest.split_once(':')?;
    Some((h.parse().ok()?, m.parse().ok()?))
}

/// Parse user-typed `HH:MM`. Range checking is the store's job; this only
/// rejects things that are not two numbers around a colon.
fn parse_hhmm(text: &str) -> Option<(u8, u8)> {
    let (h, m) = text.trim().split_once(':')?;
    Some((h.trim().parse().ok()?, m.trim().parse().ok()?))
}

/// Inline-keyboard presses for both dialog steps.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: PrefDialogue,
    state: PrefState,
    ctx: Arc<BotContext>,
) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;
    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        return Ok(());
    };
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    match state {
        PrefState::SelectingTimezone => {
            if let Some(tz) = data.strip_prefix("tz:") {
                bot.send_message(chat_id, "Now pick a time for your daily tip:")
                    .reply_markup(time_keyboard())
                    .await?;
                dialogue
                    .update(PrefState::SelectingTime {
                        timezone: tz.to_string(),
                    })
                    .await?;
            }
        }
        PrefState::SelectingTime { timezone } => {
            if data == "time:custom" {
                bot.send_message(chat_id, "Type a time as HH:MM (for example, 09:30).")
                    .await?;
                dialogue
                    .update(PrefState::AwaitingCustomTime { timezone })
                    .await?;
            } else if let Some((hour, minute)) = parse_time_callback(data) {
                if complete_subscription(&bot, chat_id, &ctx, hour, minute, &timezone).await? {
                    dialogue.exit().await?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Free-text `HH:MM` input while the dialog is waiting for a custom time.
pub async fn handle_custom_time(
    bot: Bot,
    msg: Message,
    dialogue: PrefDialogue,
    timezone: String,
    ctx: Arc<BotContext>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    match parse_hhmm(text) {
        None => {
            bot.send_message(
                msg.chat.id,
                "⛔ That doesn't look like a time. Type it as HH:MM (for example, 09:30).",
            )
            .await?;
        }
        Some((hour, minute)) => {
            if complete_subscription(&bot, msg.chat.id, &ctx, hour, minute, &timezone).await? {
                dialogue.exit().await?;
            }
        }
    }
    Ok(())
}

/// Store the preference and arm the timer. Returns true when the
/// subscription is in place; false re-prompts without leaving the dialog.
async fn complete_subscription(
    bot: &Bot,
    chat_id: ChatId,
    ctx: &BotContext,
    hour: u8,
    minute: u8,
    timezone: &str,
) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    let user_id = chat_id.0.to_string();
    match ctx.store.put(&user_id, hour, minute, timezone) {
        Ok(()) => {}
        Err(StoreError::InvalidTime { .. }) => {
            bot.send_message(
                chat_id,
                "⛔ That time is out of range — hours go 0-23 and minutes 0-59. Try again.",
            )
            .await?;
            return Ok(false);
        }
        Err(StoreError::InvalidTimezone(tz)) => {
            bot.send_message(chat_id, format!("⛔ I don't know the timezone {tz}. Try again."))
                .await?;
            return Ok(false);
        }
        Err(e) => {
            warn!(%user_id, error = %e, "preference write failed");
            bot.send_message(chat_id, "Something went wrong — please try again later.")
                .await?;
            return Ok(false);
        }
    }

    if let Err(e) = ctx.engine.arm(&user_id) {
        // The row is stored; recovery will pick it up even if arming failed.
        warn!(%user_id, error = %e, "failed to arm reminder after preference write");
    }

    bot.send_message(
        chat_id,
        format!("✅ Great! I'll send you a tip every day at {hour:02}:{minute:02} ({timezone})."),
    )
    .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_callback_parses_presets() {
        assert_eq!(parse_time_callback("time:8:0"), Some((8, 0)));
        assert_eq!(parse_time_callback("time:18:0"), Some((18, 0)));
        assert_eq!(parse_time_callback("time:custom"), None);
        assert_eq!(parse_time_callback("tz:Europe/Moscow"), None);
    }

    #[test]
    fn hhmm_accepts_plain_times() {
        assert_eq!(parse_hhmm("09:30"), Some((9, 30)));
        assert_eq!(parse_hhmm(" 9:5 "), Some((9, 5)));
        assert_eq!(parse_hhmm("23:59"), Some((23, 59)));
    }

    #[test]
    fn hhmm_rejects_garbage() {
        assert_eq!(parse_hhmm("morning"), None);
        assert_eq!(parse_hhmm("9.30"), None);
        assert_eq!(parse_hhmm("9:"), None);
        assert_eq!(parse_hhmm(":30"), None);
        assert_eq!(parse_hhmm("-1:30"), None);
    }

    #[test]
    fn out_of_range_is_left_to_the_store() {
        // 25:61 parses here; the store's validation produces the specific
        // user-facing rejection.
        assert_eq!(parse_hhmm("25:61"), Some((25, 61)));
    }

    #[test]
    fn preset_timezones_all_resolve() {
        for (_, tz) in TIMEZONE_PRESETS {
            assert!(tz.parse::<chrono_tz::Tz>().is_ok(), "preset {tz} must resolve");
        }
    }
}
