//! Telegram channel adapter for the EcoTip service.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` and drives the long-polling event
//! loop until the process exits. The preference dialog writes to the store
//! and arms the scheduler; the scheduler delivers through [`BotSender`].

pub mod adapter;
pub mod commands;
pub mod context;
pub mod dialog;
pub mod send;

pub use adapter::TelegramAdapter;
pub use context::BotContext;
pub use send::BotSender;
pub use teloxide::Bot;

/// Handler result used across the dispatcher tree. Dialogue storage and
/// transport errors both bubble into the dispatcher's error handler.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
