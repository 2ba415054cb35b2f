use std::sync::Arc;

use ecotip_scheduler::ScheduleEngine;
use ecotip_store::ReminderStore;

/// Everything the Telegram handlers need, injected into the dispatcher's
/// dependency map. One instance per process.
pub struct BotContext {
    pub store: Arc<ReminderStore>,
    pub engine: ScheduleEngine,
}
