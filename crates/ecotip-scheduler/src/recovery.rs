//! Startup recovery: rebuild every in-memory timer from durable storage.

use tracing::{debug, info, warn};

use ecotip_store::ReminderStore;

use crate::engine::ScheduleEngine;
use crate::error::Result;

/// Counts from one recovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryReport {
    pub armed: usize,
    pub skipped: usize,
}

/// Arm a timer for every stored preference. Called exactly once at process
/// start, before the dialog begins accepting preference writes.
///
/// Each row is an independent `arm` call on plain data; a row that cannot be
/// scheduled is logged and skipped so it cannot block recovery of the rest.
/// An empty store is a no-op.
pub fn recover_all(store: &ReminderStore, engine: &ScheduleEngine) -> Result<RecoveryReport> {
    let prefs = store.list_all()?;
    let mut armed = 0;
    let mut skipped = 0;

    for pref in prefs {
        match engine.arm(&pref.user_id) {
            Ok(fire_at) => {
                debug!(user_id = %pref.user_id, %fire_at, "reminder restored");
                armed += 1;
            }
            Err(e) => {
                warn!(user_id = %pref.user_id, error = %e, "skipping unrecoverable reminder row");
                skipped += 1;
            }
        }
    }

    info!(armed, skipped, "reminder recovery complete");
    Ok(RecoveryReport { armed, skipped })
}
