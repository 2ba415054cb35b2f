use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use ecotip_core::{TipCatalog, TipSender};
use ecotip_store::ReminderStore;

use crate::error::{Result, SchedulerError};
use crate::schedule::next_occurrence;

/// A live timer for one user. Owned exclusively by the engine's map; the
/// generation stamp lets a superseded task detect that it no longer owns the
/// entry.
struct TimerHandle {
    generation: u64,
    fire_at: DateTime<Utc>,
    abort: AbortHandle,
}

/// The single scheduling authority: one timer task per subscribed user.
///
/// Arm/cancel/fire transitions for one user are serialized through the map
/// entry lock and the generation stamp; different users proceed
/// independently. Firing reads the store, never writes it.
#[derive(Clone)]
pub struct ScheduleEngine {
    store: Arc<ReminderStore>,
    catalog: Arc<TipCatalog>,
    sender: Arc<dyn TipSender>,
    timers: Arc<DashMap<String, TimerHandle>>,
    generation: Arc<AtomicU64>,
    delivery_timeout: Duration,
}

impl ScheduleEngine {
    pub fn new(
        store: Arc<ReminderStore>,
        catalog: Arc<TipCatalog>,
        sender: Arc<dyn TipSender>,
        delivery_timeout: Duration,
    ) -> Self {
        Self {
            store,
            catalog,
            sender,
            timers: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
            delivery_timeout,
        }
    }

    /// Install (or replace) the timer for `user_id` from its stored
    /// preference. Returns the computed fire instant.
    ///
    /// Replacement is atomic under the map entry lock: the prior timer is
    /// retired before the new handle is visible, so a user never has two
    /// live timers.
    pub fn arm(&self, user_id: &str) -> Result<DateTime<Utc>> {
        let pref = self
            .store
            .get(user_id)?
            .ok_or_else(|| SchedulerError::PreferenceNotFound {
                user_id: user_id.to_string(),
            })?;
        let tz: Tz = pref.timezone.parse().map_err(|_| {
            SchedulerError::InvalidPreference(format!(
                "timezone {} no longer resolves",
                pref.timezone
            ))
        })?;
        let fire_at = next_occurrence(pref.hour, pref.minute, tz, Utc::now()).ok_or_else(
            || {
                SchedulerError::InvalidPreference(format!(
                    "no next occurrence for {:02}:{:02}",
                    pref.hour, pref.minute
                ))
            },
        )?;

        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        // Gate the task so its first map access happens only after the
        // handle below is installed.
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel::<()>();
        let engine = self.clone();
        let owner = user_id.to_string();
        let task = tokio::spawn(async move {
            let _ = ready_rx.await;
            run_timer(engine, owner, generation).await;
        });

        let handle = TimerHandle {
            generation,
            fire_at,
            abort: task.abort_handle(),
        };
        match self.timers.entry(user_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let old = occupied.insert(handle);
                old.abort.abort();
            }
            Entry::Vacant(vacant) => {
                vacant.insert(handle);
            }
        }
        let _ = ready_tx.send(());

        debug!(user_id, %fire_at, tz = %pref.timezone, "timer armed");
        Ok(fire_at)
    }

    /// Retire the timer for `user_id` if present; no-op otherwise.
    pub fn cancel(&self, user_id: &str) {
        if let Some((_, handle)) = self.timers.remove(user_id) {
            handle.abort.abort();
            debug!(user_id, "timer cancelled");
        }
    }

    /// Whether a live timer exists for `user_id`.
    pub fn is_armed(&self, user_id: &str) -> bool {
        self.timers.contains_key(user_id)
    }

    /// Number of live timers across all users.
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// The next fire instant for `user_id`, if armed.
    pub fn fire_at(&self, user_id: &str) -> Option<DateTime<Utc>> {
        self.timers.get(user_id).map(|h| h.fire_at)
    }

    /// Record the next fire instant for a running timer task. Returns false
    /// when the task has been superseded or cancelled and must exit.
    fn note_fire_at(&self, user_id: &str, generation: u64, fire_at: DateTime<Utc>) -> bool {
        match self.timers.get_mut(user_id) {
            Some(mut handle) if handle.generation == generation => {
                handle.fire_at = fire_at;
                true
            }
            _ => false,
        }
    }
}

/// The per-user timer loop: sleep until the next local occurrence, deliver,
/// re-arm for the following day.
///
/// Every iteration re-reads the preference, so a change made without an
/// explicit re-arm is still picked up on the next cycle, and a removal ends
/// the loop. The loop exits silently when superseded by a newer generation.
async fn run_timer(engine: ScheduleEngine, user_id: String, generation: u64) {
    loop {
        let pref = match engine.store.get(&user_id) {
            Ok(Some(pref)) => pref,
            Ok(None) => {
                debug!(%user_id, "preference gone; timer exiting");
                break;
            }
            Err(e) => {
                warn!(%user_id, error = %e, "store read failed; timer exiting");
                break;
            }
        };
        let Ok(tz) = pref.timezone.parse::<Tz>() else {
            warn!(%user_id, timezone = %pref.timezone, "stored timezone no longer resolves; timer exiting");
            break;
        };
        let Some(fire_at) = next_occurrence(pref.hour, pref.minute, tz, Utc::now()) else {
            warn!(%user_id, hour = pref.hour, minute = pref.minute, "no next occurrence; timer exiting");
            break;
        };
        if !engine.note_fire_at(&user_id, generation, fire_at) {
            // A newer timer owns this user now.
            return;
        }

        sleep_until(fire_at).await;

        // Defensive re-check: the preference may have changed or vanished
        // while we slept. A removal abandons the fire; a change takes effect
        // on the next iteration's recomputation.
        match engine.store.get(&user_id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                info!(%user_id, "preference removed while timer was pending; abandoning fire");
                break;
            }
            Err(e) => {
                warn!(%user_id, error = %e, "store re-check failed; abandoning fire");
                break;
            }
        }

        let local_day = fire_at.with_timezone(&tz).date_naive();
        let tip = engine.catalog.tip_for(local_day);
        match tokio::time::timeout(engine.delivery_timeout, engine.sender.send(&user_id, tip))
            .await
        {
            Ok(Ok(())) => {
                info!(%user_id, day_of_year = local_day.ordinal(), "tip delivered")
            }
            Ok(Err(e)) => {
                warn!(%user_id, error = %e, "tip delivery failed; keeping schedule")
            }
            Err(_) => warn!(
                %user_id,
                timeout_secs = engine.delivery_timeout.as_secs(),
                "tip delivery timed out; keeping schedule"
            ),
        }
    }

    // Clean up our own entry, but never a successor's.
    engine
        .timers
        .remove_if(&user_id, |_, handle| handle.generation == generation);
}

async fn sleep_until(at: DateTime<Utc>) {
    let remaining = (at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
    tokio::time::sleep(remaining).await;
}
