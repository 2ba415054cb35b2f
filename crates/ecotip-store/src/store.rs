use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::types::ReminderPreference;

/// Shared handle to the reminder preference table.
///
/// All callers go through the same connection mutex, so conflicting writes to
/// one user serialize and the last `put` wins; a reader never observes a torn
/// row. Rows are independent per user — no cross-row transactions exist.
pub struct ReminderStore {
    db: Arc<Mutex<Connection>>,
}

impl ReminderStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    /// Validate and durably upsert a user's preference, replacing any prior
    /// row for the same user.
    pub fn put(&self, user_id: &str, hour: u8, minute: u8, timezone: &str) -> Result<()> {
        if hour > 23 || minute > 59 {
            return Err(StoreError::InvalidTime { hour, minute });
        }
        if timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(StoreError::InvalidTimezone(timezone.to_string()));
        }

        let conn = self.db.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO reminders (user_id, hour, minute, timezone)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![user_id, hour, minute, timezone],
        )?;
        debug!(user_id, hour, minute, timezone, "preference stored");
        Ok(())
    }

    pub fn get(&self, user_id: &str) -> Result<Option<ReminderPreference>> {
        let conn = self.db.lock().unwrap();
        let pref = conn
            .query_row(
                "SELECT user_id, hour, minute, timezone FROM reminders WHERE user_id = ?1",
                [user_id],
                |row| {
                    Ok(ReminderPreference {
                        user_id: row.get(0)?,
                        hour: row.get(1)?,
                        minute: row.get(2)?,
                        timezone: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(pref)
    }

    /// Remove a user's preference. Idempotent — removing an absent user is
    /// not an error.
    pub fn remove(&self, user_id: &str) -> Result<()> {
        let conn = self.db.lock().unwrap();
        let n = conn.execute("DELETE FROM reminders WHERE user_id = ?1", [user_id])?;
        debug!(user_id, removed = n > 0, "preference removed");
        Ok(())
    }

    /// All stored preferences, for recovery. Rows whose integer columns do
    /// not fit the preference type are skipped with a warning so one corrupt
    /// row cannot block recovery of the rest.
    pub fn list_all(&self) -> Result<Vec<ReminderPreference>> {
        let conn = self.db.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT user_id, hour, minute, timezone FROM reminders")?;
        let prefs = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .filter_map(|r| {
                let (user_id, hour, minute, timezone) = r.ok()?;
                let (Ok(hour), Ok(minute)) = (u8::try_from(hour), u8::try_from(minute)) else {
                    warn!(%user_id, hour, minute, "skipping malformed reminder row");
                    return None;
                };
                Some(ReminderPreference {
                    user_id,
                    hour,
                    minute,
                    timezone,
                })
            })
            .collect();
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    fn test_store() -> ReminderStore {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        ReminderStore::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = test_store();
        store.put("42", 8, 30, "Europe/Moscow").unwrap();

        let pref = store.get("42").unwrap().unwrap();
        assert_eq!(pref.user_id, "42");
        assert_eq!(pref.hour, 8);
        assert_eq!(pref.minute, 30);
        assert_eq!(pref.timezone, "Europe/Moscow");
    }

    #[test]
    fn put_replaces_prior_row() {
        let store = test_store();
        store.put("42", 8, 0, "Europe/Moscow").unwrap();
        store.put("42", 18, 15, "Asia/Tokyo").unwrap();

        let pref = store.get("42").unwrap().unwrap();
        assert_eq!((pref.hour, pref.minute), (18, 15));
        assert_eq!(pref.timezone, "Asia/Tokyo");
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn out_of_range_time_is_rejected_and_keeps_prior_value() {
        let store = test_store();
        store.put("42", 8, 0, "Europe/Moscow").unwrap();

        let err = store.put("42", 24, 0, "Europe/Moscow").unwrap_err();
        assert!(matches!(err, StoreError::InvalidTime { hour: 24, .. }));
        let err = store.put("42", 12, 60, "Europe/Moscow").unwrap_err();
        assert!(matches!(err, StoreError::InvalidTime { minute: 60, .. }));

        // The rejected writes must not have touched the stored row.
        let pref = store.get("42").unwrap().unwrap();
        assert_eq!((pref.hour, pref.minute), (8, 0));
    }

    #[test]
    fn unresolvable_timezone_is_rejected() {
        let store = test_store();
        let err = store.put("42", 8, 0, "Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, StoreError::InvalidTimezone(_)));
        assert!(store.get("42").unwrap().is_none());
    }

    #[test]
    fn remove_is_idempotent() {
        let store = test_store();
        store.remove("absent").unwrap();

        store.put("42", 8, 0, "Europe/London").unwrap();
        store.remove("42").unwrap();
        assert!(store.get("42").unwrap().is_none());
        store.remove("42").unwrap();
    }

    #[test]
    fn list_all_returns_every_row() {
        let store = test_store();
        store.put("1", 8, 0, "Europe/Moscow").unwrap();
        store.put("2", 12, 0, "Europe/London").unwrap();
        store.put("3", 23, 59, "America/New_York").unwrap();

        let mut users: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|p| p.user_id)
            .collect();
        users.sort();
        assert_eq!(users, ["1", "2", "3"]);
    }

    #[test]
    fn list_all_skips_rows_with_out_of_type_columns() {
        let store = test_store();
        store.put("good", 9, 0, "Asia/Tokyo").unwrap();
        {
            let conn = store.db.lock().unwrap();
            conn.execute(
                "INSERT INTO reminders (user_id, hour, minute, timezone)
                 VALUES ('bad', 300, 0, 'Asia/Tokyo')",
                [],
            )
            .unwrap();
        }

        let prefs = store.list_all().unwrap();
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].user_id, "good");
    }
}
