use rusqlite::Connection;

use crate::error::Result;

/// Initialise the reminders schema in `conn`. Idempotent — safe to run on
/// every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS reminders (
            user_id  TEXT    NOT NULL PRIMARY KEY,
            hour     INTEGER NOT NULL,
            minute   INTEGER NOT NULL,
            timezone TEXT    NOT NULL
        ) STRICT;
        ",
    )?;
    Ok(())
}
