use thiserror::Error;

/// Errors from the preference store. Validation errors surface synchronously
/// to the preference-writing caller and never reach the scheduler.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Hour or minute out of range — rejected before anything is written.
    #[error("invalid time {hour:02}:{minute:02} (hour must be 0-23, minute 0-59)")]
    InvalidTime { hour: u8, minute: u8 },

    /// The timezone name does not resolve in the IANA database.
    #[error("unknown timezone: {0}")]
    InvalidTimezone(String),

    /// Underlying SQLite / rusqlite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
