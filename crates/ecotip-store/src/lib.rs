//! `ecotip-store` — durable reminder preferences in SQLite.
//!
//! One row per user: the hour, minute and IANA timezone at which that user
//! wants their daily tip. This table is the entire durable footprint of the
//! service; in-memory timers are rebuilt from it at every startup.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::ReminderStore;
pub use types::ReminderPreference;
