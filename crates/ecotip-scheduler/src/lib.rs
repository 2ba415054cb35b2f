//! `ecotip-scheduler` — per-user daily reminder timers.
//!
//! # Overview
//!
//! The [`engine::ScheduleEngine`] owns one tokio timer task per subscribed
//! user. Each task sleeps until the next occurrence of the user's chosen
//! (hour, minute) in the user's own timezone, delivers that day's tip, and
//! re-arms for the following day. Recomputing every day's fire instant from
//! wall-clock rules is what makes the cadence drift-free: daylight-saving
//! transitions are absorbed instead of accumulating.
//!
//! Timers are transient. Durable state lives only in
//! [`ecotip_store::ReminderStore`], from which [`recovery::recover_all`]
//! rebuilds every timer at process start.

pub mod engine;
pub mod error;
pub mod recovery;
pub mod schedule;

pub use engine::ScheduleEngine;
pub use error::{Result, SchedulerError};
pub use recovery::{recover_all, RecoveryReport};
pub use schedule::next_occurrence;
