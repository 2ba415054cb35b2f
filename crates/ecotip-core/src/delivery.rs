//! The outbound delivery seam between the scheduler and the messaging
//! transport.
//!
//! The scheduler only ever sees this trait; the Telegram adapter provides the
//! production implementation and tests substitute a recording fake.

use async_trait::async_trait;

/// Failure of a single delivery attempt. Always non-fatal to scheduling:
/// the engine logs it and keeps the next day's timer.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The recipient id stored for the user cannot be used by the transport.
    #[error("invalid recipient id: {0}")]
    InvalidRecipient(String),

    /// The transport rejected or failed the send.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Sends one tip text to one recipient.
#[async_trait]
pub trait TipSender: Send + Sync {
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), DeliveryError>;
}
