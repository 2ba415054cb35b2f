use thiserror::Error;

/// Errors that can occur within the scheduling subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// `arm` was called for a user with no stored preference. A caller
    /// error, not a user-facing condition.
    #[error("no stored preference for user: {user_id}")]
    PreferenceNotFound { user_id: String },

    /// A stored preference cannot be scheduled (e.g. its timezone no longer
    /// resolves). Recovery skips such rows.
    #[error("unschedulable preference: {0}")]
    InvalidPreference(String),

    /// Underlying store error.
    #[error(transparent)]
    Store(#[from] ecotip_store::StoreError),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
