/// A user's stored delivery preference. At most one per user; a new write
/// fully replaces the prior value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPreference {
    /// Opaque stable recipient identifier (the Telegram chat id, as text).
    pub user_id: String,
    /// Local delivery hour, 0-23.
    pub hour: u8,
    /// Local delivery minute, 0-59.
    pub minute: u8,
    /// IANA timezone name, validated at write time.
    pub timezone: String,
}
