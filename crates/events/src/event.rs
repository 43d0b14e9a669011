use chrono::{DateTime, Utc};

use cmdcore_core::CommandId;

/// A fact about a command that has already happened.
///
/// Events never describe intent; by the time one exists the processor has
/// committed the change it reports.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "command.applied").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// The command this event is about.
    fn command_id(&self) -> CommandId;

    fn occurred_at(&self) -> DateTime<Utc>;
}
