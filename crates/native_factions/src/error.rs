use host_event_system::EventError;

/// Errors raised by the native plugin models.
#[derive(Debug, thiserror::Error)]
pub enum NativeError {
    #[error("A faction named {0} already exists")]
    FactionExists(String),
    #[error("Unknown faction: {0}")]
    UnknownFaction(String),
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
    #[error("{0} is a system faction")]
    SystemFaction(String),
    #[error("Player {player} already belongs to {faction}")]
    AlreadyMember { player: String, faction: String },
    #[error("Player {0} has no faction")]
    NoFaction(String),
    #[error("Chunk {0} is not claimed")]
    NotClaimed(String),
    #[error("Operation {0} is not available in this build")]
    NotAvailable(&'static str),
    /// A listener cancelled the event guarding this operation
    #[error("Event {0} was cancelled")]
    Cancelled(&'static str),
    #[error("Event bus error: {0}")]
    Bus(#[from] EventError),
}
