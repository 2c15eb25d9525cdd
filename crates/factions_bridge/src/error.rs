use host_event_system::EventError;
use native_factions::NativeError;

/// Errors raised by the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No registry entry matches an installed plugin
    #[error("No supported factions plugin is installed")]
    NoProvider,
    #[error("Already connected to {0}")]
    AlreadyConnected(String),
    /// The active provider has no implementation of this operation
    #[error("{operation} is not supported by {provider}")]
    Unsupported {
        provider: String,
        operation: &'static str,
    },
    /// A lookup or probe the adapter depends on failed
    #[error("{adapter}::{operation} failed: {reason}")]
    MethodError {
        adapter: &'static str,
        operation: &'static str,
        reason: String,
    },
    /// A unified object from one provider was handed to another provider's adapter
    #[error("Expected an object from {expected}, got one from {found}")]
    CrossProvider { expected: String, found: String },
    #[error("The bridge is not connected")]
    NotConnected,
    #[error("A faction named {0} already exists")]
    FactionExists(String),
    #[error("Native plugin error: {0}")]
    Native(#[from] NativeError),
    #[error("Event bus error: {0}")]
    Event(#[from] EventError),
}

impl BridgeError {
    /// `false` for faults that indicate a bug in the caller or the adapter
    /// rather than a state of the server.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            BridgeError::CrossProvider { .. } | BridgeError::MethodError { .. }
        )
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(BridgeError::NoProvider.is_recoverable());
        assert!(BridgeError::Unsupported {
            provider: "x".into(),
            operation: "points"
        }
        .is_recoverable());
        assert!(!BridgeError::CrossProvider {
            expected: "a".into(),
            found: "b".into()
        }
        .is_recoverable());
        assert!(BridgeError::from(NativeError::Cancelled("land_claim")).is_recoverable());
    }
}
