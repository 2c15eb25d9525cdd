/// Core EventSystem implementation
use crate::events::EventHandler;
use super::stats::EventSystemStats;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The host event bus.
///
/// Handlers are stored per event key in registration order. Emission clones
/// the handler list and releases the lock before running anything, so a
/// handler may itself emit or register without deadlocking.
pub struct EventSystem {
    /// Map of event keys to their registered handlers
    pub(super) handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    /// System statistics for monitoring
    pub(super) stats: RwLock<EventSystemStats>,
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem")
            .field("handlers", &"[handlers]")
            .field("stats", &"[stats]")
            .finish()
    }
}

impl EventSystem {
    /// Creates a new event system with no registered handlers.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            stats: RwLock::new(EventSystemStats::default()),
        }
    }

    /// Gets the current event system statistics
    pub async fn get_stats(&self) -> EventSystemStats {
        self.stats.read().await.clone()
    }

    /// Number of handlers registered for one key.
    pub async fn handler_count(&self, event_key: &str) -> usize {
        self.handlers
            .read()
            .await
            .get(event_key)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}
