/// Counters kept by the event bus for monitoring.
#[derive(Debug, Clone, Default)]
pub struct EventSystemStats {
    /// Handlers currently registered across all keys
    pub total_handlers: usize,
    /// Events emitted, including those nobody listened to
    pub events_emitted: u64,
    /// Handler invocations that returned an error
    pub handler_failures: u64,
}
