/// Event emission methods
use crate::events::{Event, EventError};
use super::core::EventSystem;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::{debug, error, warn};

impl EventSystem {
    /// Emits a core host event to all registered handlers.
    ///
    /// # Arguments
    ///
    /// * `event_name` - Name of the core event
    /// * `event` - The event, shared with every handler
    pub async fn emit_core<T>(&self, event_name: &str, event: Arc<T>) -> Result<(), EventError>
    where
        T: Event,
    {
        let event_key = format!("core:{event_name}");
        self.emit_event(&event_key, event).await
    }

    /// Emits a plugin event to all registered handlers.
    ///
    /// Returns once every handler has run. Handler failures are logged and
    /// counted but never reach the emitter: one broken listener must not stop
    /// the plugin that published the event.
    ///
    /// # Arguments
    ///
    /// * `plugin_name` - Name the publishing plugin is installed under
    /// * `event_name` - The event name within that plugin's namespace
    /// * `event` - The event, shared with every handler
    ///
    /// # Returns
    ///
    /// `Ok(())` after the last handler returned, whether or not any handler
    /// was registered. A cancellable event carries the handlers' decision in
    /// its [`CancelFlag`](crate::CancelFlag) at that point.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use host_event_system::{CancelFlag, EventError, EventSystem, NativeEvent};
    /// use std::sync::Arc;
    ///
    /// #[derive(Debug, Default)]
    /// struct LandClaim {
    ///     cancel: CancelFlag,
    /// }
    ///
    /// impl NativeEvent for LandClaim {
    ///     fn event_name(&self) -> &'static str {
    ///         "land_claim"
    ///     }
    ///
    ///     fn cancel_flag(&self) -> Option<&CancelFlag> {
    ///         Some(&self.cancel)
    ///     }
    /// }
    ///
    /// # async fn demo(events: &EventSystem) -> Result<(), EventError> {
    /// let claim = Arc::new(LandClaim::default());
    /// events.emit_plugin("Factions", "land_claim", claim.clone()).await?;
    /// if claim.is_cancelled() {
    ///     // a listener vetoed the claim
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn emit_plugin<T>(
        &self,
        plugin_name: &str,
        event_name: &str,
        event: Arc<T>,
    ) -> Result<(), EventError>
    where
        T: Event,
    {
        let event_key = format!("plugin:{plugin_name}:{event_name}");
        self.emit_event(&event_key, event).await
    }

    async fn emit_event<T>(&self, event_key: &str, event: Arc<T>) -> Result<(), EventError>
    where
        T: Event,
    {
        let handlers = {
            let handlers = self.handlers.read().await;
            handlers.get(event_key).cloned()
        };

        let mut failures = 0u64;
        match handlers {
            Some(handlers) => {
                let erased: Arc<dyn Any + Send + Sync> = event;
                for handler in handlers {
                    if handler.expected_type_id() != TypeId::of::<T>() {
                        warn!(
                            "⚠️ Handler {} skipped: registered for another type than {}",
                            handler.handler_name(),
                            std::any::type_name::<T>()
                        );
                        failures += 1;
                        continue;
                    }
                    if let Err(e) = handler.handle(erased.clone()).await {
                        error!("❌ Handler {} failed: {}", handler.handler_name(), e);
                        failures += 1;
                    }
                }
            }
            None => debug!("No handlers for {}", event_key),
        }

        let mut stats = self.stats.write().await;
        stats.events_emitted += 1;
        stats.handler_failures += failures;
        Ok(())
    }
}
