/// Event handler registration methods
use crate::events::{AsyncEventHandler, Event, EventError, EventHandler, TypedEventHandler};
use super::core::EventSystem;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

impl EventSystem {
    /// Registers a handler for core host events.
    ///
    /// # Arguments
    ///
    /// * `event_name` - Name of the core event (e.g., "plugin_enabled")
    /// * `handler` - Function receiving a reference to the event
    pub async fn on_core<T, F>(&self, event_name: &str, handler: F) -> Result<(), EventError>
    where
        T: Event,
        F: Fn(&T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        let event_key = format!("core:{event_name}");
        let handler = TypedEventHandler::new(event_key.clone(), handler);
        self.register_handler(event_key, Arc::new(handler)).await
    }

    /// Registers a synchronous handler for an event published by a plugin.
    ///
    /// Handlers for one key run in registration order. A handler registered
    /// for another type than the one emitted is skipped and counted as a
    /// failure.
    ///
    /// # Arguments
    ///
    /// * `plugin_name` - Name the publishing plugin is installed under
    /// * `event_name` - The event name within that plugin's namespace
    /// * `handler` - Function receiving a reference to the event
    ///
    /// # Returns
    ///
    /// `Ok(())` once the handler is stored under `plugin:<plugin_name>:<event_name>`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use host_event_system::{EventError, EventSystem};
    ///
    /// #[derive(Debug)]
    /// struct LandClaim {
    ///     chunk: (i32, i32),
    /// }
    ///
    /// # async fn demo(events: &EventSystem) -> Result<(), EventError> {
    /// events
    ///     .on_plugin("Factions", "land_claim", |event: &LandClaim| {
    ///         tracing::debug!("claimed {:?}", event.chunk);
    ///         Ok(())
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn on_plugin<T, F>(
        &self,
        plugin_name: &str,
        event_name: &str,
        handler: F,
    ) -> Result<(), EventError>
    where
        T: Event,
        F: Fn(&T) -> Result<(), EventError> + Send + Sync + 'static,
    {
        let event_key = format!("plugin:{plugin_name}:{event_name}");
        let handler = TypedEventHandler::new(event_key.clone(), handler);
        self.register_handler(event_key, Arc::new(handler)).await
    }

    /// Registers an async handler for an event published by a plugin.
    ///
    /// The handler receives its own `Arc` of the event, so it may hold the
    /// event across await points (for example while it emits a derived
    /// event and waits for that dispatch to finish).
    ///
    /// # Arguments
    ///
    /// * `plugin_name` - Name the publishing plugin is installed under
    /// * `event_name` - The event name within that plugin's namespace
    /// * `handler` - Function returning the future that handles one event
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use host_event_system::{EventError, EventSystem};
    /// use std::sync::Arc;
    ///
    /// #[derive(Debug)]
    /// struct LandClaim {
    ///     chunk: (i32, i32),
    /// }
    ///
    /// # async fn demo(events: &EventSystem) -> Result<(), EventError> {
    /// events
    ///     .on_plugin_async("Factions", "land_claim", |event: Arc<LandClaim>| async move {
    ///         tokio::task::yield_now().await;
    ///         tracing::debug!("claimed {:?}", event.chunk);
    ///         Ok(())
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn on_plugin_async<T, F, Fut>(
        &self,
        plugin_name: &str,
        event_name: &str,
        handler: F,
    ) -> Result<(), EventError>
    where
        T: Event,
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), EventError>> + Send + 'static,
    {
        let event_key = format!("plugin:{plugin_name}:{event_name}");
        let handler = AsyncEventHandler::new(event_key.clone(), handler);
        self.register_handler(event_key, Arc::new(handler)).await
    }

    /// Internal helper for registering handlers
    async fn register_handler(
        &self,
        event_key: String,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), EventError> {
        let mut handlers = self.handlers.write().await;
        handlers.entry(event_key.clone()).or_default().push(handler);
        drop(handlers);

        let mut stats = self.stats.write().await;
        stats.total_handlers += 1;

        debug!("📝 Registered handler for {}", event_key);
        Ok(())
    }
}
