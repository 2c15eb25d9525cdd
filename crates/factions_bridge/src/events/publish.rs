use super::UnifiedEvent;
use crate::error::{BridgeError, BridgeResult};
use host_event_system::{EventError, EventSystem, NativeEvent};
use std::future::Future;
use std::sync::Arc;
use tracing::trace;

/// Plugin name the unified events are published under.
pub const BUS_NAMESPACE: &str = "FactionsBridge";

/// Publishes a unified event and returns it once every listener has run.
pub async fn publish<E: UnifiedEvent>(events: &EventSystem, event: E) -> BridgeResult<Arc<E>> {
    let event = Arc::new(event);
    trace!("📣 Publishing {}", E::EVENT_NAME);
    events
        .emit_plugin(BUS_NAMESPACE, E::EVENT_NAME, event.clone())
        .await?;
    Ok(event)
}

/// Registers a listener for one unified event type.
pub async fn subscribe<E, F>(events: &EventSystem, handler: F) -> BridgeResult<()>
where
    E: UnifiedEvent,
    F: Fn(&E) -> Result<(), EventError> + Send + Sync + 'static,
{
    events.on_plugin(BUS_NAMESPACE, E::EVENT_NAME, handler).await?;
    Ok(())
}

/// Surfaces a translation failure to the bus, which logs it.
pub(crate) fn handler_error(error: BridgeError) -> EventError {
    EventError::HandlerExecution(error.to_string())
}

/// Registers `translate` for a native event of `plugin_name`.
///
/// `state` is handed to every call; translation failures are reported to
/// the bus as handler failures.
pub(crate) async fn listen<S, E, F, Fut>(
    events: &EventSystem,
    plugin_name: &str,
    event_name: &str,
    state: Arc<S>,
    translate: F,
) -> BridgeResult<()>
where
    S: Send + Sync + 'static,
    E: NativeEvent,
    F: Fn(Arc<S>, Arc<E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = BridgeResult<()>> + Send + 'static,
{
    events
        .on_plugin_async(plugin_name, event_name, move |event: Arc<E>| {
            let translated = translate(state.clone(), event);
            async move { translated.await.map_err(handler_error) }
        })
        .await?;
    Ok(())
}
