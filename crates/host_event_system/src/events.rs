//! # Event Traits and Handlers
//!
//! Events travel through the bus as `Arc<dyn Any + Send + Sync>`. Handlers
//! are registered for one concrete type and downcast on delivery, which lets
//! a listener mutate shared state on the event (most importantly its
//! [`CancelFlag`]) and have the emitter see the change.

use async_trait::async_trait;
use std::any::{Any, TypeId};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Marker for anything that can travel on the bus.
pub trait Event: Any + Send + Sync + std::fmt::Debug {}

impl<T> Event for T where T: Any + Send + Sync + std::fmt::Debug {}

/// Cancellation state of a native plugin event.
///
/// The flag is shared through the `Arc` the event travels in, so every
/// listener of one dispatch observes and mutates the same value.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set_cancelled(&self, cancelled: bool) {
        self.0.store(cancelled, Ordering::Release);
    }
}

/// Contract every event published by a native plugin implements.
///
/// Events that the plugin does not allow to be cancelled return `None`
/// from [`NativeEvent::cancel_flag`].
pub trait NativeEvent: Event {
    /// Short name of the event as the plugin publishes it.
    fn event_name(&self) -> &'static str;

    /// Cancellation state, if this event type supports cancellation.
    fn cancel_flag(&self) -> Option<&CancelFlag>;

    fn is_cancelled(&self) -> bool {
        self.cancel_flag().map(CancelFlag::is_cancelled).unwrap_or(false)
    }

    fn set_cancelled(&self, cancelled: bool) {
        if let Some(flag) = self.cancel_flag() {
            flag.set_cancelled(cancelled);
        }
    }
}

/// Emitted on `core:plugin_enabled` when a plugin is installed on the host.
#[derive(Debug, Clone)]
pub struct PluginEnabledEvent {
    pub name: String,
    pub version: String,
    pub timestamp: u64,
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: Arc<dyn Any + Send + Sync>) -> Result<(), EventError>;
    fn expected_type_id(&self) -> TypeId;
    fn handler_name(&self) -> &str;
}

/// Synchronous handler that borrows the event for the duration of the call.
pub struct TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&T) -> Result<(), EventError> + Send + Sync,
{
    handler: F,
    name: String,
    _phantom: PhantomData<fn(&T)>,
}

impl<T, F> TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&T) -> Result<(), EventError> + Send + Sync,
{
    pub fn new(name: String, handler: F) -> Self {
        Self {
            handler,
            name,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F> EventHandler for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(&T) -> Result<(), EventError> + Send + Sync,
{
    async fn handle(&self, event: Arc<dyn Any + Send + Sync>) -> Result<(), EventError> {
        let event = event
            .downcast_ref::<T>()
            .ok_or_else(|| EventError::TypeMismatch(self.name.clone()))?;
        (self.handler)(event)
    }

    fn expected_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

/// Handler that owns a reference to the event and may await inside.
pub struct AsyncEventHandler<T, F, Fut>
where
    T: Event,
    F: Fn(Arc<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), EventError>> + Send,
{
    handler: F,
    name: String,
    _phantom: PhantomData<fn(Arc<T>) -> Fut>,
}

impl<T, F, Fut> AsyncEventHandler<T, F, Fut>
where
    T: Event,
    F: Fn(Arc<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), EventError>> + Send,
{
    pub fn new(name: String, handler: F) -> Self {
        Self {
            handler,
            name,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F, Fut> EventHandler for AsyncEventHandler<T, F, Fut>
where
    T: Event,
    F: Fn(Arc<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), EventError>> + Send,
{
    async fn handle(&self, event: Arc<dyn Any + Send + Sync>) -> Result<(), EventError> {
        let event = event
            .downcast::<T>()
            .map_err(|_| EventError::TypeMismatch(self.name.clone()))?;
        (self.handler)(event).await
    }

    fn expected_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

/// Errors raised by the bus and the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// A handler was registered for a different type than the one emitted
    #[error("Handler {0} received an event of an unexpected type")]
    TypeMismatch(String),
    /// Handler execution failed during event processing
    #[error("Handler execution error: {0}")]
    HandlerExecution(String),
    /// No handler found for the specified event key
    #[error("Handler not found: {0}")]
    HandlerNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Cancellable {
        flag: CancelFlag,
    }

    impl NativeEvent for Cancellable {
        fn event_name(&self) -> &'static str {
            "cancellable"
        }

        fn cancel_flag(&self) -> Option<&CancelFlag> {
            Some(&self.flag)
        }
    }

    #[derive(Debug)]
    struct Fixed;

    impl NativeEvent for Fixed {
        fn event_name(&self) -> &'static str {
            "fixed"
        }

        fn cancel_flag(&self) -> Option<&CancelFlag> {
            None
        }
    }

    #[test]
    fn cancel_flag_round_trips() {
        let event = Cancellable::default();
        assert!(!event.is_cancelled());
        event.set_cancelled(true);
        assert!(event.is_cancelled());
        event.set_cancelled(false);
        assert!(!event.is_cancelled());
    }

    #[test]
    fn non_cancellable_ignores_set() {
        let event = Fixed;
        event.set_cancelled(true);
        assert!(!event.is_cancelled());
    }

    #[tokio::test]
    async fn typed_handler_rejects_wrong_type() {
        let handler = TypedEventHandler::new("fixed".to_string(), |_: &Fixed| Ok(()));
        let wrong: Arc<dyn Any + Send + Sync> = Arc::new(Cancellable::default());
        assert!(matches!(
            handler.handle(wrong).await,
            Err(EventError::TypeMismatch(_))
        ));
    }
}
