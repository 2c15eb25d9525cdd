//! # Unified Events
//!
//! The bridge republishes every provider event it understands as one of the
//! types in [`types`], on the host bus under
//! `plugin:FactionsBridge:<event>`.
//!
//! A unified event does not keep a cancellation state of its own. It reads
//! and writes the flag of the native event it was translated from, so a
//! native event that arrives cancelled produces a cancelled unified event,
//! and cancelling the unified event cancels the native one. Events
//! synthesized by the [`poller`] have no native event: they are never
//! cancelled and ignore `set_cancelled`.

pub mod poller;
pub mod publish;
pub mod types;

pub use poller::{DiffPoller, FactionSnapshot, SnapshotChange};
pub use publish::{publish, subscribe, BUS_NAMESPACE};
pub use types::*;

use host_event_system::{Event, NativeEvent};
use std::sync::Arc;

/// Reference to the native event a unified event was built from.
#[derive(Clone)]
pub struct NativeRef {
    event: Arc<dyn NativeEvent>,
}

impl NativeRef {
    pub fn new<E: NativeEvent>(event: Arc<E>) -> Self {
        Self { event }
    }

    pub fn name(&self) -> &'static str {
        self.event.event_name()
    }

    /// `false` when the native event type cannot be cancelled.
    pub fn is_cancellable(&self) -> bool {
        self.event.cancel_flag().is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.event.is_cancelled()
    }

    pub fn set_cancelled(&self, cancelled: bool) {
        self.event.set_cancelled(cancelled);
    }
}

impl std::fmt::Debug for NativeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeRef")
            .field("name", &self.name())
            .field("cancellable", &self.is_cancellable())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// An event of the unified model.
pub trait UnifiedEvent: Event {
    /// Name the event is published under.
    const EVENT_NAME: &'static str;

    fn native(&self) -> Option<&NativeRef>;

    fn is_cancelled(&self) -> bool {
        self.native().is_some_and(NativeRef::is_cancelled)
    }

    fn set_cancelled(&self, cancelled: bool) {
        if let Some(native) = self.native() {
            native.set_cancelled(cancelled);
        }
    }
}
