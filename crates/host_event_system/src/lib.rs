//! # Host Event System
//!
//! The in-process surface a game-server host offers to its plugins. Every
//! faction plugin and the faction bridge itself link against this crate and
//! talk to each other only through it.
//!
//! ## Components
//!
//! - [`EventSystem`] - string-keyed event bus. Handlers run sequentially in
//!   registration order, so a listener can cancel an event and the emitter
//!   observes the decision as soon as `emit_*` returns.
//! - [`Scheduler`] - deferred task queue driven by the host game loop. Delays
//!   are measured in [`Ticks`].
//! - [`Host`] - read access to installed plugins, worlds and players.
//!   [`ServerHost`] is the concrete in-process implementation.
//! - [`NativeEvent`] / [`CancelFlag`] - the cancellation contract native
//!   plugin events implement.
//!
//! ## Event keys
//!
//! - `core:<event>` for host lifecycle events
//! - `plugin:<plugin_name>:<event>` for events published by plugins
//!
//! ```rust,no_run
//! use host_event_system::*;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Greeting {
//!     text: String,
//! }
//!
//! # async fn demo() -> Result<(), EventError> {
//! let events = create_event_system();
//! events
//!     .on_plugin("Greeter", "greeting", |event: &Greeting| {
//!         tracing::info!("got {}", event.text);
//!         Ok(())
//!     })
//!     .await?;
//! events
//!     .emit_plugin("Greeter", "greeting", Arc::new(Greeting { text: "hi".into() }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod host;
pub mod scheduler;
pub mod system;
pub mod types;
pub mod utils;

pub use events::{
    AsyncEventHandler, CancelFlag, Event, EventError, EventHandler, NativeEvent,
    PluginEnabledEvent, TypedEventHandler,
};
pub use host::{Host, ServerHost};
pub use scheduler::{Scheduler, TaskFuture, TaskId, Ticks};
pub use system::{EventSystem, EventSystemStats};
pub use types::{InstalledPlugin, Location, OfflinePlayer, World, WorldId};
pub use utils::{create_event_system, current_timestamp, current_timestamp_millis};

// Re-exported so plugins can build boxed handler futures without their own dependency.
pub use async_trait::async_trait;
pub use futures::future::BoxFuture;
