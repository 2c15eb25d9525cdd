//! # Factions Bridge
//!
//! One API and one event model over whichever faction plugin the host has
//! installed. Downstream plugins program against [`FactionsApi`] and the
//! unified events in [`events`]; the bridge finds the installed provider,
//! wraps its objects and republishes its events.
//!
//! ## Components
//!
//! - [`registry`] - the supported providers, forks before their base
//! - [`discovery`] - matches installed plugins against the registry and
//!   registers the winning adapter
//! - [`providers`] - one adapter per provider
//! - [`events`] - unified events, their translation from native events and
//!   the state-diff poller for providers with incomplete event coverage
//! - [`FactionsBridge`] - the facade holding the single binding
//!
//! ## Degradation
//!
//! Operations a provider cannot perform fail with
//! [`BridgeError::Unsupported`]. With `catch_exceptions` enabled they
//! return a neutral default instead (`0`, empty, `None`) and log one warning
//! per operation.
//!
//! ```rust,no_run
//! use factions_bridge::{BridgeOptions, FactionsBridge, FactionJoinEvent};
//! use host_event_system::ServerHost;
//! use std::sync::Arc;
//!
//! # async fn demo() -> factions_bridge::BridgeResult<()> {
//! let host = Arc::new(ServerHost::new("Paper 1.20.4"));
//! let bridge = FactionsBridge::new(host);
//! bridge.connect(BridgeOptions::default()).await?;
//! bridge
//!     .on(|event: &FactionJoinEvent| {
//!         tracing::info!("{} joined {}", event.fplayer.name(), event.faction.name());
//!         Ok(())
//!     })
//!     .await?;
//! for faction in bridge.api()?.factions()? {
//!     tracing::info!("{} has {} members", faction.name(), faction.members()?.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod api;
pub mod bridge;
pub mod capability;
pub mod context;
pub mod discovery;
pub mod error;
pub mod events;
pub mod model;
pub mod providers;
pub mod registry;
pub mod report;

pub use api::FactionsApi;
pub use bridge::{connect, connected, factions_api, FactionsBridge};
pub use context::{BridgeContext, BridgeOptions};
pub use discovery::Binding;
pub use error::{BridgeError, BridgeResult};
pub use events::{
    FactionClaimEvent, FactionCreateEvent, FactionDisbandEvent, FactionJoinEvent,
    FactionLeaveEvent, FactionRenameEvent, FactionUnclaimAllEvent, FactionUnclaimEvent,
    UnifiedEvent, BUS_NAMESPACE,
};
pub use model::*;
pub use registry::RegistryEntry;
