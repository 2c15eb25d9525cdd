//! # Bridge Facade
//!
//! [`FactionsBridge`] owns at most one binding for its whole lifetime. The
//! first successful [`connect`](FactionsBridge::connect) fixes the provider;
//! later calls either report the existing binding or fail, depending on
//! `require_provider`.
//!
//! A process-wide instance is available through the free functions
//! [`connect`], [`connected`] and [`factions_api`].

use crate::api::FactionsApi;
use crate::context::BridgeOptions;
use crate::discovery::{self, Binding};
use crate::error::{BridgeError, BridgeResult};
use crate::events::{subscribe, UnifiedEvent};
use crate::model::Provider;
use crate::report;
use host_event_system::{EventError, Host};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Entry point of the bridge for one host.
///
/// Holds the host it was created for and, once [`connect`](Self::connect)
/// has found a provider, the binding to that provider's API adapter.
pub struct FactionsBridge {
    host: Arc<dyn Host>,
    binding: OnceCell<Binding>,
    connect_lock: Mutex<()>,
}

impl std::fmt::Debug for FactionsBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactionsBridge")
            .field("provider", &self.binding.get().map(|b| b.provider.id))
            .finish()
    }
}

impl FactionsBridge {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            binding: OnceCell::new(),
            connect_lock: Mutex::new(()),
        }
    }

    /// Discovers and binds a provider.
    ///
    /// Returns `Ok` without binding anything when no provider matches,
    /// unless `require_provider` is set. Concurrent calls are serialized;
    /// only one of them can bind.
    ///
    /// # Arguments
    ///
    /// * `options` - Console output, strictness, degradation and polling
    ///   settings. They are fixed for the lifetime of the binding.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - A provider is bound, or none matched and
    ///   `require_provider` is off
    /// * `Err(BridgeError::NoProvider)` - Nothing matched and
    ///   `require_provider` is on
    /// * `Err(BridgeError::AlreadyConnected)` - A provider was bound earlier
    ///   and `require_provider` is on
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use factions_bridge::{BridgeOptions, FactionsBridge};
    /// use host_event_system::ServerHost;
    /// use std::sync::Arc;
    ///
    /// # async fn demo() -> factions_bridge::BridgeResult<()> {
    /// let host = Arc::new(ServerHost::new("Paper 1.20.4"));
    /// let bridge = FactionsBridge::new(host);
    /// bridge.connect(BridgeOptions::default()).await?;
    ///
    /// if let Ok(api) = bridge.api() {
    ///     println!("bound to {}", api.provider().name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(&self, options: BridgeOptions) -> BridgeResult<()> {
        let _guard = self.connect_lock.lock().await;

        if let Some(binding) = self.binding.get() {
            if options.require_provider {
                return Err(BridgeError::AlreadyConnected(binding.provider.name.to_string()));
            }
            report::already_connected(&binding.provider, &options);
            return Ok(());
        }

        let Some(binding) = discovery::discover(self.host.clone(), options.clone()).await? else {
            report::diagnostics(self.host.as_ref(), &options);
            if options.require_provider {
                return Err(BridgeError::NoProvider);
            }
            return Ok(());
        };

        report::status(&binding.provider, &options);
        if self.binding.set(binding).is_err() {
            debug!("Binding was set while connect held the lock");
        }
        Ok(())
    }

    pub fn connected(&self) -> bool {
        self.binding.get().is_some()
    }

    /// The bound API, or `NotConnected` before a provider is bound.
    pub fn api(&self) -> BridgeResult<Arc<dyn FactionsApi>> {
        self.binding
            .get()
            .map(|binding| binding.api.clone())
            .ok_or(BridgeError::NotConnected)
    }

    pub fn provider(&self) -> Option<&Provider> {
        self.binding.get().map(|binding| &binding.provider)
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// Subscribes to a unified event. Works before `connect` too; the
    /// handler simply sees nothing until a provider is bound.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use factions_bridge::{FactionJoinEvent, FactionsBridge, UnifiedEvent};
    ///
    /// # async fn demo(bridge: &FactionsBridge) -> factions_bridge::BridgeResult<()> {
    /// bridge
    ///     .on(|event: &FactionJoinEvent| {
    ///         if event.faction.name() == "Outlaws" {
    ///             event.set_cancelled(true);
    ///         }
    ///         Ok(())
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn on<E, F>(&self, handler: F) -> BridgeResult<()>
    where
        E: UnifiedEvent,
        F: Fn(&E) -> Result<(), EventError> + Send + Sync + 'static,
    {
        subscribe(&self.host.events(), handler).await
    }
}

static BRIDGE: OnceCell<FactionsBridge> = OnceCell::new();

/// Connects the process-wide bridge.
///
/// The first call fixes the host. A later call with a different host still
/// talks to the first one. Otherwise behaves as [`FactionsBridge::connect`].
///
/// # Example
///
/// ```rust,no_run
/// use factions_bridge::BridgeOptions;
/// use host_event_system::ServerHost;
/// use std::sync::Arc;
///
/// # async fn demo() -> factions_bridge::BridgeResult<()> {
/// let host = Arc::new(ServerHost::new("Paper 1.20.4"));
/// factions_bridge::connect(host, BridgeOptions::default()).await?;
///
/// if factions_bridge::connected() {
///     let api = factions_bridge::factions_api()?;
///     println!("{} faction(s)", api.factions()?.len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn connect(host: Arc<dyn Host>, options: BridgeOptions) -> BridgeResult<()> {
    BRIDGE
        .get_or_init(|| FactionsBridge::new(host))
        .connect(options)
        .await
}

/// Whether the process-wide bridge has bound a provider.
pub fn connected() -> bool {
    BRIDGE.get().is_some_and(FactionsBridge::connected)
}

/// The bound API of the process-wide bridge.
pub fn factions_api() -> BridgeResult<Arc<dyn FactionsApi>> {
    BRIDGE.get().ok_or(BridgeError::NotConnected)?.api()
}
