//! Options fixed at connect time and the context every adapter and
//! listener of one binding shares.

use crate::error::{BridgeError, BridgeResult};
use crate::model::Provider;
use crate::report;
use host_event_system::{EventSystem, Host, Scheduler, Ticks, WorldId};
use dashmap::DashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Behaviour switches passed to `connect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// Print the status line, diagnostics and degradation warnings
    pub console_output: bool,
    /// Treat a missing provider or a second connect as an error
    pub require_provider: bool,
    /// Return neutral defaults from unsupported operations instead of failing
    pub catch_exceptions: bool,
    /// Period of the state-diff poller, for providers that need one
    pub poll_interval_ticks: u64,
    /// How long deferred create events wait for the provider's bookkeeping
    pub create_event_delay_ticks: u64,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            console_output: true,
            require_provider: false,
            catch_exceptions: false,
            poll_interval_ticks: 20,
            create_event_delay_ticks: 1,
        }
    }
}

/// Everything an adapter needs to know about the binding it belongs to.
///
/// One context exists per bound provider. It is created by discovery once a
/// registry entry has matched and is never re-pointed at another provider.
pub struct BridgeContext {
    host: Arc<dyn Host>,
    provider: Provider,
    options: BridgeOptions,
    /// Operations already reported as degraded
    warned: DashSet<&'static str>,
}

impl std::fmt::Debug for BridgeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeContext")
            .field("provider", &self.provider.id)
            .field("options", &self.options)
            .finish()
    }
}

impl BridgeContext {
    pub fn new(host: Arc<dyn Host>, provider: Provider, options: BridgeOptions) -> Arc<Self> {
        Arc::new(Self {
            host,
            provider,
            options,
            warned: DashSet::new(),
        })
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    pub fn events(&self) -> Arc<EventSystem> {
        self.host.events()
    }

    pub fn scheduler(&self) -> Arc<Scheduler> {
        self.host.scheduler()
    }

    pub fn create_event_delay(&self) -> Ticks {
        Ticks(self.options.create_event_delay_ticks)
    }

    pub fn poll_interval(&self) -> Ticks {
        Ticks(self.options.poll_interval_ticks.max(1))
    }

    pub fn unsupported_error(&self, operation: &'static str) -> BridgeError {
        BridgeError::Unsupported {
            provider: self.provider.name.to_string(),
            operation,
        }
    }

    /// The provider has no such operation: a neutral default when
    /// `catch_exceptions` is on, an `Unsupported` error otherwise.
    pub fn unsupported<R: Default>(&self, operation: &'static str) -> BridgeResult<R> {
        self.degrade(Err(self.unsupported_error(operation)), operation)
    }

    /// An optional operation failed inside the adapter. Same policy as
    /// [`BridgeContext::unsupported`].
    pub fn method_error<R: Default>(
        &self,
        adapter: &'static str,
        operation: &'static str,
        reason: impl Into<String>,
    ) -> BridgeResult<R> {
        self.degrade(
            Err(BridgeError::MethodError {
                adapter,
                operation,
                reason: reason.into(),
            }),
            operation,
        )
    }

    /// Applies the degradation policy to the result of an optional
    /// operation. Only `Unsupported` and `MethodError` are absorbed.
    pub fn degrade<R: Default>(&self, result: BridgeResult<R>, operation: &'static str) -> BridgeResult<R> {
        match result {
            Err(error @ (BridgeError::Unsupported { .. } | BridgeError::MethodError { .. }))
                if self.options.catch_exceptions =>
            {
                if self.warned.insert(operation) {
                    report::degraded(self, operation, &error);
                }
                Ok(R::default())
            }
            other => other,
        }
    }

    /// Resolves a world by the name a provider stores.
    pub fn world_id(&self, adapter: &'static str, world_name: &str) -> BridgeResult<WorldId> {
        self.host
            .world(world_name)
            .map(|world| world.id)
            .ok_or_else(|| BridgeError::MethodError {
                adapter,
                operation: "world",
                reason: format!("unknown world {world_name}"),
            })
    }

    pub fn world_name(&self, adapter: &'static str, world: WorldId) -> BridgeResult<String> {
        self.host
            .world_by_id(world)
            .map(|world| world.name)
            .ok_or_else(|| BridgeError::MethodError {
                adapter,
                operation: "world",
                reason: format!("unknown world {world}"),
            })
    }
}
