//! Common base of every concrete adapter.

use crate::context::BridgeContext;
use crate::error::{BridgeError, BridgeResult};
use crate::model::{FPlayer, Faction};
use std::any::Any;
use std::sync::Arc;

/// Holds exactly one native object for the lifetime of the wrapper, plus
/// the context of the binding that produced it.
pub struct Adapter<T: ?Sized> {
    native: Arc<T>,
    context: Arc<BridgeContext>,
}

impl<T: ?Sized> Adapter<T> {
    pub fn new(native: Arc<T>, context: Arc<BridgeContext>) -> Self {
        Self { native, context }
    }

    pub fn native(&self) -> &Arc<T> {
        &self.native
    }

    pub fn context(&self) -> &Arc<BridgeContext> {
        &self.context
    }

    pub fn provider_id(&self) -> &'static str {
        self.context.provider_id()
    }

    pub fn unsupported<R: Default>(&self, operation: &'static str) -> BridgeResult<R> {
        self.context.unsupported(operation)
    }

    pub fn method_error<R: Default>(
        &self,
        adapter: &'static str,
        operation: &'static str,
        reason: impl Into<String>,
    ) -> BridgeResult<R> {
        self.context.method_error(adapter, operation, reason)
    }

    pub fn degrade<R: Default>(&self, result: BridgeResult<R>, operation: &'static str) -> BridgeResult<R> {
        self.context.degrade(result, operation)
    }
}

impl<T: ?Sized> Clone for Adapter<T> {
    fn clone(&self) -> Self {
        Self {
            native: self.native.clone(),
            context: self.context.clone(),
        }
    }
}

impl<T: ?Sized + std::fmt::Debug> std::fmt::Debug for Adapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("provider", &self.context.provider_id())
            .field("native", &self.native)
            .finish()
    }
}

fn unwrap_any<'a, A: 'static>(
    context: &BridgeContext,
    provider_id: &'static str,
    any: &'a dyn Any,
) -> BridgeResult<&'a A> {
    let mismatch = || BridgeError::CrossProvider {
        expected: context.provider_id().to_string(),
        found: provider_id.to_string(),
    };
    if provider_id != context.provider_id() {
        return Err(mismatch());
    }
    any.downcast_ref::<A>().ok_or_else(mismatch)
}

/// Recovers this binding's concrete faction adapter from a unified faction.
pub fn unwrap_faction<'a, A: 'static>(
    context: &BridgeContext,
    faction: &'a dyn Faction,
) -> BridgeResult<&'a A> {
    unwrap_any(context, faction.provider_id(), faction.as_any())
}

pub fn unwrap_fplayer<'a, A: 'static>(
    context: &BridgeContext,
    fplayer: &'a dyn FPlayer,
) -> BridgeResult<&'a A> {
    unwrap_any(context, fplayer.provider_id(), fplayer.as_any())
}
