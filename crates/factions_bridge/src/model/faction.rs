use super::{ClaimRef, FPlayerRef, Relationship};
use crate::error::BridgeResult;
use async_trait::async_trait;
use host_event_system::Location;
use std::any::Any;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub type FactionRef = Arc<dyn Faction>;

/// A faction of the active provider.
///
/// `provider_id`, `id`, `name` and the system-faction flags are identity and
/// never fail. Every other getter may be unsupported by the provider; with
/// `catch_exceptions` enabled those return a neutral default instead of an
/// error.
#[async_trait]
pub trait Faction: Send + Sync + std::fmt::Debug {
    /// Registry id of the provider that produced this wrapper.
    fn provider_id(&self) -> &'static str;

    fn id(&self) -> String;

    fn name(&self) -> String;

    /// The concrete adapter, for unwrapping back to the native object.
    fn as_any(&self) -> &dyn Any;

    fn is_wilderness(&self) -> bool;

    fn is_safe_zone(&self) -> bool;

    fn is_war_zone(&self) -> bool;

    fn is_server_faction(&self) -> bool {
        self.is_wilderness() || self.is_safe_zone() || self.is_war_zone()
    }

    /// Renames through the provider, so its own rename event fires.
    async fn set_name(&self, name: &str) -> BridgeResult<()>;

    fn description(&self) -> BridgeResult<String>;

    fn set_description(&self, description: &str) -> BridgeResult<()>;

    /// Creation time in epoch milliseconds.
    fn founded(&self) -> BridgeResult<u64>;

    fn leader(&self) -> BridgeResult<Option<FPlayerRef>>;

    fn members(&self) -> BridgeResult<Vec<FPlayerRef>>;

    fn claims(&self) -> BridgeResult<Vec<ClaimRef>>;

    fn power(&self) -> BridgeResult<f64>;

    fn bank(&self) -> BridgeResult<f64>;

    fn points(&self) -> BridgeResult<i64>;

    fn strikes(&self) -> BridgeResult<i64>;

    fn warps(&self) -> BridgeResult<HashMap<String, Location>>;

    fn home(&self) -> BridgeResult<Option<Location>>;

    fn set_home(&self, home: Option<Location>) -> BridgeResult<()>;

    /// Fails with `CrossProvider` if `other` comes from another provider.
    fn relationship_to(&self, other: &dyn Faction) -> BridgeResult<Relationship>;
}

impl PartialEq for dyn Faction {
    fn eq(&self, other: &Self) -> bool {
        self.provider_id() == other.provider_id()
            && self.id() == other.id()
            && self.name() == other.name()
    }
}

impl Eq for dyn Faction {}

impl Hash for dyn Faction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider_id().hash(state);
        self.id().hash(state);
        self.name().hash(state);
    }
}
