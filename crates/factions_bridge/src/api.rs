use crate::error::BridgeResult;
use crate::model::{ChunkCoords, ClaimRef, FPlayerRef, Faction, FactionRef, Provider};
use async_trait::async_trait;
use host_event_system::OfflinePlayer;
use uuid::Uuid;

/// The unified API over the bound provider.
#[async_trait]
pub trait FactionsApi: Send + Sync {
    fn provider(&self) -> &Provider;

    /// Type name of the concrete adapter, see
    /// [`crate::registry::lookup_by_adapter_class`].
    fn adapter_class(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn factions(&self) -> BridgeResult<Vec<FactionRef>>;

    fn faction(&self, id: &str) -> BridgeResult<Option<FactionRef>>;

    fn faction_by_name(&self, name: &str) -> BridgeResult<Option<FactionRef>>;

    /// The claim at `coords`; unclaimed chunks still yield a claim.
    fn claim(&self, coords: ChunkCoords) -> BridgeResult<ClaimRef>;

    /// The provider's record for a host player, created on first use as the
    /// provider itself would.
    fn fplayer(&self, player: &OfflinePlayer) -> BridgeResult<FPlayerRef>;

    fn fplayer_by_id(&self, id: Uuid) -> BridgeResult<Option<FPlayerRef>>;

    fn fplayer_by_name(&self, name: &str) -> BridgeResult<Option<FPlayerRef>>;

    fn fplayers(&self) -> BridgeResult<Vec<FPlayerRef>>;

    fn wilderness(&self) -> BridgeResult<Option<FactionRef>>;

    fn safe_zone(&self) -> BridgeResult<Option<FactionRef>>;

    fn war_zone(&self) -> BridgeResult<Option<FactionRef>>;

    /// Fails with `FactionExists` if a non-system faction already uses `name`.
    async fn create_faction(&self, name: &str) -> BridgeResult<FactionRef>;

    async fn delete_faction(&self, faction: &dyn Faction) -> BridgeResult<()>;

    /// Wires the provider's events onto the unified events. Calling it again
    /// does nothing.
    async fn register(&self) -> BridgeResult<()>;

    fn is_registered(&self) -> bool;
}

impl std::fmt::Debug for dyn FactionsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactionsApi")
            .field("provider", &self.provider().id)
            .field("adapter", &self.adapter_class())
            .field("registered", &self.is_registered())
            .finish()
    }
}
