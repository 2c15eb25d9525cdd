use super::{FactionRef, Role};
use crate::error::BridgeResult;
use host_event_system::OfflinePlayer;
use std::any::Any;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

pub type FPlayerRef = Arc<dyn FPlayer>;

/// A player as the active provider sees them.
pub trait FPlayer: Send + Sync + std::fmt::Debug {
    fn provider_id(&self) -> &'static str;

    fn unique_id(&self) -> Uuid;

    fn name(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    /// The player's faction. Providers with a wilderness faction return it
    /// for factionless players; the others return `None`.
    fn faction(&self) -> BridgeResult<Option<FactionRef>>;

    /// [`Role::Factionless`] for players without a faction.
    fn role(&self) -> BridgeResult<Role>;

    fn set_role(&self, role: Role) -> BridgeResult<()>;

    fn power(&self) -> BridgeResult<f64>;

    fn max_power(&self) -> BridgeResult<f64>;

    fn title(&self) -> BridgeResult<String>;

    fn set_title(&self, title: &str) -> BridgeResult<()>;

    fn is_online(&self) -> bool;

    /// The host's record of this player, if the host knows them.
    fn offline_player(&self) -> Option<OfflinePlayer>;
}

impl PartialEq for dyn FPlayer {
    fn eq(&self, other: &Self) -> bool {
        self.provider_id() == other.provider_id() && self.unique_id() == other.unique_id()
    }
}

impl Eq for dyn FPlayer {}

impl Hash for dyn FPlayer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider_id().hash(state);
        self.unique_id().hash(state);
    }
}
