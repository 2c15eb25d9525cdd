//! FactionsUUID.
//!
//! The SaberFactions adapter is this adapter plus a [`ForkFields`]
//! extension; see [`super::saber`].

mod claim;
mod faction;
mod listener;
mod player;

pub use claim::UuidClaim;
pub use faction::UuidFaction;
pub use player::UuidFPlayer;

use super::saber::ForkFields;
use crate::adapter::unwrap_faction;
use crate::api::FactionsApi;
use crate::context::BridgeContext;
use crate::error::{BridgeError, BridgeResult};
use crate::model::{
    ChunkCoords, ClaimRef, FPlayerRef, Faction, FactionRef, Provider, Role, RoleAliases,
};
use async_trait::async_trait;
use host_event_system::OfflinePlayer;
use native_factions::factions_uuid::event::PlayerDisbandReason;
use native_factions::factions_uuid::faction::Faction as NativeFaction;
use native_factions::factions_uuid::fplayer::FPlayer as NativeFPlayer;
use native_factions::factions_uuid::types::FLocation;
use native_factions::factions_uuid::FactionsPlugin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub(crate) const ROLE_ALIASES: RoleAliases = RoleAliases(&[
    ("admin", Role::Leader),
    ("coleader", Role::CoLeader),
    ("moderator", Role::Officer),
    ("normal member", Role::Normal),
    ("recruit", Role::Recruit),
]);

/// State shared by the API adapter, every wrapper it hands out and the
/// event listeners of one binding.
pub struct UuidBinding {
    pub(crate) context: Arc<BridgeContext>,
    pub(crate) plugin: Arc<FactionsPlugin>,
    pub(crate) fork: Option<ForkFields>,
}

impl std::fmt::Debug for UuidBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UuidBinding")
            .field("provider", &self.context.provider_id())
            .field("fork", &self.fork)
            .finish()
    }
}

impl UuidBinding {
    pub(crate) fn faction(self: &Arc<Self>, native: Arc<NativeFaction>) -> FactionRef {
        Arc::new(UuidFaction::new(self.clone(), native))
    }

    pub(crate) fn fplayer(self: &Arc<Self>, native: Arc<NativeFPlayer>) -> FPlayerRef {
        Arc::new(UuidFPlayer::new(self.clone(), native))
    }

    pub(crate) fn claim(self: &Arc<Self>, location: FLocation) -> BridgeResult<ClaimRef> {
        Ok(Arc::new(UuidClaim::new(self.clone(), location)?))
    }
}

/// The plugin's own API object, from the installed plugin's handle.
pub(crate) fn plugin_handle(context: &BridgeContext) -> BridgeResult<Arc<FactionsPlugin>> {
    context
        .provider()
        .plugin
        .handle_as::<FactionsPlugin>()
        .ok_or_else(|| BridgeError::MethodError {
            adapter: "UuidFactionsApi",
            operation: "new",
            reason: "plugin handle is not a FactionsUUID instance".to_string(),
        })
}

pub fn create(context: Arc<BridgeContext>) -> BridgeResult<Arc<dyn FactionsApi>> {
    let plugin = plugin_handle(&context)?;
    Ok(Arc::new(UuidFactionsApi::new(context, plugin, None)))
}

pub struct UuidFactionsApi {
    binding: Arc<UuidBinding>,
    registered: AtomicBool,
}

impl UuidFactionsApi {
    pub(crate) fn new(
        context: Arc<BridgeContext>,
        plugin: Arc<FactionsPlugin>,
        fork: Option<ForkFields>,
    ) -> Self {
        Self {
            binding: Arc::new(UuidBinding {
                context,
                plugin,
                fork,
            }),
            registered: AtomicBool::new(false),
        }
    }

    pub fn plugin(&self) -> &Arc<FactionsPlugin> {
        &self.binding.plugin
    }
}

#[async_trait]
impl FactionsApi for UuidFactionsApi {
    fn provider(&self) -> &Provider {
        self.binding.context.provider()
    }

    fn factions(&self) -> BridgeResult<Vec<FactionRef>> {
        Ok(self
            .binding
            .plugin
            .all_factions()
            .into_iter()
            .map(|f| self.binding.faction(f))
            .collect())
    }

    fn faction(&self, id: &str) -> BridgeResult<Option<FactionRef>> {
        Ok(self
            .binding
            .plugin
            .faction_by_id(id)
            .map(|f| self.binding.faction(f)))
    }

    fn faction_by_name(&self, name: &str) -> BridgeResult<Option<FactionRef>> {
        Ok(self
            .binding
            .plugin
            .faction_by_tag(name)
            .map(|f| self.binding.faction(f)))
    }

    fn claim(&self, coords: ChunkCoords) -> BridgeResult<ClaimRef> {
        let world = self
            .binding
            .context
            .world_name("UuidFactionsApi", coords.world)?;
        self.binding.claim(FLocation::new(world, coords.x, coords.z))
    }

    fn fplayer(&self, player: &OfflinePlayer) -> BridgeResult<FPlayerRef> {
        let native = self
            .binding
            .plugin
            .get_or_create_fplayer(player.uuid, &player.name);
        Ok(self.binding.fplayer(native))
    }

    fn fplayer_by_id(&self, id: Uuid) -> BridgeResult<Option<FPlayerRef>> {
        Ok(self.binding.plugin.fplayer(id).map(|p| self.binding.fplayer(p)))
    }

    fn fplayer_by_name(&self, name: &str) -> BridgeResult<Option<FPlayerRef>> {
        Ok(self
            .binding
            .plugin
            .fplayer_by_name(name)
            .map(|p| self.binding.fplayer(p)))
    }

    fn fplayers(&self) -> BridgeResult<Vec<FPlayerRef>> {
        Ok(self
            .binding
            .plugin
            .all_fplayers()
            .into_iter()
            .map(|p| self.binding.fplayer(p))
            .collect())
    }

    fn wilderness(&self) -> BridgeResult<Option<FactionRef>> {
        Ok(Some(self.binding.faction(self.binding.plugin.wilderness())))
    }

    fn safe_zone(&self) -> BridgeResult<Option<FactionRef>> {
        Ok(Some(self.binding.faction(self.binding.plugin.safe_zone())))
    }

    fn war_zone(&self) -> BridgeResult<Option<FactionRef>> {
        Ok(Some(self.binding.faction(self.binding.plugin.war_zone())))
    }

    async fn create_faction(&self, name: &str) -> BridgeResult<FactionRef> {
        if self
            .binding
            .plugin
            .faction_by_tag(name)
            .is_some_and(|existing| existing.is_normal())
        {
            return Err(BridgeError::FactionExists(name.to_string()));
        }
        let native = self.binding.plugin.create_faction(name, None).await?;
        Ok(self.binding.faction(native))
    }

    async fn delete_faction(&self, faction: &dyn Faction) -> BridgeResult<()> {
        let faction = unwrap_faction::<UuidFaction>(&self.binding.context, faction)?;
        self.binding
            .plugin
            .disband(faction.native().id(), None, PlayerDisbandReason::Plugin)
            .await?;
        Ok(())
    }

    async fn register(&self) -> BridgeResult<()> {
        if self.registered.swap(true, Ordering::AcqRel) {
            debug!("Listeners for {} already registered", self.provider().name);
            return Ok(());
        }
        if let Err(e) = listener::register(self.binding.clone()).await {
            self.registered.store(false, Ordering::Release);
            return Err(e);
        }
        Ok(())
    }

    fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }
}
