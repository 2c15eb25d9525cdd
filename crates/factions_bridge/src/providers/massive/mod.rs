//! MassiveCraft Factions.

mod claim;
mod faction;
mod listener;
mod player;

pub use claim::MassiveClaim;
pub use faction::MassiveFaction;
pub use player::MassiveFPlayer;

use crate::adapter::unwrap_faction;
use crate::api::FactionsApi;
use crate::context::BridgeContext;
use crate::error::{BridgeError, BridgeResult};
use crate::model::{
    ChunkCoords, ClaimRef, FPlayerRef, Faction, FactionRef, Provider, Role, RoleAliases,
};
use async_trait::async_trait;
use host_event_system::OfflinePlayer;
use native_factions::massive::entity::{Faction as NativeFaction, MPlayer, PS};
use native_factions::massive::MassiveFactions;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub(crate) const ROLE_ALIASES: RoleAliases = RoleAliases(&[
    ("LEADER", Role::Leader),
    ("OFFICER", Role::Officer),
    ("MEMBER", Role::Normal),
    ("RECRUIT", Role::Recruit),
]);

pub struct MassiveBinding {
    pub(crate) context: Arc<BridgeContext>,
    pub(crate) plugin: Arc<MassiveFactions>,
}

impl std::fmt::Debug for MassiveBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MassiveBinding")
            .field("provider", &self.context.provider_id())
            .finish()
    }
}

impl MassiveBinding {
    pub(crate) fn faction(self: &Arc<Self>, native: Arc<NativeFaction>) -> FactionRef {
        Arc::new(MassiveFaction::new(self.clone(), native))
    }

    pub(crate) fn fplayer(self: &Arc<Self>, native: Arc<MPlayer>) -> FPlayerRef {
        Arc::new(MassiveFPlayer::new(self.clone(), native))
    }

    pub(crate) fn claim(self: &Arc<Self>, ps: PS) -> BridgeResult<ClaimRef> {
        Ok(Arc::new(MassiveClaim::new(self.clone(), ps)?))
    }
}

pub fn create(context: Arc<BridgeContext>) -> BridgeResult<Arc<dyn FactionsApi>> {
    let plugin = context
        .provider()
        .plugin
        .handle_as::<MassiveFactions>()
        .ok_or_else(|| BridgeError::MethodError {
            adapter: "MassiveFactionsApi",
            operation: "new",
            reason: "plugin handle is not a MassiveCraft Factions instance".to_string(),
        })?;
    Ok(Arc::new(MassiveFactionsApi::new(context, plugin)))
}

pub struct MassiveFactionsApi {
    binding: Arc<MassiveBinding>,
    registered: AtomicBool,
}

impl MassiveFactionsApi {
    pub fn new(context: Arc<BridgeContext>, plugin: Arc<MassiveFactions>) -> Self {
        Self {
            binding: Arc::new(MassiveBinding { context, plugin }),
            registered: AtomicBool::new(false),
        }
    }

    pub fn plugin(&self) -> &Arc<MassiveFactions> {
        &self.binding.plugin
    }
}

#[async_trait]
impl FactionsApi for MassiveFactionsApi {
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
        Ok(self.binding.plugin.faction(id).map(|f| self.binding.faction(f)))
    }

    fn faction_by_name(&self, name: &str) -> BridgeResult<Option<FactionRef>> {
        Ok(self
            .binding
            .plugin
            .faction_by_name(name)
            .map(|f| self.binding.faction(f)))
    }

    fn claim(&self, coords: ChunkCoords) -> BridgeResult<ClaimRef> {
        let world = self
            .binding
            .context
            .world_name("MassiveFactionsApi", coords.world)?;
        self.binding.claim(PS::chunk(world, coords.x, coords.z))
    }

    fn fplayer(&self, player: &OfflinePlayer) -> BridgeResult<FPlayerRef> {
        let native = self
            .binding
            .plugin
            .get_or_create_mplayer(player.uuid, &player.name);
        Ok(self.binding.fplayer(native))
    }

    fn fplayer_by_id(&self, id: Uuid) -> BridgeResult<Option<FPlayerRef>> {
        Ok(self.binding.plugin.mplayer(id).map(|p| self.binding.fplayer(p)))
    }

    fn fplayer_by_name(&self, name: &str) -> BridgeResult<Option<FPlayerRef>> {
        Ok(self
            .binding
            .plugin
            .mplayer_by_name(name)
            .map(|p| self.binding.fplayer(p)))
    }

    fn fplayers(&self) -> BridgeResult<Vec<FPlayerRef>> {
        Ok(self
            .binding
            .plugin
            .all_mplayers()
            .into_iter()
            .map(|p| self.binding.fplayer(p))
            .collect())
    }

    fn wilderness(&self) -> BridgeResult<Option<FactionRef>> {
        Ok(Some(self.binding.faction(self.binding.plugin.none())))
    }

    fn safe_zone(&self) -> BridgeResult<Option<FactionRef>> {
        Ok(Some(self.binding.faction(self.binding.plugin.safezone())))
    }

    fn war_zone(&self) -> BridgeResult<Option<FactionRef>> {
        Ok(Some(self.binding.faction(self.binding.plugin.warzone())))
    }

    async fn create_faction(&self, name: &str) -> BridgeResult<FactionRef> {
        if self
            .binding
            .plugin
            .faction_by_name(name)
            .is_some_and(|existing| existing.is_normal())
        {
            return Err(BridgeError::FactionExists(name.to_string()));
        }
        let native = self.binding.plugin.create_faction(name, None).await?;
        Ok(self.binding.faction(native))
    }

    async fn delete_faction(&self, faction: &dyn Faction) -> BridgeResult<()> {
        let faction = unwrap_faction::<MassiveFaction>(&self.binding.context, faction)?;
        self.binding
            .plugin
            .disband(faction.native().id(), None)
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
