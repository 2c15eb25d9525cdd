//! Medieval Factions.
//!
//! The plugin publishes creation and disbanding only. Everything else it
//! does silently, so [`MedievalFactionsApi::register`] also starts a
//! [`DiffPoller`] that turns observed state changes into unified events.
//!
//! There is no player object: a player is a UUID plus whatever the host
//! knows about it. Claims name their holder, so resolving the faction of a
//! claim is a lookup by name.

mod claim;
mod faction;
mod listener;
mod player;

pub use claim::MedievalClaim;
pub use faction::MedievalFaction;
pub use player::MedievalFPlayer;

use crate::adapter::unwrap_faction;
use crate::api::FactionsApi;
use crate::context::BridgeContext;
use crate::error::{BridgeError, BridgeResult};
use crate::events::DiffPoller;
use crate::model::{ChunkCoords, ClaimRef, FPlayerRef, Faction, FactionRef, Provider};
use async_trait::async_trait;
use host_event_system::{OfflinePlayer, TaskId};
use native_factions::medieval::objects::Faction as NativeFaction;
use native_factions::medieval::MedievalFactions;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;
use uuid::Uuid;

pub struct MedievalBinding {
    pub(crate) context: Arc<BridgeContext>,
    pub(crate) plugin: Arc<MedievalFactions>,
}

impl std::fmt::Debug for MedievalBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedievalBinding")
            .field("provider", &self.context.provider_id())
            .finish()
    }
}

impl MedievalBinding {
    pub(crate) fn faction(self: &Arc<Self>, native: Arc<NativeFaction>) -> FactionRef {
        Arc::new(MedievalFaction::new(self.clone(), native))
    }

    pub(crate) fn fplayer(self: &Arc<Self>, player: Uuid) -> FPlayerRef {
        Arc::new(MedievalFPlayer::new(self.clone(), player))
    }

    pub(crate) fn claim(self: &Arc<Self>, world: &str, x: i32, z: i32) -> BridgeResult<ClaimRef> {
        Ok(Arc::new(MedievalClaim::new(self.clone(), world, x, z)?))
    }

    /// Whether the plugin or the host has ever seen `player`.
    fn knows(&self, player: Uuid) -> bool {
        self.plugin.faction_of_player(player).is_some()
            || self.context.host().offline_player(player).is_some()
    }
}

pub fn create(context: Arc<BridgeContext>) -> BridgeResult<Arc<dyn FactionsApi>> {
    let plugin = context
        .provider()
        .plugin
        .handle_as::<MedievalFactions>()
        .ok_or_else(|| BridgeError::MethodError {
            adapter: "MedievalFactionsApi",
            operation: "new",
            reason: "plugin handle is not a Medieval Factions instance".to_string(),
        })?;
    let api: Arc<dyn FactionsApi> = MedievalFactionsApi::new(context, plugin);
    Ok(api)
}

pub struct MedievalFactionsApi {
    binding: Arc<MedievalBinding>,
    registered: AtomicBool,
    poller: Arc<DiffPoller>,
    poll_task: Mutex<Option<TaskId>>,
}

impl MedievalFactionsApi {
    pub fn new(context: Arc<BridgeContext>, plugin: Arc<MedievalFactions>) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<MedievalFactionsApi>| {
            let api: Weak<dyn FactionsApi> = this.clone();
            Self {
                poller: DiffPoller::new(api, context.clone()),
                binding: Arc::new(MedievalBinding { context, plugin }),
                registered: AtomicBool::new(false),
                poll_task: Mutex::new(None),
            }
        })
    }

    pub fn plugin(&self) -> &Arc<MedievalFactions> {
        &self.binding.plugin
    }

    pub fn poller(&self) -> &Arc<DiffPoller> {
        &self.poller
    }

    /// The scheduler task running the poller, once registered.
    pub fn poll_task(&self) -> Option<TaskId> {
        *self.poll_task.lock()
    }
}

#[async_trait]
impl FactionsApi for MedievalFactionsApi {
    fn provider(&self) -> &Provider {
        self.binding.context.provider()
    }

    fn factions(&self) -> BridgeResult<Vec<FactionRef>> {
        Ok(self
            .binding
            .plugin
            .factions()
            .into_iter()
            .map(|f| self.binding.faction(f))
            .collect())
    }

    fn faction(&self, id: &str) -> BridgeResult<Option<FactionRef>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
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
            .world_name("MedievalFactionsApi", coords.world)?;
        self.binding.claim(&world, coords.x, coords.z)
    }

    fn fplayer(&self, player: &OfflinePlayer) -> BridgeResult<FPlayerRef> {
        self.binding.plugin.power_record(player.uuid);
        Ok(self.binding.fplayer(player.uuid))
    }

    fn fplayer_by_id(&self, id: Uuid) -> BridgeResult<Option<FPlayerRef>> {
        Ok(self.binding.knows(id).then(|| self.binding.fplayer(id)))
    }

    fn fplayer_by_name(&self, name: &str) -> BridgeResult<Option<FPlayerRef>> {
        Ok(self
            .binding
            .context
            .host()
            .offline_player_by_name(name)
            .filter(|player| self.binding.knows(player.uuid))
            .map(|player| self.binding.fplayer(player.uuid)))
    }

    /// Every member of every faction.
    fn fplayers(&self) -> BridgeResult<Vec<FPlayerRef>> {
        let players: BTreeSet<Uuid> = self
            .binding
            .plugin
            .factions()
            .iter()
            .flat_map(|f| f.members())
            .collect();
        Ok(players.into_iter().map(|p| self.binding.fplayer(p)).collect())
    }

    fn wilderness(&self) -> BridgeResult<Option<FactionRef>> {
        self.binding.context.unsupported("wilderness")
    }

    fn safe_zone(&self) -> BridgeResult<Option<FactionRef>> {
        self.binding.context.unsupported("safe_zone")
    }

    fn war_zone(&self) -> BridgeResult<Option<FactionRef>> {
        self.binding.context.unsupported("war_zone")
    }

    /// Medieval Factions cannot create a faction without an owner.
    async fn create_faction(&self, _name: &str) -> BridgeResult<FactionRef> {
        Err(self.binding.context.unsupported_error("create_faction"))
    }

    async fn delete_faction(&self, faction: &dyn Faction) -> BridgeResult<()> {
        let faction = unwrap_faction::<MedievalFaction>(&self.binding.context, faction)?;
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
        if self.provider().polled {
            // Baseline now, so changes made before the first scheduled pass count.
            self.poller.poll().await?;
            *self.poll_task.lock() = Some(self.poller.start());
        }
        Ok(())
    }

    fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }
}
