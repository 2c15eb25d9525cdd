use super::MedievalBinding;
use crate::adapter::Adapter;
use crate::error::BridgeResult;
use crate::model::{FPlayer, FactionRef, Role};
use host_event_system::OfflinePlayer;
use native_factions::medieval::objects::PowerRecord;
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

/// A player as Medieval Factions sees it: a UUID with a power record.
pub struct MedievalFPlayer {
    base: Adapter<Uuid>,
    binding: Arc<MedievalBinding>,
}

impl MedievalFPlayer {
    pub(crate) fn new(binding: Arc<MedievalBinding>, player: Uuid) -> Self {
        Self {
            base: Adapter::new(Arc::new(player), binding.context.clone()),
            binding,
        }
    }

    fn id(&self) -> Uuid {
        **self.base.native()
    }
}

impl std::fmt::Debug for MedievalFPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MedievalFPlayer").field(&self.id()).finish()
    }
}

impl FPlayer for MedievalFPlayer {
    fn provider_id(&self) -> &'static str {
        self.base.provider_id()
    }

    fn unique_id(&self) -> Uuid {
        self.id()
    }

    /// The host's name for the player, or the UUID if the host never saw them.
    fn name(&self) -> String {
        self.offline_player()
            .map(|player| player.name)
            .unwrap_or_else(|| self.id().to_string())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn faction(&self) -> BridgeResult<Option<FactionRef>> {
        Ok(self
            .binding
            .plugin
            .faction_of_player(self.id())
            .map(|f| self.binding.faction(f)))
    }

    fn role(&self) -> BridgeResult<Role> {
        let Some(faction) = self.binding.plugin.faction_of_player(self.id()) else {
            return Ok(Role::Factionless);
        };
        let role = if faction.owner() == self.id() {
            Role::Leader
        } else if faction.is_officer(self.id()) {
            Role::Officer
        } else {
            Role::Normal
        };
        Ok(role)
    }

    fn set_role(&self, role: Role) -> BridgeResult<()> {
        let Some(faction) = self.binding.plugin.faction_of_player(self.id()) else {
            return self.base.unsupported("set_role");
        };
        match role {
            Role::Leader => {
                let previous = faction.owner();
                faction.set_owner(self.id());
                faction.remove_officer(self.id());
                faction.add_officer(previous);
            }
            Role::Officer => {
                faction.add_officer(self.id());
            }
            Role::Normal => {
                faction.remove_officer(self.id());
            }
            _ => return self.base.unsupported("set_role"),
        }
        Ok(())
    }

    fn power(&self) -> BridgeResult<f64> {
        Ok(self.binding.plugin.power_record(self.id()).power() as f64)
    }

    fn max_power(&self) -> BridgeResult<f64> {
        Ok(PowerRecord::MAX_POWER as f64)
    }

    fn title(&self) -> BridgeResult<String> {
        self.base.unsupported("title")
    }

    fn set_title(&self, _title: &str) -> BridgeResult<()> {
        self.base.unsupported("set_title")
    }

    fn is_online(&self) -> bool {
        self.offline_player().is_some_and(|player| player.online)
    }

    fn offline_player(&self) -> Option<OfflinePlayer> {
        self.base.context().host().offline_player(self.id())
    }
}
