use super::{MassiveBinding, ROLE_ALIASES};
use crate::adapter::Adapter;
use crate::error::BridgeResult;
use crate::model::{FPlayer, FactionRef, Role};
use host_event_system::OfflinePlayer;
use native_factions::massive::entity::{MPlayer, Rel};
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

pub struct MassiveFPlayer {
    base: Adapter<MPlayer>,
    binding: Arc<MassiveBinding>,
}

impl MassiveFPlayer {
    pub(crate) fn new(binding: Arc<MassiveBinding>, native: Arc<MPlayer>) -> Self {
        Self {
            base: Adapter::new(native, binding.context.clone()),
            binding,
        }
    }

    pub fn native(&self) -> &Arc<MPlayer> {
        self.base.native()
    }
}

impl std::fmt::Debug for MassiveFPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MassiveFPlayer")
            .field("id", &self.native().id())
            .field("name", &self.native().name())
            .finish()
    }
}

impl FPlayer for MassiveFPlayer {
    fn provider_id(&self) -> &'static str {
        self.base.provider_id()
    }

    fn unique_id(&self) -> Uuid {
        self.native().id()
    }

    fn name(&self) -> String {
        self.native().name().to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn faction(&self) -> BridgeResult<Option<FactionRef>> {
        let faction = self.binding.plugin.faction_of(self.native());
        Ok(Some(self.binding.faction(faction)))
    }

    fn role(&self) -> BridgeResult<Role> {
        if !self.native().has_faction() {
            return Ok(Role::Factionless);
        }
        Ok(ROLE_ALIASES.resolve(self.native().rel().name()))
    }

    fn set_role(&self, role: Role) -> BridgeResult<()> {
        let rel = match ROLE_ALIASES.native_name(role) {
            Some("LEADER") => Rel::Leader,
            Some("OFFICER") => Rel::Officer,
            Some("MEMBER") => Rel::Member,
            Some("RECRUIT") => Rel::Recruit,
            _ => return self.base.unsupported("set_role"),
        };
        if !self.native().has_faction() {
            return self.base.unsupported("set_role");
        }
        self.native().set_rel(rel);
        Ok(())
    }

    fn power(&self) -> BridgeResult<f64> {
        Ok(self.native().power())
    }

    fn max_power(&self) -> BridgeResult<f64> {
        Ok(self.native().power_max())
    }

    fn title(&self) -> BridgeResult<String> {
        Ok(self.native().title().unwrap_or_default())
    }

    fn set_title(&self, title: &str) -> BridgeResult<()> {
        let title = Some(title.to_string()).filter(|t| !t.is_empty());
        self.native().set_title(title);
        Ok(())
    }

    fn is_online(&self) -> bool {
        self.native().is_online()
    }

    fn offline_player(&self) -> Option<OfflinePlayer> {
        self.base.context().host().offline_player(self.native().id())
    }
}
