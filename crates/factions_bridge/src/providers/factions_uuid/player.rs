use super::{UuidBinding, ROLE_ALIASES};
use crate::adapter::Adapter;
use crate::error::BridgeResult;
use crate::model::{FPlayer, FactionRef, Role};
use host_event_system::OfflinePlayer;
use native_factions::factions_uuid::fplayer::FPlayer as NativeFPlayer;
use native_factions::factions_uuid::types::Role as NativeRole;
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

pub struct UuidFPlayer {
    base: Adapter<NativeFPlayer>,
    binding: Arc<UuidBinding>,
}

impl UuidFPlayer {
    pub(crate) fn new(binding: Arc<UuidBinding>, native: Arc<NativeFPlayer>) -> Self {
        Self {
            base: Adapter::new(native, binding.context.clone()),
            binding,
        }
    }

    pub fn native(&self) -> &Arc<NativeFPlayer> {
        self.base.native()
    }
}

impl std::fmt::Debug for UuidFPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UuidFPlayer")
            .field("id", &self.native().id())
            .field("name", &self.native().name())
            .finish()
    }
}

fn native_role(role: Role) -> Option<NativeRole> {
    match ROLE_ALIASES.native_name(role)? {
        "admin" => Some(NativeRole::Admin),
        "coleader" => Some(NativeRole::Coleader),
        "moderator" => Some(NativeRole::Moderator),
        "normal member" => Some(NativeRole::Normal),
        "recruit" => Some(NativeRole::Recruit),
        _ => None,
    }
}

impl FPlayer for UuidFPlayer {
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
        Ok(ROLE_ALIASES.resolve(self.native().role().nice_name()))
    }

    fn set_role(&self, role: Role) -> BridgeResult<()> {
        match native_role(role) {
            Some(role) if self.native().has_faction() => {
                self.native().set_role(role);
                Ok(())
            }
            _ => self.base.unsupported("set_role"),
        }
    }

    fn power(&self) -> BridgeResult<f64> {
        Ok(self.native().power())
    }

    fn max_power(&self) -> BridgeResult<f64> {
        Ok(NativeFPlayer::MAX_POWER)
    }

    fn title(&self) -> BridgeResult<String> {
        Ok(self.native().title())
    }

    fn set_title(&self, title: &str) -> BridgeResult<()> {
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
