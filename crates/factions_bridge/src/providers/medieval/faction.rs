use super::MedievalBinding;
use crate::adapter::{unwrap_faction, Adapter};
use crate::error::BridgeResult;
use crate::model::{ClaimRef, FPlayerRef, Faction, Relationship};
use async_trait::async_trait;
use host_event_system::Location;
use native_factions::medieval::objects::{Faction as NativeFaction, Home};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub struct MedievalFaction {
    base: Adapter<NativeFaction>,
    binding: Arc<MedievalBinding>,
}

impl MedievalFaction {
    pub(crate) fn new(binding: Arc<MedievalBinding>, native: Arc<NativeFaction>) -> Self {
        Self {
            base: Adapter::new(native, binding.context.clone()),
            binding,
        }
    }

    pub fn native(&self) -> &Arc<NativeFaction> {
        self.base.native()
    }
}

impl std::fmt::Debug for MedievalFaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedievalFaction")
            .field("id", &self.native().id())
            .field("name", &self.native().name())
            .finish()
    }
}

#[async_trait]
impl Faction for MedievalFaction {
    fn provider_id(&self) -> &'static str {
        self.base.provider_id()
    }

    fn id(&self) -> String {
        self.native().id().to_string()
    }

    fn name(&self) -> String {
        self.native().name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_wilderness(&self) -> bool {
        false
    }

    fn is_safe_zone(&self) -> bool {
        false
    }

    fn is_war_zone(&self) -> bool {
        false
    }

    /// Silent in Medieval Factions; the poller reports the rename.
    async fn set_name(&self, name: &str) -> BridgeResult<()> {
        self.binding.plugin.rename(self.native().id(), name)?;
        Ok(())
    }

    fn description(&self) -> BridgeResult<String> {
        Ok(self.native().description())
    }

    fn set_description(&self, description: &str) -> BridgeResult<()> {
        self.native().set_description(description);
        Ok(())
    }

    fn founded(&self) -> BridgeResult<u64> {
        Ok(self.native().created_millis())
    }

    fn leader(&self) -> BridgeResult<Option<FPlayerRef>> {
        Ok(Some(self.binding.fplayer(self.native().owner())))
    }

    fn members(&self) -> BridgeResult<Vec<FPlayerRef>> {
        let mut members = self.native().members();
        members.sort();
        Ok(members.into_iter().map(|m| self.binding.fplayer(m)).collect())
    }

    fn claims(&self) -> BridgeResult<Vec<ClaimRef>> {
        let claims = self
            .binding
            .plugin
            .claims_of(&self.native().name())
            .iter()
            .map(|chunk| self.binding.claim(chunk.world(), chunk.x(), chunk.z()))
            .collect();
        self.base.degrade(claims, "claims")
    }

    /// Member power plus bonus power.
    fn power(&self) -> BridgeResult<f64> {
        Ok(self.binding.plugin.cumulative_power(self.native()) as f64)
    }

    fn bank(&self) -> BridgeResult<f64> {
        self.base.unsupported("bank")
    }

    fn points(&self) -> BridgeResult<i64> {
        self.base.unsupported("points")
    }

    fn strikes(&self) -> BridgeResult<i64> {
        self.base.unsupported("strikes")
    }

    fn warps(&self) -> BridgeResult<HashMap<String, Location>> {
        self.base.unsupported("warps")
    }

    fn home(&self) -> BridgeResult<Option<Location>> {
        let home = match self.native().home() {
            Some(home) => self
                .base
                .context()
                .world_id("MedievalFaction", &home.world)
                .map(|world| Some(Location::new(world, home.x, home.y, home.z))),
            None => Ok(None),
        };
        self.base.degrade(home, "home")
    }

    fn set_home(&self, home: Option<Location>) -> BridgeResult<()> {
        let home = match home {
            Some(location) => Some(Home {
                world: self
                    .base
                    .context()
                    .world_name("MedievalFaction", location.world)?,
                x: location.x,
                y: location.y,
                z: location.z,
            }),
            None => None,
        };
        self.native().set_home(home);
        Ok(())
    }

    /// Diplomacy is stored by name on both sides.
    fn relationship_to(&self, other: &dyn Faction) -> BridgeResult<Relationship> {
        let other = unwrap_faction::<MedievalFaction>(self.base.context(), other)?;
        let (this, other) = (self.native(), other.native());
        let relationship = if this.id() == other.id() {
            Relationship::Member
        } else if this.is_ally(&other.name()) {
            Relationship::Ally
        } else if this.is_enemy(&other.name()) {
            Relationship::Enemy
        } else {
            Relationship::Neutral
        };
        Ok(relationship)
    }
}
