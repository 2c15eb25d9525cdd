use super::MassiveBinding;
use crate::adapter::{unwrap_faction, Adapter};
use crate::error::BridgeResult;
use crate::model::{ClaimRef, FPlayerRef, Faction, Relationship};
use async_trait::async_trait;
use host_event_system::Location;
use native_factions::massive::entity::{Faction as NativeFaction, Home};
use native_factions::massive::{SAFEZONE_ID, WARZONE_ID};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub struct MassiveFaction {
    base: Adapter<NativeFaction>,
    binding: Arc<MassiveBinding>,
}

impl MassiveFaction {
    pub(crate) fn new(binding: Arc<MassiveBinding>, native: Arc<NativeFaction>) -> Self {
        Self {
            base: Adapter::new(native, binding.context.clone()),
            binding,
        }
    }

    pub fn native(&self) -> &Arc<NativeFaction> {
        self.base.native()
    }
}

impl std::fmt::Debug for MassiveFaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MassiveFaction")
            .field("id", &self.native().id())
            .field("name", &self.native().name())
            .finish()
    }
}

#[async_trait]
impl Faction for MassiveFaction {
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
        self.native().is_none()
    }

    fn is_safe_zone(&self) -> bool {
        self.native().id() == SAFEZONE_ID
    }

    fn is_war_zone(&self) -> bool {
        self.native().id() == WARZONE_ID
    }

    async fn set_name(&self, name: &str) -> BridgeResult<()> {
        self.binding
            .plugin
            .rename(self.native().id(), name, None)
            .await?;
        Ok(())
    }

    fn description(&self) -> BridgeResult<String> {
        Ok(self.native().description().unwrap_or_default())
    }

    fn set_description(&self, description: &str) -> BridgeResult<()> {
        let description = Some(description.to_string()).filter(|d| !d.is_empty());
        self.native().set_description(description);
        Ok(())
    }

    fn founded(&self) -> BridgeResult<u64> {
        Ok(self.native().created_at_millis())
    }

    fn leader(&self) -> BridgeResult<Option<FPlayerRef>> {
        Ok(self
            .binding
            .plugin
            .leader_of(self.native())
            .map(|p| self.binding.fplayer(p)))
    }

    fn members(&self) -> BridgeResult<Vec<FPlayerRef>> {
        Ok(self
            .binding
            .plugin
            .members_of(self.native())
            .into_iter()
            .map(|p| self.binding.fplayer(p))
            .collect())
    }

    fn claims(&self) -> BridgeResult<Vec<ClaimRef>> {
        let claims = self
            .binding
            .plugin
            .claims_of(self.native().id())
            .into_iter()
            .map(|ps| self.binding.claim(ps))
            .collect();
        self.base.degrade(claims, "claims")
    }

    /// Sum of member power plus the faction's boost.
    fn power(&self) -> BridgeResult<f64> {
        Ok(self.binding.plugin.power_of(self.native()))
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
                .world_id("MassiveFaction", &home.world)
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
                    .world_name("MassiveFaction", location.world)?,
                x: location.x,
                y: location.y,
                z: location.z,
            }),
            None => None,
        };
        self.native().set_home(home);
        Ok(())
    }

    fn relationship_to(&self, other: &dyn Faction) -> BridgeResult<Relationship> {
        let other = unwrap_faction::<MassiveFaction>(self.base.context(), other)?;
        let rel = self.native().relation_to(other.native());
        Ok(Relationship::from_native(rel.name()))
    }
}
