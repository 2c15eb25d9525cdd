use super::UuidBinding;
use crate::adapter::{unwrap_faction, Adapter};
use crate::error::BridgeResult;
use crate::model::{ClaimRef, FPlayerRef, Faction, Relationship};
use async_trait::async_trait;
use host_event_system::Location;
use native_factions::factions_uuid::faction::Faction as NativeFaction;
use native_factions::factions_uuid::types::LazyLocation;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub struct UuidFaction {
    base: Adapter<NativeFaction>,
    binding: Arc<UuidBinding>,
}

impl UuidFaction {
    pub(crate) fn new(binding: Arc<UuidBinding>, native: Arc<NativeFaction>) -> Self {
        Self {
            base: Adapter::new(native, binding.context.clone()),
            binding,
        }
    }

    pub fn native(&self) -> &Arc<NativeFaction> {
        self.base.native()
    }

    fn to_location(&self, lazy: &LazyLocation) -> BridgeResult<Location> {
        let world = self.base.context().world_id("UuidFaction", &lazy.world_name)?;
        Ok(Location::new(world, lazy.x, lazy.y, lazy.z))
    }

    fn fork_field(&self, operation: &'static str) -> BridgeResult<i64> {
        match &self.binding.fork {
            Some(fork) => fork.read(&self.base, operation),
            None => self.base.unsupported(operation),
        }
    }
}

impl std::fmt::Debug for UuidFaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UuidFaction")
            .field("id", &self.native().id())
            .field("tag", &self.native().tag())
            .finish()
    }
}

#[async_trait]
impl Faction for UuidFaction {
    fn provider_id(&self) -> &'static str {
        self.base.provider_id()
    }

    fn id(&self) -> String {
        self.native().id().to_string()
    }

    fn name(&self) -> String {
        self.native().tag()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn is_wilderness(&self) -> bool {
        self.native().is_wilderness()
    }

    fn is_safe_zone(&self) -> bool {
        self.native().is_safe_zone()
    }

    fn is_war_zone(&self) -> bool {
        self.native().is_war_zone()
    }

    async fn set_name(&self, name: &str) -> BridgeResult<()> {
        self.binding
            .plugin
            .rename(self.native().id(), name, None)
            .await?;
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
        Ok(self.native().founded_date())
    }

    fn leader(&self) -> BridgeResult<Option<FPlayerRef>> {
        Ok(self
            .binding
            .plugin
            .admin_of(self.native())
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
            .map(|location| self.binding.claim(location))
            .collect();
        self.base.degrade(claims, "claims")
    }

    fn power(&self) -> BridgeResult<f64> {
        Ok(self.binding.plugin.power_of(self.native()))
    }

    fn bank(&self) -> BridgeResult<f64> {
        Ok(self.native().money())
    }

    fn points(&self) -> BridgeResult<i64> {
        self.fork_field("points")
    }

    fn strikes(&self) -> BridgeResult<i64> {
        self.fork_field("strikes")
    }

    fn warps(&self) -> BridgeResult<HashMap<String, Location>> {
        let warps = self
            .native()
            .warps()
            .iter()
            .map(|(name, lazy)| -> BridgeResult<(String, Location)> {
                Ok((name.clone(), self.to_location(lazy)?))
            })
            .collect();
        self.base.degrade(warps, "warps")
    }

    fn home(&self) -> BridgeResult<Option<Location>> {
        let home = self
            .native()
            .home()
            .map(|lazy| self.to_location(&lazy))
            .transpose();
        self.base.degrade(home, "home")
    }

    fn set_home(&self, home: Option<Location>) -> BridgeResult<()> {
        let lazy = match home {
            Some(location) => {
                let world = self
                    .base
                    .context()
                    .world_name("UuidFaction", location.world)?;
                Some(LazyLocation::new(world, location.x, location.y, location.z))
            }
            None => None,
        };
        self.native().set_home(lazy);
        Ok(())
    }

    fn relationship_to(&self, other: &dyn Faction) -> BridgeResult<Relationship> {
        let other = unwrap_faction::<UuidFaction>(self.base.context(), other)?;
        let relation = self.native().relation_to(other.native());
        Ok(Relationship::from_native(relation.name()))
    }
}
