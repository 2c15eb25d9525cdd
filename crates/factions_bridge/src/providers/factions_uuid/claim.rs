use super::UuidBinding;
use crate::adapter::Adapter;
use crate::error::BridgeResult;
use crate::model::{ChunkCoords, Claim, FactionRef};
use native_factions::factions_uuid::types::FLocation;
use std::any::Any;
use std::sync::Arc;

pub struct UuidClaim {
    base: Adapter<FLocation>,
    binding: Arc<UuidBinding>,
    coords: ChunkCoords,
}

impl UuidClaim {
    pub(crate) fn new(binding: Arc<UuidBinding>, location: FLocation) -> BridgeResult<Self> {
        let world = binding.context.world_id("UuidClaim", &location.world_name)?;
        Ok(Self {
            coords: ChunkCoords::new(world, location.x, location.z),
            base: Adapter::new(Arc::new(location), binding.context.clone()),
            binding,
        })
    }

    pub fn location(&self) -> &FLocation {
        self.base.native()
    }
}

impl std::fmt::Debug for UuidClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UuidClaim({})", self.location())
    }
}

impl Claim for UuidClaim {
    fn provider_id(&self) -> &'static str {
        self.base.provider_id()
    }

    fn coords(&self) -> ChunkCoords {
        self.coords
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn faction(&self) -> BridgeResult<Option<FactionRef>> {
        let owner = self.binding.plugin.faction_at(self.location());
        Ok(Some(self.binding.faction(owner)))
    }
}
