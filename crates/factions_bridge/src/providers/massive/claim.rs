use super::MassiveBinding;
use crate::adapter::Adapter;
use crate::error::BridgeResult;
use crate::model::{ChunkCoords, Claim, FactionRef};
use native_factions::massive::entity::PS;
use std::any::Any;
use std::sync::Arc;

pub struct MassiveClaim {
    base: Adapter<PS>,
    binding: Arc<MassiveBinding>,
    coords: ChunkCoords,
}

impl MassiveClaim {
    pub(crate) fn new(binding: Arc<MassiveBinding>, ps: PS) -> BridgeResult<Self> {
        let world = binding.context.world_id("MassiveClaim", &ps.world)?;
        Ok(Self {
            coords: ChunkCoords::new(world, ps.chunk_x, ps.chunk_z),
            base: Adapter::new(Arc::new(ps), binding.context.clone()),
            binding,
        })
    }

    pub fn ps(&self) -> &PS {
        self.base.native()
    }
}

impl std::fmt::Debug for MassiveClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MassiveClaim({})", self.ps())
    }
}

impl Claim for MassiveClaim {
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
        let owner = self.binding.plugin.faction_at(self.ps());
        Ok(Some(self.binding.faction(owner)))
    }
}
