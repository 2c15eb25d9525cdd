use super::MedievalBinding;
use crate::error::BridgeResult;
use crate::model::{ChunkCoords, Claim, FactionRef};
use std::any::Any;
use std::sync::Arc;

/// A chunk, claimed or not. The holder is looked up on demand.
pub struct MedievalClaim {
    binding: Arc<MedievalBinding>,
    world: String,
    coords: ChunkCoords,
}

impl MedievalClaim {
    pub(crate) fn new(binding: Arc<MedievalBinding>, world: &str, x: i32, z: i32) -> BridgeResult<Self> {
        let world_id = binding.context.world_id("MedievalClaim", world)?;
        Ok(Self {
            binding,
            world: world.to_string(),
            coords: ChunkCoords::new(world_id, x, z),
        })
    }

    pub fn world_name(&self) -> &str {
        &self.world
    }
}

impl std::fmt::Debug for MedievalClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MedievalClaim({}:{},{})", self.world, self.coords.x, self.coords.z)
    }
}

impl Claim for MedievalClaim {
    fn provider_id(&self) -> &'static str {
        self.binding.context.provider_id()
    }

    fn coords(&self) -> ChunkCoords {
        self.coords
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn faction(&self) -> BridgeResult<Option<FactionRef>> {
        let plugin = &self.binding.plugin;
        let Some(chunk) = plugin.claimed_chunk(&self.world, self.coords.x, self.coords.z) else {
            return Ok(None);
        };
        let holder = chunk.holder();
        match plugin.faction_by_name(&holder) {
            Some(faction) => Ok(Some(self.binding.faction(faction))),
            None => self.binding.context.method_error(
                "MedievalClaim",
                "faction",
                format!("claim holder {holder} is not a faction"),
            ),
        }
    }
}
