use super::FactionRef;
use crate::error::BridgeResult;
use host_event_system::{Location, WorldId};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub type ClaimRef = Arc<dyn Claim>;

/// A chunk column in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoords {
    pub world: WorldId,
    pub x: i32,
    pub z: i32,
}

impl ChunkCoords {
    pub fn new(world: WorldId, x: i32, z: i32) -> Self {
        Self { world, x, z }
    }

    /// Chunk containing `location`.
    pub fn of(location: &Location) -> Self {
        let (x, z) = location.chunk();
        Self::new(location.world, x, z)
    }
}

impl std::fmt::Display for ChunkCoords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}, {}]", self.world, self.x, self.z)
    }
}

/// A chunk and whoever holds it.
///
/// Two claims are equal when their coordinates are, whichever adapter or
/// call site produced them.
pub trait Claim: Send + Sync + std::fmt::Debug {
    fn provider_id(&self) -> &'static str;

    fn coords(&self) -> ChunkCoords;

    fn world(&self) -> WorldId {
        self.coords().world
    }

    fn x(&self) -> i32 {
        self.coords().x
    }

    fn z(&self) -> i32 {
        self.coords().z
    }

    fn as_any(&self) -> &dyn Any;

    /// Owning faction; `None` for unclaimed land on providers without a
    /// wilderness faction.
    fn faction(&self) -> BridgeResult<Option<FactionRef>>;
}

impl PartialEq for dyn Claim {
    fn eq(&self, other: &Self) -> bool {
        self.coords() == other.coords()
    }
}

impl Eq for dyn Claim {}

impl Hash for dyn Claim {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coords().hash(state);
    }
}
