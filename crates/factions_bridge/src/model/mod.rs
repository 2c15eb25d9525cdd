//! The provider-agnostic model downstream plugins program against.

pub mod claim;
pub mod faction;
pub mod player;
pub mod provider;
pub mod reason;
pub mod relationship;
pub mod role;

pub use claim::{ChunkCoords, Claim, ClaimRef};
pub use faction::{Faction, FactionRef};
pub use player::{FPlayer, FPlayerRef};
pub use provider::Provider;
pub use reason::{DisbandReason, LeaveReason};
pub use relationship::Relationship;
pub use role::{Role, RoleAliases};
