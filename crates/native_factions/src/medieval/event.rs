//! The only two events Medieval Factions publishes.

use super::objects::Faction;
use host_event_system::{CancelFlag, NativeEvent};
use std::sync::Arc;
use uuid::Uuid;

pub const FACTION_CREATE: &str = "faction_create";
pub const FACTION_DISBAND: &str = "faction_disband";

/// Carries the fully built faction, which is stored once dispatch ends.
#[derive(Debug)]
pub struct FactionCreateEvent {
    pub faction: Arc<Faction>,
    pub creator: Uuid,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct FactionDisbandEvent {
    pub faction: Arc<Faction>,
    pub disbander: Option<Uuid>,
    pub cancel: CancelFlag,
}

impl NativeEvent for FactionCreateEvent {
    fn event_name(&self) -> &'static str {
        FACTION_CREATE
    }

    fn cancel_flag(&self) -> Option<&CancelFlag> {
        Some(&self.cancel)
    }
}

impl NativeEvent for FactionDisbandEvent {
    fn event_name(&self) -> &'static str {
        FACTION_DISBAND
    }

    fn cancel_flag(&self) -> Option<&CancelFlag> {
        Some(&self.cancel)
    }
}
