//! Events MassiveCraft Factions publishes under the plugin name.

use super::entity::{Faction, MPlayer, PS};
use host_event_system::{CancelFlag, NativeEvent};
use std::collections::HashMap;
use std::sync::Arc;

pub const FACTIONS_CREATE: &str = "factions_create";
pub const FACTIONS_DISBAND: &str = "factions_disband";
pub const FACTIONS_NAME_CHANGE: &str = "factions_name_change";
pub const FACTIONS_CHUNKS_CHANGE: &str = "factions_chunks_change";
pub const FACTIONS_MEMBERSHIP_CHANGE: &str = "factions_membership_change";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChangeReason {
    Create,
    Leader,
    Rank,
    Join,
    Leave,
    Kick,
    Disband,
}

impl MembershipChangeReason {
    pub fn name(&self) -> &'static str {
        match self {
            MembershipChangeReason::Create => "CREATE",
            MembershipChangeReason::Leader => "LEADER",
            MembershipChangeReason::Rank => "RANK",
            MembershipChangeReason::Join => "JOIN",
            MembershipChangeReason::Leave => "LEAVE",
            MembershipChangeReason::Kick => "KICK",
            MembershipChangeReason::Disband => "DISBAND",
        }
    }
}

/// Published before the faction is stored. The id is already reserved.
#[derive(Debug)]
pub struct EventFactionsCreate {
    pub faction_id: String,
    pub faction_name: String,
    pub sender: Option<Arc<MPlayer>>,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct EventFactionsDisband {
    pub faction: Arc<Faction>,
    pub sender: Option<Arc<MPlayer>>,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct EventFactionsNameChange {
    pub faction: Arc<Faction>,
    pub new_name: String,
    pub sender: Option<Arc<MPlayer>>,
    pub cancel: CancelFlag,
}

/// One transaction moving a set of chunks to `new_faction`.
///
/// Unclaiming is a change to the wilderness faction. `old_faction_chunks`
/// groups the chunks by the faction that held them before, keyed by id.
#[derive(Debug)]
pub struct EventFactionsChunksChange {
    pub new_faction: Arc<Faction>,
    pub chunks: Vec<PS>,
    pub old_chunk_faction: HashMap<PS, Arc<Faction>>,
    pub old_faction_chunks: HashMap<String, (Arc<Faction>, Vec<PS>)>,
    pub sender: Option<Arc<MPlayer>>,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct EventFactionsMembershipChange {
    pub mplayer: Arc<MPlayer>,
    pub new_faction: Arc<Faction>,
    pub reason: MembershipChangeReason,
    pub sender: Option<Arc<MPlayer>>,
    pub cancel: CancelFlag,
}

macro_rules! cancellable_event {
    ($($event:ty => $name:expr),* $(,)?) => {
        $(
            impl NativeEvent for $event {
                fn event_name(&self) -> &'static str {
                    $name
                }

                fn cancel_flag(&self) -> Option<&CancelFlag> {
                    Some(&self.cancel)
                }
            }
        )*
    };
}

cancellable_event! {
    EventFactionsCreate => FACTIONS_CREATE,
    EventFactionsDisband => FACTIONS_DISBAND,
    EventFactionsNameChange => FACTIONS_NAME_CHANGE,
    EventFactionsChunksChange => FACTIONS_CHUNKS_CHANGE,
    EventFactionsMembershipChange => FACTIONS_MEMBERSHIP_CHANGE,
}
