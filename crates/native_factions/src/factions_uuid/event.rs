//! Events FactionsUUID publishes on the host bus under the plugin name.

use super::faction::Faction;
use super::fplayer::FPlayer;
use super::types::FLocation;
use host_event_system::{CancelFlag, NativeEvent};
use std::sync::Arc;

pub const FACTION_CREATE: &str = "faction_create";
pub const FACTION_DISBAND: &str = "faction_disband";
pub const FACTION_RENAME: &str = "faction_rename";
pub const LAND_CLAIM: &str = "land_claim";
pub const LAND_UNCLAIM: &str = "land_unclaim";
pub const LAND_UNCLAIM_ALL: &str = "land_unclaim_all";
pub const FPLAYER_JOIN: &str = "fplayer_join";
pub const FPLAYER_LEAVE: &str = "fplayer_leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerDisbandReason {
    Command,
    Plugin,
    Inactivity,
    Leave,
}

impl PlayerDisbandReason {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerDisbandReason::Command => "COMMAND",
            PlayerDisbandReason::Plugin => "PLUGIN",
            PlayerDisbandReason::Inactivity => "INACTIVITY",
            PlayerDisbandReason::Leave => "LEAVE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerLeaveReason {
    Kicked,
    Disband,
    Reset,
    JoinOther,
    Leave,
    Banned,
}

impl PlayerLeaveReason {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerLeaveReason::Kicked => "KICKED",
            PlayerLeaveReason::Disband => "DISBAND",
            PlayerLeaveReason::Reset => "RESET",
            PlayerLeaveReason::JoinOther => "JOINOTHER",
            PlayerLeaveReason::Leave => "LEAVE",
            PlayerLeaveReason::Banned => "BANNED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerJoinReason {
    Create,
    Leader,
    Command,
}

/// Published before the faction exists; the faction id is not known yet.
#[derive(Debug)]
pub struct FactionCreateEvent {
    pub tag: String,
    pub fplayer: Option<Arc<FPlayer>>,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct FactionDisbandEvent {
    pub faction: Arc<Faction>,
    pub fplayer: Option<Arc<FPlayer>>,
    pub reason: PlayerDisbandReason,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct FactionRenameEvent {
    pub faction: Arc<Faction>,
    pub fplayer: Option<Arc<FPlayer>>,
    pub new_tag: String,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct LandClaimEvent {
    pub location: FLocation,
    pub faction: Arc<Faction>,
    pub fplayer: Option<Arc<FPlayer>>,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct LandUnclaimEvent {
    pub location: FLocation,
    pub faction: Arc<Faction>,
    pub fplayer: Option<Arc<FPlayer>>,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct LandUnclaimAllEvent {
    pub faction: Arc<Faction>,
    pub fplayer: Option<Arc<FPlayer>>,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct FPlayerJoinEvent {
    pub fplayer: Arc<FPlayer>,
    pub faction: Arc<Faction>,
    pub reason: PlayerJoinReason,
    pub cancel: CancelFlag,
}

#[derive(Debug)]
pub struct FPlayerLeaveEvent {
    pub fplayer: Arc<FPlayer>,
    pub faction: Arc<Faction>,
    pub reason: PlayerLeaveReason,
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
    FactionCreateEvent => FACTION_CREATE,
    FactionDisbandEvent => FACTION_DISBAND,
    FactionRenameEvent => FACTION_RENAME,
    LandClaimEvent => LAND_CLAIM,
    LandUnclaimEvent => LAND_UNCLAIM,
    LandUnclaimAllEvent => LAND_UNCLAIM_ALL,
    FPlayerJoinEvent => FPLAYER_JOIN,
    FPlayerLeaveEvent => FPLAYER_LEAVE,
}
