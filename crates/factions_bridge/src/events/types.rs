use super::{NativeRef, UnifiedEvent};
use crate::model::{ClaimRef, DisbandReason, FPlayerRef, FactionRef, LeaveReason};

#[derive(Debug)]
pub struct FactionCreateEvent {
    pub faction: FactionRef,
    pub fplayer: Option<FPlayerRef>,
    pub(crate) native: Option<NativeRef>,
}

#[derive(Debug)]
pub struct FactionDisbandEvent {
    pub faction: FactionRef,
    pub fplayer: Option<FPlayerRef>,
    pub reason: DisbandReason,
    pub(crate) native: Option<NativeRef>,
}

/// `old_name` is the name before the change. Events observed by the poller
/// are published after the fact, so their faction already reports the new
/// name.
#[derive(Debug)]
pub struct FactionRenameEvent {
    pub faction: FactionRef,
    pub fplayer: Option<FPlayerRef>,
    pub old_name: String,
    pub new_name: String,
    pub(crate) native: Option<NativeRef>,
}

#[derive(Debug)]
pub struct FactionClaimEvent {
    pub faction: FactionRef,
    pub claim: ClaimRef,
    pub fplayer: Option<FPlayerRef>,
    pub(crate) native: Option<NativeRef>,
}

#[derive(Debug)]
pub struct FactionUnclaimEvent {
    pub faction: FactionRef,
    pub claim: ClaimRef,
    pub fplayer: Option<FPlayerRef>,
    pub(crate) native: Option<NativeRef>,
}

#[derive(Debug)]
pub struct FactionUnclaimAllEvent {
    pub faction: FactionRef,
    pub fplayer: Option<FPlayerRef>,
    pub(crate) native: Option<NativeRef>,
}

#[derive(Debug)]
pub struct FactionJoinEvent {
    pub faction: FactionRef,
    pub fplayer: FPlayerRef,
    pub(crate) native: Option<NativeRef>,
}

#[derive(Debug)]
pub struct FactionLeaveEvent {
    pub faction: FactionRef,
    pub fplayer: FPlayerRef,
    pub reason: LeaveReason,
    pub(crate) native: Option<NativeRef>,
}

macro_rules! unified_event {
    ($($event:ty => $name:literal),* $(,)?) => {
        $(
            impl UnifiedEvent for $event {
                const EVENT_NAME: &'static str = $name;

                fn native(&self) -> Option<&NativeRef> {
                    self.native.as_ref()
                }
            }
        )*
    };
}

unified_event! {
    FactionCreateEvent => "faction_create",
    FactionDisbandEvent => "faction_disband",
    FactionRenameEvent => "faction_rename",
    FactionClaimEvent => "faction_claim",
    FactionUnclaimEvent => "faction_unclaim",
    FactionUnclaimAllEvent => "faction_unclaim_all",
    FactionJoinEvent => "faction_join",
    FactionLeaveEvent => "faction_leave",
}
