//! MassiveCraft Factions.
//!
//! Land changes are transactional: one [`event::EventFactionsChunksChange`]
//! covers every chunk a command touches, and unclaiming is modelled as
//! moving chunks to the wilderness faction. Membership changes of every
//! kind share one event type distinguished by its reason.

pub mod entity;
pub mod event;

use crate::NativeError;
use dashmap::DashMap;
use entity::{Faction, MPlayer, Rel, PS};
use event::*;
use host_event_system::{current_timestamp_millis, CancelFlag, EventSystem, InstalledPlugin, NativeEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub const PLUGIN_NAME: &str = "Factions";
pub const MAIN_CLASS: &str = "com.massivecraft.factions.Factions";

pub const NONE_ID: &str = "none";
pub const SAFEZONE_ID: &str = "safezone";
pub const WARZONE_ID: &str = "warzone";

pub const CLASSES: &[&str] = &[
    "com.massivecraft.factions.entity.Faction",
    "com.massivecraft.factions.entity.MPlayer",
    "com.massivecraft.factions.entity.BoardColl",
    "com.massivecraft.factions.Rel",
    "com.massivecraft.factions.event.EventFactionsChunksChange",
    "com.massivecraft.factions.event.EventFactionsMembershipChange",
    "com.massivecraft.massivecore.ps.PS",
];

pub struct MassiveFactions {
    events: Arc<EventSystem>,
    factions: DashMap<String, Arc<Faction>>,
    mplayers: DashMap<Uuid, Arc<MPlayer>>,
    board: DashMap<PS, String>,
    none: Arc<Faction>,
    safezone: Arc<Faction>,
    warzone: Arc<Faction>,
}

impl std::fmt::Debug for MassiveFactions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MassiveFactions")
            .field("factions", &self.factions.len())
            .field("mplayers", &self.mplayers.len())
            .field("claims", &self.board.len())
            .finish()
    }
}

impl MassiveFactions {
    pub fn new(events: Arc<EventSystem>) -> Arc<Self> {
        let now = current_timestamp_millis();
        let none = Arc::new(Faction::new(NONE_ID, "Wilderness", now));
        let safezone = Arc::new(Faction::new(SAFEZONE_ID, "SafeZone", now));
        let warzone = Arc::new(Faction::new(WARZONE_ID, "WarZone", now));
        safezone.set_flag("permanent", true);
        warzone.set_flag("permanent", true);

        let factions = DashMap::new();
        for system in [&none, &safezone, &warzone] {
            factions.insert(system.id().to_string(), system.clone());
        }

        Arc::new(Self {
            events,
            factions,
            mplayers: DashMap::new(),
            board: DashMap::new(),
            none,
            safezone,
            warzone,
        })
    }

    pub fn descriptor(self: &Arc<Self>) -> InstalledPlugin {
        InstalledPlugin {
            name: PLUGIN_NAME.to_string(),
            version: "2.14.0".to_string(),
            authors: ["Cayorion", "Madus", "Ulumulu1510", "MarkehMe"]
                .into_iter()
                .map(String::from)
                .collect(),
            main_class: MAIN_CLASS.to_string(),
            classes: CLASSES.iter().map(|c| c.to_string()).collect(),
            enabled: true,
            handle: self.clone(),
        }
    }

    pub fn all_factions(&self) -> Vec<Arc<Faction>> {
        self.factions.iter().map(|f| f.value().clone()).collect()
    }

    pub fn faction(&self, id: &str) -> Option<Arc<Faction>> {
        self.factions.get(id).map(|f| f.value().clone())
    }

    pub fn faction_by_name(&self, name: &str) -> Option<Arc<Faction>> {
        self.factions
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .map(|f| f.value().clone())
    }

    pub fn none(&self) -> Arc<Faction> {
        self.none.clone()
    }

    pub fn safezone(&self) -> Arc<Faction> {
        self.safezone.clone()
    }

    pub fn warzone(&self) -> Arc<Faction> {
        self.warzone.clone()
    }

    pub fn mplayer(&self, id: Uuid) -> Option<Arc<MPlayer>> {
        self.mplayers.get(&id).map(|p| p.value().clone())
    }

    pub fn mplayer_by_name(&self, name: &str) -> Option<Arc<MPlayer>> {
        self.mplayers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .map(|p| p.value().clone())
    }

    pub fn all_mplayers(&self) -> Vec<Arc<MPlayer>> {
        self.mplayers.iter().map(|p| p.value().clone()).collect()
    }

    pub fn get_or_create_mplayer(&self, id: Uuid, name: &str) -> Arc<MPlayer> {
        self.mplayers
            .entry(id)
            .or_insert_with(|| Arc::new(MPlayer::new(id, name)))
            .value()
            .clone()
    }

    pub fn faction_of(&self, mplayer: &MPlayer) -> Arc<Faction> {
        self.faction(&mplayer.faction_id())
            .unwrap_or_else(|| self.none())
    }

    pub fn members_of(&self, faction: &Faction) -> Vec<Arc<MPlayer>> {
        if faction.is_none() {
            return Vec::new();
        }
        self.mplayers
            .iter()
            .filter(|p| p.faction_id() == faction.id())
            .map(|p| p.value().clone())
            .collect()
    }

    pub fn leader_of(&self, faction: &Faction) -> Option<Arc<MPlayer>> {
        self.members_of(faction)
            .into_iter()
            .find(|p| p.rel() == Rel::Leader)
    }

    pub fn power_of(&self, faction: &Faction) -> f64 {
        let members: f64 = self.members_of(faction).iter().map(|p| p.power()).sum();
        members + faction.power_boost()
    }

    pub fn faction_at(&self, ps: &PS) -> Arc<Faction> {
        let owner = self.board.get(ps).map(|id| id.value().clone());
        owner
            .and_then(|id| self.faction(&id))
            .unwrap_or_else(|| self.none())
    }

    pub fn claims_of(&self, faction_id: &str) -> Vec<PS> {
        self.board
            .iter()
            .filter(|entry| entry.value() == faction_id)
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn claim_count(&self, faction_id: &str) -> usize {
        self.board.iter().filter(|entry| entry.value() == faction_id).count()
    }

    pub async fn create_faction(
        &self,
        name: &str,
        creator: Option<Arc<MPlayer>>,
    ) -> Result<Arc<Faction>, NativeError> {
        if self.faction_by_name(name).is_some() {
            return Err(NativeError::FactionExists(name.to_string()));
        }
        if let Some(creator) = creator.as_ref().filter(|c| c.has_faction()) {
            return Err(NativeError::AlreadyMember {
                player: creator.name().to_string(),
                faction: creator.faction_id(),
            });
        }

        let id = Uuid::new_v4().to_string();
        self.call(Arc::new(EventFactionsCreate {
            faction_id: id.clone(),
            faction_name: name.to_string(),
            sender: creator.clone(),
            cancel: CancelFlag::new(),
        }))
        .await?;

        let faction = Arc::new(Faction::new(id.clone(), name, current_timestamp_millis()));
        self.factions.insert(id, faction.clone());

        if let Some(creator) = creator {
            self.events
                .emit_plugin(
                    PLUGIN_NAME,
                    FACTIONS_MEMBERSHIP_CHANGE,
                    Arc::new(EventFactionsMembershipChange {
                        mplayer: creator.clone(),
                        new_faction: faction.clone(),
                        reason: MembershipChangeReason::Create,
                        sender: Some(creator.clone()),
                        cancel: CancelFlag::new(),
                    }),
                )
                .await?;
            creator.set_faction_id(faction.id());
            creator.set_rel(Rel::Leader);
        }

        debug!("Created faction {} ({})", faction.name(), faction.id());
        Ok(faction)
    }

    pub async fn disband(
        &self,
        faction_id: &str,
        sender: Option<Arc<MPlayer>>,
    ) -> Result<(), NativeError> {
        let faction = self.normal_faction(faction_id)?;

        self.call(Arc::new(EventFactionsDisband {
            faction: faction.clone(),
            sender: sender.clone(),
            cancel: CancelFlag::new(),
        }))
        .await?;

        for member in self.members_of(&faction) {
            self.events
                .emit_plugin(
                    PLUGIN_NAME,
                    FACTIONS_MEMBERSHIP_CHANGE,
                    Arc::new(EventFactionsMembershipChange {
                        mplayer: member.clone(),
                        new_faction: self.none(),
                        reason: MembershipChangeReason::Disband,
                        sender: sender.clone(),
                        cancel: CancelFlag::new(),
                    }),
                )
                .await?;
            member.set_faction_id(NONE_ID);
            member.set_rel(Rel::Recruit);
        }
        self.board.retain(|_, owner| *owner != faction.id());
        self.factions.remove(faction.id());
        Ok(())
    }

    pub async fn rename(
        &self,
        faction_id: &str,
        new_name: &str,
        sender: Option<Arc<MPlayer>>,
    ) -> Result<(), NativeError> {
        let faction = self.normal_faction(faction_id)?;
        if self
            .faction_by_name(new_name)
            .is_some_and(|other| other.id() != faction.id())
        {
            return Err(NativeError::FactionExists(new_name.to_string()));
        }

        self.call(Arc::new(EventFactionsNameChange {
            faction: faction.clone(),
            new_name: new_name.to_string(),
            sender,
            cancel: CancelFlag::new(),
        }))
        .await?;

        faction.set_name(new_name);
        Ok(())
    }

    /// Moves every chunk in `chunks` to `new_faction_id` as one transaction.
    /// Pass [`NONE_ID`] to unclaim.
    pub async fn change_chunks(
        &self,
        chunks: Vec<PS>,
        new_faction_id: &str,
        sender: Option<Arc<MPlayer>>,
    ) -> Result<(), NativeError> {
        let new_faction = self
            .faction(new_faction_id)
            .ok_or_else(|| NativeError::UnknownFaction(new_faction_id.to_string()))?;

        let mut old_chunk_faction = HashMap::new();
        let mut old_faction_chunks: HashMap<String, (Arc<Faction>, Vec<PS>)> = HashMap::new();
        for ps in &chunks {
            let old = self.faction_at(ps);
            old_faction_chunks
                .entry(old.id().to_string())
                .or_insert_with(|| (old.clone(), Vec::new()))
                .1
                .push(ps.clone());
            old_chunk_faction.insert(ps.clone(), old);
        }

        self.call(Arc::new(EventFactionsChunksChange {
            new_faction: new_faction.clone(),
            chunks: chunks.clone(),
            old_chunk_faction,
            old_faction_chunks,
            sender,
            cancel: CancelFlag::new(),
        }))
        .await?;

        for ps in chunks {
            if new_faction.is_none() {
                self.board.remove(&ps);
            } else {
                self.board.insert(ps, new_faction.id().to_string());
            }
        }
        Ok(())
    }

    pub async fn unclaim_all(
        &self,
        faction_id: &str,
        sender: Option<Arc<MPlayer>>,
    ) -> Result<(), NativeError> {
        let chunks = self.claims_of(faction_id);
        if chunks.is_empty() {
            return Ok(());
        }
        self.change_chunks(chunks, NONE_ID, sender).await
    }

    pub async fn join(&self, mplayer: Arc<MPlayer>, faction_id: &str) -> Result<(), NativeError> {
        let faction = self.normal_faction(faction_id)?;
        if mplayer.has_faction() {
            return Err(NativeError::AlreadyMember {
                player: mplayer.name().to_string(),
                faction: mplayer.faction_id(),
            });
        }
        self.change_membership(mplayer.clone(), faction.clone(), MembershipChangeReason::Join, Some(mplayer.clone()))
            .await?;
        mplayer.set_faction_id(faction.id());
        mplayer.set_rel(Rel::Recruit);
        Ok(())
    }

    pub async fn leave(&self, mplayer: Arc<MPlayer>) -> Result<(), NativeError> {
        self.remove_member(mplayer.clone(), MembershipChangeReason::Leave, Some(mplayer))
            .await
    }

    pub async fn kick(
        &self,
        mplayer: Arc<MPlayer>,
        sender: Option<Arc<MPlayer>>,
    ) -> Result<(), NativeError> {
        self.remove_member(mplayer, MembershipChangeReason::Kick, sender).await
    }

    /// Hands leadership to `mplayer`; the previous leader becomes an officer.
    pub async fn promote_leader(&self, mplayer: Arc<MPlayer>) -> Result<(), NativeError> {
        if !mplayer.has_faction() {
            return Err(NativeError::NoFaction(mplayer.name().to_string()));
        }
        let faction = self.faction_of(&mplayer);
        self.change_membership(mplayer.clone(), faction.clone(), MembershipChangeReason::Leader, None)
            .await?;
        if let Some(previous) = self.leader_of(&faction) {
            previous.set_rel(Rel::Officer);
        }
        mplayer.set_rel(Rel::Leader);
        Ok(())
    }

    async fn remove_member(
        &self,
        mplayer: Arc<MPlayer>,
        reason: MembershipChangeReason,
        sender: Option<Arc<MPlayer>>,
    ) -> Result<(), NativeError> {
        if !mplayer.has_faction() {
            return Err(NativeError::NoFaction(mplayer.name().to_string()));
        }
        self.change_membership(mplayer.clone(), self.none(), reason, sender)
            .await?;
        mplayer.set_faction_id(NONE_ID);
        mplayer.set_rel(Rel::Recruit);
        Ok(())
    }

    async fn change_membership(
        &self,
        mplayer: Arc<MPlayer>,
        new_faction: Arc<Faction>,
        reason: MembershipChangeReason,
        sender: Option<Arc<MPlayer>>,
    ) -> Result<(), NativeError> {
        self.call(Arc::new(EventFactionsMembershipChange {
            mplayer,
            new_faction,
            reason,
            sender,
            cancel: CancelFlag::new(),
        }))
        .await
    }

    fn normal_faction(&self, faction_id: &str) -> Result<Arc<Faction>, NativeError> {
        let faction = self
            .faction(faction_id)
            .ok_or_else(|| NativeError::UnknownFaction(faction_id.to_string()))?;
        if !faction.is_normal() {
            return Err(NativeError::SystemFaction(faction.name()));
        }
        Ok(faction)
    }

    async fn call<E: NativeEvent>(&self, event: Arc<E>) -> Result<(), NativeError> {
        let name = event.event_name();
        self.events.emit_plugin(PLUGIN_NAME, name, event.clone()).await?;
        if event.is_cancelled() {
            debug!("{} cancelled by a listener", name);
            return Err(NativeError::Cancelled(name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use host_event_system::create_event_system;
    use std::sync::Mutex;

    #[tokio::test]
    async fn chunk_change_groups_by_previous_owner() {
        let events = create_event_system();
        let plugin = MassiveFactions::new(events.clone());
        let a = plugin.create_faction("A", None).await.unwrap();
        let b = plugin.create_faction("B", None).await.unwrap();
        plugin
            .change_chunks(vec![PS::chunk("world", 0, 0), PS::chunk("world", 0, 1)], a.id(), None)
            .await
            .unwrap();
        plugin
            .change_chunks(vec![PS::chunk("world", 5, 5)], b.id(), None)
            .await
            .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        events
            .on_plugin(PLUGIN_NAME, FACTIONS_CHUNKS_CHANGE, move |event: &EventFactionsChunksChange| {
                let mut groups: Vec<(String, usize)> = event
                    .old_faction_chunks
                    .values()
                    .map(|(faction, chunks)| (faction.name(), chunks.len()))
                    .collect();
                groups.sort();
                sink.lock().unwrap().push(groups);
                Ok(())
            })
            .await
            .unwrap();

        plugin
            .change_chunks(
                vec![PS::chunk("world", 0, 0), PS::chunk("world", 0, 1), PS::chunk("world", 5, 5)],
                NONE_ID,
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[vec![("A".to_string(), 2), ("B".to_string(), 1)]]
        );
        assert_eq!(plugin.claim_count(a.id()), 0);
        assert_eq!(plugin.claim_count(b.id()), 0);
    }

    #[tokio::test]
    async fn cancelled_membership_change_keeps_player() {
        let events = create_event_system();
        let plugin = MassiveFactions::new(events.clone());
        let leader = plugin.get_or_create_mplayer(Uuid::new_v4(), "Leader");
        let faction = plugin.create_faction("A", Some(leader.clone())).await.unwrap();
        assert_eq!(leader.rel(), Rel::Leader);

        events
            .on_plugin(
                PLUGIN_NAME,
                FACTIONS_MEMBERSHIP_CHANGE,
                |event: &EventFactionsMembershipChange| {
                    if event.reason == MembershipChangeReason::Leave {
                        event.set_cancelled(true);
                    }
                    Ok(())
                },
            )
            .await
            .unwrap();

        assert!(plugin.leave(leader.clone()).await.is_err());
        assert_eq!(plugin.members_of(&faction).len(), 1);
    }

    #[tokio::test]
    async fn power_is_sum_of_members() {
        let plugin = MassiveFactions::new(create_event_system());
        let first = plugin.get_or_create_mplayer(Uuid::new_v4(), "First");
        let second = plugin.get_or_create_mplayer(Uuid::new_v4(), "Second");
        let faction = plugin.create_faction("A", Some(first.clone())).await.unwrap();
        plugin.join(second.clone(), faction.id()).await.unwrap();
        first.set_power(4.0);
        second.set_power(2.5);
        assert_eq!(plugin.power_of(&faction), 6.5);
    }
}
