//! Medieval Factions.
//!
//! Publishes events for faction creation and disbanding only. Joins,
//! departures, renames and land changes happen silently, and claims refer
//! to their holder by faction name.

pub mod event;
pub mod objects;

use crate::NativeError;
use dashmap::DashMap;
use event::*;
use host_event_system::{current_timestamp_millis, CancelFlag, EventSystem, InstalledPlugin, NativeEvent};
use objects::{ClaimedChunk, Faction, PowerRecord};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub const PLUGIN_NAME: &str = "MedievalFactions";
pub const MAIN_CLASS: &str = "dansplugins.factionsystem.MedievalFactions";

pub const CLASSES: &[&str] = &[
    "dansplugins.factionsystem.objects.domain.Faction",
    "dansplugins.factionsystem.objects.domain.ClaimedChunk",
    "dansplugins.factionsystem.objects.domain.PowerRecord",
    "dansplugins.factionsystem.events.FactionCreateEvent",
    "dansplugins.factionsystem.events.FactionDisbandEvent",
    "dansplugins.factionsystem.services.PersistentData",
];

type ChunkKey = (String, i32, i32);

pub struct MedievalFactions {
    events: Arc<EventSystem>,
    factions: DashMap<Uuid, Arc<Faction>>,
    claims: DashMap<ChunkKey, Arc<ClaimedChunk>>,
    power_records: DashMap<Uuid, Arc<PowerRecord>>,
}

impl std::fmt::Debug for MedievalFactions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedievalFactions")
            .field("factions", &self.factions.len())
            .field("claims", &self.claims.len())
            .finish()
    }
}

impl MedievalFactions {
    pub fn new(events: Arc<EventSystem>) -> Arc<Self> {
        Arc::new(Self {
            events,
            factions: DashMap::new(),
            claims: DashMap::new(),
            power_records: DashMap::new(),
        })
    }

    pub fn descriptor(self: &Arc<Self>) -> InstalledPlugin {
        InstalledPlugin {
            name: PLUGIN_NAME.to_string(),
            version: "4.6.2".to_string(),
            authors: vec!["DanTheTechMan".to_string(), "Caibinus".to_string()],
            main_class: MAIN_CLASS.to_string(),
            classes: CLASSES.iter().map(|c| c.to_string()).collect(),
            enabled: true,
            handle: self.clone(),
        }
    }

    pub fn factions(&self) -> Vec<Arc<Faction>> {
        self.factions.iter().map(|f| f.value().clone()).collect()
    }

    pub fn faction(&self, id: Uuid) -> Option<Arc<Faction>> {
        self.factions.get(&id).map(|f| f.value().clone())
    }

    pub fn faction_by_name(&self, name: &str) -> Option<Arc<Faction>> {
        self.factions
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .map(|f| f.value().clone())
    }

    pub fn faction_of_player(&self, player: Uuid) -> Option<Arc<Faction>> {
        self.factions
            .iter()
            .find(|f| f.is_member(player))
            .map(|f| f.value().clone())
    }

    pub fn claimed_chunk(&self, world: &str, x: i32, z: i32) -> Option<Arc<ClaimedChunk>> {
        self.claims
            .get(&(world.to_string(), x, z))
            .map(|c| c.value().clone())
    }

    pub fn claims_of(&self, faction_name: &str) -> Vec<Arc<ClaimedChunk>> {
        self.claims
            .iter()
            .filter(|c| c.holder() == faction_name)
            .map(|c| c.value().clone())
            .collect()
    }

    pub fn power_record(&self, player: Uuid) -> Arc<PowerRecord> {
        self.power_records
            .entry(player)
            .or_insert_with(|| Arc::new(PowerRecord::new(player)))
            .value()
            .clone()
    }

    pub fn cumulative_power(&self, faction: &Faction) -> i32 {
        let members: i32 = faction
            .members()
            .into_iter()
            .map(|m| self.power_record(m).power())
            .sum();
        members + faction.bonus_power()
    }

    pub async fn create_faction(&self, name: &str, owner: Uuid) -> Result<Arc<Faction>, NativeError> {
        if self.faction_by_name(name).is_some() {
            return Err(NativeError::FactionExists(name.to_string()));
        }
        if let Some(current) = self.faction_of_player(owner) {
            return Err(NativeError::AlreadyMember {
                player: owner.to_string(),
                faction: current.name(),
            });
        }

        let faction = Arc::new(Faction::new(name, owner, current_timestamp_millis()));
        self.call(Arc::new(FactionCreateEvent {
            faction: faction.clone(),
            creator: owner,
            cancel: CancelFlag::new(),
        }))
        .await?;

        self.power_record(owner);
        self.factions.insert(faction.id(), faction.clone());
        debug!("Created faction {}", name);
        Ok(faction)
    }

    pub async fn disband(&self, faction_id: Uuid, disbander: Option<Uuid>) -> Result<(), NativeError> {
        let faction = self.existing(faction_id)?;

        self.call(Arc::new(FactionDisbandEvent {
            faction: faction.clone(),
            disbander,
            cancel: CancelFlag::new(),
        }))
        .await?;

        let name = faction.name();
        self.claims.retain(|_, chunk| chunk.holder() != name);
        for other in self.factions() {
            other.allies_mut().remove(&name);
            other.enemies_mut().remove(&name);
        }
        self.factions.remove(&faction_id);
        Ok(())
    }

    /// Renames without publishing anything; claims and diplomacy follow.
    pub fn rename(&self, faction_id: Uuid, new_name: &str) -> Result<(), NativeError> {
        let faction = self.existing(faction_id)?;
        if self
            .faction_by_name(new_name)
            .is_some_and(|other| other.id() != faction_id)
        {
            return Err(NativeError::FactionExists(new_name.to_string()));
        }

        let old_name = faction.name();
        for chunk in self.claims_of(&old_name) {
            chunk.set_holder(new_name);
        }
        for other in self.factions() {
            let mut allies = other.allies_mut();
            if allies.remove(&old_name) {
                allies.insert(new_name.to_string());
            }
            drop(allies);
            let mut enemies = other.enemies_mut();
            if enemies.remove(&old_name) {
                enemies.insert(new_name.to_string());
            }
        }
        faction.set_name(new_name);
        Ok(())
    }

    pub fn join(&self, player: Uuid, faction_id: Uuid) -> Result<(), NativeError> {
        let faction = self.existing(faction_id)?;
        if let Some(current) = self.faction_of_player(player) {
            return Err(NativeError::AlreadyMember {
                player: player.to_string(),
                faction: current.name(),
            });
        }
        self.power_record(player);
        faction.add_member(player);
        Ok(())
    }

    /// Owners cannot leave; they have to disband or transfer ownership.
    pub fn leave(&self, player: Uuid) -> Result<(), NativeError> {
        let faction = self
            .faction_of_player(player)
            .ok_or_else(|| NativeError::NoFaction(player.to_string()))?;
        if faction.owner() == player {
            return Err(NativeError::NotAvailable("owner leave"));
        }
        faction.remove_member(player);
        Ok(())
    }

    pub fn claim(&self, world: &str, x: i32, z: i32, faction_id: Uuid) -> Result<(), NativeError> {
        let faction = self.existing(faction_id)?;
        let holder = faction.name();
        self.claims
            .entry((world.to_string(), x, z))
            .or_insert_with(|| Arc::new(ClaimedChunk::new(world, x, z, holder.clone())))
            .set_holder(&holder);
        Ok(())
    }

    pub fn unclaim(&self, world: &str, x: i32, z: i32) -> Result<(), NativeError> {
        self.claims
            .remove(&(world.to_string(), x, z))
            .map(|_| ())
            .ok_or_else(|| NativeError::NotClaimed(format!("{world}:{x},{z}")))
    }

    pub fn unclaim_all(&self, faction_id: Uuid) -> Result<(), NativeError> {
        let name = self.existing(faction_id)?.name();
        self.claims.retain(|_, chunk| chunk.holder() != name);
        Ok(())
    }

    pub fn ally(&self, a: Uuid, b: Uuid) -> Result<(), NativeError> {
        let (first, second) = (self.existing(a)?, self.existing(b)?);
        first.enemies_mut().remove(&second.name());
        second.enemies_mut().remove(&first.name());
        first.allies_mut().insert(second.name());
        second.allies_mut().insert(first.name());
        Ok(())
    }

    pub fn declare_war(&self, a: Uuid, b: Uuid) -> Result<(), NativeError> {
        let (first, second) = (self.existing(a)?, self.existing(b)?);
        first.allies_mut().remove(&second.name());
        second.allies_mut().remove(&first.name());
        first.enemies_mut().insert(second.name());
        second.enemies_mut().insert(first.name());
        Ok(())
    }

    fn existing(&self, faction_id: Uuid) -> Result<Arc<Faction>, NativeError> {
        self.faction(faction_id)
            .ok_or_else(|| NativeError::UnknownFaction(faction_id.to_string()))
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

    #[tokio::test]
    async fn rename_moves_claims_and_diplomacy() {
        let plugin = MedievalFactions::new(create_event_system());
        let a = plugin.create_faction("Avalon", Uuid::new_v4()).await.unwrap();
        let b = plugin.create_faction("Bree", Uuid::new_v4()).await.unwrap();
        plugin.claim("world", 1, 1, a.id()).unwrap();
        plugin.ally(a.id(), b.id()).unwrap();

        plugin.rename(a.id(), "Camelot").unwrap();

        let chunk = plugin.claimed_chunk("world", 1, 1).unwrap();
        assert_eq!(chunk.holder(), "Camelot");
        assert!(b.is_ally("Camelot"));
        assert!(!b.is_ally("Avalon"));
    }

    #[tokio::test]
    async fn cancelled_create_stores_nothing() {
        let events = create_event_system();
        let plugin = MedievalFactions::new(events.clone());
        events
            .on_plugin(PLUGIN_NAME, FACTION_CREATE, |event: &FactionCreateEvent| {
                event.set_cancelled(true);
                Ok(())
            })
            .await
            .unwrap();

        assert!(plugin.create_faction("Avalon", Uuid::new_v4()).await.is_err());
        assert!(plugin.factions().is_empty());
    }

    #[tokio::test]
    async fn owner_cannot_leave() {
        let plugin = MedievalFactions::new(create_event_system());
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let faction = plugin.create_faction("Avalon", owner).await.unwrap();
        plugin.join(member, faction.id()).unwrap();

        assert!(matches!(plugin.leave(owner), Err(NativeError::NotAvailable(_))));
        plugin.leave(member).unwrap();
        assert_eq!(faction.members(), vec![owner]);
        assert_eq!(plugin.cumulative_power(&faction), PowerRecord::INITIAL_POWER);
    }
}
