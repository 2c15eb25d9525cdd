//! FactionsUUID, and the SaberFactions fork built from the same sources.
//!
//! Both builds install as a plugin called `Factions` and share the class
//! surface of upstream; the fork adds its own classes and stores faction
//! points and strikes in fields that are not part of the published API.
//!
//! Faction creation publishes [`event::FactionCreateEvent`] *before* the
//! faction exists and before the creator is made its admin.

pub mod event;
pub mod faction;
pub mod fplayer;
pub mod types;

use crate::NativeError;
use dashmap::DashMap;
use event::*;
use faction::Faction;
use fplayer::FPlayer;
use host_event_system::{current_timestamp_millis, CancelFlag, EventSystem, InstalledPlugin, NativeEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use types::{FLocation, Flavor, InternalField, Role};
use uuid::Uuid;

pub const PLUGIN_NAME: &str = "Factions";
pub const MAIN_CLASS: &str = "com.massivecraft.factions.FactionsPlugin";

pub const WILDERNESS_ID: &str = "0";
pub const SAFEZONE_ID: &str = "-1";
pub const WARZONE_ID: &str = "-2";

/// Classes every build exports.
pub const CLASSES: &[&str] = &[
    "com.massivecraft.factions.Faction",
    "com.massivecraft.factions.FPlayer",
    "com.massivecraft.factions.Board",
    "com.massivecraft.factions.FLocation",
    "com.massivecraft.factions.perms.Relation",
    "com.massivecraft.factions.perms.Role",
    "com.massivecraft.factions.event.LandClaimEvent",
    "com.massivecraft.factions.event.FPlayerJoinEvent",
];

/// Classes only the SaberFactions fork exports.
pub const SABER_CLASSES: &[&str] = &[
    "com.massivecraft.factions.zcore.fperms.Access",
    "com.massivecraft.factions.zcore.fperms.PermissableAction",
    "com.massivecraft.factions.cmd.points.CmdPoints",
];

/// The plugin's API object, as handed to the host on install.
pub struct FactionsPlugin {
    flavor: Flavor,
    events: Arc<EventSystem>,
    factions: DashMap<String, Arc<Faction>>,
    fplayers: DashMap<Uuid, Arc<FPlayer>>,
    board: DashMap<FLocation, String>,
    next_id: AtomicU64,
    wilderness: Arc<Faction>,
    safe_zone: Arc<Faction>,
    war_zone: Arc<Faction>,
}

impl std::fmt::Debug for FactionsPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactionsPlugin")
            .field("flavor", &self.flavor)
            .field("factions", &self.factions.len())
            .field("fplayers", &self.fplayers.len())
            .field("claims", &self.board.len())
            .finish()
    }
}

impl FactionsPlugin {
    /// Starts the plugin; the three system factions exist from here on.
    pub fn new(events: Arc<EventSystem>, flavor: Flavor) -> Arc<Self> {
        let now = current_timestamp_millis();
        let wilderness = Arc::new(Faction::new(WILDERNESS_ID, "Wilderness", now));
        let safe_zone = Arc::new(Faction::new(SAFEZONE_ID, "SafeZone", now));
        let war_zone = Arc::new(Faction::new(WARZONE_ID, "WarZone", now));

        let factions = DashMap::new();
        for system in [&wilderness, &safe_zone, &war_zone] {
            Self::declare_fork_fields(flavor, system);
            factions.insert(system.id().to_string(), system.clone());
        }

        Arc::new(Self {
            flavor,
            events,
            factions,
            fplayers: DashMap::new(),
            board: DashMap::new(),
            next_id: AtomicU64::new(1),
            wilderness,
            safe_zone,
            war_zone,
        })
    }

    /// How this plugin presents itself to the host.
    pub fn descriptor(self: &Arc<Self>) -> InstalledPlugin {
        let mut classes: Vec<String> = CLASSES.iter().map(|c| c.to_string()).collect();
        let (version, authors) = match self.flavor {
            Flavor::Uuid => ("1.6.9.5-U0.6.33", vec!["drtshock", "mbaxter"]),
            Flavor::Saber { .. } => {
                classes.extend(SABER_CLASSES.iter().map(|c| c.to_string()));
                ("2.9.1-RC", vec!["Driftay", "SavageLabs"])
            }
        };
        InstalledPlugin {
            name: PLUGIN_NAME.to_string(),
            version: version.to_string(),
            authors: authors.into_iter().map(String::from).collect(),
            main_class: MAIN_CLASS.to_string(),
            classes,
            enabled: true,
            handle: self.clone(),
        }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn all_factions(&self) -> Vec<Arc<Faction>> {
        self.factions.iter().map(|f| f.value().clone()).collect()
    }

    pub fn faction_by_id(&self, id: &str) -> Option<Arc<Faction>> {
        self.factions.get(id).map(|f| f.value().clone())
    }

    pub fn faction_by_tag(&self, tag: &str) -> Option<Arc<Faction>> {
        self.factions
            .iter()
            .find(|f| f.tag().eq_ignore_ascii_case(tag))
            .map(|f| f.value().clone())
    }

    pub fn wilderness(&self) -> Arc<Faction> {
        self.wilderness.clone()
    }

    pub fn safe_zone(&self) -> Arc<Faction> {
        self.safe_zone.clone()
    }

    pub fn war_zone(&self) -> Arc<Faction> {
        self.war_zone.clone()
    }

    pub fn fplayer(&self, id: Uuid) -> Option<Arc<FPlayer>> {
        self.fplayers.get(&id).map(|p| p.value().clone())
    }

    pub fn fplayer_by_name(&self, name: &str) -> Option<Arc<FPlayer>> {
        self.fplayers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .map(|p| p.value().clone())
    }

    pub fn all_fplayers(&self) -> Vec<Arc<FPlayer>> {
        self.fplayers.iter().map(|p| p.value().clone()).collect()
    }

    /// Player records are created the first time a player is seen.
    pub fn get_or_create_fplayer(&self, id: Uuid, name: &str) -> Arc<FPlayer> {
        self.fplayers
            .entry(id)
            .or_insert_with(|| Arc::new(FPlayer::new(id, name)))
            .value()
            .clone()
    }

    pub fn faction_of(&self, fplayer: &FPlayer) -> Arc<Faction> {
        self.faction_by_id(&fplayer.faction_id())
            .unwrap_or_else(|| self.wilderness())
    }

    pub fn members_of(&self, faction: &Faction) -> Vec<Arc<FPlayer>> {
        faction
            .fplayer_ids()
            .into_iter()
            .filter_map(|id| self.fplayer(id))
            .collect()
    }

    pub fn admin_of(&self, faction: &Faction) -> Option<Arc<FPlayer>> {
        self.members_of(faction)
            .into_iter()
            .find(|p| p.role() == Role::Admin)
    }

    /// Sum of member power plus the faction's boost.
    pub fn power_of(&self, faction: &Faction) -> f64 {
        let members: f64 = self.members_of(faction).iter().map(|p| p.power()).sum();
        members + faction.power_boost()
    }

    /// Owner of a chunk; unclaimed chunks belong to the wilderness.
    pub fn faction_at(&self, location: &FLocation) -> Arc<Faction> {
        let owner = self.board.get(location).map(|id| id.value().clone());
        owner
            .and_then(|id| self.faction_by_id(&id))
            .unwrap_or_else(|| self.wilderness())
    }

    pub fn claims_of(&self, faction_id: &str) -> Vec<FLocation> {
        self.board
            .iter()
            .filter(|entry| entry.value() == faction_id)
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn claim_count(&self, faction_id: &str) -> usize {
        self.board.iter().filter(|entry| entry.value() == faction_id).count()
    }

    // ------------------------------------------------------------------
    // Operations guarded by events
    // ------------------------------------------------------------------

    pub async fn create_faction(
        &self,
        tag: &str,
        creator: Option<Arc<FPlayer>>,
    ) -> Result<Arc<Faction>, NativeError> {
        if self.faction_by_tag(tag).is_some() {
            return Err(NativeError::FactionExists(tag.to_string()));
        }
        if let Some(creator) = creator.as_ref().filter(|c| c.has_faction()) {
            return Err(NativeError::AlreadyMember {
                player: creator.name().to_string(),
                faction: creator.faction_id(),
            });
        }

        self.call(Arc::new(FactionCreateEvent {
            tag: tag.to_string(),
            fplayer: creator.clone(),
            cancel: CancelFlag::new(),
        }))
        .await?;

        let id = self.next_id.fetch_add(1, Ordering::AcqRel).to_string();
        let faction = Arc::new(Faction::new(id.clone(), tag, current_timestamp_millis()));
        Self::declare_fork_fields(self.flavor, &faction);
        self.factions.insert(id, faction.clone());

        if let Some(creator) = creator {
            // Not cancellable at this point: the faction would be left without an admin.
            self.events
                .emit_plugin(
                    PLUGIN_NAME,
                    FPLAYER_JOIN,
                    Arc::new(FPlayerJoinEvent {
                        fplayer: creator.clone(),
                        faction: faction.clone(),
                        reason: PlayerJoinReason::Create,
                        cancel: CancelFlag::new(),
                    }),
                )
                .await?;
            creator.set_faction_id(faction.id());
            creator.set_role(Role::Admin);
            faction.add_fplayer(creator.id());
        }

        debug!("Created faction {} ({})", faction.tag(), faction.id());
        Ok(faction)
    }

    pub async fn disband(
        &self,
        faction_id: &str,
        by: Option<Arc<FPlayer>>,
        reason: PlayerDisbandReason,
    ) -> Result<(), NativeError> {
        let faction = self.normal_faction(faction_id)?;

        self.call(Arc::new(FactionDisbandEvent {
            faction: faction.clone(),
            fplayer: by,
            reason,
            cancel: CancelFlag::new(),
        }))
        .await?;

        for member in self.members_of(&faction) {
            self.events
                .emit_plugin(
                    PLUGIN_NAME,
                    FPLAYER_LEAVE,
                    Arc::new(FPlayerLeaveEvent {
                        fplayer: member.clone(),
                        faction: faction.clone(),
                        reason: PlayerLeaveReason::Disband,
                        cancel: CancelFlag::new(),
                    }),
                )
                .await?;
            member.set_faction_id(WILDERNESS_ID);
            member.set_role(Role::Normal);
        }
        self.board.retain(|_, owner| *owner != faction.id());
        self.factions.remove(faction.id());
        debug!("Disbanded faction {}", faction.tag());
        Ok(())
    }

    pub async fn rename(
        &self,
        faction_id: &str,
        new_tag: &str,
        by: Option<Arc<FPlayer>>,
    ) -> Result<(), NativeError> {
        let faction = self.normal_faction(faction_id)?;
        if self
            .faction_by_tag(new_tag)
            .is_some_and(|other| other.id() != faction.id())
        {
            return Err(NativeError::FactionExists(new_tag.to_string()));
        }

        self.call(Arc::new(FactionRenameEvent {
            faction: faction.clone(),
            fplayer: by,
            new_tag: new_tag.to_string(),
            cancel: CancelFlag::new(),
        }))
        .await?;

        faction.set_tag(new_tag);
        Ok(())
    }

    pub async fn claim(
        &self,
        location: FLocation,
        faction_id: &str,
        by: Option<Arc<FPlayer>>,
    ) -> Result<(), NativeError> {
        let faction = self
            .faction_by_id(faction_id)
            .filter(|f| !f.is_wilderness())
            .ok_or_else(|| NativeError::UnknownFaction(faction_id.to_string()))?;

        self.call(Arc::new(LandClaimEvent {
            location: location.clone(),
            faction: faction.clone(),
            fplayer: by,
            cancel: CancelFlag::new(),
        }))
        .await?;

        self.board.insert(location, faction.id().to_string());
        Ok(())
    }

    pub async fn unclaim(
        &self,
        location: FLocation,
        by: Option<Arc<FPlayer>>,
    ) -> Result<(), NativeError> {
        let owner = self.faction_at(&location);
        if owner.is_wilderness() {
            return Err(NativeError::NotClaimed(location.to_string()));
        }

        self.call(Arc::new(LandUnclaimEvent {
            location: location.clone(),
            faction: owner,
            fplayer: by,
            cancel: CancelFlag::new(),
        }))
        .await?;

        self.board.remove(&location);
        Ok(())
    }

    pub async fn unclaim_all(
        &self,
        faction_id: &str,
        by: Option<Arc<FPlayer>>,
    ) -> Result<(), NativeError> {
        let faction = self
            .faction_by_id(faction_id)
            .ok_or_else(|| NativeError::UnknownFaction(faction_id.to_string()))?;

        self.call(Arc::new(LandUnclaimAllEvent {
            faction: faction.clone(),
            fplayer: by,
            cancel: CancelFlag::new(),
        }))
        .await?;

        self.board.retain(|_, owner| *owner != faction.id());
        Ok(())
    }

    pub async fn join(
        &self,
        fplayer: Arc<FPlayer>,
        faction_id: &str,
        reason: PlayerJoinReason,
    ) -> Result<(), NativeError> {
        let faction = self.normal_faction(faction_id)?;
        if fplayer.has_faction() {
            return Err(NativeError::AlreadyMember {
                player: fplayer.name().to_string(),
                faction: fplayer.faction_id(),
            });
        }

        self.call(Arc::new(FPlayerJoinEvent {
            fplayer: fplayer.clone(),
            faction: faction.clone(),
            reason,
            cancel: CancelFlag::new(),
        }))
        .await?;

        fplayer.set_faction_id(faction.id());
        fplayer.set_role(Role::Recruit);
        faction.add_fplayer(fplayer.id());
        Ok(())
    }

    pub async fn leave(
        &self,
        fplayer: Arc<FPlayer>,
        reason: PlayerLeaveReason,
    ) -> Result<(), NativeError> {
        if !fplayer.has_faction() {
            return Err(NativeError::NoFaction(fplayer.name().to_string()));
        }
        let faction = self.faction_of(&fplayer);

        self.call(Arc::new(FPlayerLeaveEvent {
            fplayer: fplayer.clone(),
            faction: faction.clone(),
            reason,
            cancel: CancelFlag::new(),
        }))
        .await?;

        faction.remove_fplayer(fplayer.id());
        fplayer.set_faction_id(WILDERNESS_ID);
        fplayer.set_role(Role::Normal);
        Ok(())
    }

    // ------------------------------------------------------------------
    // SaberFactions extras
    // ------------------------------------------------------------------

    /// Adds (or removes) faction points. Fork builds only.
    pub fn add_points(&self, faction_id: &str, delta: i64) -> Result<i64, NativeError> {
        let field = self
            .flavor
            .points_field()
            .ok_or(NativeError::NotAvailable("points"))?;
        self.bump_field(faction_id, field, delta)
    }

    /// Records a strike against a faction. Fork builds only.
    pub fn add_strike(&self, faction_id: &str) -> Result<i64, NativeError> {
        let field = self
            .flavor
            .strikes_field()
            .ok_or(NativeError::NotAvailable("strikes"))?;
        self.bump_field(faction_id, field, 1)
    }

    fn bump_field(&self, faction_id: &str, field: &str, delta: i64) -> Result<i64, NativeError> {
        let faction = self
            .faction_by_id(faction_id)
            .ok_or_else(|| NativeError::UnknownFaction(faction_id.to_string()))?;
        let current = match faction.get_declared_field(field) {
            Some(InternalField::Int(value)) => value,
            _ => 0,
        };
        let updated = current + delta;
        faction.set_declared_field(field, InternalField::Int(updated));
        Ok(updated)
    }

    fn declare_fork_fields(flavor: Flavor, faction: &Faction) {
        if let Some(points) = flavor.points_field() {
            faction.set_declared_field(points, InternalField::Int(0));
        }
        if let Some(strikes) = flavor.strikes_field() {
            faction.set_declared_field(strikes, InternalField::Int(0));
        }
    }

    fn normal_faction(&self, faction_id: &str) -> Result<Arc<Faction>, NativeError> {
        let faction = self
            .faction_by_id(faction_id)
            .ok_or_else(|| NativeError::UnknownFaction(faction_id.to_string()))?;
        if !faction.is_normal() {
            return Err(NativeError::SystemFaction(faction.tag()));
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
