use super::NONE_ID;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Ranks and relations share one enum in this plugin.
///
/// The first four values are ranks inside a faction; the remaining ones are
/// standings between factions. Relations are ordered from hostile to
/// friendly so the effective relation of two factions is the lower wish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rel {
    Enemy,
    Neutral,
    Truce,
    Ally,
    Recruit,
    Member,
    Officer,
    Leader,
}

impl Rel {
    pub fn is_rank(&self) -> bool {
        *self >= Rel::Recruit
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rel::Enemy => "ENEMY",
            Rel::Neutral => "NEUTRAL",
            Rel::Truce => "TRUCE",
            Rel::Ally => "ALLY",
            Rel::Recruit => "RECRUIT",
            Rel::Member => "MEMBER",
            Rel::Officer => "OFFICER",
            Rel::Leader => "LEADER",
        }
    }
}

/// Position snapshot of a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PS {
    pub world: String,
    pub chunk_x: i32,
    pub chunk_z: i32,
}

impl PS {
    pub fn chunk(world: impl Into<String>, chunk_x: i32, chunk_z: i32) -> Self {
        Self {
            world: world.into(),
            chunk_x,
            chunk_z,
        }
    }
}

impl std::fmt::Display for PS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.world, self.chunk_x, self.chunk_z)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Home {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Faction entity. Members are not stored here: an [`MPlayer`] points at
/// its faction and the plugin indexes the other direction.
#[derive(Debug)]
pub struct Faction {
    id: String,
    name: RwLock<String>,
    description: RwLock<Option<String>>,
    created_at_millis: u64,
    home: RwLock<Option<Home>>,
    power_boost: RwLock<f64>,
    flags: RwLock<HashMap<String, bool>>,
    relation_wishes: RwLock<HashMap<String, Rel>>,
}

impl Faction {
    pub(crate) fn new(id: impl Into<String>, name: impl Into<String>, created_at_millis: u64) -> Self {
        Self {
            id: id.into(),
            name: RwLock::new(name.into()),
            description: RwLock::new(None),
            created_at_millis,
            home: RwLock::new(None),
            power_boost: RwLock::new(0.0),
            flags: RwLock::new(HashMap::new()),
            relation_wishes: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub(crate) fn set_name(&self, name: &str) {
        *self.name.write() = name.to_string();
    }

    pub fn description(&self) -> Option<String> {
        self.description.read().clone()
    }

    pub fn set_description(&self, description: Option<String>) {
        *self.description.write() = description;
    }

    pub fn created_at_millis(&self) -> u64 {
        self.created_at_millis
    }

    pub fn is_none(&self) -> bool {
        self.id == NONE_ID
    }

    pub fn is_normal(&self) -> bool {
        !self.is_none() && !self.flag("permanent")
    }

    pub fn home(&self) -> Option<Home> {
        self.home.read().clone()
    }

    pub fn set_home(&self, home: Option<Home>) {
        *self.home.write() = home;
    }

    pub fn power_boost(&self) -> f64 {
        *self.power_boost.read()
    }

    pub fn set_power_boost(&self, boost: f64) {
        *self.power_boost.write() = boost;
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.read().get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&self, name: &str, value: bool) {
        self.flags.write().insert(name.to_string(), value);
    }

    pub fn relation_wish(&self, other_id: &str) -> Rel {
        self.relation_wishes
            .read()
            .get(other_id)
            .copied()
            .unwrap_or(Rel::Neutral)
    }

    pub fn set_relation_wish(&self, other_id: &str, rel: Rel) {
        if !rel.is_rank() {
            self.relation_wishes.write().insert(other_id.to_string(), rel);
        }
    }

    pub fn relation_to(&self, other: &Faction) -> Rel {
        if self.id == other.id {
            return Rel::Member;
        }
        if self.is_none() || other.is_none() {
            return Rel::Neutral;
        }
        self.relation_wish(&other.id).min(other.relation_wish(&self.id))
    }
}

/// Per-player record.
#[derive(Debug)]
pub struct MPlayer {
    id: Uuid,
    name: String,
    faction_id: RwLock<String>,
    rel: RwLock<Rel>,
    power: RwLock<f64>,
    title: RwLock<Option<String>>,
    online: AtomicBool,
}

impl MPlayer {
    pub const POWER_MAX: f64 = 10.0;

    pub(crate) fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            faction_id: RwLock::new(NONE_ID.to_string()),
            rel: RwLock::new(Rel::Recruit),
            power: RwLock::new(0.0),
            title: RwLock::new(None),
            online: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faction_id(&self) -> String {
        self.faction_id.read().clone()
    }

    pub(crate) fn set_faction_id(&self, id: &str) {
        *self.faction_id.write() = id.to_string();
    }

    pub fn has_faction(&self) -> bool {
        *self.faction_id.read() != NONE_ID
    }

    pub fn rel(&self) -> Rel {
        *self.rel.read()
    }

    pub fn set_rel(&self, rel: Rel) {
        if rel.is_rank() {
            *self.rel.write() = rel;
        }
    }

    pub fn power(&self) -> f64 {
        *self.power.read()
    }

    pub fn set_power(&self, power: f64) {
        *self.power.write() = power.clamp(0.0, Self::POWER_MAX);
    }

    pub fn power_max(&self) -> f64 {
        Self::POWER_MAX
    }

    pub fn title(&self) -> Option<String> {
        self.title.read().clone()
    }

    pub fn set_title(&self, title: Option<String>) {
        *self.title.write() = title;
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_not_relation_wishes() {
        let faction = Faction::new("a", "A", 0);
        faction.set_relation_wish("b", Rel::Officer);
        assert_eq!(faction.relation_wish("b"), Rel::Neutral);
        faction.set_relation_wish("b", Rel::Truce);
        assert_eq!(faction.relation_wish("b"), Rel::Truce);
    }

    #[test]
    fn permanent_factions_are_not_normal() {
        let safezone = Faction::new("safezone", "SafeZone", 0);
        assert!(safezone.is_normal());
        safezone.set_flag("permanent", true);
        assert!(!safezone.is_normal());
        assert!(!Faction::new(NONE_ID, "Wilderness", 0).is_normal());
    }

    #[test]
    fn player_rel_only_accepts_ranks() {
        let player = MPlayer::new(Uuid::new_v4(), "Alex");
        player.set_rel(Rel::Ally);
        assert_eq!(player.rel(), Rel::Recruit);
        player.set_rel(Rel::Officer);
        assert_eq!(player.rel(), Rel::Officer);
    }
}
