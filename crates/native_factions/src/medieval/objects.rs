use parking_lot::RwLock;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Home {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A Medieval Factions faction.
///
/// Diplomacy is kept by faction *name*, like everything else in this plugin
/// that refers to another faction.
#[derive(Debug)]
pub struct Faction {
    id: Uuid,
    name: RwLock<String>,
    owner: RwLock<Uuid>,
    members: RwLock<HashSet<Uuid>>,
    officers: RwLock<HashSet<Uuid>>,
    description: RwLock<String>,
    prefix: RwLock<String>,
    bonus_power: RwLock<i32>,
    allies: RwLock<HashSet<String>>,
    enemies: RwLock<HashSet<String>>,
    home: RwLock<Option<Home>>,
    created_millis: u64,
}

impl Faction {
    pub(crate) fn new(name: impl Into<String>, owner: Uuid, created_millis: u64) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            prefix: RwLock::new(name.clone()),
            name: RwLock::new(name),
            owner: RwLock::new(owner),
            members: RwLock::new(HashSet::from([owner])),
            officers: RwLock::new(HashSet::new()),
            description: RwLock::new("default description".to_string()),
            bonus_power: RwLock::new(0),
            allies: RwLock::new(HashSet::new()),
            enemies: RwLock::new(HashSet::new()),
            home: RwLock::new(None),
            created_millis,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub(crate) fn set_name(&self, name: &str) {
        *self.name.write() = name.to_string();
    }

    pub fn owner(&self) -> Uuid {
        *self.owner.read()
    }

    pub fn set_owner(&self, owner: Uuid) {
        *self.owner.write() = owner;
    }

    pub fn members(&self) -> Vec<Uuid> {
        self.members.read().iter().copied().collect()
    }

    pub fn is_member(&self, player: Uuid) -> bool {
        self.members.read().contains(&player)
    }

    pub(crate) fn add_member(&self, player: Uuid) {
        self.members.write().insert(player);
    }

    pub(crate) fn remove_member(&self, player: Uuid) {
        self.members.write().remove(&player);
        self.officers.write().remove(&player);
    }

    pub fn is_officer(&self, player: Uuid) -> bool {
        self.officers.read().contains(&player)
    }

    pub fn add_officer(&self, player: Uuid) -> bool {
        self.is_member(player) && self.officers.write().insert(player)
    }

    pub fn remove_officer(&self, player: Uuid) -> bool {
        self.officers.write().remove(&player)
    }

    pub fn description(&self) -> String {
        self.description.read().clone()
    }

    pub fn set_description(&self, description: &str) {
        *self.description.write() = description.to_string();
    }

    pub fn prefix(&self) -> String {
        self.prefix.read().clone()
    }

    pub fn bonus_power(&self) -> i32 {
        *self.bonus_power.read()
    }

    pub fn set_bonus_power(&self, bonus: i32) {
        *self.bonus_power.write() = bonus;
    }

    pub fn is_ally(&self, faction_name: &str) -> bool {
        self.allies.read().contains(faction_name)
    }

    pub fn is_enemy(&self, faction_name: &str) -> bool {
        self.enemies.read().contains(faction_name)
    }

    pub(crate) fn allies_mut(&self) -> parking_lot::RwLockWriteGuard<'_, HashSet<String>> {
        self.allies.write()
    }

    pub(crate) fn enemies_mut(&self) -> parking_lot::RwLockWriteGuard<'_, HashSet<String>> {
        self.enemies.write()
    }

    pub fn home(&self) -> Option<Home> {
        self.home.read().clone()
    }

    pub fn set_home(&self, home: Option<Home>) {
        *self.home.write() = home;
    }

    pub fn created_millis(&self) -> u64 {
        self.created_millis
    }
}

/// A claimed chunk. The holder is stored by faction name.
#[derive(Debug)]
pub struct ClaimedChunk {
    world: String,
    x: i32,
    z: i32,
    holder: RwLock<String>,
}

impl ClaimedChunk {
    pub(crate) fn new(world: impl Into<String>, x: i32, z: i32, holder: impl Into<String>) -> Self {
        Self {
            world: world.into(),
            x,
            z,
            holder: RwLock::new(holder.into()),
        }
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn holder(&self) -> String {
        self.holder.read().clone()
    }

    pub(crate) fn set_holder(&self, holder: &str) {
        *self.holder.write() = holder.to_string();
    }
}

/// Power a player contributes to their faction.
#[derive(Debug)]
pub struct PowerRecord {
    player: Uuid,
    power: RwLock<i32>,
}

impl PowerRecord {
    pub const INITIAL_POWER: i32 = 5;
    pub const MAX_POWER: i32 = 20;

    pub(crate) fn new(player: Uuid) -> Self {
        Self {
            player,
            power: RwLock::new(Self::INITIAL_POWER),
        }
    }

    pub fn player(&self) -> Uuid {
        self.player
    }

    pub fn power(&self) -> i32 {
        *self.power.read()
    }

    pub fn set_power(&self, power: i32) {
        *self.power.write() = power.clamp(0, Self::MAX_POWER);
    }
}
