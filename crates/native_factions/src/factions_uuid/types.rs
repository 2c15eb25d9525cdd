/// Member roles, highest first in authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Coleader,
    Moderator,
    Normal,
    Recruit,
}

impl Role {
    /// Name as the plugin prints it.
    pub fn nice_name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coleader => "coleader",
            Role::Moderator => "moderator",
            Role::Normal => "normal member",
            Role::Recruit => "recruit",
        }
    }
}

/// Relation between factions, ordered from hostile to friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    Enemy,
    Neutral,
    Truce,
    Ally,
    Member,
}

impl Relation {
    pub fn name(&self) -> &'static str {
        match self {
            Relation::Enemy => "ENEMY",
            Relation::Neutral => "NEUTRAL",
            Relation::Truce => "TRUCE",
            Relation::Ally => "ALLY",
            Relation::Member => "MEMBER",
        }
    }
}

/// A claimed chunk, addressed by world name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FLocation {
    pub world_name: String,
    pub x: i32,
    pub z: i32,
}

impl FLocation {
    pub fn new(world_name: impl Into<String>, x: i32, z: i32) -> Self {
        Self {
            world_name: world_name.into(),
            x,
            z,
        }
    }
}

impl std::fmt::Display for FLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{},{}", self.world_name, self.x, self.z)
    }
}

/// A location whose world is resolved by name only when it is used.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyLocation {
    pub world_name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LazyLocation {
    pub fn new(world_name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world_name: world_name.into(),
            x,
            y,
            z,
        }
    }
}

/// Value of an undeclared field.
#[derive(Debug, Clone, PartialEq)]
pub enum InternalField {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Which build of the plugin is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Upstream FactionsUUID
    Uuid,
    /// The SaberFactions fork. Older builds name their point and strike
    /// fields differently.
    Saber { legacy_fields: bool },
}

impl Flavor {
    pub(crate) fn points_field(&self) -> Option<&'static str> {
        match self {
            Flavor::Uuid => None,
            Flavor::Saber { legacy_fields: false } => Some("points"),
            Flavor::Saber { legacy_fields: true } => Some("factionPoints"),
        }
    }

    pub(crate) fn strikes_field(&self) -> Option<&'static str> {
        match self {
            Flavor::Uuid => None,
            Flavor::Saber { legacy_fields: false } => Some("strikes"),
            Flavor::Saber { legacy_fields: true } => Some("strikeCount"),
        }
    }
}
