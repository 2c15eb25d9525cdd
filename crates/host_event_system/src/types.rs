//! # Host Value Types
//!
//! Worlds, locations, player records and installed-plugin descriptors as the
//! host exposes them to plugins.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

/// Stable identifier of a loaded world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub Uuid);

impl WorldId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorldId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct World {
    pub id: WorldId,
    pub name: String,
}

impl World {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: WorldId::new(),
            name: name.into(),
        }
    }
}

/// A block-precision position inside a world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: WorldId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self { world, x, y, z }
    }

    /// Chunk column containing this location (16x16 blocks).
    pub fn chunk(&self) -> (i32, i32) {
        ((self.x.floor() as i32) >> 4, (self.z.floor() as i32) >> 4)
    }
}

/// The host's record of a player, online or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfflinePlayer {
    pub uuid: Uuid,
    pub name: String,
    pub online: bool,
}

impl OfflinePlayer {
    pub fn new(uuid: Uuid, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            online: false,
        }
    }
}

/// A plugin installed on the host.
///
/// `classes` is the plugin's exported class surface; registries match
/// against it to tell forks apart from the implementation they forked.
/// `handle` is the plugin's own API object, opaque to the host.
#[derive(Clone)]
pub struct InstalledPlugin {
    pub name: String,
    pub version: String,
    pub authors: Vec<String>,
    pub main_class: String,
    pub classes: Vec<String>,
    pub enabled: bool,
    pub handle: Arc<dyn Any + Send + Sync>,
}

impl InstalledPlugin {
    pub fn provides_class(&self, class_name: &str) -> bool {
        self.main_class == class_name || self.classes.iter().any(|c| c == class_name)
    }

    /// Downcasts the plugin handle to its concrete API type.
    pub fn handle_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.handle.clone().downcast::<T>().ok()
    }
}

impl std::fmt::Debug for InstalledPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstalledPlugin")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("authors", &self.authors)
            .field("main_class", &self.main_class)
            .field("classes", &self.classes.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_of_negative_coordinates_rounds_down() {
        let world = WorldId::new();
        assert_eq!(Location::new(world, 0.0, 64.0, 15.9).chunk(), (0, 0));
        assert_eq!(Location::new(world, 16.0, 64.0, -0.5).chunk(), (1, -1));
        assert_eq!(Location::new(world, -17.0, 64.0, -32.0).chunk(), (-2, -2));
    }

    #[test]
    fn handle_downcast_checks_type() {
        let plugin = InstalledPlugin {
            name: "Demo".to_string(),
            version: "1.0".to_string(),
            authors: vec![],
            main_class: "demo.Main".to_string(),
            classes: vec!["demo.Api".to_string()],
            enabled: true,
            handle: Arc::new(42u32),
        };
        assert!(plugin.provides_class("demo.Main"));
        assert!(plugin.provides_class("demo.Api"));
        assert!(!plugin.provides_class("demo.Other"));
        assert_eq!(plugin.handle_as::<u32>().as_deref(), Some(&42));
        assert!(plugin.handle_as::<String>().is_none());
    }
}
