//! # Host
//!
//! The read surface plugins use to look at the server they run in, and the
//! in-process [`ServerHost`] that embedders (and tests) populate directly.

use crate::events::PluginEnabledEvent;
use crate::scheduler::Scheduler;
use crate::system::EventSystem;
use crate::types::{InstalledPlugin, OfflinePlayer, World, WorldId};
use crate::utils::current_timestamp;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// What a plugin can see of the server hosting it.
pub trait Host: Send + Sync {
    /// Installed plugins in load order.
    fn installed_plugins(&self) -> Vec<InstalledPlugin>;

    fn plugin(&self, name: &str) -> Option<InstalledPlugin> {
        self.installed_plugins()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    fn events(&self) -> Arc<EventSystem>;

    fn scheduler(&self) -> Arc<Scheduler>;

    fn worlds(&self) -> Vec<World>;

    fn world(&self, name: &str) -> Option<World> {
        self.worlds().into_iter().find(|w| w.name == name)
    }

    fn world_by_id(&self, id: WorldId) -> Option<World> {
        self.worlds().into_iter().find(|w| w.id == id)
    }

    fn offline_player(&self, uuid: Uuid) -> Option<OfflinePlayer>;

    fn offline_player_by_name(&self, name: &str) -> Option<OfflinePlayer>;

    /// Server software name and version, as printed in diagnostics.
    fn platform_version(&self) -> String;
}

/// In-process host.
///
/// Worlds, players and plugins are registered by whoever embeds it; the
/// host owns one event bus and one scheduler for its whole lifetime.
pub struct ServerHost {
    platform_version: String,
    events: Arc<EventSystem>,
    scheduler: Arc<Scheduler>,
    plugins: RwLock<Vec<InstalledPlugin>>,
    worlds: RwLock<Vec<World>>,
    players: DashMap<Uuid, OfflinePlayer>,
}

impl ServerHost {
    pub fn new(platform_version: impl Into<String>) -> Self {
        Self {
            platform_version: platform_version.into(),
            events: Arc::new(EventSystem::new()),
            scheduler: Arc::new(Scheduler::new()),
            plugins: RwLock::new(Vec::new()),
            worlds: RwLock::new(Vec::new()),
            players: DashMap::new(),
        }
    }

    /// Creates and registers a world, returning it.
    pub fn add_world(&self, name: impl Into<String>) -> World {
        let world = World::new(name);
        self.worlds.write().push(world.clone());
        world
    }

    /// Registers (or replaces) a player record.
    pub fn add_player(&self, player: OfflinePlayer) {
        self.players.insert(player.uuid, player);
    }

    pub fn set_online(&self, uuid: Uuid, online: bool) {
        if let Some(mut player) = self.players.get_mut(&uuid) {
            player.online = online;
        }
    }

    /// Installs a plugin and announces it on `core:plugin_enabled`.
    ///
    /// A second plugin with the same name replaces the first, as a host
    /// reload would.
    pub async fn install_plugin(&self, plugin: InstalledPlugin) {
        let event = Arc::new(PluginEnabledEvent {
            name: plugin.name.clone(),
            version: plugin.version.clone(),
            timestamp: current_timestamp(),
        });
        {
            let mut plugins = self.plugins.write();
            if let Some(existing) = plugins
                .iter_mut()
                .find(|p| p.name.eq_ignore_ascii_case(&plugin.name))
            {
                warn!("🔁 Replacing installed plugin {}", existing.name);
                *existing = plugin;
            } else {
                info!("🔌 Installed plugin {} v{}", plugin.name, plugin.version);
                plugins.push(plugin);
            }
        }
        if let Err(e) = self.events.emit_core("plugin_enabled", event).await {
            warn!("Failed to announce plugin: {}", e);
        }
    }
}

impl Host for ServerHost {
    fn installed_plugins(&self) -> Vec<InstalledPlugin> {
        self.plugins.read().clone()
    }

    fn events(&self) -> Arc<EventSystem> {
        self.events.clone()
    }

    fn scheduler(&self) -> Arc<Scheduler> {
        self.scheduler.clone()
    }

    fn worlds(&self) -> Vec<World> {
        self.worlds.read().clone()
    }

    fn offline_player(&self, uuid: Uuid) -> Option<OfflinePlayer> {
        self.players.get(&uuid).map(|p| p.clone())
    }

    fn offline_player_by_name(&self, name: &str) -> Option<OfflinePlayer> {
        self.players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.clone())
    }

    fn platform_version(&self) -> String {
        self.platform_version.clone()
    }
}
