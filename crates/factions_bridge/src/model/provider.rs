use crate::registry::RegistryEntry;
use host_event_system::InstalledPlugin;

/// The provider the bridge is bound to: its registry entry plus the host
/// plugin that matched it.
#[derive(Debug, Clone)]
pub struct Provider {
    pub id: &'static str,
    pub name: &'static str,
    pub probe_class: &'static str,
    pub authors: &'static [&'static str],
    /// State changes the plugin does not publish are found by polling
    pub polled: bool,
    pub plugin: InstalledPlugin,
}

impl Provider {
    pub fn new(entry: &RegistryEntry, plugin: InstalledPlugin) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            probe_class: entry.probe_class,
            authors: entry.authors,
            polled: entry.polled,
            plugin,
        }
    }

    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }
}
