//! The known faction plugins.
//!
//! Several plugins install under the same name, so an entry matches on the
//! plugin name *and* a probe class only that implementation exports. Forks
//! come before the implementation they forked, which makes the first match
//! in table order the most specific one.

use crate::api::FactionsApi;
use crate::context::BridgeContext;
use crate::error::BridgeResult;
use crate::providers::{factions_uuid, massive, medieval, saber};
use host_event_system::InstalledPlugin;
use std::sync::Arc;

/// Builds the provider's API adapter over the matched plugin.
pub type AdapterFactory = fn(Arc<BridgeContext>) -> BridgeResult<Arc<dyn FactionsApi>>;

pub struct RegistryEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub plugin_name: &'static str,
    pub probe_class: &'static str,
    pub authors: &'static [&'static str],
    /// The plugin lacks native events for joins, leaves, renames and land
    /// changes, so the bridge polls for them.
    pub polled: bool,
    /// Type name of the API adapter, for identifying a live instance
    pub adapter_class: fn() -> &'static str,
    pub factory: AdapterFactory,
}

impl RegistryEntry {
    pub fn matches(&self, plugin: &InstalledPlugin) -> bool {
        plugin.enabled
            && plugin.name.eq_ignore_ascii_case(self.plugin_name)
            && plugin.provides_class(self.probe_class)
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("id", &self.id)
            .field("plugin_name", &self.plugin_name)
            .field("probe_class", &self.probe_class)
            .finish()
    }
}

static ENTRIES: [RegistryEntry; 4] = [
    RegistryEntry {
        id: "saberfactions",
        name: "SaberFactions",
        plugin_name: "Factions",
        probe_class: "com.massivecraft.factions.zcore.fperms.Access",
        authors: &["Driftay", "SavageLabs"],
        polled: false,
        adapter_class: std::any::type_name::<saber::SaberFactionsApi>,
        factory: saber::create,
    },
    RegistryEntry {
        id: "factionsuuid",
        name: "FactionsUUID",
        plugin_name: "Factions",
        probe_class: "com.massivecraft.factions.perms.Relation",
        authors: &["drtshock", "mbaxter"],
        polled: false,
        adapter_class: std::any::type_name::<factions_uuid::UuidFactionsApi>,
        factory: factions_uuid::create,
    },
    RegistryEntry {
        id: "massivecraft",
        name: "MassiveCraft Factions",
        plugin_name: "Factions",
        probe_class: "com.massivecraft.factions.entity.MPlayer",
        authors: &["Cayorion", "Madus", "Ulumulu1510", "MarkehMe"],
        polled: false,
        adapter_class: std::any::type_name::<massive::MassiveFactionsApi>,
        factory: massive::create,
    },
    RegistryEntry {
        id: "medievalfactions",
        name: "Medieval Factions",
        plugin_name: "MedievalFactions",
        probe_class: "dansplugins.factionsystem.MedievalFactions",
        authors: &["DanTheTechMan", "Caibinus"],
        polled: true,
        adapter_class: std::any::type_name::<medieval::MedievalFactionsApi>,
        factory: medieval::create,
    },
];

/// All entries in precedence order.
pub fn entries() -> &'static [RegistryEntry] {
    &ENTRIES
}

/// Entries installing under `plugin_name`, in precedence order.
pub fn lookup_by_plugin_name(plugin_name: &str) -> Vec<&'static RegistryEntry> {
    ENTRIES
        .iter()
        .filter(|entry| entry.plugin_name.eq_ignore_ascii_case(plugin_name))
        .collect()
}

/// The entry whose adapter produced a live API object.
pub fn lookup_by_adapter_class(adapter_class: &str) -> Option<&'static RegistryEntry> {
    ENTRIES
        .iter()
        .find(|entry| (entry.adapter_class)() == adapter_class)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(name: &str, classes: &[&str], enabled: bool) -> InstalledPlugin {
        InstalledPlugin {
            name: name.to_string(),
            version: "1.0".to_string(),
            authors: vec![],
            main_class: format!("test.{name}"),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            enabled,
            handle: Arc::new(()),
        }
    }

    fn first_match(plugin: &InstalledPlugin) -> Option<&'static str> {
        entries().iter().find(|entry| entry.matches(plugin)).map(|e| e.id)
    }

    #[test]
    fn fork_is_preferred_over_base() {
        let fork = plugin(
            "Factions",
            &[
                "com.massivecraft.factions.perms.Relation",
                "com.massivecraft.factions.zcore.fperms.Access",
            ],
            true,
        );
        assert_eq!(first_match(&fork), Some("saberfactions"));

        let base = plugin("factions", &["com.massivecraft.factions.perms.Relation"], true);
        assert_eq!(first_match(&base), Some("factionsuuid"));
    }

    #[test]
    fn disabled_or_misnamed_plugins_do_not_match() {
        let disabled = plugin("Factions", &["com.massivecraft.factions.perms.Relation"], false);
        assert!(first_match(&disabled).is_none());

        let renamed = plugin("FactionsPlus", &["com.massivecraft.factions.perms.Relation"], true);
        assert!(first_match(&renamed).is_none());
    }

    #[test]
    fn lookups() {
        let ids: Vec<_> = lookup_by_plugin_name("factions").iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["saberfactions", "factionsuuid", "massivecraft"]);

        let class = std::any::type_name::<medieval::MedievalFactionsApi>();
        assert_eq!(lookup_by_adapter_class(class).map(|e| e.id), Some("medievalfactions"));
        assert!(lookup_by_adapter_class("nope").is_none());
        let polled: Vec<_> = entries().iter().filter(|e| e.polled).map(|e| e.id).collect();
        assert_eq!(polled, vec!["medievalfactions"]);
    }
}
