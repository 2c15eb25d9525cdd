//! Host bootstrap and the game loop that drives its scheduler.

use crate::config::{HostSettings, ProviderInstall, ProviderSettings};
use host_event_system::{Host, InstalledPlugin, ServerHost};
use native_factions::factions_uuid::types::Flavor;
use native_factions::factions_uuid::FactionsPlugin;
use native_factions::massive::MassiveFactions;
use native_factions::medieval::MedievalFactions;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Creates the host and its worlds.
pub fn build_host(settings: &HostSettings) -> Arc<ServerHost> {
    let host = Arc::new(ServerHost::new(settings.platform_version.clone()));
    for name in &settings.worlds {
        let world = host.add_world(name.clone());
        debug!("🌍 Created world {} ({:?})", world.name, world.id);
    }
    host
}

/// Installs the configured native plugin. Returns the installed descriptor,
/// or `None` when the host is configured to run without one.
pub async fn install_provider(
    host: &ServerHost,
    settings: &ProviderSettings,
) -> Option<InstalledPlugin> {
    let events = host.events();
    let descriptor = match settings.install {
        ProviderInstall::FactionsUuid => FactionsPlugin::new(events, Flavor::Uuid).descriptor(),
        ProviderInstall::Saber => FactionsPlugin::new(
            events,
            Flavor::Saber {
                legacy_fields: settings.saber_legacy_fields,
            },
        )
        .descriptor(),
        ProviderInstall::Massive => MassiveFactions::new(events).descriptor(),
        ProviderInstall::Medieval => MedievalFactions::new(events).descriptor(),
        ProviderInstall::None => {
            info!("🔌 No faction plugin configured");
            return None;
        }
    };

    info!("🔌 Installing {} v{}", descriptor.name, descriptor.version);
    host.install_plugin(descriptor.clone()).await;
    Some(descriptor)
}

/// Advances the host scheduler once per `tick_interval_ms` until aborted.
pub fn spawn_tick_loop(host: Arc<ServerHost>, tick_interval_ms: u64) -> JoinHandle<()> {
    let scheduler = host.scheduler();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(tick_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            scheduler.tick().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use factions_bridge::{BridgeOptions, FactionsBridge};

    fn quiet() -> BridgeOptions {
        BridgeOptions {
            console_output: false,
            ..BridgeOptions::default()
        }
    }

    async fn bound_provider(install: ProviderInstall) -> Option<&'static str> {
        let host = build_host(&HostSettings::default());
        let settings = ProviderSettings {
            install,
            saber_legacy_fields: false,
        };
        install_provider(&host, &settings).await;

        let bridge = FactionsBridge::new(host);
        bridge.connect(quiet()).await.unwrap();
        bridge.provider().map(|provider| provider.id)
    }

    #[tokio::test]
    async fn configured_plugin_is_bound() {
        assert_eq!(bound_provider(ProviderInstall::FactionsUuid).await, Some("factionsuuid"));
        assert_eq!(bound_provider(ProviderInstall::Saber).await, Some("saberfactions"));
        assert_eq!(bound_provider(ProviderInstall::Massive).await, Some("massivecraft"));
        assert_eq!(bound_provider(ProviderInstall::Medieval).await, Some("medievalfactions"));
        assert_eq!(bound_provider(ProviderInstall::None).await, None);
    }

    #[test]
    fn configured_worlds_exist() {
        let settings = HostSettings {
            worlds: vec!["world".to_string(), "world_the_end".to_string()],
            ..HostSettings::default()
        };
        let host = build_host(&settings);
        assert_eq!(host.worlds().len(), 2);
        assert!(host.world("world_the_end").is_some());
    }

    #[tokio::test]
    async fn tick_loop_advances_the_scheduler() {
        let host = build_host(&HostSettings::default());
        let handle = spawn_tick_loop(host.clone(), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert!(host.scheduler().current_tick() > 0);
    }
}
