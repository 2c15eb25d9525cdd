//! Shared harness: an in-process host with one world, the native plugins,
//! and helpers for recording unified events.

#![allow(dead_code)]

use factions_bridge::{BridgeOptions, FactionsBridge, UnifiedEvent};
use host_event_system::{Host, OfflinePlayer, ServerHost, World};
use native_factions::factions_uuid::types::Flavor;
use native_factions::factions_uuid::FactionsPlugin;
use native_factions::massive::MassiveFactions;
use native_factions::medieval::MedievalFactions;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

pub const WORLD: &str = "world";

pub struct TestServer {
    pub host: Arc<ServerHost>,
    pub world: World,
}

impl TestServer {
    pub fn new() -> Self {
        let host = Arc::new(ServerHost::new("TestHost 1.20.4"));
        let world = host.add_world(WORLD);
        Self { host, world }
    }

    pub fn player(&self, name: &str) -> OfflinePlayer {
        let player = OfflinePlayer::new(Uuid::new_v4(), name);
        self.host.add_player(player.clone());
        player
    }

    pub async fn install_uuid(&self, flavor: Flavor) -> Arc<FactionsPlugin> {
        let plugin = FactionsPlugin::new(self.host.events(), flavor);
        self.host.install_plugin(plugin.descriptor()).await;
        plugin
    }

    pub async fn install_massive(&self) -> Arc<MassiveFactions> {
        let plugin = MassiveFactions::new(self.host.events());
        self.host.install_plugin(plugin.descriptor()).await;
        plugin
    }

    pub async fn install_medieval(&self) -> Arc<MedievalFactions> {
        let plugin = MedievalFactions::new(self.host.events());
        self.host.install_plugin(plugin.descriptor()).await;
        plugin
    }

    pub async fn connect(&self, options: BridgeOptions) -> FactionsBridge {
        let bridge = FactionsBridge::new(self.host.clone());
        bridge.connect(options).await.unwrap();
        bridge
    }

    pub async fn tick(&self, ticks: usize) {
        for _ in 0..ticks {
            self.host.scheduler().tick().await;
        }
    }
}

pub fn quiet() -> BridgeOptions {
    BridgeOptions {
        console_output: false,
        ..BridgeOptions::default()
    }
}

pub fn lenient() -> BridgeOptions {
    BridgeOptions {
        catch_exceptions: true,
        ..quiet()
    }
}

/// Records `summary(event)` for every published event of type `E`.
pub async fn record<E, T, F>(bridge: &FactionsBridge, summary: F) -> Arc<Mutex<Vec<T>>>
where
    E: UnifiedEvent,
    T: Send + 'static,
    F: Fn(&E) -> T + Send + Sync + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bridge
        .on(move |event: &E| {
            sink.lock().push(summary(event));
            Ok(())
        })
        .await
        .unwrap();
    seen
}
