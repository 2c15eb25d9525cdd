//! Binding the bridge to whichever provider is installed.

mod common;

use common::{quiet, TestServer};
use factions_bridge::{registry, BridgeError, BridgeOptions, FactionsBridge};
use host_event_system::Host;
use native_factions::factions_uuid::types::Flavor;
use native_factions::massive::MassiveFactions;

async fn bound_provider(server: &TestServer) -> Option<&'static str> {
    let bridge = server.connect(quiet()).await;
    assert_eq!(bridge.connected(), bridge.provider().is_some());
    bridge.provider().map(|provider| provider.id)
}

#[tokio::test]
async fn binds_every_supported_provider() {
    let server = TestServer::new();
    server.install_uuid(Flavor::Uuid).await;
    assert_eq!(bound_provider(&server).await, Some("factionsuuid"));

    let server = TestServer::new();
    server.install_massive().await;
    assert_eq!(bound_provider(&server).await, Some("massivecraft"));

    let server = TestServer::new();
    server.install_medieval().await;
    assert_eq!(bound_provider(&server).await, Some("medievalfactions"));
}

#[tokio::test]
async fn fork_is_bound_instead_of_upstream() {
    let server = TestServer::new();
    server.install_uuid(Flavor::Saber { legacy_fields: true }).await;

    let bridge = server.connect(quiet()).await;
    let provider = bridge.provider().unwrap();
    assert_eq!(provider.id, "saberfactions");
    assert_eq!(provider.authors, &["Driftay", "SavageLabs"]);

    let api = bridge.api().unwrap();
    let entry = registry::lookup_by_adapter_class(api.adapter_class()).unwrap();
    assert_eq!(entry.id, "saberfactions");
}

#[tokio::test]
async fn missing_provider_is_only_an_error_when_required() {
    let server = TestServer::new();

    let bridge = FactionsBridge::new(server.host.clone());
    bridge.connect(quiet()).await.unwrap();
    assert!(!bridge.connected());
    assert!(matches!(bridge.api(), Err(BridgeError::NotConnected)));

    let strict = BridgeOptions {
        require_provider: true,
        ..quiet()
    };
    assert!(matches!(bridge.connect(strict).await, Err(BridgeError::NoProvider)));
}

#[tokio::test]
async fn second_connect_keeps_the_first_binding() {
    let server = TestServer::new();
    server.install_massive().await;
    let bridge = server.connect(quiet()).await;
    let first = bridge.api().unwrap();

    bridge.connect(quiet()).await.unwrap();
    let strict = BridgeOptions {
        require_provider: true,
        ..quiet()
    };
    match bridge.connect(strict).await {
        Err(BridgeError::AlreadyConnected(name)) => assert_eq!(name, "MassiveCraft Factions"),
        other => panic!("expected AlreadyConnected, got {other:?}"),
    }
    assert!(std::sync::Arc::ptr_eq(&first, &bridge.api().unwrap()));
}

#[tokio::test]
async fn disabled_plugin_is_not_bound() {
    let server = TestServer::new();
    let plugin = MassiveFactions::new(server.host.events());
    let mut descriptor = plugin.descriptor();
    descriptor.enabled = false;
    server.host.install_plugin(descriptor).await;

    assert_eq!(bound_provider(&server).await, None);
}
