//! The unified model over the different providers.

mod common;

use common::{lenient, quiet, TestServer, WORLD};
use factions_bridge::{BridgeError, ChunkCoords, ClaimRef, Relationship, Role};
use host_event_system::Location;
use native_factions::factions_uuid::types::{FLocation, Flavor, Relation};
use native_factions::massive::entity::PS;
use std::collections::HashSet;

#[tokio::test]
async fn claims_are_equal_by_coordinates() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(quiet()).await;
    let api = bridge.api().unwrap();

    let knights = plugin.create_faction("Knights", None).await.unwrap();
    plugin
        .claim(FLocation::new(WORLD, 3, 7), knights.id(), None)
        .await
        .unwrap();

    let coords = ChunkCoords::new(server.world.id, 3, 7);
    let looked_up = api.claim(coords).unwrap();
    let owned = api.faction(knights.id()).unwrap().unwrap().claims().unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(&owned[0], &looked_up);

    let set: HashSet<ClaimRef> = [looked_up.clone(), api.claim(coords).unwrap()].into();
    assert_eq!(set.len(), 1);
    assert_ne!(&api.claim(ChunkCoords::new(server.world.id, 3, 8)).unwrap(), &looked_up);

    let owner = looked_up.faction().unwrap().unwrap();
    assert_eq!(owner.name(), "Knights");
}

#[tokio::test]
async fn claim_coordinates_follow_block_locations() {
    let server = TestServer::new();
    let coords = ChunkCoords::of(&Location::new(server.world.id, -1.0, 64.0, 33.5));
    assert_eq!((coords.x, coords.z), (-1, 2));
}

#[tokio::test]
async fn system_factions_are_server_factions() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(quiet()).await;
    let api = bridge.api().unwrap();

    for faction in [api.wilderness(), api.safe_zone(), api.war_zone()] {
        assert!(faction.unwrap().unwrap().is_server_faction());
    }
    let knights = plugin.create_faction("Knights", None).await.unwrap();
    let knights = api.faction(knights.id()).unwrap().unwrap();
    assert!(!knights.is_server_faction());
}

#[tokio::test]
async fn massive_system_factions_are_server_factions() {
    let server = TestServer::new();
    server.install_massive().await;
    let bridge = server.connect(quiet()).await;
    let api = bridge.api().unwrap();

    let none = api.wilderness().unwrap().unwrap();
    assert!(none.is_wilderness());
    assert!(none.is_server_faction());
    assert!(api.war_zone().unwrap().unwrap().is_war_zone());
}

#[tokio::test]
async fn unsupported_operations_fail_without_catch() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(quiet()).await;
    let api = bridge.api().unwrap();
    let knights = plugin.create_faction("Knights", None).await.unwrap();
    let knights = api.faction(knights.id()).unwrap().unwrap();

    match knights.points() {
        Err(BridgeError::Unsupported { provider, operation }) => {
            assert_eq!(provider, "FactionsUUID");
            assert_eq!(operation, "points");
        }
        other => panic!("expected Unsupported, got {other:?}"),
    }
    assert!(knights.strikes().is_err());
}

#[tokio::test]
async fn unsupported_operations_degrade_with_catch() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(lenient()).await;
    let api = bridge.api().unwrap();
    let knights = plugin.create_faction("Knights", None).await.unwrap();
    let knights = api.faction(knights.id()).unwrap().unwrap();

    assert_eq!(knights.points().unwrap(), 0);
    assert_eq!(knights.points().unwrap(), 0);
    assert_eq!(knights.strikes().unwrap(), 0);
}

#[tokio::test]
async fn catch_does_not_hide_cross_provider_mistakes() {
    let uuid_server = TestServer::new();
    let uuid_plugin = uuid_server.install_uuid(Flavor::Uuid).await;
    let uuid_bridge = uuid_server.connect(lenient()).await;

    let massive_server = TestServer::new();
    let massive_plugin = massive_server.install_massive().await;
    let massive_bridge = massive_server.connect(lenient()).await;

    let knights = uuid_plugin.create_faction("Knights", None).await.unwrap();
    let knights = uuid_bridge.api().unwrap().faction(knights.id()).unwrap().unwrap();
    let legion = massive_plugin.create_faction("Legion", None).await.unwrap();
    let legion = massive_bridge.api().unwrap().faction(legion.id()).unwrap().unwrap();

    let result = uuid_bridge.api().unwrap().delete_faction(legion.as_ref()).await;
    match result {
        Err(error @ BridgeError::CrossProvider { .. }) => assert!(!error.is_recoverable()),
        other => panic!("expected CrossProvider, got {other:?}"),
    }
    assert!(matches!(
        knights.relationship_to(legion.as_ref()),
        Err(BridgeError::CrossProvider { .. })
    ));
}

#[tokio::test]
async fn saber_points_use_the_fields_of_the_build() {
    for legacy_fields in [false, true] {
        let server = TestServer::new();
        let plugin = server.install_uuid(Flavor::Saber { legacy_fields }).await;
        let bridge = server.connect(quiet()).await;
        let api = bridge.api().unwrap();

        let knights = plugin.create_faction("Knights", None).await.unwrap();
        plugin.add_points(knights.id(), 7).unwrap();
        plugin.add_strike(knights.id()).unwrap();

        let knights = api.faction(knights.id()).unwrap().unwrap();
        assert_eq!(knights.points().unwrap(), 7, "legacy_fields = {legacy_fields}");
        assert_eq!(knights.strikes().unwrap(), 1, "legacy_fields = {legacy_fields}");
    }
}

#[tokio::test]
async fn roles_and_relationships_map_to_the_unified_model() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(quiet()).await;
    let api = bridge.api().unwrap();

    let alice = server.player("Alice");
    let creator = plugin.get_or_create_fplayer(alice.uuid, &alice.name);
    let knights = plugin.create_faction("Knights", Some(creator)).await.unwrap();
    let rogues = plugin.create_faction("Rogues", None).await.unwrap();
    knights.set_relation_wish(rogues.id(), Relation::Enemy);

    let fplayer = api.fplayer(&alice).unwrap();
    assert_eq!(fplayer.role().unwrap(), Role::Leader);
    fplayer.set_role(Role::Officer).unwrap();
    assert_eq!(fplayer.role().unwrap(), Role::Officer);

    let knights = api.faction(knights.id()).unwrap().unwrap();
    let rogues = api.faction(rogues.id()).unwrap().unwrap();
    assert_eq!(knights.relationship_to(rogues.as_ref()).unwrap(), Relationship::Enemy);
    assert_eq!(knights.relationship_to(knights.as_ref()).unwrap(), Relationship::Member);

    let newcomer = server.player("Dora");
    assert_eq!(api.fplayer(&newcomer).unwrap().role().unwrap(), Role::Factionless);
}

#[tokio::test]
async fn massive_power_and_titles() {
    let server = TestServer::new();
    let plugin = server.install_massive().await;
    let bridge = server.connect(quiet()).await;
    let api = bridge.api().unwrap();

    let erin = server.player("Erin");
    let creator = plugin.get_or_create_mplayer(erin.uuid, &erin.name);
    creator.set_power(4.0);
    let legion = plugin.create_faction("Legion", Some(creator)).await.unwrap();
    legion.set_power_boost(1.5);
    plugin
        .change_chunks(vec![PS::chunk(WORLD, 9, 9)], legion.id(), None)
        .await
        .unwrap();

    let legion = api.faction(legion.id()).unwrap().unwrap();
    assert_eq!(legion.power().unwrap(), 5.5);
    assert_eq!(legion.claims().unwrap().len(), 1);
    assert!(legion.bank().is_err());

    let fplayer = api.fplayer(&erin).unwrap();
    assert_eq!(fplayer.role().unwrap(), Role::Leader);
    fplayer.set_title("the Bold").unwrap();
    assert_eq!(fplayer.title().unwrap(), "the Bold");
    assert!(fplayer.set_role(Role::CoLeader).is_err());
}

#[tokio::test]
async fn medieval_claims_resolve_their_holder_by_name() {
    let server = TestServer::new();
    let plugin = server.install_medieval().await;
    let bridge = server.connect(quiet()).await;
    let api = bridge.api().unwrap();

    let frank = server.player("Frank");
    let guild = plugin.create_faction("Guild", frank.uuid).await.unwrap();
    plugin.claim(WORLD, 2, 2, guild.id()).unwrap();

    let claim = api.claim(ChunkCoords::new(server.world.id, 2, 2)).unwrap();
    assert_eq!(claim.faction().unwrap().unwrap().name(), "Guild");
    let wild = api.claim(ChunkCoords::new(server.world.id, 5, 5)).unwrap();
    assert!(wild.faction().unwrap().is_none());

    assert!(matches!(api.wilderness(), Err(BridgeError::Unsupported { .. })));
    assert!(matches!(
        api.create_faction("Other").await,
        Err(BridgeError::Unsupported { .. })
    ));

    let guild = api.faction(&guild.id().to_string()).unwrap().unwrap();
    assert_eq!(guild.leader().unwrap().unwrap().name(), "Frank");
    assert_eq!(guild.power().unwrap(), 5.0);
}

#[tokio::test]
async fn uuid_create_faction_rejects_taken_names() {
    let server = TestServer::new();
    server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(quiet()).await;
    let api = bridge.api().unwrap();

    let knights = api.create_faction("Knights").await.unwrap();
    assert_eq!(knights.name(), "Knights");
    assert!(matches!(
        api.create_faction("knights").await,
        Err(BridgeError::FactionExists(_))
    ));
    assert!(api.faction_by_name("KNIGHTS").unwrap().is_some());
}
