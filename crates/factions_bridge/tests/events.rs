//! Translation of native events into unified events.

mod common;

use common::{quiet, record, TestServer, WORLD};
use factions_bridge::{
    FactionClaimEvent, FactionCreateEvent, FactionDisbandEvent, FactionJoinEvent,
    FactionLeaveEvent, FactionUnclaimAllEvent, FactionUnclaimEvent, LeaveReason, Role,
    UnifiedEvent,
};
use host_event_system::{Host, NativeEvent};
use native_factions::factions_uuid::event::{
    FactionCreateEvent as NativeCreate, LandClaimEvent, PlayerJoinReason, PlayerLeaveReason, FACTION_CREATE,
    LAND_CLAIM,
};
use native_factions::factions_uuid::types::{FLocation, Flavor};
use native_factions::massive::entity::PS;
use native_factions::massive::NONE_ID;
use native_factions::NativeError;

#[tokio::test]
async fn registering_twice_does_not_duplicate_events() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(quiet()).await;
    let api = bridge.api().unwrap();
    api.register().await.unwrap();
    api.register().await.unwrap();
    assert!(api.is_registered());

    let claims = record(&bridge, |e: &FactionClaimEvent| e.claim.x()).await;
    let knights = plugin.create_faction("Knights", None).await.unwrap();
    plugin
        .claim(FLocation::new(WORLD, 4, -2), knights.id(), None)
        .await
        .unwrap();

    assert_eq!(*claims.lock(), vec![4]);
}

#[tokio::test]
async fn cancelling_the_unified_event_cancels_the_native_one() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(quiet()).await;
    bridge
        .on(|event: &FactionClaimEvent| {
            event.set_cancelled(true);
            Ok(())
        })
        .await
        .unwrap();

    let knights = plugin.create_faction("Knights", None).await.unwrap();
    let result = plugin
        .claim(FLocation::new(WORLD, 0, 0), knights.id(), None)
        .await;

    assert!(matches!(result, Err(NativeError::Cancelled(_))));
    assert_eq!(plugin.claim_count(knights.id()), 0);
}

#[tokio::test]
async fn native_cancellation_is_visible_on_the_unified_event() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    // Registered before the bridge, so it runs first.
    server
        .host
        .events()
        .on_plugin("Factions", LAND_CLAIM, |event: &LandClaimEvent| {
            event.set_cancelled(true);
            Ok(())
        })
        .await
        .unwrap();
    let bridge = server.connect(quiet()).await;
    let seen = record(&bridge, |e: &FactionClaimEvent| {
        (e.is_cancelled(), e.native().map(|n| n.name()))
    })
    .await;

    let knights = plugin.create_faction("Knights", None).await.unwrap();
    let _ = plugin
        .claim(FLocation::new(WORLD, 1, 1), knights.id(), None)
        .await;

    assert_eq!(*seen.lock(), vec![(true, Some(LAND_CLAIM))]);
}

#[tokio::test]
async fn create_is_published_after_the_creator_is_admin() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(quiet()).await;
    let seen = record(&bridge, |e: &FactionCreateEvent| {
        let leader = e.faction.leader().unwrap().map(|l| l.name());
        let role = e.fplayer.as_ref().map(|p| p.role().unwrap());
        (e.faction.name(), leader, role)
    })
    .await;

    let alice = server.player("Alice");
    let creator = plugin.get_or_create_fplayer(alice.uuid, &alice.name);
    plugin.create_faction("Knights", Some(creator)).await.unwrap();
    assert!(seen.lock().is_empty());

    server.tick(1).await;
    assert_eq!(
        *seen.lock(),
        vec![(
            "Knights".to_string(),
            Some("Alice".to_string()),
            Some(Role::Leader)
        )]
    );
}

#[tokio::test]
async fn cancelled_create_publishes_nothing() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    server
        .host
        .events()
        .on_plugin("Factions", FACTION_CREATE, |event: &NativeCreate| {
            event.set_cancelled(true);
            Ok(())
        })
        .await
        .unwrap();
    let bridge = server.connect(quiet()).await;
    let seen = record(&bridge, |e: &FactionCreateEvent| e.faction.name()).await;

    assert!(plugin.create_faction("Knights", None).await.is_err());
    server.tick(3).await;
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn disband_publishes_disband_and_member_leaves() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let bridge = server.connect(quiet()).await;

    let alice = server.player("Alice");
    let creator = plugin.get_or_create_fplayer(alice.uuid, &alice.name);
    let knights = plugin.create_faction("Knights", Some(creator)).await.unwrap();

    let leaves = record(&bridge, |e: &FactionLeaveEvent| (e.fplayer.name(), e.reason)).await;
    let disbands = record(&bridge, |e: &FactionDisbandEvent| e.faction.name()).await;

    let api = bridge.api().unwrap();
    let faction = api.faction(knights.id()).unwrap().unwrap();
    api.delete_faction(faction.as_ref()).await.unwrap();

    assert_eq!(*disbands.lock(), vec!["Knights".to_string()]);
    assert_eq!(*leaves.lock(), vec![("Alice".to_string(), LeaveReason::Disband)]);
    assert!(plugin.faction_by_tag("Knights").is_none());
}

#[tokio::test]
async fn leave_reason_is_translated() {
    let server = TestServer::new();
    let plugin = server.install_uuid(Flavor::Uuid).await;
    let knights = plugin.create_faction("Knights", None).await.unwrap();
    let bob = server.player("Bob");
    let member = plugin.get_or_create_fplayer(bob.uuid, &bob.name);
    plugin
        .join(member.clone(), knights.id(), PlayerJoinReason::Command)
        .await
        .unwrap();

    let bridge = server.connect(quiet()).await;
    let leaves = record(&bridge, |e: &FactionLeaveEvent| (e.faction.name(), e.reason)).await;
    plugin.leave(member, PlayerLeaveReason::Kicked).await.unwrap();

    assert_eq!(*leaves.lock(), vec![("Knights".to_string(), LeaveReason::Kicked)]);
}

fn chunks(xs: std::ops::Range<i32>) -> Vec<PS> {
    xs.map(|x| PS::chunk(WORLD, x, 0)).collect()
}

#[tokio::test]
async fn partial_chunk_change_fans_out_per_chunk() {
    let server = TestServer::new();
    let plugin = server.install_massive().await;
    let bridge = server.connect(quiet()).await;
    let legion = plugin.create_faction("Legion", None).await.unwrap();
    plugin.change_chunks(chunks(0..5), legion.id(), None).await.unwrap();

    let unclaims = record(&bridge, |e: &FactionUnclaimEvent| e.claim.x()).await;
    let unclaim_alls = record(&bridge, |e: &FactionUnclaimAllEvent| e.faction.name()).await;
    plugin
        .change_chunks(chunks(0..3), NONE_ID, None)
        .await
        .unwrap();

    assert_eq!(*unclaims.lock(), vec![0, 1, 2]);
    assert!(unclaim_alls.lock().is_empty());
    assert_eq!(plugin.claim_count(legion.id()), 2);
}

#[tokio::test]
async fn losing_every_chunk_is_one_unclaim_all() {
    let server = TestServer::new();
    let plugin = server.install_massive().await;
    let bridge = server.connect(quiet()).await;
    let legion = plugin.create_faction("Legion", None).await.unwrap();
    plugin.change_chunks(chunks(0..3), legion.id(), None).await.unwrap();

    let unclaims = record(&bridge, |e: &FactionUnclaimEvent| e.claim.x()).await;
    let unclaim_alls = record(&bridge, |e: &FactionUnclaimAllEvent| e.faction.name()).await;
    plugin.unclaim_all(legion.id(), None).await.unwrap();

    assert!(unclaims.lock().is_empty());
    assert_eq!(*unclaim_alls.lock(), vec!["Legion".to_string()]);
}

#[tokio::test]
async fn repeated_chunks_are_reported_once() {
    let server = TestServer::new();
    let plugin = server.install_massive().await;
    let bridge = server.connect(quiet()).await;
    let legion = plugin.create_faction("Legion", None).await.unwrap();

    let claims = record(&bridge, |e: &FactionClaimEvent| e.claim.x()).await;
    let twice = [chunks(0..2), chunks(0..2)].concat();
    plugin.change_chunks(twice, legion.id(), None).await.unwrap();
    assert_eq!(*claims.lock(), vec![0, 1]);

    let unclaims = record(&bridge, |e: &FactionUnclaimEvent| e.claim.x()).await;
    let unclaim_alls = record(&bridge, |e: &FactionUnclaimAllEvent| e.faction.name()).await;
    plugin
        .change_chunks(vec![PS::chunk(WORLD, 0, 0), PS::chunk(WORLD, 0, 0)], NONE_ID, None)
        .await
        .unwrap();

    assert_eq!(*unclaims.lock(), vec![0]);
    assert!(unclaim_alls.lock().is_empty());
    assert_eq!(plugin.claim_count(legion.id()), 1);
}

#[tokio::test]
async fn cancelling_one_fanned_out_claim_cancels_the_transaction() {
    let server = TestServer::new();
    let plugin = server.install_massive().await;
    let bridge = server.connect(quiet()).await;
    let legion = plugin.create_faction("Legion", None).await.unwrap();

    let seen = record(&bridge, |e: &FactionClaimEvent| {
        let cancelled_before = e.is_cancelled();
        if e.claim.x() == 1 {
            e.set_cancelled(true);
        }
        (e.claim.x(), cancelled_before)
    })
    .await;
    let result = plugin.change_chunks(chunks(0..3), legion.id(), None).await;

    assert!(matches!(result, Err(NativeError::Cancelled(_))));
    assert_eq!(*seen.lock(), vec![(0, false), (1, false), (2, true)]);
    assert_eq!(plugin.claim_count(legion.id()), 0);
}

#[tokio::test]
async fn massive_membership_changes_map_to_join_and_leave() {
    let server = TestServer::new();
    let plugin = server.install_massive().await;
    let bridge = server.connect(quiet()).await;
    let legion = plugin.create_faction("Legion", None).await.unwrap();
    let carol = server.player("Carol");
    let mplayer = plugin.get_or_create_mplayer(carol.uuid, &carol.name);

    let joins = record(&bridge, |e: &FactionJoinEvent| e.faction.name()).await;
    let leaves = record(&bridge, |e: &FactionLeaveEvent| (e.faction.name(), e.reason)).await;

    plugin.join(mplayer.clone(), legion.id()).await.unwrap();
    plugin.promote_leader(mplayer.clone()).await.unwrap();
    plugin.kick(mplayer, None).await.unwrap();

    assert_eq!(*joins.lock(), vec!["Legion".to_string()]);
    assert_eq!(*leaves.lock(), vec![("Legion".to_string(), LeaveReason::Kicked)]);
}

#[tokio::test]
async fn massive_create_waits_for_the_scheduler() {
    let server = TestServer::new();
    let plugin = server.install_massive().await;
    let bridge = server.connect(quiet()).await;
    let created = record(&bridge, |e: &FactionCreateEvent| e.faction.id()).await;

    let legion = plugin.create_faction("Legion", None).await.unwrap();
    assert!(created.lock().is_empty());
    assert_eq!(server.host.scheduler().pending(), 1);

    server.tick(1).await;
    assert_eq!(*created.lock(), vec![legion.id().to_string()]);
}
