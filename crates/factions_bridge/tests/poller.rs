//! Events synthesized for Medieval Factions, which publishes only creation
//! and disbanding.

mod common;

use common::{quiet, record, TestServer, WORLD};
use factions_bridge::{
    BridgeOptions, FactionClaimEvent, FactionCreateEvent, FactionJoinEvent, FactionLeaveEvent,
    FactionRenameEvent, FactionUnclaimAllEvent, LeaveReason, UnifiedEvent,
};
use uuid::Uuid;

fn every_tick() -> BridgeOptions {
    BridgeOptions {
        poll_interval_ticks: 1,
        ..quiet()
    }
}

#[tokio::test]
async fn third_member_produces_exactly_one_join() {
    let server = TestServer::new();
    let plugin = server.install_medieval().await;
    let (owner, second, third) = (server.player("Gale"), server.player("Hale"), server.player("Ivo"));
    let guild = plugin.create_faction("Guild", owner.uuid).await.unwrap();
    plugin.join(second.uuid, guild.id()).unwrap();

    let bridge = server.connect(every_tick()).await;
    let joins = record(&bridge, |e: &FactionJoinEvent| {
        (e.faction.name(), e.fplayer.name(), e.native().is_none())
    })
    .await;

    plugin.join(third.uuid, guild.id()).unwrap();
    server.tick(1).await;
    server.tick(1).await;

    assert_eq!(
        *joins.lock(),
        vec![("Guild".to_string(), "Ivo".to_string(), true)]
    );
}

#[tokio::test]
async fn synthesized_events_ignore_cancellation() {
    let server = TestServer::new();
    let plugin = server.install_medieval().await;
    let (owner, member) = (server.player("Gale"), server.player("Hale"));
    let guild = plugin.create_faction("Guild", owner.uuid).await.unwrap();
    plugin.join(member.uuid, guild.id()).unwrap();

    let bridge = server.connect(every_tick()).await;
    let seen = record(&bridge, |e: &FactionLeaveEvent| {
        e.set_cancelled(true);
        (e.is_cancelled(), e.reason)
    })
    .await;

    plugin.leave(member.uuid).unwrap();
    server.tick(1).await;

    assert_eq!(*seen.lock(), vec![(false, LeaveReason::Unknown)]);
    assert!(!guild.is_member(member.uuid));
}

#[tokio::test]
async fn departure_of_a_player_the_host_never_saw_is_reported() {
    let server = TestServer::new();
    let plugin = server.install_medieval().await;
    let owner = server.player("Gale");
    let guild = plugin.create_faction("Guild", owner.uuid).await.unwrap();

    let bridge = server.connect(every_tick()).await;
    let leaves = record(&bridge, |e: &FactionLeaveEvent| {
        (e.faction.name(), e.fplayer.unique_id(), e.fplayer.name())
    })
    .await;

    let stranger = Uuid::new_v4();
    plugin.join(stranger, guild.id()).unwrap();
    server.tick(1).await;
    plugin.leave(stranger).unwrap();
    server.tick(1).await;

    assert_eq!(
        *leaves.lock(),
        vec![("Guild".to_string(), stranger, stranger.to_string())]
    );
}

#[tokio::test]
async fn silent_rename_and_land_changes_are_observed() {
    let server = TestServer::new();
    let plugin = server.install_medieval().await;
    let owner = server.player("Gale");
    let guild = plugin.create_faction("Guild", owner.uuid).await.unwrap();
    plugin.claim(WORLD, 0, 0, guild.id()).unwrap();

    let bridge = server.connect(every_tick()).await;
    let renames = record(&bridge, |e: &FactionRenameEvent| {
        (e.old_name.clone(), e.new_name.clone())
    })
    .await;
    let claims = record(&bridge, |e: &FactionClaimEvent| (e.claim.x(), e.claim.z())).await;
    let unclaim_alls = record(&bridge, |e: &FactionUnclaimAllEvent| e.faction.name()).await;

    let api = bridge.api().unwrap();
    let faction = api.faction(&guild.id().to_string()).unwrap().unwrap();
    faction.set_name("Order").await.unwrap();
    plugin.claim(WORLD, 1, 0, guild.id()).unwrap();
    server.tick(1).await;

    assert_eq!(*renames.lock(), vec![("Guild".to_string(), "Order".to_string())]);
    assert_eq!(*claims.lock(), vec![(1, 0)]);

    plugin.unclaim_all(guild.id()).unwrap();
    server.tick(1).await;
    assert_eq!(*unclaim_alls.lock(), vec!["Order".to_string()]);
}

#[tokio::test]
async fn new_factions_are_announced_once() {
    let server = TestServer::new();
    let plugin = server.install_medieval().await;
    let bridge = server.connect(every_tick()).await;
    let creates = record(&bridge, |e: &FactionCreateEvent| {
        (e.faction.name(), e.fplayer.as_ref().map(|p| p.name()))
    })
    .await;
    let joins = record(&bridge, |e: &FactionJoinEvent| e.fplayer.name()).await;

    let owner = server.player("Gale");
    plugin.create_faction("Guild", owner.uuid).await.unwrap();
    server.tick(2).await;

    assert_eq!(
        *creates.lock(),
        vec![("Guild".to_string(), Some("Gale".to_string()))]
    );
    assert!(joins.lock().is_empty());
}

#[tokio::test]
async fn poller_runs_on_the_configured_interval() {
    let server = TestServer::new();
    let plugin = server.install_medieval().await;
    let owner = server.player("Gale");
    let member = server.player("Hale");
    let guild = plugin.create_faction("Guild", owner.uuid).await.unwrap();

    let bridge = server
        .connect(BridgeOptions {
            poll_interval_ticks: 5,
            ..quiet()
        })
        .await;
    let joins = record(&bridge, |e: &FactionJoinEvent| e.fplayer.name()).await;

    plugin.join(member.uuid, guild.id()).unwrap();
    server.tick(4).await;
    assert!(joins.lock().is_empty());
    server.tick(1).await;
    assert_eq!(*joins.lock(), vec!["Hale".to_string()]);
}
