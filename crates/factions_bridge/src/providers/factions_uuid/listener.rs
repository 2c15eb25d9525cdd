//! FactionsUUID events to unified events. Every native event maps to one
//! unified event; creation is published one delay after the native event,
//! once the plugin has stored the faction and made the creator its admin.

use super::UuidBinding;
use crate::error::BridgeResult;
use crate::events::publish::listen;
use crate::events::{
    publish, FactionClaimEvent, FactionCreateEvent, FactionDisbandEvent, FactionJoinEvent,
    FactionLeaveEvent, FactionRenameEvent, FactionUnclaimAllEvent, FactionUnclaimEvent,
    NativeRef,
};
use crate::model::{DisbandReason, FPlayerRef, LeaveReason};
use native_factions::factions_uuid::event as native;
use native_factions::factions_uuid::fplayer::FPlayer as NativeFPlayer;
use native_factions::factions_uuid::PLUGIN_NAME;
use std::sync::Arc;
use tracing::{debug, warn};

pub(crate) async fn register(binding: Arc<UuidBinding>) -> BridgeResult<()> {
    let events = binding.context.events();
    listen(&events, PLUGIN_NAME, native::FACTION_CREATE, binding.clone(), on_create).await?;
    listen(&events, PLUGIN_NAME, native::FACTION_DISBAND, binding.clone(), on_disband).await?;
    listen(&events, PLUGIN_NAME, native::FACTION_RENAME, binding.clone(), on_rename).await?;
    listen(&events, PLUGIN_NAME, native::LAND_CLAIM, binding.clone(), on_claim).await?;
    listen(&events, PLUGIN_NAME, native::LAND_UNCLAIM, binding.clone(), on_unclaim).await?;
    listen(&events, PLUGIN_NAME, native::LAND_UNCLAIM_ALL, binding.clone(), on_unclaim_all).await?;
    listen(&events, PLUGIN_NAME, native::FPLAYER_JOIN, binding.clone(), on_join).await?;
    listen(&events, PLUGIN_NAME, native::FPLAYER_LEAVE, binding.clone(), on_leave).await?;
    debug!("📡 Listening to {} events", binding.context.provider().name);
    Ok(())
}

fn fplayer(binding: &Arc<UuidBinding>, native: &Option<Arc<NativeFPlayer>>) -> Option<FPlayerRef> {
    native.clone().map(|p| binding.fplayer(p))
}

async fn on_create(binding: Arc<UuidBinding>, event: Arc<native::FactionCreateEvent>) -> BridgeResult<()> {
    let delay = binding.context.create_event_delay();
    binding.context.scheduler().run_later(delay, move || {
        Box::pin(async move {
            if let Err(e) = publish_create(binding, event).await {
                warn!("Failed to publish deferred faction creation: {}", e);
            }
        })
    });
    Ok(())
}

async fn publish_create(binding: Arc<UuidBinding>, event: Arc<native::FactionCreateEvent>) -> BridgeResult<()> {
    let Some(faction) = binding.plugin.faction_by_tag(&event.tag) else {
        debug!("Faction {} was never created, nothing to publish", event.tag);
        return Ok(());
    };
    publish(
        &binding.context.events(),
        FactionCreateEvent {
            faction: binding.faction(faction),
            fplayer: fplayer(&binding, &event.fplayer),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

async fn on_disband(binding: Arc<UuidBinding>, event: Arc<native::FactionDisbandEvent>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionDisbandEvent {
            faction: binding.faction(event.faction.clone()),
            fplayer: fplayer(&binding, &event.fplayer),
            reason: DisbandReason::from_native(event.reason.name()),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

async fn on_rename(binding: Arc<UuidBinding>, event: Arc<native::FactionRenameEvent>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionRenameEvent {
            faction: binding.faction(event.faction.clone()),
            fplayer: fplayer(&binding, &event.fplayer),
            old_name: event.faction.tag(),
            new_name: event.new_tag.clone(),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

async fn on_claim(binding: Arc<UuidBinding>, event: Arc<native::LandClaimEvent>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionClaimEvent {
            faction: binding.faction(event.faction.clone()),
            claim: binding.claim(event.location.clone())?,
            fplayer: fplayer(&binding, &event.fplayer),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

async fn on_unclaim(binding: Arc<UuidBinding>, event: Arc<native::LandUnclaimEvent>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionUnclaimEvent {
            faction: binding.faction(event.faction.clone()),
            claim: binding.claim(event.location.clone())?,
            fplayer: fplayer(&binding, &event.fplayer),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

async fn on_unclaim_all(binding: Arc<UuidBinding>, event: Arc<native::LandUnclaimAllEvent>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionUnclaimAllEvent {
            faction: binding.faction(event.faction.clone()),
            fplayer: fplayer(&binding, &event.fplayer),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

async fn on_join(binding: Arc<UuidBinding>, event: Arc<native::FPlayerJoinEvent>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionJoinEvent {
            faction: binding.faction(event.faction.clone()),
            fplayer: binding.fplayer(event.fplayer.clone()),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

async fn on_leave(binding: Arc<UuidBinding>, event: Arc<native::FPlayerLeaveEvent>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionLeaveEvent {
            faction: binding.faction(event.faction.clone()),
            fplayer: binding.fplayer(event.fplayer.clone()),
            reason: LeaveReason::from_native(event.reason.name()),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}
