//! The two events Medieval Factions publishes. Its create event carries the
//! finished faction, so creation is translated right away.

use super::MedievalBinding;
use crate::error::BridgeResult;
use crate::events::publish::listen;
use crate::events::{publish, FactionCreateEvent, FactionDisbandEvent, NativeRef};
use crate::model::DisbandReason;
use native_factions::medieval::event as native;
use native_factions::medieval::PLUGIN_NAME;
use std::sync::Arc;
use tracing::debug;

pub(crate) async fn register(binding: Arc<MedievalBinding>) -> BridgeResult<()> {
    let events = binding.context.events();
    listen(&events, PLUGIN_NAME, native::FACTION_CREATE, binding.clone(), on_create).await?;
    listen(&events, PLUGIN_NAME, native::FACTION_DISBAND, binding.clone(), on_disband).await?;
    debug!("📡 Listening to {} events", binding.context.provider().name);
    Ok(())
}

async fn on_create(binding: Arc<MedievalBinding>, event: Arc<native::FactionCreateEvent>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionCreateEvent {
            faction: binding.faction(event.faction.clone()),
            fplayer: Some(binding.fplayer(event.creator)),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

async fn on_disband(binding: Arc<MedievalBinding>, event: Arc<native::FactionDisbandEvent>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionDisbandEvent {
            faction: binding.faction(event.faction.clone()),
            fplayer: event.disbander.map(|p| binding.fplayer(p)),
            reason: DisbandReason::Unknown,
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}
