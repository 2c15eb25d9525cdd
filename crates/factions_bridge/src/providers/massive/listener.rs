//! MassiveCraft events to unified events.
//!
//! MassiveCraft reports every land change as one chunk transaction and every
//! membership change as one event with a reason, so a native event can fan
//! out to several unified events. All events of one fan-out share the same
//! native reference: cancelling any of them cancels the whole transaction.

use super::MassiveBinding;
use crate::error::BridgeResult;
use crate::events::publish::listen;
use crate::events::{
    publish, FactionClaimEvent, FactionCreateEvent, FactionDisbandEvent, FactionJoinEvent,
    FactionLeaveEvent, FactionRenameEvent, FactionUnclaimAllEvent, FactionUnclaimEvent,
    NativeRef,
};
use crate::model::{DisbandReason, FPlayerRef, LeaveReason};
use native_factions::massive::entity::{MPlayer, PS};
use native_factions::massive::event::{self as native, MembershipChangeReason};
use native_factions::massive::PLUGIN_NAME;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub(crate) async fn register(binding: Arc<MassiveBinding>) -> BridgeResult<()> {
    let events = binding.context.events();
    listen(&events, PLUGIN_NAME, native::FACTIONS_CREATE, binding.clone(), on_create).await?;
    listen(&events, PLUGIN_NAME, native::FACTIONS_DISBAND, binding.clone(), on_disband).await?;
    listen(&events, PLUGIN_NAME, native::FACTIONS_NAME_CHANGE, binding.clone(), on_name_change).await?;
    listen(&events, PLUGIN_NAME, native::FACTIONS_CHUNKS_CHANGE, binding.clone(), on_chunks_change).await?;
    listen(
        &events,
        PLUGIN_NAME,
        native::FACTIONS_MEMBERSHIP_CHANGE,
        binding.clone(),
        on_membership_change,
    )
    .await?;
    debug!("📡 Listening to {} events", binding.context.provider().name);
    Ok(())
}

/// `chunks` without repeats, in first-seen order.
fn distinct(chunks: &[PS]) -> Vec<&PS> {
    let mut seen = HashSet::new();
    chunks.iter().filter(|ps| seen.insert(*ps)).collect()
}

fn sender(binding: &Arc<MassiveBinding>, native: &Option<Arc<MPlayer>>) -> Option<FPlayerRef> {
    native.clone().map(|p| binding.fplayer(p))
}

async fn on_create(binding: Arc<MassiveBinding>, event: Arc<native::EventFactionsCreate>) -> BridgeResult<()> {
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

async fn publish_create(binding: Arc<MassiveBinding>, event: Arc<native::EventFactionsCreate>) -> BridgeResult<()> {
    let Some(faction) = binding.plugin.faction(&event.faction_id) else {
        debug!("Faction {} was never created, nothing to publish", event.faction_name);
        return Ok(());
    };
    publish(
        &binding.context.events(),
        FactionCreateEvent {
            faction: binding.faction(faction),
            fplayer: sender(&binding, &event.sender),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

/// MassiveCraft does not say why a faction was disbanded.
async fn on_disband(binding: Arc<MassiveBinding>, event: Arc<native::EventFactionsDisband>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionDisbandEvent {
            faction: binding.faction(event.faction.clone()),
            fplayer: sender(&binding, &event.sender),
            reason: DisbandReason::Unknown,
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

async fn on_name_change(binding: Arc<MassiveBinding>, event: Arc<native::EventFactionsNameChange>) -> BridgeResult<()> {
    publish(
        &binding.context.events(),
        FactionRenameEvent {
            faction: binding.faction(event.faction.clone()),
            fplayer: sender(&binding, &event.sender),
            old_name: event.faction.name(),
            new_name: event.new_name.clone(),
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}

/// A claim becomes one event per distinct chunk. An unclaim is split by
/// previous owner: an owner losing every chunk it holds gets one unclaim-all
/// event, any other owner one unclaim event per distinct chunk.
async fn on_chunks_change(binding: Arc<MassiveBinding>, event: Arc<native::EventFactionsChunksChange>) -> BridgeResult<()> {
    let events = binding.context.events();
    let native = NativeRef::new(event.clone());
    let fplayer = sender(&binding, &event.sender);

    if !event.new_faction.is_none() {
        for ps in distinct(&event.chunks) {
            publish(
                &events,
                FactionClaimEvent {
                    faction: binding.faction(event.new_faction.clone()),
                    claim: binding.claim(ps.clone())?,
                    fplayer: fplayer.clone(),
                    native: Some(native.clone()),
                },
            )
            .await?;
        }
        return Ok(());
    }

    let mut owners: Vec<_> = event.old_faction_chunks.iter().collect();
    owners.sort_by(|a, b| a.0.cmp(b.0));
    for (owner_id, (owner, chunks)) in owners {
        if owner.is_none() {
            continue;
        }
        let chunks = distinct(chunks);
        if chunks.len() >= binding.plugin.claim_count(owner_id) {
            trace!("{} loses all {} chunks", owner.name(), chunks.len());
            publish(
                &events,
                FactionUnclaimAllEvent {
                    faction: binding.faction(owner.clone()),
                    fplayer: fplayer.clone(),
                    native: Some(native.clone()),
                },
            )
            .await?;
            continue;
        }
        for ps in chunks {
            publish(
                &events,
                FactionUnclaimEvent {
                    faction: binding.faction(owner.clone()),
                    claim: binding.claim(ps.clone())?,
                    fplayer: fplayer.clone(),
                    native: Some(native.clone()),
                },
            )
            .await?;
        }
    }
    Ok(())
}

async fn on_membership_change(
    binding: Arc<MassiveBinding>,
    event: Arc<native::EventFactionsMembershipChange>,
) -> BridgeResult<()> {
    let events = binding.context.events();
    let fplayer = binding.fplayer(event.mplayer.clone());
    let reason = match event.reason {
        MembershipChangeReason::Create | MembershipChangeReason::Join => {
            publish(
                &events,
                FactionJoinEvent {
                    faction: binding.faction(event.new_faction.clone()),
                    fplayer,
                    native: Some(NativeRef::new(event)),
                },
            )
            .await?;
            return Ok(());
        }
        MembershipChangeReason::Leave => LeaveReason::Leave,
        MembershipChangeReason::Kick => LeaveReason::Kicked,
        MembershipChangeReason::Disband => LeaveReason::Disband,
        MembershipChangeReason::Leader | MembershipChangeReason::Rank => {
            trace!("Ignoring {} change for {}", event.reason.name(), event.mplayer.name());
            return Ok(());
        }
    };
    // The player still belongs to the faction being left.
    let faction = binding.plugin.faction_of(&event.mplayer);
    publish(
        &events,
        FactionLeaveEvent {
            faction: binding.faction(faction),
            fplayer,
            reason,
            native: Some(NativeRef::new(event)),
        },
    )
    .await?;
    Ok(())
}
