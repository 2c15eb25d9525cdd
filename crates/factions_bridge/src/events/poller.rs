//! State-diff poller for providers that do not publish every transition.
//!
//! Each pass snapshots name, members and claims of every faction and
//! compares the result with the previous pass. The first pass only records
//! the baseline. Factions that appear later are recorded silently (their
//! creation is published natively) and factions that vanish are dropped
//! silently (so is their disbanding).

use super::publish::publish;
use super::types::*;
use crate::api::FactionsApi;
use crate::context::BridgeContext;
use crate::error::BridgeResult;
use crate::model::{ChunkCoords, FPlayerRef, FactionRef, LeaveReason};
use host_event_system::{EventSystem, TaskId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactionSnapshot {
    pub name: String,
    pub members: HashSet<Uuid>,
    pub claims: HashSet<ChunkCoords>,
}

/// One difference between two passes.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotChange {
    Renamed {
        faction_id: String,
        old_name: String,
        new_name: String,
    },
    Joined {
        faction_id: String,
        player: Uuid,
    },
    Left {
        faction_id: String,
        player: Uuid,
    },
    Claimed {
        faction_id: String,
        coords: ChunkCoords,
    },
    Unclaimed {
        faction_id: String,
        coords: ChunkCoords,
    },
    /// Every claim of the faction is gone
    UnclaimedAll { faction_id: String },
}

/// Changes from `previous` to `current`, ordered by faction id and then
/// rename, joins, departures, claims, unclaims.
pub fn diff(
    previous: &HashMap<String, FactionSnapshot>,
    current: &HashMap<String, FactionSnapshot>,
) -> Vec<SnapshotChange> {
    let mut ids: Vec<&String> = current.keys().filter(|id| previous.contains_key(*id)).collect();
    ids.sort();

    let mut changes = Vec::new();
    for id in ids {
        let (before, after) = (&previous[id], &current[id]);
        let faction_id = || id.clone();

        if before.name != after.name {
            changes.push(SnapshotChange::Renamed {
                faction_id: faction_id(),
                old_name: before.name.clone(),
                new_name: after.name.clone(),
            });
        }

        let mut joined: Vec<_> = after.members.difference(&before.members).copied().collect();
        joined.sort();
        changes.extend(joined.into_iter().map(|player| SnapshotChange::Joined {
            faction_id: faction_id(),
            player,
        }));

        let mut left: Vec<_> = before.members.difference(&after.members).copied().collect();
        left.sort();
        changes.extend(left.into_iter().map(|player| SnapshotChange::Left {
            faction_id: faction_id(),
            player,
        }));

        let mut claimed: Vec<_> = after.claims.difference(&before.claims).copied().collect();
        claimed.sort_by_key(|c| (c.world, c.x, c.z));
        changes.extend(claimed.into_iter().map(|coords| SnapshotChange::Claimed {
            faction_id: faction_id(),
            coords,
        }));

        let mut unclaimed: Vec<_> = before.claims.difference(&after.claims).copied().collect();
        if !unclaimed.is_empty() && after.claims.is_empty() {
            changes.push(SnapshotChange::UnclaimedAll {
                faction_id: faction_id(),
            });
        } else {
            unclaimed.sort_by_key(|c| (c.world, c.x, c.z));
            changes.extend(unclaimed.into_iter().map(|coords| SnapshotChange::Unclaimed {
                faction_id: faction_id(),
                coords,
            }));
        }
    }
    changes
}

/// The last pass: what every faction looked like and the members seen.
///
/// A departed player may no longer resolve through the provider, so the
/// handle from the pass that still listed them is kept.
#[derive(Default)]
struct Baseline {
    factions: HashMap<String, FactionSnapshot>,
    players: HashMap<Uuid, FPlayerRef>,
}

pub struct DiffPoller {
    api: Weak<dyn FactionsApi>,
    context: Arc<BridgeContext>,
    baseline: Mutex<Option<Baseline>>,
}

impl std::fmt::Debug for DiffPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffPoller")
            .field("provider", &self.context.provider_id())
            .field("has_baseline", &self.baseline.lock().is_some())
            .finish()
    }
}

impl DiffPoller {
    pub fn new(api: Weak<dyn FactionsApi>, context: Arc<BridgeContext>) -> Arc<Self> {
        Arc::new(Self {
            api,
            context,
            baseline: Mutex::new(None),
        })
    }

    /// Schedules a pass every `poll_interval_ticks`, starting one interval
    /// from now.
    pub fn start(self: &Arc<Self>) -> TaskId {
        let interval = self.context.poll_interval();
        let poller = self.clone();
        debug!(
            "🔍 Polling {} every {} tick(s)",
            self.context.provider().name,
            interval.0
        );
        self.context.scheduler().run_repeating(interval, interval, move || {
            let poller = poller.clone();
            Box::pin(async move {
                if let Err(e) = poller.poll().await {
                    warn!("Faction state poll failed: {}", e);
                }
            })
        })
    }

    /// Runs one pass and returns how many events it published.
    ///
    /// The baseline moves forward before anything is published. A change
    /// that fails to publish is logged and skipped so the rest of the pass
    /// still goes out.
    pub async fn poll(&self) -> BridgeResult<usize> {
        let Some(api) = self.api.upgrade() else {
            return Ok(0);
        };

        let mut current = Baseline::default();
        let mut factions = HashMap::new();
        for faction in api.factions()? {
            let members = faction.members()?;
            let snapshot = FactionSnapshot {
                name: faction.name(),
                members: members.iter().map(|m| m.unique_id()).collect(),
                claims: faction.claims()?.iter().map(|c| c.coords()).collect(),
            };
            current
                .players
                .extend(members.into_iter().map(|m| (m.unique_id(), m)));
            current.factions.insert(faction.id(), snapshot);
            factions.insert(faction.id(), faction);
        }

        let (changes, players) = {
            let mut baseline = self.baseline.lock();
            let (changes, mut players) = match baseline.take() {
                Some(previous) => (diff(&previous.factions, &current.factions), previous.players),
                None => {
                    debug!("Recorded baseline of {} faction(s)", current.factions.len());
                    (Vec::new(), HashMap::new())
                }
            };
            // Members of this pass win over handles from the previous one
            players.extend(current.players.iter().map(|(id, p)| (*id, p.clone())));
            *baseline = Some(current);
            (changes, players)
        };

        Ok(self
            .publish_changes(api.as_ref(), &factions, &players, changes)
            .await)
    }

    async fn publish_changes(
        &self,
        api: &dyn FactionsApi,
        factions: &HashMap<String, FactionRef>,
        players: &HashMap<Uuid, FPlayerRef>,
        changes: Vec<SnapshotChange>,
    ) -> usize {
        let events = self.context.events();
        let mut published = 0;
        for change in changes {
            match self.publish_change(api, &events, factions, players, change).await {
                Ok(true) => published += 1,
                Ok(false) => {}
                Err(e) => warn!("Failed to publish polled change: {}", e),
            }
        }
        published
    }

    async fn publish_change(
        &self,
        api: &dyn FactionsApi,
        events: &EventSystem,
        factions: &HashMap<String, FactionRef>,
        players: &HashMap<Uuid, FPlayerRef>,
        change: SnapshotChange,
    ) -> BridgeResult<bool> {
        let faction_of = |id: &str| factions.get(id).cloned();
        let fplayer_of = |id: Uuid| match players.get(&id) {
            Some(fplayer) => Ok(Some(fplayer.clone())),
            None => api.fplayer_by_id(id),
        };

        match change {
            SnapshotChange::Renamed {
                faction_id,
                old_name,
                new_name,
            } => {
                let Some(faction) = faction_of(&faction_id) else {
                    return Ok(false);
                };
                publish(
                    events,
                    FactionRenameEvent {
                        faction,
                        fplayer: None,
                        old_name,
                        new_name,
                        native: None,
                    },
                )
                .await?;
            }
            SnapshotChange::Joined { faction_id, player } => {
                let (Some(faction), Some(fplayer)) =
                    (faction_of(&faction_id), fplayer_of(player)?)
                else {
                    debug!("Skipping join of unresolvable player {}", player);
                    return Ok(false);
                };
                publish(
                    events,
                    FactionJoinEvent {
                        faction,
                        fplayer,
                        native: None,
                    },
                )
                .await?;
            }
            SnapshotChange::Left { faction_id, player } => {
                let (Some(faction), Some(fplayer)) =
                    (faction_of(&faction_id), fplayer_of(player)?)
                else {
                    debug!("Skipping departure of unresolvable player {}", player);
                    return Ok(false);
                };
                publish(
                    events,
                    FactionLeaveEvent {
                        faction,
                        fplayer,
                        reason: LeaveReason::Unknown,
                        native: None,
                    },
                )
                .await?;
            }
            SnapshotChange::Claimed { faction_id, coords } => {
                let Some(faction) = faction_of(&faction_id) else {
                    return Ok(false);
                };
                publish(
                    events,
                    FactionClaimEvent {
                        faction,
                        claim: api.claim(coords)?,
                        fplayer: None,
                        native: None,
                    },
                )
                .await?;
            }
            SnapshotChange::Unclaimed { faction_id, coords } => {
                let Some(faction) = faction_of(&faction_id) else {
                    return Ok(false);
                };
                publish(
                    events,
                    FactionUnclaimEvent {
                        faction,
                        claim: api.claim(coords)?,
                        fplayer: None,
                        native: None,
                    },
                )
                .await?;
            }
            SnapshotChange::UnclaimedAll { faction_id } => {
                let Some(faction) = faction_of(&faction_id) else {
                    return Ok(false);
                };
                publish(
                    events,
                    FactionUnclaimAllEvent {
                        faction,
                        fplayer: None,
                        native: None,
                    },
                )
                .await?;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BridgeOptions;
    use crate::discovery::discover;
    use crate::events::subscribe;
    use host_event_system::{Host, ServerHost, WorldId};
    use native_factions::medieval::MedievalFactions;

    fn snapshot(name: &str, members: &[Uuid], claims: &[ChunkCoords]) -> FactionSnapshot {
        FactionSnapshot {
            name: name.to_string(),
            members: members.iter().copied().collect(),
            claims: claims.iter().copied().collect(),
        }
    }

    #[test]
    fn one_new_member_yields_one_join() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let previous = HashMap::from([("f".to_string(), snapshot("F", &[a, b], &[]))]);
        let current = HashMap::from([("f".to_string(), snapshot("F", &[a, b, c], &[]))]);

        assert_eq!(
            diff(&previous, &current),
            vec![SnapshotChange::Joined {
                faction_id: "f".to_string(),
                player: c
            }]
        );
    }

    #[test]
    fn emptied_claim_set_is_one_unclaim_all() {
        let world = WorldId::new();
        let chunks = [ChunkCoords::new(world, 0, 0), ChunkCoords::new(world, 0, 1)];
        let previous = HashMap::from([("f".to_string(), snapshot("F", &[], &chunks))]);
        let partial = HashMap::from([("f".to_string(), snapshot("F", &[], &chunks[..1]))]);
        let empty = HashMap::from([("f".to_string(), snapshot("F", &[], &[]))]);

        assert_eq!(
            diff(&previous, &partial),
            vec![SnapshotChange::Unclaimed {
                faction_id: "f".to_string(),
                coords: chunks[1]
            }]
        );
        assert_eq!(
            diff(&previous, &empty),
            vec![SnapshotChange::UnclaimedAll {
                faction_id: "f".to_string()
            }]
        );
    }

    #[test]
    fn appearing_and_vanishing_factions_are_silent() {
        let previous = HashMap::from([("old".to_string(), snapshot("Old", &[Uuid::new_v4()], &[]))]);
        let current = HashMap::from([("new".to_string(), snapshot("New", &[Uuid::new_v4()], &[]))]);
        assert!(diff(&previous, &current).is_empty());
    }

    #[test]
    fn rename_is_detected_by_id() {
        let previous = HashMap::from([("f".to_string(), snapshot("Avalon", &[], &[]))]);
        let current = HashMap::from([("f".to_string(), snapshot("Camelot", &[], &[]))]);
        assert_eq!(
            diff(&previous, &current),
            vec![SnapshotChange::Renamed {
                faction_id: "f".to_string(),
                old_name: "Avalon".to_string(),
                new_name: "Camelot".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn failed_change_does_not_drop_the_rest_of_the_pass() {
        let host = Arc::new(ServerHost::new("1.20.4"));
        host.add_world("world");
        let plugin = MedievalFactions::new(host.events());
        host.install_plugin(plugin.descriptor()).await;
        let guild = plugin.create_faction("Guild", Uuid::new_v4()).await.unwrap();

        let options = BridgeOptions {
            console_output: false,
            ..BridgeOptions::default()
        };
        let binding = discover(host.clone(), options.clone()).await.unwrap().unwrap();
        let renames = Arc::new(Mutex::new(Vec::new()));
        let seen = renames.clone();
        subscribe(&host.events(), move |e: &FactionRenameEvent| {
            seen.lock().push(e.new_name.clone());
            Ok(())
        })
        .await
        .unwrap();

        let context = BridgeContext::new(host.clone(), binding.provider.clone(), options);
        let poller = DiffPoller::new(Arc::downgrade(&binding.api), context);
        let factions: HashMap<_, _> = binding
            .api
            .factions()
            .unwrap()
            .into_iter()
            .map(|f| (f.id(), f))
            .collect();
        let faction_id = guild.id().to_string();
        let changes = vec![
            // No such world on the host, so the claim cannot be resolved
            SnapshotChange::Claimed {
                faction_id: faction_id.clone(),
                coords: ChunkCoords::new(WorldId::new(), 0, 0),
            },
            SnapshotChange::Renamed {
                faction_id,
                old_name: "Guild".to_string(),
                new_name: "Order".to_string(),
            },
        ];

        let published = poller
            .publish_changes(binding.api.as_ref(), &factions, &HashMap::new(), changes)
            .await;

        assert_eq!(published, 1);
        assert_eq!(*renames.lock(), vec!["Order".to_string()]);
    }
}
