//! SaberFactions, a fork of FactionsUUID.
//!
//! Everything the fork shares with upstream is served by the FactionsUUID
//! adapter. The fork adds faction points and strikes, which it keeps in
//! fields outside the published API whose names changed between releases.
//! [`ForkFields`] finds them once, when the adapter is built.

use super::factions_uuid::{self, UuidFactionsApi};
use crate::adapter::Adapter;
use crate::api::FactionsApi;
use crate::capability::CapabilityTable;
use crate::context::BridgeContext;
use crate::error::BridgeResult;
use crate::model::{ChunkCoords, ClaimRef, FPlayerRef, Faction, FactionRef, Provider};
use async_trait::async_trait;
use host_event_system::OfflinePlayer;
use native_factions::factions_uuid::faction::Faction as NativeFaction;
use native_factions::factions_uuid::types::InternalField;
use native_factions::factions_uuid::FactionsPlugin;
use std::sync::Arc;
use uuid::Uuid;

const FIELD_PROBES: &[(&str, &[&str])] = &[
    ("points", &["points", "factionPoints"]),
    ("strikes", &["strikes", "strikeCount"]),
];

/// Resolved accessors for the fork-only faction fields.
#[derive(Debug, Clone)]
pub struct ForkFields {
    table: CapabilityTable,
}

impl ForkFields {
    /// Probes the wilderness faction, which every build creates at start-up.
    pub fn resolve(plugin: &FactionsPlugin) -> Self {
        let probe = plugin.wilderness();
        let declared = probe.declared_field_names();
        Self {
            table: CapabilityTable::resolve(FIELD_PROBES, |field| {
                declared.iter().any(|name| name == field)
            }),
        }
    }

    pub fn supports(&self, operation: &str) -> bool {
        self.table.supports(operation)
    }

    pub(crate) fn read(&self, faction: &Adapter<NativeFaction>, operation: &'static str) -> BridgeResult<i64> {
        let Some(field) = self.table.accessor(operation) else {
            return faction.unsupported(operation);
        };
        match faction.native().get_declared_field(field) {
            Some(InternalField::Int(value)) => Ok(value),
            Some(InternalField::Float(value)) => Ok(value as i64),
            Some(InternalField::Text(text)) => match text.trim().parse() {
                Ok(value) => Ok(value),
                Err(_) => faction.method_error(
                    "SaberFaction",
                    operation,
                    format!("field {field} holds {text:?}"),
                ),
            },
            None => faction.method_error("SaberFaction", operation, format!("field {field} is missing")),
        }
    }
}

pub fn create(context: Arc<BridgeContext>) -> BridgeResult<Arc<dyn FactionsApi>> {
    let plugin = factions_uuid::plugin_handle(&context)?;
    Ok(Arc::new(SaberFactionsApi::new(context, plugin)))
}

/// Delegates to a FactionsUUID adapter built with the fork fields.
pub struct SaberFactionsApi {
    upstream: UuidFactionsApi,
}

impl SaberFactionsApi {
    pub fn new(context: Arc<BridgeContext>, plugin: Arc<FactionsPlugin>) -> Self {
        let fork = ForkFields::resolve(&plugin);
        Self {
            upstream: UuidFactionsApi::new(context, plugin, Some(fork)),
        }
    }

    pub fn plugin(&self) -> &Arc<FactionsPlugin> {
        self.upstream.plugin()
    }
}

#[async_trait]
impl FactionsApi for SaberFactionsApi {
    fn provider(&self) -> &Provider {
        self.upstream.provider()
    }

    fn factions(&self) -> BridgeResult<Vec<FactionRef>> {
        self.upstream.factions()
    }

    fn faction(&self, id: &str) -> BridgeResult<Option<FactionRef>> {
        self.upstream.faction(id)
    }

    fn faction_by_name(&self, name: &str) -> BridgeResult<Option<FactionRef>> {
        self.upstream.faction_by_name(name)
    }

    fn claim(&self, coords: ChunkCoords) -> BridgeResult<ClaimRef> {
        self.upstream.claim(coords)
    }

    fn fplayer(&self, player: &OfflinePlayer) -> BridgeResult<FPlayerRef> {
        self.upstream.fplayer(player)
    }

    fn fplayer_by_id(&self, id: Uuid) -> BridgeResult<Option<FPlayerRef>> {
        self.upstream.fplayer_by_id(id)
    }

    fn fplayer_by_name(&self, name: &str) -> BridgeResult<Option<FPlayerRef>> {
        self.upstream.fplayer_by_name(name)
    }

    fn fplayers(&self) -> BridgeResult<Vec<FPlayerRef>> {
        self.upstream.fplayers()
    }

    fn wilderness(&self) -> BridgeResult<Option<FactionRef>> {
        self.upstream.wilderness()
    }

    fn safe_zone(&self) -> BridgeResult<Option<FactionRef>> {
        self.upstream.safe_zone()
    }

    fn war_zone(&self) -> BridgeResult<Option<FactionRef>> {
        self.upstream.war_zone()
    }

    async fn create_faction(&self, name: &str) -> BridgeResult<FactionRef> {
        self.upstream.create_faction(name).await
    }

    async fn delete_faction(&self, faction: &dyn Faction) -> BridgeResult<()> {
        self.upstream.delete_faction(faction).await
    }

    async fn register(&self) -> BridgeResult<()> {
        self.upstream.register().await
    }

    fn is_registered(&self) -> bool {
        self.upstream.is_registered()
    }
}
