use super::types::{InternalField, LazyLocation, Relation};
use super::{SAFEZONE_ID, WARZONE_ID, WILDERNESS_ID};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A FactionsUUID faction.
///
/// Ids are numeric strings handed out by the plugin; `"0"`, `"-1"` and
/// `"-2"` are the wilderness, safe zone and war zone.
#[derive(Debug)]
pub struct Faction {
    id: String,
    tag: RwLock<String>,
    description: RwLock<String>,
    founded_date: u64,
    money: RwLock<f64>,
    power_boost: RwLock<f64>,
    home: RwLock<Option<LazyLocation>>,
    warps: RwLock<HashMap<String, LazyLocation>>,
    relation_wishes: RwLock<HashMap<String, Relation>>,
    fplayers: RwLock<HashSet<Uuid>>,
    /// Fields only some builds carry; not part of the published API
    declared_fields: RwLock<HashMap<String, InternalField>>,
}

impl Faction {
    pub(crate) fn new(id: impl Into<String>, tag: impl Into<String>, founded_date: u64) -> Self {
        Self {
            id: id.into(),
            tag: RwLock::new(tag.into()),
            description: RwLock::new("Default faction description :(".to_string()),
            founded_date,
            money: RwLock::new(0.0),
            power_boost: RwLock::new(0.0),
            home: RwLock::new(None),
            warps: RwLock::new(HashMap::new()),
            relation_wishes: RwLock::new(HashMap::new()),
            fplayers: RwLock::new(HashSet::new()),
            declared_fields: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> String {
        self.tag.read().clone()
    }

    pub(crate) fn set_tag(&self, tag: &str) {
        *self.tag.write() = tag.to_string();
    }

    pub fn description(&self) -> String {
        self.description.read().clone()
    }

    pub fn set_description(&self, description: &str) {
        *self.description.write() = description.to_string();
    }

    /// Creation time in epoch milliseconds.
    pub fn founded_date(&self) -> u64 {
        self.founded_date
    }

    pub fn is_wilderness(&self) -> bool {
        self.id == WILDERNESS_ID
    }

    pub fn is_safe_zone(&self) -> bool {
        self.id == SAFEZONE_ID
    }

    pub fn is_war_zone(&self) -> bool {
        self.id == WARZONE_ID
    }

    pub fn is_normal(&self) -> bool {
        !(self.is_wilderness() || self.is_safe_zone() || self.is_war_zone())
    }

    pub fn money(&self) -> f64 {
        *self.money.read()
    }

    pub fn deposit(&self, amount: f64) {
        *self.money.write() += amount;
    }

    pub fn power_boost(&self) -> f64 {
        *self.power_boost.read()
    }

    pub fn set_power_boost(&self, boost: f64) {
        *self.power_boost.write() = boost;
    }

    pub fn home(&self) -> Option<LazyLocation> {
        self.home.read().clone()
    }

    pub fn set_home(&self, home: Option<LazyLocation>) {
        *self.home.write() = home;
    }

    pub fn warps(&self) -> HashMap<String, LazyLocation> {
        self.warps.read().clone()
    }

    pub fn set_warp(&self, name: &str, location: LazyLocation) {
        self.warps.write().insert(name.to_string(), location);
    }

    pub fn relation_wish(&self, other_id: &str) -> Relation {
        self.relation_wishes
            .read()
            .get(other_id)
            .copied()
            .unwrap_or(Relation::Neutral)
    }

    pub fn set_relation_wish(&self, other_id: &str, relation: Relation) {
        self.relation_wishes
            .write()
            .insert(other_id.to_string(), relation);
    }

    /// Effective relation: the lower of both sides' wishes.
    pub fn relation_to(&self, other: &Faction) -> Relation {
        if self.id == other.id {
            return Relation::Member;
        }
        if !self.is_normal() || !other.is_normal() {
            return Relation::Neutral;
        }
        let mine = self.relation_wish(&other.id);
        let theirs = other.relation_wish(&self.id);
        mine.min(theirs)
    }

    pub fn fplayer_ids(&self) -> Vec<Uuid> {
        self.fplayers.read().iter().copied().collect()
    }

    pub fn size(&self) -> usize {
        self.fplayers.read().len()
    }

    pub(crate) fn add_fplayer(&self, id: Uuid) {
        self.fplayers.write().insert(id);
    }

    pub(crate) fn remove_fplayer(&self, id: Uuid) {
        self.fplayers.write().remove(&id);
    }

    /// Reads a field by its internal name, if this build declares it.
    pub fn get_declared_field(&self, name: &str) -> Option<InternalField> {
        self.declared_fields.read().get(name).cloned()
    }

    pub fn declared_field_names(&self) -> Vec<String> {
        self.declared_fields.read().keys().cloned().collect()
    }

    pub(crate) fn set_declared_field(&self, name: &str, value: InternalField) {
        self.declared_fields.write().insert(name.to_string(), value);
    }
}
