use super::types::Role;
use super::WILDERNESS_ID;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Per-player faction record.
#[derive(Debug)]
pub struct FPlayer {
    id: Uuid,
    name: String,
    faction_id: RwLock<String>,
    role: RwLock<Role>,
    power: RwLock<f64>,
    title: RwLock<String>,
    online: AtomicBool,
}

impl FPlayer {
    pub const MAX_POWER: f64 = 10.0;

    pub(crate) fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            faction_id: RwLock::new(WILDERNESS_ID.to_string()),
            role: RwLock::new(Role::Normal),
            power: RwLock::new(Self::MAX_POWER),
            title: RwLock::new(String::new()),
            online: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faction_id(&self) -> String {
        self.faction_id.read().clone()
    }

    pub(crate) fn set_faction_id(&self, id: &str) {
        *self.faction_id.write() = id.to_string();
    }

    pub fn has_faction(&self) -> bool {
        *self.faction_id.read() != WILDERNESS_ID
    }

    pub fn role(&self) -> Role {
        *self.role.read()
    }

    pub fn set_role(&self, role: Role) {
        *self.role.write() = role;
    }

    pub fn power(&self) -> f64 {
        *self.power.read()
    }

    pub fn set_power(&self, power: f64) {
        *self.power.write() = power.clamp(-Self::MAX_POWER, Self::MAX_POWER);
    }

    pub fn title(&self) -> String {
        self.title.read().clone()
    }

    pub fn set_title(&self, title: &str) {
        *self.title.write() = title.to_string();
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}
