//! One adapter per supported faction plugin.

pub mod factions_uuid;
pub mod massive;
pub mod medieval;
pub mod saber;
