//! # Native Faction Plugins
//!
//! Object models of the faction-management plugins a server may have
//! installed. Each module is a self-contained plugin with its own domain
//! types, its own identifier scheme and its own native events, published on
//! the host bus under the plugin's name. Operations that publish an event
//! abort when a listener cancels it.
//!
//! - [`factions_uuid`] - FactionsUUID and its SaberFactions fork
//! - [`massive`] - MassiveCraft Factions (batched chunk transactions)
//! - [`medieval`] - Medieval Factions (publishes create/disband only)
//!
//! The modules deliberately do not share types: the bridge has to translate
//! each model on its own terms.

pub mod error;
pub mod factions_uuid;
pub mod massive;
pub mod medieval;

pub use error::NativeError;
