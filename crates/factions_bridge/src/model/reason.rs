//! Why a faction was disbanded or a player left one.
//!
//! Native reason names are matched by name only; anything unmatched maps to
//! `Unknown`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisbandReason {
    Command,
    Plugin,
    Inactivity,
    Leave,
    Unknown,
}

impl DisbandReason {
    pub fn from_native(name: &str) -> DisbandReason {
        match name.to_ascii_uppercase().as_str() {
            "COMMAND" => DisbandReason::Command,
            "PLUGIN" => DisbandReason::Plugin,
            "INACTIVITY" => DisbandReason::Inactivity,
            "LEAVE" => DisbandReason::Leave,
            _ => DisbandReason::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveReason {
    Leave,
    Kicked,
    Banned,
    Disband,
    JoinOther,
    Reset,
    Unknown,
}

impl LeaveReason {
    pub fn from_native(name: &str) -> LeaveReason {
        match name.to_ascii_uppercase().as_str() {
            "LEAVE" => LeaveReason::Leave,
            "KICKED" | "KICK" => LeaveReason::Kicked,
            "BANNED" => LeaveReason::Banned,
            "DISBAND" => LeaveReason::Disband,
            "JOINOTHER" => LeaveReason::JoinOther,
            "RESET" => LeaveReason::Reset,
            _ => LeaveReason::Unknown,
        }
    }
}
