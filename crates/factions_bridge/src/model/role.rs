use serde::{Deserialize, Serialize};

/// Rank of a player inside their faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Leader,
    CoLeader,
    Officer,
    Normal,
    Recruit,
    /// A provider rank with no unified counterpart
    Custom,
    Factionless,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Leader => "LEADER",
            Role::CoLeader => "CO_LEADER",
            Role::Officer => "OFFICER",
            Role::Normal => "NORMAL",
            Role::Recruit => "RECRUIT",
            Role::Custom => "CUSTOM",
            Role::Factionless => "FACTIONLESS",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Provider-specific names for each role.
///
/// Resolution is case-insensitive and falls back to [`Role::Custom`].
#[derive(Debug, Clone, Copy)]
pub struct RoleAliases(pub &'static [(&'static str, Role)]);

impl RoleAliases {
    pub fn resolve(&self, native: &str) -> Role {
        self.0
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(native))
            .map(|(_, role)| *role)
            .unwrap_or(Role::Custom)
    }

    /// First native name registered for `role`.
    pub fn native_name(&self, role: Role) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(_, candidate)| *candidate == role)
            .map(|(alias, _)| *alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIASES: RoleAliases = RoleAliases(&[
        ("admin", Role::Leader),
        ("leader", Role::Leader),
        ("mod", Role::Officer),
    ]);

    #[test]
    fn resolves_aliases_case_insensitively() {
        assert_eq!(ALIASES.resolve("ADMIN"), Role::Leader);
        assert_eq!(ALIASES.resolve("Mod"), Role::Officer);
        assert_eq!(ALIASES.resolve("emperor"), Role::Custom);
        assert_eq!(ALIASES.native_name(Role::Leader), Some("admin"));
        assert_eq!(ALIASES.native_name(Role::Recruit), None);
    }
}
