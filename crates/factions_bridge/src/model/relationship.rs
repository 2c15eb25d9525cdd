use serde::{Deserialize, Serialize};

/// Standing of one faction towards another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    Member,
    Ally,
    Truce,
    Neutral,
    Enemy,
    Unknown,
}

impl Relationship {
    /// Normalizes a provider relation name. Rank names count as membership.
    pub fn from_native(name: &str) -> Relationship {
        match name.to_ascii_uppercase().as_str() {
            "MEMBER" | "LEADER" | "OFFICER" | "RECRUIT" | "COLEADER" => Relationship::Member,
            "ALLY" => Relationship::Ally,
            "TRUCE" => Relationship::Truce,
            "NEUTRAL" => Relationship::Neutral,
            "ENEMY" => Relationship::Enemy,
            _ => Relationship::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_native_names() {
        assert_eq!(Relationship::from_native("ally"), Relationship::Ally);
        assert_eq!(Relationship::from_native("LEADER"), Relationship::Member);
        assert_eq!(Relationship::from_native("VASSAL"), Relationship::Unknown);
    }
}
