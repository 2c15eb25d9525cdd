//! Accessors for data a provider only keeps in undocumented fields.
//!
//! The candidates for each operation are probed once when the adapter is
//! built. Calls later look the resolved accessor up instead of probing.

use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    resolved: HashMap<&'static str, &'static str>,
}

impl CapabilityTable {
    /// Picks, for every operation, the first candidate field `has_field`
    /// accepts. Operations with no accepted candidate stay absent.
    pub fn resolve<F>(probes: &[(&'static str, &[&'static str])], has_field: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let mut resolved = HashMap::new();
        for (operation, candidates) in probes {
            match candidates.iter().find(|field| has_field(field)) {
                Some(field) => {
                    debug!("Capability {} resolved to field {}", operation, field);
                    resolved.insert(*operation, *field);
                }
                None => debug!("Capability {} unavailable", operation),
            }
        }
        Self { resolved }
    }

    pub fn accessor(&self, operation: &str) -> Option<&'static str> {
        self.resolved.get(operation).copied()
    }

    pub fn supports(&self, operation: &str) -> bool {
        self.resolved.contains_key(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_available_candidate_wins() {
        let fields = ["factionPoints", "strikes"];
        let table = CapabilityTable::resolve(
            &[
                ("points", &["points", "factionPoints"]),
                ("strikes", &["strikes", "strikeCount"]),
                ("tokens", &["tokens"]),
            ],
            |field| fields.contains(&field),
        );
        assert_eq!(table.accessor("points"), Some("factionPoints"));
        assert_eq!(table.accessor("strikes"), Some("strikes"));
        assert!(!table.supports("tokens"));
    }
}
