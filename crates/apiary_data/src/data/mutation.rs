use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An (unordered parent pair -> child) species rule with a base chance.
///
/// Parents are stored in sorted order so `(a, b)` and `(b, a)` build the
/// same edge. Equality and hashing ignore the chance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationEdge {
    first_parent: String,
    second_parent: String,
    child: String,
    chance: f64,
}

impl MutationEdge {
    pub fn new(
        parent_a: impl Into<String>,
        parent_b: impl Into<String>,
        child: impl Into<String>,
        chance: f64,
    ) -> Self {
        let (first_parent, second_parent) = canonical_pair(parent_a.into(), parent_b.into());
        Self {
            first_parent,
            second_parent,
            child: child.into(),
            chance,
        }
    }

    #[must_use]
    pub fn first_parent(&self) -> &str {
        &self.first_parent
    }

    #[must_use]
    pub fn second_parent(&self) -> &str {
        &self.second_parent
    }

    #[must_use]
    pub fn child(&self) -> &str {
        &self.child
    }

    #[must_use]
    pub fn chance(&self) -> f64 {
        self.chance
    }

    /// Canonical parent pair, usable as a lookup key.
    #[must_use]
    pub fn parents(&self) -> (&str, &str) {
        (&self.first_parent, &self.second_parent)
    }

    /// Whether either parent is `uid`.
    #[must_use]
    pub fn has_parent(&self, uid: &str) -> bool {
        self.first_parent == uid || self.second_parent == uid
    }
}

impl PartialEq for MutationEdge {
    fn eq(&self, other: &Self) -> bool {
        self.first_parent == other.first_parent
            && self.second_parent == other.second_parent
            && self.child == other.child
    }
}

impl Eq for MutationEdge {}

impl Hash for MutationEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first_parent.hash(state);
        self.second_parent.hash(state);
        self.child.hash(state);
    }
}

/// Orders two parent uids so the pair is symmetric.
pub fn canonical_pair(a: String, b: String) -> (String, String) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parent_order_is_canonical() {
        let ab = MutationEdge::new("species_meadows", "species_forest", "species_common", 0.15);
        let ba = MutationEdge::new("species_forest", "species_meadows", "species_common", 0.15);
        assert_eq!(ab.parents(), ("species_forest", "species_meadows"));
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_identity_ignores_chance() {
        let low = MutationEdge::new("species_a", "species_b", "species_c", 0.1);
        let high = MutationEdge::new("species_b", "species_a", "species_c", 0.9);
        let mut set = HashSet::new();
        set.insert(low);
        assert!(!set.insert(high));
    }
}
