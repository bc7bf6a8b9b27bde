use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of chromosome slots in every genome.
pub const CHROMOSOME_COUNT: usize = 7;

/// The closed set of payload kinds an allele can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlleleKind {
    /// Floating point scalar (sortable).
    Double,
    /// Integer scalar (sortable).
    Integer,
    /// Symbolic plant material.
    Plant,
    /// Executable side effect.
    Effect,
    /// Bee species with products and items.
    Species,
}

impl fmt::Display for AlleleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlleleKind::Double => "double",
            AlleleKind::Integer => "integer",
            AlleleKind::Plant => "plant",
            AlleleKind::Effect => "effect",
            AlleleKind::Species => "species",
        };
        f.write_str(name)
    }
}

/// A chromosome slot. The declaration order is the slot index used by
/// genomes and by the persisted record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[archive_attr(derive(Debug, PartialEq, Eq))]
#[serde(rename_all = "snake_case")]
pub enum ChromosomeType {
    /// Bee species, never sortable.
    Species,
    /// Product chance multiplier.
    Productivity,
    /// Drone count per breeding.
    Fertility,
    /// Breeding duration multiplier.
    Lifespan,
    /// Effect intensity / working range.
    Range,
    /// Pollinated plant.
    Plant,
    /// Area effect.
    Effect,
}

impl ChromosomeType {
    /// Every slot in index order.
    pub const ALL: [ChromosomeType; CHROMOSOME_COUNT] = [
        ChromosomeType::Species,
        ChromosomeType::Productivity,
        ChromosomeType::Fertility,
        ChromosomeType::Lifespan,
        ChromosomeType::Range,
        ChromosomeType::Plant,
        ChromosomeType::Effect,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The only allele kind this slot accepts.
    #[must_use]
    pub const fn allele_kind(self) -> AlleleKind {
        match self {
            ChromosomeType::Species => AlleleKind::Species,
            ChromosomeType::Productivity => AlleleKind::Double,
            ChromosomeType::Fertility | ChromosomeType::Lifespan | ChromosomeType::Range => {
                AlleleKind::Integer
            }
            ChromosomeType::Plant => AlleleKind::Plant,
            ChromosomeType::Effect => AlleleKind::Effect,
        }
    }

    /// Sortable slots keep a value-ordered index in the catalog.
    #[must_use]
    pub const fn is_sortable(self) -> bool {
        matches!(
            self.allele_kind(),
            AlleleKind::Double | AlleleKind::Integer
        )
    }

    /// Lower-case prefix every allele uid of this slot starts with.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            ChromosomeType::Species => "species",
            ChromosomeType::Productivity => "productivity",
            ChromosomeType::Fertility => "fertility",
            ChromosomeType::Lifespan => "lifespan",
            ChromosomeType::Range => "range",
            ChromosomeType::Plant => "plant",
            ChromosomeType::Effect => "effect",
        }
    }

    /// Case-insensitive lookup by slot name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|slot| slot.prefix().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ChromosomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_declaration_order() {
        for (i, slot) in ChromosomeType::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
        assert_eq!(ChromosomeType::ALL.len(), CHROMOSOME_COUNT);
    }

    #[test]
    fn test_species_is_never_sortable() {
        assert!(!ChromosomeType::Species.is_sortable());
        assert!(!ChromosomeType::Plant.is_sortable());
        assert!(!ChromosomeType::Effect.is_sortable());
        assert!(ChromosomeType::Productivity.is_sortable());
        assert!(ChromosomeType::Fertility.is_sortable());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            ChromosomeType::parse("PRODUCTIVITY"),
            Some(ChromosomeType::Productivity)
        );
        assert_eq!(ChromosomeType::parse(" range "), Some(ChromosomeType::Range));
        assert_eq!(ChromosomeType::parse("speed"), None);
    }
}
