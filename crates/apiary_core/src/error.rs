//! Error kinds raised by the genetics engine.
//!
//! Registration errors are authoring bugs and are meant to abort startup.
//! `CorruptRecord` is local to one item and callers usually downgrade it to
//! "not a bee". `UnresolvedSpecies` means catalog and mutation graph disagree.

use apiary_data::{AlleleKind, ChromosomeType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneticsError {
    /// Allele payload kind is not accepted by the slot.
    #[error("allele {uid} is {found} but slot {slot} accepts {expected}")]
    TypeMismatch {
        slot: ChromosomeType,
        uid: String,
        expected: AlleleKind,
        found: AlleleKind,
    },

    /// Allele was built for a different slot of the same kind.
    #[error("allele {uid} belongs to slot {owner}, not {slot}")]
    SlotMismatch {
        slot: ChromosomeType,
        uid: String,
        owner: ChromosomeType,
    },

    /// A genome template has no allele for a slot.
    #[error("template is missing an allele for slot {0}")]
    IncompleteTemplate(ChromosomeType),

    /// The slot may not be changed through this operation.
    #[error("slot {0} cannot be set directly")]
    InvalidSlot(ChromosomeType),

    /// A locus update selected neither the primary nor the secondary allele.
    #[error("locus update for slot {0} selects neither primary nor secondary")]
    NoLocusSelected(ChromosomeType),

    /// A genome was built from the wrong number of pairs.
    #[error("genome needs {expected} chromosome pairs, got {found}")]
    PairCount { expected: usize, found: usize },

    /// A persisted genome record could not be decoded.
    #[error("corrupt genome record: {0}")]
    CorruptRecord(String),

    /// Mutation chance outside (0, 1).
    #[error("mutation chance must be in (0, 1) exclusive, got {0}")]
    InvalidChance(f64),

    /// A resolved species uid has no catalog entry.
    #[error("species {0} is not registered")]
    UnresolvedSpecies(String),

    /// Uid does not follow the `<slot>_<lower_snake>` convention.
    #[error("invalid allele uid {uid} for slot {slot}")]
    InvalidUid { slot: ChromosomeType, uid: String },

    /// Uid has no catalog entry for the slot.
    #[error("no allele {uid} registered for slot {slot}")]
    UnknownAllele { slot: ChromosomeType, uid: String },

    /// Product table entry is malformed.
    #[error("invalid product {item}: {reason}")]
    InvalidProduct { item: String, reason: String },

    /// Registry frozen while a slot has no registered allele.
    #[error("slot {0} has no registered allele")]
    EmptySlot(ChromosomeType),
}

impl GeneticsError {
    /// Creates a new corrupt record error.
    #[must_use]
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        Self::CorruptRecord(msg.into())
    }

    /// Whether the error comes from a single bad item rather than bad data.
    #[must_use]
    pub fn is_item_local(&self) -> bool {
        matches!(self, Self::CorruptRecord(_))
    }
}

/// Result type alias for genetics operations.
pub type Result<T> = std::result::Result<T, GeneticsError>;
