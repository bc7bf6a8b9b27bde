use super::chromosome::ChromosomeType;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// One chromosome pair as persisted: the slot and both allele uids.
#[derive(
    Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct LocusRecord {
    pub slot: ChromosomeType,
    pub primary: String,
    pub secondary: String,
}

/// Flat persisted form of a genome, ordered by slot index.
#[derive(
    Clone,
    Debug,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct GenomeRecord {
    pub loci: Vec<LocusRecord>,
}
