//! Plain data shared by the apiary crates: chromosome slots, item records,
//! persisted genome records, product tables, mutation edges and discovery
//! records. Nothing in here knows about the allele catalog.

pub mod data;

pub use data::chromosome::{AlleleKind, ChromosomeType, CHROMOSOME_COUNT};
pub use data::discovery::{Discoverer, LedgerSnapshot, PlayerId};
pub use data::item::{GenomeCarrier, ItemStack, Location, Material, GENOME_KEY};
pub use data::mutation::{canonical_pair, MutationEdge};
pub use data::product::ProductEntry;
pub use data::record::{GenomeRecord, LocusRecord};
