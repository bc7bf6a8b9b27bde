//! # Apiary IO
//!
//! File formats around the genetics engine:
//! - hex-DNA and JSON export of genome records
//! - rkyv genome record files
//! - discovery ledger persistence
//! - species definitions in TOML

/// Error types and result aliases for I/O operations
pub mod error;
/// rkyv record files and ledger persistence
pub mod persistence;
/// Validated JSON and hex-DNA helpers
pub mod serialization;
/// TOML species definitions
pub mod species_data;

pub use error::{IoError, Result};
pub use persistence::{load_record, save_record, LedgerPersistence};
pub use serialization::{
    export_genome, from_hex_dna, from_json, import_genome, is_valid_hex_dna, read_json_file,
    record_fingerprint, to_hex_dna, to_json, to_json_pretty, write_json_file,
};
pub use species_data::{load_registry, load_species_file, SpeciesDef, SpeciesFile};
