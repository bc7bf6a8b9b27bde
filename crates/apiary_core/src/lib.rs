//! # Apiary Core
//!
//! The genetics resolution engine for apiary: a typed catalog of alleles
//! organised into chromosome slots, a diploid genome model, and the
//! breeding algorithm that combines two parents into an offspring.
//!
//! This crate contains:
//! - The allele catalog and per-species templates
//! - Genome encoding onto host items (validated rkyv records)
//! - Mendelian inheritance and first-match-wins species mutation
//! - Product drops, breeding duration and brood size
//! - The discovery ledger, configuration and metrics
//!
//! ## Lifecycle
//!
//! Alleles, species and mutations are registered on a [`RegistryBuilder`]
//! during startup. [`RegistryBuilder::build`] freezes everything into a
//! [`Genetics`] context that is shared read-only behind an `Arc`. Every
//! random decision goes through [`GeneticRng`], so seeded runs replay.
//!
//! ## Example
//!
//! ```
//! use apiary_core::{setup, BreedingConfig, BreedingEngine};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use std::sync::Arc;
//!
//! let genetics = Arc::new(setup::standard_registry()?.build()?);
//! let forest = genetics.template_genome("species_forest")?;
//! let meadows = genetics.template_genome("species_meadows")?;
//!
//! let engine = BreedingEngine::new(genetics, BreedingConfig::default());
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let offspring = engine.breed(&forest, &meadows, 1.0, &mut rng)?;
//! assert!(offspring.genome.pair(apiary_data::ChromosomeType::Species).is_homozygous());
//! # Ok::<(), apiary_core::GeneticsError>(())
//! ```

/// Alleles and their typed payloads
pub mod allele;
/// Breeding compute: offspring genome, products, duration
pub mod breeding;
/// Staged species registration
pub mod builder;
/// Typed allele storage per chromosome slot
pub mod catalog;
/// Genome to item record conversion
pub mod codec;
/// Engine configuration
pub mod config;
/// Player and global discovery bookkeeping
pub mod discovery;
/// Error kinds
pub mod error;
/// Diploid genome model
pub mod genome;
/// Metrics collection and logging setup
pub mod metrics;
/// Species mutation rules
pub mod mutation;
/// Startup registry and the frozen genetics context
pub mod registry;
/// Mendelian inheritance
pub mod resolver;
/// Injectable random source
pub mod rng;
/// Player-facing breeding and analysis
pub mod service;
/// Standard alleles and base species
pub mod setup;
/// Default and per-species allele templates
pub mod templates;

pub use allele::{Allele, AlleleValue, EffectFunction, SpeciesItems, SpeciesTraits};
pub use breeding::{BreedingEngine, BreedingOutcome, Offspring};
pub use builder::SpeciesBuilder;
pub use catalog::AlleleCatalog;
pub use codec::GenomeCodec;
pub use config::{BreedingConfig, EngineConfig};
pub use discovery::{DiscoveryLedger, DiscoveryProgress};
pub use error::{GeneticsError, Result};
pub use genome::{AlleleTemplate, ChromosomePair, Genome};
pub use metrics::Metrics;
pub use mutation::MutationGraph;
pub use registry::{Genetics, RegistryBuilder};
pub use rng::{GeneticRng, ScriptedRng};
pub use service::BreedingService;
