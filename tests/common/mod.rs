use apiary_core::setup::{register_standard_alleles, standard_registry};
use apiary_core::{
    BreedingConfig, BreedingEngine, Genetics, Genome, RegistryBuilder, SpeciesBuilder,
};
use apiary_data::ChromosomeType;
use std::path::PathBuf;
use std::sync::Arc;

#[allow(dead_code)]
pub fn species_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/species.toml")
}

/// Builds a frozen registry step by step, starting from the standard
/// alleles.
#[allow(dead_code)]
pub struct GeneticsBuilder {
    registry: RegistryBuilder,
}

#[allow(dead_code)]
impl GeneticsBuilder {
    /// Standard alleles only, no species.
    pub fn bare() -> Self {
        let mut registry = RegistryBuilder::new();
        register_standard_alleles(&mut registry).unwrap();
        Self { registry }
    }

    /// Standard alleles and the four base species.
    pub fn standard() -> Self {
        Self {
            registry: standard_registry().unwrap(),
        }
    }

    /// Standard alleles and the bundled species data file.
    pub fn bundled() -> Self {
        Self {
            registry: apiary_io::load_registry(species_file()).unwrap(),
        }
    }

    pub fn with_species(mut self, species: SpeciesBuilder) -> Self {
        species.register(&mut self.registry).unwrap();
        self
    }

    pub fn with_mutation(mut self, a: &str, b: &str, child: &str, chance: f64) -> Self {
        self.registry.add_mutation(a, b, child, chance).unwrap();
        self
    }

    pub fn build(self) -> Arc<Genetics> {
        Arc::new(self.registry.build().unwrap())
    }
}

#[allow(dead_code)]
pub fn engine(genetics: &Arc<Genetics>) -> BreedingEngine {
    BreedingEngine::new(Arc::clone(genetics), BreedingConfig::default())
}

/// The pure-bred genome of `species` with `slot` set to `uid` on both
/// chromosomes.
#[allow(dead_code)]
pub fn genome_with(genetics: &Genetics, species: &str, slot: ChromosomeType, uid: &str) -> Genome {
    let allele = genetics.catalog().require(slot, uid).unwrap();
    genetics
        .template_genome(species)
        .unwrap()
        .with_locus_set(slot, allele, true, true)
        .unwrap()
}
