//! Default and per-species allele templates.

use crate::allele::Allele;
use crate::error::{GeneticsError, Result};
use crate::genome::{AlleleTemplate, Genome};
use apiary_data::ChromosomeType;
use std::collections::HashMap;
use std::sync::Arc;

/// Default alleles for every non-species slot, plus each species' partial
/// overrides. A species template always carries its own species allele.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    defaults: AlleleTemplate,
    species: HashMap<String, AlleleTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback allele for a non-species slot.
    pub fn set_default(&mut self, slot: ChromosomeType, allele: Arc<Allele>) -> Result<()> {
        if slot == ChromosomeType::Species {
            return Err(GeneticsError::InvalidSlot(slot));
        }
        self.defaults.set(slot, allele)
    }

    #[must_use]
    pub fn defaults(&self) -> &AlleleTemplate {
        &self.defaults
    }

    /// Stores `overrides` for `species`, whose own allele fills the species slot.
    pub fn register_species(
        &mut self,
        species: Arc<Allele>,
        overrides: &AlleleTemplate,
    ) -> Result<()> {
        let mut template = overrides.clone();
        let uid = species.uid().to_string();
        template.set(ChromosomeType::Species, species)?;
        self.species.insert(uid, template);
        Ok(())
    }

    #[must_use]
    pub fn species_template(&self, species_uid: &str) -> Option<&AlleleTemplate> {
        self.species.get(species_uid)
    }

    /// Species overrides merged over the defaults.
    pub fn full_template(&self, species_uid: &str) -> Result<AlleleTemplate> {
        let template = self
            .species
            .get(species_uid)
            .ok_or_else(|| GeneticsError::UnresolvedSpecies(species_uid.to_string()))?;
        let full = template.merged_over(&self.defaults);
        match full.missing_slots().first() {
            Some(slot) => Err(GeneticsError::IncompleteTemplate(*slot)),
            None => Ok(full),
        }
    }

    /// Homozygous genome of a registered species.
    pub fn template_genome(&self, species_uid: &str) -> Result<Genome> {
        Genome::build_homozygous(&self.full_template(species_uid)?)
    }
}
