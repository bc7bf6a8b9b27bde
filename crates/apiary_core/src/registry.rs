//! Startup registration and the frozen genetics context.
//!
//! [`RegistryBuilder`] is the mutable startup phase. [`RegistryBuilder::build`]
//! validates it and yields [`Genetics`], which is read-only for the rest of
//! the process and meant to be shared behind an `Arc`.

use crate::allele::{Allele, AlleleValue, SpeciesItems};
use crate::catalog::AlleleCatalog;
use crate::codec::GenomeCodec;
use crate::error::{GeneticsError, Result};
use crate::genome::{AlleleTemplate, Genome};
use crate::mutation::MutationGraph;
use crate::templates::TemplateRegistry;
use apiary_data::{ChromosomeType, ItemStack};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct PendingMutation {
    parent_a: String,
    parent_b: String,
    child: String,
    chance: f64,
}

/// Collects alleles, templates and mutations before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    catalog: AlleleCatalog,
    templates: TemplateRegistry,
    pending: Vec<PendingMutation>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn catalog(&self) -> &AlleleCatalog {
        &self.catalog
    }

    /// Registers a non-species allele.
    pub fn register_allele(
        &mut self,
        slot: ChromosomeType,
        uid: impl Into<String>,
        value: AlleleValue,
        dominant: bool,
    ) -> Result<Arc<Allele>> {
        if slot == ChromosomeType::Species {
            return Err(GeneticsError::InvalidSlot(slot));
        }
        self.catalog.register_value(slot, uid, value, dominant)
    }

    /// Makes an already registered allele the default for its slot.
    pub fn set_default(&mut self, slot: ChromosomeType, uid: &str) -> Result<()> {
        let allele = self.catalog.require(slot, uid)?;
        self.templates.set_default(slot, allele)
    }

    /// Registers a species allele with its partial template.
    pub(crate) fn register_species(
        &mut self,
        species: Allele,
        overrides: &AlleleTemplate,
    ) -> Result<Arc<Allele>> {
        let species = self.catalog.register(ChromosomeType::Species, species)?;
        self.templates
            .register_species(Arc::clone(&species), overrides)?;
        Ok(species)
    }

    /// Queues a mutation. Parents and child are resolved when the registry is
    /// frozen; only the chance is checked here.
    pub fn add_mutation(
        &mut self,
        parent_a: impl Into<String>,
        parent_b: impl Into<String>,
        child: impl Into<String>,
        chance: f64,
    ) -> Result<()> {
        if !(chance > 0.0 && chance < 1.0) {
            return Err(GeneticsError::InvalidChance(chance));
        }
        self.pending.push(PendingMutation {
            parent_a: parent_a.into(),
            parent_b: parent_b.into(),
            child: child.into(),
            chance,
        });
        Ok(())
    }

    /// Freezes the registry.
    ///
    /// Fails when a slot has no allele or a species template cannot be
    /// completed. Mutations naming an unregistered species are skipped with
    /// a warning.
    pub fn build(self) -> Result<Genetics> {
        if let Some(slot) = self.catalog.first_empty_slot() {
            return Err(GeneticsError::EmptySlot(slot));
        }

        let mut mutations = MutationGraph::new();
        for m in &self.pending {
            let known = |uid: &str| self.catalog.lookup(ChromosomeType::Species, uid).is_some();
            if !(known(&m.parent_a) && known(&m.parent_b) && known(&m.child)) {
                tracing::warn!(
                    child = %m.child,
                    parent_a = %m.parent_a,
                    parent_b = %m.parent_b,
                    "Skipping mutation with unregistered species"
                );
                continue;
            }
            mutations.add_edge(&m.parent_a, &m.parent_b, &m.child, m.chance)?;
        }

        let genetics = Genetics {
            catalog: self.catalog,
            templates: self.templates,
            mutations,
        };
        genetics.create_species_items()?;

        tracing::info!(
            species = genetics.catalog.len(ChromosomeType::Species),
            mutations = genetics.mutations.len(),
            "Genetics registry frozen"
        );
        Ok(genetics)
    }
}

/// The frozen catalog, templates and mutation graph.
#[derive(Debug)]
pub struct Genetics {
    catalog: AlleleCatalog,
    templates: TemplateRegistry,
    mutations: MutationGraph,
}

impl Genetics {
    #[must_use]
    pub fn catalog(&self) -> &AlleleCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    #[must_use]
    pub fn mutations(&self) -> &MutationGraph {
        &self.mutations
    }

    #[must_use]
    pub fn codec(&self) -> GenomeCodec<'_> {
        GenomeCodec::new(&self.catalog)
    }

    #[must_use]
    pub fn species(&self, uid: &str) -> Option<Arc<Allele>> {
        self.catalog.lookup(ChromosomeType::Species, uid)
    }

    pub fn template_genome(&self, species_uid: &str) -> Result<Genome> {
        self.templates.template_genome(species_uid)
    }

    /// Princess and drone items of a species.
    #[must_use]
    pub fn species_items(&self, species_uid: &str) -> Option<SpeciesItems> {
        self.species(species_uid)?
            .species()?
            .items()
            .cloned()
    }

    /// Species that are never a mutation child.
    #[must_use]
    pub fn root_species(&self) -> Vec<String> {
        self.catalog
            .all_species()
            .iter()
            .map(|s| s.uid().to_string())
            .filter(|uid| self.mutations.edges_for_child(uid).next().is_none())
            .collect()
    }

    /// Species that no chain of mutations starting at the roots produces.
    #[must_use]
    pub fn unreachable_species(&self) -> Vec<String> {
        let roots = self.root_species();
        let reachable: BTreeSet<String> = self
            .mutations
            .reachable_from(roots.iter().map(String::as_str));
        self.catalog
            .all_species()
            .iter()
            .map(|s| s.uid().to_string())
            .filter(|uid| !reachable.contains(uid))
            .collect()
    }

    fn create_species_items(&self) -> Result<()> {
        let codec = self.codec();
        for species in self.catalog.all_species() {
            let Some(traits) = species.species() else {
                continue;
            };
            let genome = self.template_genome(species.uid())?;
            let base = species.name().to_lowercase();
            let princess = ItemStack::new(format!("{base}_princess"), 1)
                .with_display(format!("{} Princess", species.display_name()), Vec::new());
            let drone = ItemStack::new(format!("{base}_drone"), 1)
                .with_display(format!("{} Drone", species.display_name()), Vec::new());
            traits.set_items(SpeciesItems {
                princess: codec.update_item(&princess, &genome)?,
                drone: codec.update_item(&drone, &genome)?,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SpeciesBuilder;
    use crate::setup::standard_registry;

    #[test]
    fn test_empty_registry_does_not_build() {
        assert!(matches!(
            RegistryBuilder::new().build(),
            Err(GeneticsError::EmptySlot(ChromosomeType::Species))
        ));
    }

    #[test]
    fn test_species_cannot_be_registered_as_plain_allele() {
        let mut registry = RegistryBuilder::new();
        assert!(matches!(
            registry.register_allele(
                ChromosomeType::Species,
                "species_forest",
                AlleleValue::Integer(1),
                false
            ),
            Err(GeneticsError::InvalidSlot(_))
        ));
    }

    #[test]
    fn test_unknown_mutation_parents_are_skipped() {
        let mut registry = standard_registry().unwrap();
        SpeciesBuilder::new("species_orphan")
            .mutation("species_forest", "species_missing", 0.2)
            .register(&mut registry)
            .unwrap();
        let genetics = registry.build().unwrap();
        assert_eq!(genetics.mutations().edges_for_child("species_orphan").count(), 0);
        assert!(genetics
            .unreachable_species()
            .is_empty());
        // no incoming edge makes it a root
        assert!(genetics.root_species().contains(&"species_orphan".to_string()));
    }

    #[test]
    fn test_species_items_carry_template_genome() {
        let genetics = standard_registry().unwrap().build().unwrap();
        let items = genetics.species_items("species_forest").unwrap();
        assert_eq!(items.princess.id, "forest_princess");
        assert_eq!(items.drone.display_name, "Forest Drone");

        let codec = genetics.codec();
        let genome = codec.decode_from_item(&items.drone).unwrap().unwrap();
        assert_eq!(genome, genetics.template_genome("species_forest").unwrap());
    }

    #[test]
    fn test_mutation_children_are_reachable() {
        let genetics = standard_registry().unwrap().build().unwrap();
        assert!(genetics
            .mutations()
            .edges_for_child("species_common")
            .next()
            .is_some());
        assert!(!genetics.root_species().contains(&"species_common".to_string()));
        assert!(genetics.unreachable_species().is_empty());
    }
}
