//! Diploid genome: one (primary, secondary) allele pair per chromosome slot.

use crate::allele::{Allele, SpeciesTraits};
use crate::error::{GeneticsError, Result};
use apiary_data::{ChromosomeType, CHROMOSOME_COUNT};
use std::sync::Arc;

/// One allele pair at a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomePair {
    pub primary: Arc<Allele>,
    pub secondary: Arc<Allele>,
}

impl ChromosomePair {
    pub fn new(primary: Arc<Allele>, secondary: Arc<Allele>) -> Self {
        Self { primary, secondary }
    }

    pub fn homozygous(allele: Arc<Allele>) -> Self {
        Self {
            primary: Arc::clone(&allele),
            secondary: allele,
        }
    }

    /// Primary if dominant, else secondary if dominant, else primary.
    #[must_use]
    pub fn expressed(&self) -> &Arc<Allele> {
        if self.primary.is_dominant() || !self.secondary.is_dominant() {
            &self.primary
        } else {
            &self.secondary
        }
    }

    #[must_use]
    pub fn is_homozygous(&self) -> bool {
        self.primary == self.secondary
    }
}

/// A slot-indexed allele selection, possibly partial.
#[derive(Debug, Clone, Default)]
pub struct AlleleTemplate {
    alleles: [Option<Arc<Allele>>; CHROMOSOME_COUNT],
}

impl AlleleTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `slot`, checking that the allele belongs to it.
    pub fn set(&mut self, slot: ChromosomeType, allele: Arc<Allele>) -> Result<()> {
        allele.ensure_slot(slot)?;
        self.alleles[slot.index()] = Some(allele);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, slot: ChromosomeType) -> Option<&Arc<Allele>> {
        self.alleles[slot.index()].as_ref()
    }

    /// Fills every unset slot from `defaults`.
    #[must_use]
    pub fn merged_over(&self, defaults: &AlleleTemplate) -> AlleleTemplate {
        let mut merged = defaults.clone();
        for (slot, allele) in self.alleles.iter().enumerate() {
            if allele.is_some() {
                merged.alleles[slot] = allele.clone();
            }
        }
        merged
    }

    #[must_use]
    pub fn missing_slots(&self) -> Vec<ChromosomeType> {
        ChromosomeType::ALL
            .iter()
            .copied()
            .filter(|slot| self.get(*slot).is_none())
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.alleles.iter().all(Option::is_some)
    }
}

/// Full diploid genome. Always holds exactly one pair per slot, both
/// members built for that slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    pairs: Vec<ChromosomePair>,
}

impl Genome {
    /// Builds a homozygous genome from a complete template.
    pub fn build_homozygous(template: &AlleleTemplate) -> Result<Self> {
        let pairs = ChromosomeType::ALL
            .iter()
            .map(|slot| {
                template
                    .get(*slot)
                    .map(|allele| ChromosomePair::homozygous(Arc::clone(allele)))
                    .ok_or(GeneticsError::IncompleteTemplate(*slot))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pairs })
    }

    /// Builds a genome from explicit pairs in slot order, validating slots.
    pub fn from_pairs(pairs: Vec<ChromosomePair>) -> Result<Self> {
        if pairs.len() != CHROMOSOME_COUNT {
            return Err(GeneticsError::PairCount {
                expected: CHROMOSOME_COUNT,
                found: pairs.len(),
            });
        }
        for (slot, pair) in ChromosomeType::ALL.iter().zip(&pairs) {
            pair.primary.ensure_slot(*slot)?;
            pair.secondary.ensure_slot(*slot)?;
        }
        Ok(Self { pairs })
    }

    #[must_use]
    pub fn pair(&self, slot: ChromosomeType) -> &ChromosomePair {
        &self.pairs[slot.index()]
    }

    /// Pairs in slot order.
    pub fn pairs(&self) -> impl Iterator<Item = (ChromosomeType, &ChromosomePair)> {
        ChromosomeType::ALL.iter().copied().zip(self.pairs.iter())
    }

    /// The dominance-resolved allele for `slot`.
    #[must_use]
    pub fn expressed(&self, slot: ChromosomeType) -> &Arc<Allele> {
        self.pair(slot).expressed()
    }

    /// Shorthand for `expressed(Species)`.
    #[must_use]
    pub fn species(&self) -> &Arc<Allele> {
        self.expressed(ChromosomeType::Species)
    }

    /// Species payload of the expressed species.
    #[must_use]
    pub fn species_traits(&self) -> Option<&SpeciesTraits> {
        self.species().species()
    }

    /// Expressed scalar value for a numeric slot.
    #[must_use]
    pub fn expressed_scalar(&self, slot: ChromosomeType) -> Option<f64> {
        self.expressed(slot).scalar()
    }

    #[must_use]
    pub fn is_homozygous(&self) -> bool {
        self.pairs.iter().all(ChromosomePair::is_homozygous)
    }

    /// Returns a new genome with the selected pair members replaced.
    ///
    /// The species slot cannot be set this way; it only ever comes from
    /// registration templates or from breeding.
    pub fn with_locus_set(
        &self,
        slot: ChromosomeType,
        allele: Arc<Allele>,
        set_primary: bool,
        set_secondary: bool,
    ) -> Result<Self> {
        if slot == ChromosomeType::Species {
            return Err(GeneticsError::InvalidSlot(slot));
        }
        if !set_primary && !set_secondary {
            return Err(GeneticsError::NoLocusSelected(slot));
        }
        allele.ensure_slot(slot)?;

        let mut genome = self.clone();
        let pair = &mut genome.pairs[slot.index()];
        if set_primary {
            pair.primary = Arc::clone(&allele);
        }
        if set_secondary {
            pair.secondary = allele;
        }
        Ok(genome)
    }

    /// Forces the species slot homozygous. Only breeding resolution may do this.
    pub(crate) fn with_species(&self, species: Arc<Allele>) -> Result<Self> {
        species.ensure_slot(ChromosomeType::Species)?;
        let mut genome = self.clone();
        genome.pairs[ChromosomeType::Species.index()] = ChromosomePair::homozygous(species);
        Ok(genome)
    }
}
