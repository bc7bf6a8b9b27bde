//! Mendelian inheritance: every slot is resolved independently by selection.
//!
//! Numeric slots are never averaged; an offspring only ever carries alleles
//! that one of its parents already had.

use crate::allele::Allele;
use crate::error::Result;
use crate::genome::{ChromosomePair, Genome};
use crate::rng::GeneticRng;
use apiary_data::ChromosomeType;
use std::sync::Arc;

/// Produces the provisional offspring genome of two parents.
///
/// Species: primary and secondary are each drawn independently from the two
/// parents' expressed species. Every other slot: one allele of parent A's
/// pair becomes the primary and one of parent B's pair the secondary.
pub fn resolve<R: GeneticRng + ?Sized>(
    parent_a: &Genome,
    parent_b: &Genome,
    rng: &mut R,
) -> Result<Genome> {
    let pairs = ChromosomeType::ALL
        .iter()
        .map(|&slot| resolve_slot(slot, parent_a, parent_b, rng))
        .collect();
    Genome::from_pairs(pairs)
}

fn resolve_slot<R: GeneticRng + ?Sized>(
    slot: ChromosomeType,
    parent_a: &Genome,
    parent_b: &Genome,
    rng: &mut R,
) -> ChromosomePair {
    if slot == ChromosomeType::Species {
        let expressed = [parent_a.species(), parent_b.species()];
        let primary = Arc::clone(expressed[rng.pick(2)]);
        let secondary = Arc::clone(expressed[rng.pick(2)]);
        return ChromosomePair::new(primary, secondary);
    }

    let primary = segregate(parent_a.pair(slot), rng);
    let secondary = segregate(parent_b.pair(slot), rng);
    ChromosomePair::new(primary, secondary)
}

/// One of the pair's two alleles, uniformly.
fn segregate<R: GeneticRng + ?Sized>(pair: &ChromosomePair, rng: &mut R) -> Arc<Allele> {
    if rng.pick(2) == 0 {
        Arc::clone(&pair.primary)
    } else {
        Arc::clone(&pair.secondary)
    }
}
