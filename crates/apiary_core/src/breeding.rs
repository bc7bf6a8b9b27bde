//! Breeding compute: resolver, mutation graph and product table combined.

use crate::allele::Allele;
use crate::config::BreedingConfig;
use crate::error::{GeneticsError, Result};
use crate::genome::Genome;
use crate::registry::Genetics;
use crate::resolver;
use crate::rng::GeneticRng;
use apiary_data::{ChromosomeType, GenomeCarrier, ItemStack, Location};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Genome-level result of one breeding.
#[derive(Debug, Clone)]
pub struct Offspring {
    /// Final genome, species slot homozygous.
    pub genome: Genome,
    /// Whether a mutation edge fired.
    pub mutated: bool,
    /// Product drops, each with its dropped amount.
    pub products: Vec<ItemStack>,
    pub ticks: u64,
    pub drone_count: u32,
}

impl Offspring {
    #[must_use]
    pub fn species(&self) -> &Arc<Allele> {
        self.genome.species()
    }

    /// Total dropped units across all products.
    #[must_use]
    pub fn product_units(&self) -> u64 {
        self.products.iter().map(|p| u64::from(p.amount)).sum()
    }
}

/// Item-level result of one breeding.
#[derive(Debug, Clone)]
pub struct BreedingOutcome<I> {
    /// Copy of the princess item carrying the offspring genome.
    pub princess: I,
    /// Copies of the drone item carrying the offspring genome.
    pub drones: Vec<I>,
    pub products: Vec<ItemStack>,
    pub ticks: u64,
    pub offspring: Offspring,
}

impl<I> BreedingOutcome<I> {
    #[must_use]
    pub fn species(&self) -> &Arc<Allele> {
        self.offspring.species()
    }

    /// Runs the offspring's expressed effect at `location`, with the
    /// expressed range as intensity.
    pub fn apply_effect(&self, location: &Location) {
        let genome = &self.offspring.genome;
        let intensity = genome
            .expressed_scalar(ChromosomeType::Range)
            .map_or(0, |r| r.max(0.0) as u32);
        if let Some(effect) = genome.expressed(ChromosomeType::Effect).effect() {
            effect.apply(location, intensity);
        }
    }
}

/// Breeds genomes against a frozen [`Genetics`].
#[derive(Debug, Clone)]
pub struct BreedingEngine {
    genetics: Arc<Genetics>,
    config: BreedingConfig,
}

impl BreedingEngine {
    pub fn new(genetics: Arc<Genetics>, config: BreedingConfig) -> Self {
        Self { genetics, config }
    }

    #[must_use]
    pub fn genetics(&self) -> &Arc<Genetics> {
        &self.genetics
    }

    #[must_use]
    pub fn config(&self) -> &BreedingConfig {
        &self.config
    }

    /// Breeds two genomes.
    ///
    /// Fails with `UnresolvedSpecies` only if the catalog and mutation graph
    /// disagree, which a frozen registry rules out.
    pub fn breed<R: GeneticRng + ?Sized>(
        &self,
        princess: &Genome,
        drone: &Genome,
        modifier: f64,
        rng: &mut R,
    ) -> Result<Offspring> {
        let provisional = resolver::resolve(princess, drone, rng)?;

        let mutation = self.genetics.mutations().resolve_species(
            princess.species().uid(),
            drone.species().uid(),
            modifier,
            rng,
        );
        let child_uid = mutation.unwrap_or_else(|| provisional.species().uid());
        let species = self
            .genetics
            .species(child_uid)
            .ok_or_else(|| GeneticsError::UnresolvedSpecies(child_uid.to_string()))?;
        let genome = provisional.with_species(species)?;

        let products = self.roll_products(&genome, rng)?;
        let ticks = self.duration(&genome)?;
        let drone_count = self.drone_count(&genome);

        Ok(Offspring {
            genome,
            mutated: mutation.is_some(),
            products,
            ticks,
            drone_count,
        })
    }

    /// Decodes both items, breeds them and writes the offspring genome back
    /// onto copies of the parents. `Ok(None)` when either item is not a bee.
    pub fn breed_items<I: GenomeCarrier, R: GeneticRng + ?Sized>(
        &self,
        princess_item: &I,
        drone_item: &I,
        modifier: f64,
        rng: &mut R,
    ) -> Result<Option<BreedingOutcome<I>>> {
        let codec = self.genetics.codec();
        let (Some(princess), Some(drone)) = (
            codec.decode_from_item(princess_item)?,
            codec.decode_from_item(drone_item)?,
        ) else {
            return Ok(None);
        };

        let offspring = self.breed(&princess, &drone, modifier, rng)?;
        let princess = codec.update_item(princess_item, &offspring.genome)?;
        let drone = codec.update_item(drone_item, &offspring.genome)?;
        let drones = vec![drone; offspring.drone_count as usize];

        Ok(Some(BreedingOutcome {
            princess,
            drones,
            products: offspring.products.clone(),
            ticks: offspring.ticks,
            offspring,
        }))
    }

    /// Breeds every pair with its own `ChaCha8Rng` seeded from
    /// `seed + index`, so results do not depend on scheduling.
    pub fn breed_batch(
        &self,
        pairs: &[(Genome, Genome)],
        modifier: f64,
        seed: u64,
    ) -> Vec<Result<Offspring>> {
        let breed_one = |(idx, (princess, drone)): (usize, &(Genome, Genome))| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(idx as u64));
            self.breed(princess, drone, modifier, &mut rng)
        };

        #[cfg(feature = "parallel")]
        {
            pairs.par_iter().enumerate().map(breed_one).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            pairs.iter().enumerate().map(breed_one).collect()
        }
    }

    fn roll_products<R: GeneticRng + ?Sized>(
        &self,
        genome: &Genome,
        rng: &mut R,
    ) -> Result<Vec<ItemStack>> {
        let traits = genome
            .species_traits()
            .ok_or_else(|| GeneticsError::UnresolvedSpecies(genome.species().uid().to_string()))?;
        let scale = if self.config.productivity_scaling {
            genome
                .expressed_scalar(ChromosomeType::Productivity)
                .unwrap_or(1.0)
        } else {
            1.0
        };

        let mut drops = Vec::new();
        for entry in &traits.products {
            if !rng.roll((entry.chance * scale).clamp(0.0, 1.0)) {
                continue;
            }
            let count = rng.count(entry.min_count, entry.max_count);
            if count > 0 {
                drops.push(entry.item.with_amount(count));
            }
        }
        Ok(drops)
    }

    /// `round(base * lifespan / max(fertility, 1) * multiplier)`, at least 1.
    fn duration(&self, genome: &Genome) -> Result<u64> {
        let traits = genome
            .species_traits()
            .ok_or_else(|| GeneticsError::UnresolvedSpecies(genome.species().uid().to_string()))?;
        let lifespan = genome
            .expressed_scalar(ChromosomeType::Lifespan)
            .unwrap_or(1.0);
        let fertility = genome
            .expressed_scalar(ChromosomeType::Fertility)
            .unwrap_or(1.0)
            .max(1.0);
        let ticks = f64::from(traits.base_ticks) * lifespan / fertility
            * self.config.duration_multiplier;
        Ok((ticks.round() as u64).max(1))
    }

    fn drone_count(&self, genome: &Genome) -> u32 {
        let fertility = genome
            .expressed_scalar(ChromosomeType::Fertility)
            .map_or(0, |f| f.max(0.0) as u32);
        self.config
            .brood_size
            .unwrap_or(fertility)
            .min(self.config.max_drones)
    }
}
