//! Player-facing entry points: breeding and analysing items, with corrupt
//! records downgraded to a logged no-op and discoveries recorded.

use crate::breeding::{BreedingEngine, BreedingOutcome};
use crate::discovery::DiscoveryLedger;
use crate::error::Result;
use crate::genome::Genome;
use crate::metrics::Metrics;
use crate::rng::GeneticRng;
use apiary_data::{GenomeCarrier, PlayerId};
use std::sync::Arc;

#[derive(Clone)]
pub struct BreedingService {
    engine: BreedingEngine,
    ledger: Arc<DiscoveryLedger>,
    metrics: Arc<Metrics>,
}

impl BreedingService {
    pub fn new(engine: BreedingEngine, ledger: Arc<DiscoveryLedger>, metrics: Arc<Metrics>) -> Self {
        Self {
            engine,
            ledger,
            metrics,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &BreedingEngine {
        &self.engine
    }

    #[must_use]
    pub fn ledger(&self) -> &Arc<DiscoveryLedger> {
        &self.ledger
    }

    #[must_use]
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Breeds two items for `player`.
    ///
    /// `Ok(None)` when either item is not a bee or carries a corrupt record.
    /// Other errors mean the registry itself is inconsistent.
    pub fn breed_items<I: GenomeCarrier, R: GeneticRng + ?Sized>(
        &self,
        player: PlayerId,
        player_name: &str,
        princess: &I,
        drone: &I,
        modifier: f64,
        rng: &mut R,
    ) -> Result<Option<BreedingOutcome<I>>> {
        let outcome = match self.engine.breed_items(princess, drone, modifier, rng) {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return Ok(None),
            Err(e) if e.is_item_local() => {
                tracing::warn!(%player, error = %e, "Ignoring bee with corrupt genome");
                self.metrics.record_corrupt_record();
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let species = outcome.species();
        self.metrics
            .record_breeding(outcome.offspring.mutated, outcome.offspring.product_units());
        self.metrics.increment_counter(species.uid());
        if self.ledger.discover(player, player_name, species) {
            self.metrics.record_discovery();
        }
        Ok(Some(outcome))
    }

    /// Breeds with the configured default modifier.
    pub fn breed_items_default<I: GenomeCarrier, R: GeneticRng + ?Sized>(
        &self,
        player: PlayerId,
        player_name: &str,
        princess: &I,
        drone: &I,
        rng: &mut R,
    ) -> Result<Option<BreedingOutcome<I>>> {
        let modifier = self.engine.config().default_modifier;
        self.breed_items(player, player_name, princess, drone, modifier, rng)
    }

    /// Decodes an item and discovers its species. `None` for non-bees and
    /// corrupt records.
    pub fn analyze_item<I: GenomeCarrier>(
        &self,
        player: PlayerId,
        player_name: &str,
        item: &I,
    ) -> Option<Genome> {
        let genome = match self.engine.genetics().codec().decode_from_item(item) {
            Ok(genome) => genome?,
            Err(e) => {
                tracing::warn!(%player, error = %e, "Cannot analyze bee with corrupt genome");
                self.metrics.record_corrupt_record();
                return None;
            }
        };
        if self.ledger.discover(player, player_name, genome.species()) {
            self.metrics.record_discovery();
        }
        Some(genome)
    }
}
