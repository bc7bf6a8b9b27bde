//! Headless breeding sessions.
//!
//! A session starts from two root species and keeps breeding the resulting
//! princess. Each generation the drone is either the offspring's own drone
//! or a fresh root drone, so the run wanders through the mutation tree.

use crate::apiary::Apiary;
use anyhow::Result;
use apiary_core::GeneticRng;
use apiary_data::{ItemStack, PlayerId};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub generations: u32,
    pub mutations: u32,
    pub product_units: u64,
    pub ticks: u64,
    /// Offspring count per species uid.
    pub species: BTreeMap<String, u32>,
    pub final_species: String,
}

pub struct Session<'a> {
    apiary: &'a Apiary,
    player: PlayerId,
    player_name: String,
}

impl<'a> Session<'a> {
    pub fn new(apiary: &'a Apiary, player: PlayerId, player_name: impl Into<String>) -> Self {
        Self {
            apiary,
            player,
            player_name: player_name.into(),
        }
    }

    fn root_drones(&self) -> Vec<ItemStack> {
        let genetics = self.apiary.genetics();
        genetics
            .root_species()
            .iter()
            .filter_map(|uid| genetics.species_items(uid))
            .map(|items| items.drone)
            .collect()
    }

    /// Breeds `generations` times starting from a `first` princess and a
    /// `second` drone.
    pub fn run<R: GeneticRng + ?Sized>(
        &self,
        first: &str,
        second: &str,
        generations: u32,
        rng: &mut R,
    ) -> Result<SessionSummary> {
        let genetics = self.apiary.genetics();
        let princess_items = genetics
            .species_items(first)
            .ok_or_else(|| anyhow::anyhow!("unknown species {first}"))?;
        let drone_items = genetics
            .species_items(second)
            .ok_or_else(|| anyhow::anyhow!("unknown species {second}"))?;
        let roots = self.root_drones();
        let service = self.apiary.service();

        let mut princess = princess_items.princess;
        let mut drone = drone_items.drone;
        let mut summary = SessionSummary {
            final_species: first.to_string(),
            ..SessionSummary::default()
        };

        for generation in 0..generations {
            let Some(outcome) =
                service.breed_items_default(self.player, &self.player_name, &princess, &drone, rng)?
            else {
                tracing::warn!(generation, "Breeding produced nothing, stopping session");
                break;
            };

            let uid = outcome.species().uid().to_string();
            tracing::debug!(generation, species = %uid, mutated = outcome.offspring.mutated, "Generation bred");
            summary.generations += 1;
            summary.mutations += u32::from(outcome.offspring.mutated);
            summary.product_units += outcome.offspring.product_units();
            summary.ticks += outcome.ticks;
            *summary.species.entry(uid.clone()).or_default() += 1;
            summary.final_species = uid;

            let offspring_drone = outcome.drones.into_iter().next();
            drone = match offspring_drone {
                Some(own) if roots.is_empty() || rng.roll(0.5) => own,
                _ if !roots.is_empty() => roots[rng.pick(roots.len())].clone(),
                _ => drone,
            };
            princess = outcome.princess;
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiary_core::{EngineConfig, ScriptedRng};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uuid::Uuid;

    #[test]
    fn test_session_is_deterministic() {
        let apiary = Apiary::standard(EngineConfig::default()).unwrap();
        let player = Uuid::new_v4();
        let session = Session::new(&apiary, player, "tester");

        let a = session
            .run("species_forest", "species_meadows", 40, &mut ChaCha8Rng::seed_from_u64(3))
            .unwrap();
        let b = session
            .run("species_forest", "species_meadows", 40, &mut ChaCha8Rng::seed_from_u64(3))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.generations, 40);
        assert_eq!(a.species.values().sum::<u32>(), 40);
    }

    #[test]
    fn test_session_with_forced_mutation() {
        let apiary = Apiary::standard(EngineConfig::default()).unwrap();
        let player = Uuid::new_v4();
        let summary = Session::new(&apiary, player, "tester")
            .run("species_forest", "species_meadows", 1, &mut ScriptedRng::always_succeed())
            .unwrap();
        assert_eq!(summary.final_species, "species_common");
        assert_eq!(summary.mutations, 1);
        assert!(apiary.ledger().has_discovered(player, "species_common"));
    }

    #[test]
    fn test_unknown_start_species() {
        let apiary = Apiary::standard(EngineConfig::default()).unwrap();
        let session = Session::new(&apiary, Uuid::new_v4(), "tester");
        assert!(session
            .run("species_missing", "species_forest", 1, &mut ScriptedRng::always_fail())
            .is_err());
    }
}
