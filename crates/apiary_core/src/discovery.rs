//! Per-player and global species discovery bookkeeping.
//!
//! The ledger is the only runtime-mutable shared state in the engine. Each
//! map sits behind its own `RwLock`; the global "first discoverer" record is
//! checked and set under a single write lock so two players can never both
//! claim it.

use crate::allele::Allele;
use apiary_data::{Discoverer, LedgerSnapshot, PlayerId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::RwLock;

/// Name shown instead of a secret species the viewer has not discovered.
pub const HIDDEN_SPECIES_NAME: &str = "???";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryProgress {
    pub discovered: usize,
    pub total: usize,
}

impl DiscoveryProgress {
    /// Percentage in `[0, 100]`; 0 when there is nothing to discover.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.discovered.min(self.total) as f64 / self.total as f64) * 100.0
        }
    }
}

#[derive(Debug, Default)]
pub struct DiscoveryLedger {
    players: RwLock<HashMap<PlayerId, BTreeSet<String>>>,
    first_discoverers: RwLock<HashMap<String, Discoverer>>,
    broadcast_first_discovery: bool,
}

impl DiscoveryLedger {
    pub fn new(broadcast_first_discovery: bool) -> Self {
        Self {
            broadcast_first_discovery,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_discovered(&self, player: PlayerId, species_uid: &str) -> bool {
        let players = self.players.read().unwrap_or_else(|e| e.into_inner());
        players
            .get(&player)
            .is_some_and(|set| set.contains(species_uid))
    }

    /// `true` when the player had not discovered the species before.
    pub fn mark_discovered(&self, player: PlayerId, species_uid: &str) -> bool {
        let mut players = self.players.write().unwrap_or_else(|e| e.into_inner());
        players
            .entry(player)
            .or_default()
            .insert(species_uid.to_string())
    }

    /// `true` when the player had discovered the species.
    pub fn undiscover(&self, player: PlayerId, species_uid: &str) -> bool {
        let mut players = self.players.write().unwrap_or_else(|e| e.into_inner());
        players
            .get_mut(&player)
            .is_some_and(|set| set.remove(species_uid))
    }

    #[must_use]
    pub fn first_discoverer(&self, species_uid: &str) -> Option<Discoverer> {
        let first = self
            .first_discoverers
            .read()
            .unwrap_or_else(|e| e.into_inner());
        first.get(species_uid).cloned()
    }

    /// Records `discoverer` unless someone already holds the record.
    pub fn mark_first_discoverer(&self, species_uid: &str, discoverer: Discoverer) -> bool {
        let mut first = self
            .first_discoverers
            .write()
            .unwrap_or_else(|e| e.into_inner());
        if first.contains_key(species_uid) {
            return false;
        }
        first.insert(species_uid.to_string(), discoverer);
        true
    }

    /// Marks the species for the player, then claims the global record.
    /// Returns whether the player's own record changed.
    pub fn discover(&self, player: PlayerId, player_name: &str, species: &Allele) -> bool {
        let changed = self.mark_discovered(player, species.uid());
        if changed {
            tracing::debug!(%player, species = species.uid(), "Species discovered");
        }

        if self.mark_first_discoverer(species.uid(), Discoverer::new(player, player_name))
            && self.broadcast_first_discovery
        {
            let shown = if species.species().is_some_and(|s| s.secret) {
                HIDDEN_SPECIES_NAME
            } else {
                species.display_name()
            };
            tracing::info!(
                player = player_name,
                species = shown,
                "First discovery of a species"
            );
        }
        changed
    }

    /// Discovers every listed species, in name order. Returns how many were new.
    pub fn discover_all<'a>(
        &self,
        player: PlayerId,
        species_uids: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        let sorted: BTreeSet<&str> = species_uids.into_iter().collect();
        sorted
            .into_iter()
            .filter(|uid| self.mark_discovered(player, uid))
            .count()
    }

    /// Copies everything `owner` has discovered to `player`.
    pub fn discover_all_from(&self, player: PlayerId, owner: PlayerId) -> usize {
        let owned = self.discovered_species(owner);
        self.discover_all(player, owned.iter().map(String::as_str))
    }

    /// Forgets every discovery of `player`. Returns how many were removed.
    pub fn undiscover_all(&self, player: PlayerId) -> usize {
        let mut players = self.players.write().unwrap_or_else(|e| e.into_inner());
        players.remove(&player).map_or(0, |set| set.len())
    }

    /// Sorted species uids the player has discovered.
    #[must_use]
    pub fn discovered_species(&self, player: PlayerId) -> Vec<String> {
        let players = self.players.read().unwrap_or_else(|e| e.into_inner());
        players
            .get(&player)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn global_discoveries(&self) -> BTreeMap<String, Discoverer> {
        let first = self
            .first_discoverers
            .read()
            .unwrap_or_else(|e| e.into_inner());
        first
            .iter()
            .map(|(uid, d)| (uid.clone(), d.clone()))
            .collect()
    }

    #[must_use]
    pub fn progress(&self, player: PlayerId, total_species: usize) -> DiscoveryProgress {
        let players = self.players.read().unwrap_or_else(|e| e.into_inner());
        DiscoveryProgress {
            discovered: players.get(&player).map_or(0, BTreeSet::len),
            total: total_species,
        }
    }

    /// Whether the player may see the species' details: discovered, or
    /// flagged always visible.
    #[must_use]
    pub fn is_visible(&self, player: PlayerId, species: &Allele) -> bool {
        species.species().is_some_and(|s| s.always_visible)
            || self.has_discovered(player, species.uid())
    }

    /// The species name as `viewer` may see it in announcements.
    #[must_use]
    pub fn display_name_for(&self, viewer: PlayerId, species: &Allele) -> String {
        let secret = species.species().is_some_and(|s| s.secret);
        if secret && !self.has_discovered(viewer, species.uid()) {
            HIDDEN_SPECIES_NAME.to_string()
        } else {
            species.display_name().to_string()
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        let players = self.players.read().unwrap_or_else(|e| e.into_inner());
        LedgerSnapshot {
            players: players
                .iter()
                .map(|(id, set)| (*id, set.clone()))
                .collect(),
            first_discoverers: self.global_discoveries(),
        }
    }

    /// Replaces the ledger contents, dropping species that are not in
    /// `known_species`.
    pub fn restore<'a>(
        &self,
        snapshot: LedgerSnapshot,
        known_species: impl IntoIterator<Item = &'a str>,
    ) {
        let known: HashSet<&str> = known_species.into_iter().collect();
        let mut dropped = 0usize;

        let restored_players: HashMap<PlayerId, BTreeSet<String>> = snapshot
            .players
            .into_iter()
            .map(|(id, set)| {
                let before = set.len();
                let kept: BTreeSet<String> = set
                    .into_iter()
                    .filter(|uid| known.contains(uid.as_str()))
                    .collect();
                dropped += before - kept.len();
                (id, kept)
            })
            .collect();
        let restored_first: HashMap<String, Discoverer> = snapshot
            .first_discoverers
            .into_iter()
            .filter(|(uid, _)| {
                let keep = known.contains(uid.as_str());
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();

        if dropped > 0 {
            tracing::warn!(dropped, "Ignoring discoveries of unregistered species");
        }
        *self.players.write().unwrap_or_else(|e| e.into_inner()) = restored_players;
        *self
            .first_discoverers
            .write()
            .unwrap_or_else(|e| e.into_inner()) = restored_first;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allele::{AlleleValue, SpeciesTraits};
    use apiary_data::ChromosomeType;
    use uuid::Uuid;

    fn species(uid: &str, secret: bool, always_visible: bool) -> Allele {
        Allele::new(
            ChromosomeType::Species,
            uid,
            false,
            AlleleValue::Species(SpeciesTraits::new(secret, always_visible, 600, Vec::new())),
        )
        .unwrap()
    }

    #[test]
    fn test_discover_sets_first_once() {
        let ledger = DiscoveryLedger::new(true);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let common = species("species_common", false, false);

        assert!(ledger.discover(alice, "alice", &common));
        assert!(!ledger.discover(alice, "alice", &common));
        assert!(ledger.discover(bob, "bob", &common));
        assert_eq!(ledger.first_discoverer("species_common").unwrap().name, "alice");
    }

    #[test]
    fn test_bulk_operations() {
        let ledger = DiscoveryLedger::new(false);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        assert_eq!(
            ledger.discover_all(alice, ["species_meadows", "species_forest", "species_forest"]),
            2
        );
        assert_eq!(ledger.discover_all_from(bob, alice), 2);
        assert_eq!(ledger.discover_all_from(bob, alice), 0);
        assert_eq!(
            ledger.discovered_species(bob),
            vec!["species_forest", "species_meadows"]
        );
        assert_eq!(ledger.progress(bob, 4).percent(), 50.0);
        assert_eq!(ledger.undiscover_all(bob), 2);
        assert!(ledger.discovered_species(bob).is_empty());
        assert!(ledger.undiscover(alice, "species_forest"));
        assert!(!ledger.undiscover(alice, "species_forest"));
    }

    #[test]
    fn test_visibility_rules() {
        let ledger = DiscoveryLedger::new(true);
        let viewer = Uuid::new_v4();
        let secret = species("species_secret", true, false);
        let forest = species("species_forest", false, true);

        assert!(ledger.is_visible(viewer, &forest));
        assert!(!ledger.is_visible(viewer, &secret));
        assert_eq!(ledger.display_name_for(viewer, &secret), HIDDEN_SPECIES_NAME);
        ledger.mark_discovered(viewer, "species_secret");
        assert!(ledger.is_visible(viewer, &secret));
        assert_eq!(ledger.display_name_for(viewer, &secret), "Secret");
    }

    #[test]
    fn test_restore_drops_unknown_species() {
        let ledger = DiscoveryLedger::new(false);
        let alice = Uuid::new_v4();
        ledger.discover_all(alice, ["species_forest", "species_removed"]);
        ledger.mark_first_discoverer("species_removed", Discoverer::new(alice, "alice"));
        let snapshot = ledger.snapshot();

        let restored = DiscoveryLedger::new(false);
        restored.restore(snapshot, ["species_forest", "species_meadows"]);
        assert_eq!(restored.discovered_species(alice), vec!["species_forest"]);
        assert!(restored.global_discoveries().is_empty());
    }
}
