//! Typed storage of every registered allele.
//!
//! Each slot keeps an insertion-ordered map from uid to allele. Sortable
//! slots additionally keep a value-sorted index, rebuilt on each insert;
//! registration happens at startup so the rebuild cost does not matter.

use crate::allele::{Allele, AlleleValue};
use crate::error::{GeneticsError, Result};
use apiary_data::{ChromosomeType, CHROMOSOME_COUNT};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct SlotEntries {
    order: Vec<Arc<Allele>>,
    by_uid: HashMap<String, usize>,
    sorted: Vec<(f64, Arc<Allele>)>,
}

impl SlotEntries {
    fn insert(&mut self, allele: Arc<Allele>) -> bool {
        if let Some(&idx) = self.by_uid.get(allele.uid()) {
            self.order[idx] = allele;
            return true;
        }
        self.by_uid.insert(allele.uid().to_string(), self.order.len());
        self.order.push(allele);
        false
    }

    fn rebuild_sorted(&mut self) {
        let mut sorted: Vec<(f64, Arc<Allele>)> = self
            .order
            .iter()
            .filter_map(|a| a.scalar().map(|v| (v, Arc::clone(a))))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.uid().cmp(b.1.uid())));
        self.sorted = sorted;
    }
}

/// All registered alleles, per chromosome slot.
#[derive(Debug)]
pub struct AlleleCatalog {
    slots: [SlotEntries; CHROMOSOME_COUNT],
}

impl Default for AlleleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AlleleCatalog {
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
        }
    }

    /// Registers `allele` under `slot`.
    ///
    /// Fails with `TypeMismatch` when the payload kind is not the slot's
    /// declared kind, and with `SlotMismatch` when the allele was built for
    /// another slot. Re-registering a uid replaces the previous entry in
    /// place; genomes already holding the old allele keep it.
    pub fn register(&mut self, slot: ChromosomeType, allele: Allele) -> Result<Arc<Allele>> {
        allele.ensure_slot(slot)?;

        let allele = Arc::new(allele);
        let entries = &mut self.slots[slot.index()];
        let replaced = entries.insert(Arc::clone(&allele));
        if slot.is_sortable() {
            entries.rebuild_sorted();
        }

        if replaced {
            tracing::debug!(slot = %slot, uid = allele.uid(), "Allele overridden");
        } else {
            tracing::debug!(slot = %slot, uid = allele.uid(), "Allele registered");
        }
        Ok(allele)
    }

    /// Builds and registers an allele from a raw value.
    pub fn register_value(
        &mut self,
        slot: ChromosomeType,
        uid: impl Into<String>,
        value: AlleleValue,
        dominant: bool,
    ) -> Result<Arc<Allele>> {
        let allele = Allele::new(slot, uid, dominant, value)?;
        self.register(slot, allele)
    }

    #[must_use]
    pub fn lookup(&self, slot: ChromosomeType, uid: &str) -> Option<Arc<Allele>> {
        let entries = &self.slots[slot.index()];
        entries
            .by_uid
            .get(uid)
            .map(|&idx| Arc::clone(&entries.order[idx]))
    }

    /// Like [`lookup`](Self::lookup) but fails with `UnknownAllele`.
    pub fn require(&self, slot: ChromosomeType, uid: &str) -> Result<Arc<Allele>> {
        self.lookup(slot, uid)
            .ok_or_else(|| GeneticsError::UnknownAllele {
                slot,
                uid: uid.to_string(),
            })
    }

    /// Insertion order for non-sortable slots, ascending value (ties by
    /// uid) for sortable ones.
    #[must_use]
    pub fn list(&self, slot: ChromosomeType) -> Vec<Arc<Allele>> {
        let entries = &self.slots[slot.index()];
        if slot.is_sortable() {
            entries.sorted.iter().map(|(_, a)| Arc::clone(a)).collect()
        } else {
            entries.order.clone()
        }
    }

    /// Uids in [`list`](Self::list) order.
    #[must_use]
    pub fn uids(&self, slot: ChromosomeType) -> Vec<String> {
        self.list(slot).iter().map(|a| a.uid().to_string()).collect()
    }

    /// Every species allele, insertion order.
    #[must_use]
    pub fn all_species(&self) -> Vec<Arc<Allele>> {
        self.slots[ChromosomeType::Species.index()].order.clone()
    }

    #[must_use]
    pub fn len(&self, slot: ChromosomeType) -> usize {
        self.slots[slot.index()].order.len()
    }

    #[must_use]
    pub fn is_empty(&self, slot: ChromosomeType) -> bool {
        self.len(slot) == 0
    }

    /// First slot without any registered allele.
    #[must_use]
    pub fn first_empty_slot(&self) -> Option<ChromosomeType> {
        ChromosomeType::ALL
            .iter()
            .copied()
            .find(|slot| self.is_empty(*slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allele::{EffectFunction, SpeciesTraits};
    use apiary_data::Material;

    fn catalog_with_productivity() -> AlleleCatalog {
        let mut catalog = AlleleCatalog::new();
        for (uid, value) in [
            ("productivity_high", 1.5),
            ("productivity_low", 0.75),
            ("productivity_normal", 1.0),
            ("productivity_also_normal", 1.0),
        ] {
            catalog
                .register_value(
                    ChromosomeType::Productivity,
                    uid,
                    AlleleValue::Double(value),
                    false,
                )
                .unwrap();
        }
        catalog
    }

    #[test]
    fn test_sortable_list_is_value_ordered() {
        let catalog = catalog_with_productivity();
        assert_eq!(
            catalog.uids(ChromosomeType::Productivity),
            vec![
                "productivity_low",
                "productivity_also_normal",
                "productivity_normal",
                "productivity_high"
            ]
        );
    }

    #[test]
    fn test_non_sortable_list_is_insertion_ordered() {
        let mut catalog = AlleleCatalog::new();
        for uid in ["plant_wheat", "plant_carrot", "plant_beetroot"] {
            catalog
                .register_value(
                    ChromosomeType::Plant,
                    uid,
                    AlleleValue::Plant(Material::new(uid)),
                    false,
                )
                .unwrap();
        }
        assert_eq!(
            catalog.uids(ChromosomeType::Plant),
            vec!["plant_wheat", "plant_carrot", "plant_beetroot"]
        );
    }

    #[test]
    fn test_register_rejects_wrong_kind() {
        let mut catalog = AlleleCatalog::new();
        let err = catalog
            .register_value(
                ChromosomeType::Effect,
                "effect_none",
                AlleleValue::Integer(3),
                false,
            )
            .unwrap_err();
        assert!(matches!(err, GeneticsError::TypeMismatch { .. }));
        assert!(catalog.is_empty(ChromosomeType::Effect));
    }

    #[test]
    fn test_register_rejects_allele_of_another_slot() {
        let mut catalog = AlleleCatalog::new();
        let fertility = Allele::new(
            ChromosomeType::Fertility,
            "fertility_x",
            false,
            AlleleValue::Integer(2),
        )
        .unwrap();
        let err = catalog.register(ChromosomeType::Lifespan, fertility).unwrap_err();
        assert!(matches!(err, GeneticsError::SlotMismatch { .. }));
        assert!(catalog.list(ChromosomeType::Lifespan).is_empty());
        assert!(catalog.lookup(ChromosomeType::Lifespan, "fertility_x").is_none());
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut catalog = catalog_with_productivity();
        catalog
            .register_value(
                ChromosomeType::Productivity,
                "productivity_low",
                AlleleValue::Double(0.25),
                true,
            )
            .unwrap();
        let uids = catalog.uids(ChromosomeType::Productivity);
        assert_eq!(uids.iter().filter(|u| *u == "productivity_low").count(), 1);
        assert_eq!(catalog.len(ChromosomeType::Productivity), 4);
        let low = catalog
            .lookup(ChromosomeType::Productivity, "productivity_low")
            .unwrap();
        assert!(low.is_dominant());
        assert_eq!(low.scalar(), Some(0.25));
    }

    #[test]
    fn test_all_species_and_empty_slots() {
        let mut catalog = AlleleCatalog::new();
        assert_eq!(catalog.first_empty_slot(), Some(ChromosomeType::Species));
        catalog
            .register_value(
                ChromosomeType::Species,
                "species_forest",
                AlleleValue::Species(SpeciesTraits::new(false, true, 600, Vec::new())),
                true,
            )
            .unwrap();
        catalog
            .register_value(
                ChromosomeType::Effect,
                "effect_none",
                AlleleValue::Effect(EffectFunction::noop()),
                false,
            )
            .unwrap();
        assert_eq!(catalog.all_species().len(), 1);
        assert_eq!(
            catalog.first_empty_slot(),
            Some(ChromosomeType::Productivity)
        );
        assert!(catalog
            .require(ChromosomeType::Species, "species_meadows")
            .is_err());
    }
}
