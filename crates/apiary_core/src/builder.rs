//! Staged species registration.
//!
//! A [`SpeciesBuilder`] only accumulates settings. Everything is validated
//! in [`SpeciesBuilder::register`], which either registers the species
//! completely or leaves the registry untouched.

use crate::allele::{Allele, AlleleValue, SpeciesTraits};
use crate::error::{GeneticsError, Result};
use crate::genome::AlleleTemplate;
use crate::registry::RegistryBuilder;
use apiary_data::{ChromosomeType, ItemStack, ProductEntry};
use std::sync::Arc;

/// Default breeding duration in ticks.
pub const DEFAULT_BASE_TICKS: u32 = 600;

#[derive(Debug, Clone)]
pub struct SpeciesBuilder {
    uid: String,
    dominant: bool,
    secret: bool,
    always_visible: bool,
    base_ticks: u32,
    products: Vec<ProductEntry>,
    alleles: Vec<(ChromosomeType, String)>,
    mutations: Vec<(String, String, f64)>,
}

impl SpeciesBuilder {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            dominant: false,
            secret: false,
            always_visible: false,
            base_ticks: DEFAULT_BASE_TICKS,
            products: Vec::new(),
            alleles: Vec::new(),
            mutations: Vec::new(),
        }
    }

    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    #[must_use]
    pub fn dominant(mut self, dominant: bool) -> Self {
        self.dominant = dominant;
        self
    }

    /// Hidden from players until discovered.
    #[must_use]
    pub fn secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    #[must_use]
    pub fn always_visible(mut self, always_visible: bool) -> Self {
        self.always_visible = always_visible;
        self
    }

    #[must_use]
    pub fn base_ticks(mut self, ticks: u32) -> Self {
        self.base_ticks = ticks;
        self
    }

    /// Adds a single-unit product.
    #[must_use]
    pub fn product(self, item: ItemStack, chance: f64) -> Self {
        self.product_range(item, chance, 1, 1)
    }

    #[must_use]
    pub fn product_range(mut self, item: ItemStack, chance: f64, min: u32, max: u32) -> Self {
        self.products.push(ProductEntry::new(item, chance, min, max));
        self
    }

    /// Overrides the default allele of a non-species slot.
    #[must_use]
    pub fn allele(mut self, slot: ChromosomeType, uid: impl Into<String>) -> Self {
        self.alleles.push((slot, uid.into()));
        self
    }

    /// This species as the child of `{parent_a, parent_b}`.
    #[must_use]
    pub fn mutation(
        mut self,
        parent_a: impl Into<String>,
        parent_b: impl Into<String>,
        chance: f64,
    ) -> Self {
        self.mutations.push((parent_a.into(), parent_b.into(), chance));
        self
    }

    /// Applies settings shared by a group of species.
    #[must_use]
    pub fn group<F: FnOnce(Self) -> Self>(self, apply: F) -> Self {
        apply(self)
    }

    /// Validates and registers the species allele, its template and its
    /// pending mutations.
    pub fn register(self, registry: &mut RegistryBuilder) -> Result<Arc<Allele>> {
        for product in &self.products {
            validate_product(product)?;
        }
        for (_, _, chance) in &self.mutations {
            if !(*chance > 0.0 && *chance < 1.0) {
                return Err(GeneticsError::InvalidChance(*chance));
            }
        }

        let mut overrides = AlleleTemplate::new();
        for (slot, uid) in &self.alleles {
            if *slot == ChromosomeType::Species {
                return Err(GeneticsError::InvalidSlot(*slot));
            }
            overrides.set(*slot, registry.catalog().require(*slot, uid)?)?;
        }

        let traits = SpeciesTraits::new(
            self.secret,
            self.always_visible,
            self.base_ticks,
            self.products,
        );
        let allele = Allele::new(
            ChromosomeType::Species,
            self.uid,
            self.dominant,
            AlleleValue::Species(traits),
        )?;
        let species = registry.register_species(allele, &overrides)?;

        for (parent_a, parent_b, chance) in self.mutations {
            registry.add_mutation(parent_a, parent_b, species.uid(), chance)?;
        }
        Ok(species)
    }
}

fn validate_product(product: &ProductEntry) -> Result<()> {
    let invalid = |reason: &str| GeneticsError::InvalidProduct {
        item: product.item.id.clone(),
        reason: reason.to_string(),
    };
    if !(product.chance > 0.0 && product.chance <= 1.0) {
        return Err(invalid("chance must be in (0, 1]"));
    }
    if product.min_count > product.max_count {
        return Err(invalid("min count exceeds max count"));
    }
    if product.max_count == 0 {
        return Err(invalid("max count must be positive"));
    }
    Ok(())
}
