//! Species definitions loaded from TOML.
//!
//! ```toml
//! [[species]]
//! uid = "species_common"
//! base_ticks = 600
//!
//! [species.alleles]
//! productivity = "productivity_high"
//!
//! [[species.products]]
//! item = "honey_comb"
//! chance = 0.35
//!
//! [[species.mutations]]
//! parents = ["species_forest", "species_meadows"]
//! chance = 0.15
//! ```

use crate::error::{IoError, Result};
use apiary_core::builder::{SpeciesBuilder, DEFAULT_BASE_TICKS};
use apiary_core::setup::register_standard_alleles;
use apiary_core::RegistryBuilder;
use apiary_data::{ChromosomeType, ItemStack};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDef {
    pub item: String,
    /// Shown instead of the item id.
    #[serde(default)]
    pub display: Option<String>,
    pub chance: f64,
    #[serde(default = "one")]
    pub min: u32,
    #[serde(default = "one")]
    pub max: u32,
}

fn one() -> u32 {
    1
}

fn default_base_ticks() -> u32 {
    DEFAULT_BASE_TICKS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationDef {
    pub parents: [String; 2],
    pub chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDef {
    pub uid: String,
    #[serde(default)]
    pub dominant: bool,
    #[serde(default)]
    pub secret: bool,
    #[serde(default)]
    pub always_visible: bool,
    #[serde(default = "default_base_ticks")]
    pub base_ticks: u32,
    /// Slot name to allele uid. Unlisted slots use the defaults.
    #[serde(default)]
    pub alleles: BTreeMap<String, String>,
    #[serde(default)]
    pub products: Vec<ProductDef>,
    /// Parent pairs that produce this species.
    #[serde(default)]
    pub mutations: Vec<MutationDef>,
}

impl SpeciesDef {
    /// Fails on unknown slot names; everything else is checked on
    /// registration.
    pub fn to_builder(&self) -> Result<SpeciesBuilder> {
        let mut builder = SpeciesBuilder::new(&self.uid)
            .dominant(self.dominant)
            .secret(self.secret)
            .always_visible(self.always_visible)
            .base_ticks(self.base_ticks);

        for (slot_name, uid) in &self.alleles {
            let slot = ChromosomeType::parse(slot_name).ok_or_else(|| {
                IoError::validation(format!("{}: unknown slot '{slot_name}'", self.uid))
            })?;
            builder = builder.allele(slot, uid);
        }
        for product in &self.products {
            let item = match &product.display {
                Some(display) => ItemStack::new(&product.item, 1).with_display(display, Vec::new()),
                None => ItemStack::new(&product.item, 1),
            };
            builder = builder.product_range(item, product.chance, product.min, product.max);
        }
        for mutation in &self.mutations {
            let [a, b] = &mutation.parents;
            builder = builder.mutation(a, b, mutation.chance);
        }
        Ok(builder)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesFile {
    #[serde(default)]
    pub species: Vec<SpeciesDef>,
}

impl SpeciesFile {
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: Self = toml::from_str(content)?;
        let mut seen = std::collections::HashSet::new();
        for def in &file.species {
            if !seen.insert(def.uid.as_str()) {
                return Err(IoError::validation(format!("duplicate species {}", def.uid)));
            }
        }
        Ok(file)
    }

    /// Registers every species in file order. Stops at the first species
    /// the registry rejects; earlier species stay registered.
    pub fn apply(&self, registry: &mut RegistryBuilder) -> Result<Vec<String>> {
        let mut registered = Vec::with_capacity(self.species.len());
        for def in &self.species {
            def.to_builder()?
                .register(registry)
                .map_err(|e| IoError::from(e).with_context(format!("registering {}", def.uid)))?;
            registered.push(def.uid.clone());
        }
        tracing::debug!(count = registered.len(), "Species data applied");
        Ok(registered)
    }
}

pub fn load_species_file<P: AsRef<Path>>(path: P) -> Result<SpeciesFile> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::not_found(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    SpeciesFile::from_toml(&content)
        .map_err(|e| e.with_context(format!("parsing {}", path.display())))
}

/// The standard alleles plus every species in `path`, not yet frozen.
pub fn load_registry<P: AsRef<Path>>(path: P) -> Result<RegistryBuilder> {
    let file = load_species_file(path)?;
    let mut registry = RegistryBuilder::new();
    register_standard_alleles(&mut registry)?;
    file.apply(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiary_core::GeneticsError;

    const SAMPLE: &str = r#"
        [[species]]
        uid = "species_forest"
        dominant = true
        always_visible = true

        [[species.products]]
        item = "honey_comb"
        chance = 0.3

        [[species]]
        uid = "species_meadows"
        dominant = true
        always_visible = true
        alleles = { plant = "plant_oxeye_daisy" }

        [[species]]
        uid = "species_common"
        base_ticks = 800

        [[species.products]]
        item = "honey_comb"
        chance = 0.35
        max = 2

        [[species.mutations]]
        parents = ["species_forest", "species_meadows"]
        chance = 0.15
    "#;

    fn standard() -> RegistryBuilder {
        let mut registry = RegistryBuilder::new();
        register_standard_alleles(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_sample_builds_registry() {
        let file = SpeciesFile::from_toml(SAMPLE).unwrap();
        assert_eq!(file.species[2].products[0].min, 1);
        assert_eq!(file.species[0].base_ticks, DEFAULT_BASE_TICKS);

        let mut registry = standard();
        let uids = file.apply(&mut registry).unwrap();
        assert_eq!(uids, vec!["species_forest", "species_meadows", "species_common"]);

        let genetics = registry.build().unwrap();
        assert_eq!(genetics.mutations().len(), 1);
        let common = genetics.species("species_common").unwrap();
        assert_eq!(common.species().unwrap().base_ticks, 800);
        let meadows = genetics.template_genome("species_meadows").unwrap();
        assert_eq!(
            meadows.expressed(ChromosomeType::Plant).uid(),
            "plant_oxeye_daisy"
        );
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        let file = SpeciesFile::from_toml(
            r#"
            [[species]]
            uid = "species_odd"
            alleles = { speed = "speed_fast" }
            "#,
        )
        .unwrap();
        assert!(matches!(
            file.apply(&mut standard()),
            Err(IoError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_chance_surfaces_genetics_error() {
        let file = SpeciesFile::from_toml(
            r#"
            [[species]]
            uid = "species_odd"

            [[species.mutations]]
            parents = ["species_forest", "species_meadows"]
            chance = 1.5
            "#,
        )
        .unwrap();
        match file.apply(&mut standard()).unwrap_err() {
            IoError::Context { source, .. } => assert!(matches!(
                *source,
                IoError::Genetics(GeneticsError::InvalidChance(_))
            )),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_species_rejected() {
        let dup = "[[species]]\nuid = \"species_a\"\n[[species]]\nuid = \"species_a\"\n";
        assert!(SpeciesFile::from_toml(dup).is_err());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        assert!(matches!(
            load_species_file("/nonexistent/species.toml"),
            Err(IoError::NotFound(_))
        ));
    }
}
