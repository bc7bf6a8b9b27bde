//! The standard allele set, default template and base species.

use crate::allele::{uid_for, AlleleValue, EffectFunction};
use crate::builder::SpeciesBuilder;
use crate::error::Result;
use crate::registry::RegistryBuilder;
use apiary_data::{ChromosomeType, ItemStack, Location, Material};

pub const PRODUCTIVITY: [(&str, f64, bool); 5] = [
    ("very_low", 0.5, false),
    ("low", 0.75, false),
    ("normal", 1.0, false),
    ("high", 1.5, true),
    ("very_high", 2.0, true),
];

pub const FERTILITY: [(&str, i32, bool); 4] = [
    ("low", 1, true),
    ("normal", 2, true),
    ("high", 3, false),
    ("very_high", 4, false),
];

pub const LIFESPAN: [(&str, i32, bool); 5] = [
    ("very_short", 1, false),
    ("short", 2, false),
    ("normal", 3, false),
    ("long", 4, false),
    ("very_long", 5, false),
];

pub const RANGE: [(&str, i32, bool); 5] = [
    ("very_short", 1, false),
    ("short", 2, false),
    ("normal", 3, false),
    ("long", 4, true),
    ("very_long", 5, true),
];

pub const PLANTS: [(&str, &str); 11] = [
    ("none", "air"),
    ("oxeye_daisy", "oxeye_daisy"),
    ("wheat", "wheat"),
    ("sugar_cane", "sugar_cane"),
    ("melon", "melon"),
    ("pumpkin", "pumpkin"),
    ("potato", "potatoes"),
    ("carrot", "carrots"),
    ("beetroot", "beetroots"),
    ("cocoa", "cocoa"),
    ("berry", "sweet_berry_bush"),
];

/// Registers every standard non-species allele and the default template.
pub fn register_standard_alleles(registry: &mut RegistryBuilder) -> Result<()> {
    for (name, value, dominant) in PRODUCTIVITY {
        let slot = ChromosomeType::Productivity;
        registry.register_allele(slot, uid_for(slot, name), AlleleValue::Double(value), dominant)?;
    }
    for (slot, table) in [
        (ChromosomeType::Fertility, &FERTILITY[..]),
        (ChromosomeType::Lifespan, &LIFESPAN[..]),
        (ChromosomeType::Range, &RANGE[..]),
    ] {
        for (name, value, dominant) in table {
            registry.register_allele(
                slot,
                uid_for(slot, name),
                AlleleValue::Integer(*value),
                *dominant,
            )?;
        }
    }
    for (name, material) in PLANTS {
        let slot = ChromosomeType::Plant;
        registry.register_allele(
            slot,
            uid_for(slot, name),
            AlleleValue::Plant(Material::new(material)),
            false,
        )?;
    }

    let effect = ChromosomeType::Effect;
    registry.register_allele(
        effect,
        uid_for(effect, "none"),
        AlleleValue::Effect(EffectFunction::noop()),
        false,
    )?;
    registry.register_allele(
        effect,
        uid_for(effect, "regeneration"),
        AlleleValue::Effect(EffectFunction::new(|location: &Location, intensity| {
            tracing::debug!(world = %location.world, intensity, "Regeneration pulse");
        })),
        false,
    )?;
    registry.register_allele(
        effect,
        uid_for(effect, "firework"),
        AlleleValue::Effect(EffectFunction::new(|location: &Location, intensity| {
            tracing::debug!(world = %location.world, intensity, "Firework burst");
        })),
        true,
    )?;

    for (slot, uid) in [
        (ChromosomeType::Productivity, "productivity_normal"),
        (ChromosomeType::Fertility, "fertility_normal"),
        (ChromosomeType::Lifespan, "lifespan_normal"),
        (ChromosomeType::Range, "range_normal"),
        (ChromosomeType::Plant, "plant_none"),
        (ChromosomeType::Effect, "effect_none"),
    ] {
        registry.set_default(slot, uid)?;
    }
    Ok(())
}

fn comb(name: &str) -> ItemStack {
    ItemStack::new(format!("{name}_comb"), 1)
}

/// Forest, Meadows and their first two mutation tiers.
pub fn register_base_species(registry: &mut RegistryBuilder) -> Result<()> {
    SpeciesBuilder::new("species_forest")
        .dominant(true)
        .always_visible(true)
        .product(comb("honey"), 0.3)
        .register(registry)?;
    SpeciesBuilder::new("species_meadows")
        .dominant(true)
        .always_visible(true)
        .product(comb("honey"), 0.3)
        .allele(ChromosomeType::Plant, "plant_oxeye_daisy")
        .register(registry)?;
    SpeciesBuilder::new("species_common")
        .product(comb("honey"), 0.35)
        .mutation("species_forest", "species_meadows", 0.15)
        .register(registry)?;
    SpeciesBuilder::new("species_cultivated")
        .product(comb("honey"), 0.4)
        .allele(ChromosomeType::Productivity, "productivity_high")
        .allele(ChromosomeType::Lifespan, "lifespan_short")
        .mutation("species_common", "species_forest", 0.12)
        .mutation("species_common", "species_meadows", 0.12)
        .register(registry)?;
    Ok(())
}

/// A registry holding the standard alleles and base species, ready to
/// extend or freeze.
pub fn standard_registry() -> Result<RegistryBuilder> {
    let mut registry = RegistryBuilder::new();
    register_standard_alleles(&mut registry)?;
    register_base_species(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_builds() {
        let genetics = standard_registry().unwrap().build().unwrap();
        let catalog = genetics.catalog();
        assert_eq!(catalog.len(ChromosomeType::Productivity), 5);
        assert_eq!(catalog.len(ChromosomeType::Plant), 11);
        assert_eq!(catalog.all_species().len(), 4);
        assert_eq!(genetics.mutations().len(), 3);
        assert_eq!(
            catalog.uids(ChromosomeType::Fertility),
            vec!["fertility_low", "fertility_normal", "fertility_high", "fertility_very_high"]
        );
    }

    #[test]
    fn test_default_template_fills_species() {
        let genetics = standard_registry().unwrap().build().unwrap();
        let forest = genetics.template_genome("species_forest").unwrap();
        assert_eq!(forest.expressed(ChromosomeType::Plant).uid(), "plant_none");
        assert_eq!(forest.expressed_scalar(ChromosomeType::Fertility), Some(2.0));
        let cultivated = genetics.template_genome("species_cultivated").unwrap();
        assert_eq!(
            cultivated.expressed(ChromosomeType::Productivity).uid(),
            "productivity_high"
        );
    }
}
