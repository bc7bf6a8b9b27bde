//! Alleles: a uid, dominance and one typed payload per kind.

use crate::error::{GeneticsError, Result};
use apiary_data::{AlleleKind, ChromosomeType, ItemStack, Location, Material, ProductEntry};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Side effect run by the Effect slot: `(location, intensity)`.
#[derive(Clone)]
pub struct EffectFunction(Arc<dyn Fn(&Location, u32) + Send + Sync>);

impl EffectFunction {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Location, u32) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// An effect that does nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_, _| {})
    }

    pub fn apply(&self, location: &Location, intensity: u32) {
        (self.0)(location, intensity);
    }
}

impl fmt::Debug for EffectFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EffectFunction(..)")
    }
}

/// Princess and drone items carrying a species' template genome.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesItems {
    pub princess: ItemStack,
    pub drone: ItemStack,
}

/// Extra payload of species alleles.
#[derive(Debug)]
pub struct SpeciesTraits {
    /// Hidden from players until discovered.
    pub secret: bool,
    /// Shown in listings even before discovery.
    pub always_visible: bool,
    /// Base breeding duration before lifespan/fertility scaling.
    pub base_ticks: u32,
    /// Weighted product table.
    pub products: Vec<ProductEntry>,
    items: OnceLock<SpeciesItems>,
}

impl SpeciesTraits {
    pub fn new(secret: bool, always_visible: bool, base_ticks: u32, products: Vec<ProductEntry>) -> Self {
        Self {
            secret,
            always_visible,
            base_ticks,
            products,
            items: OnceLock::new(),
        }
    }

    /// Items are created once the registry is frozen.
    #[must_use]
    pub fn items(&self) -> Option<&SpeciesItems> {
        self.items.get()
    }

    /// Stores the species items; later calls are ignored.
    pub fn set_items(&self, items: SpeciesItems) -> bool {
        self.items.set(items).is_ok()
    }
}

/// The typed payload. One variant per [`AlleleKind`].
#[derive(Debug)]
pub enum AlleleValue {
    Double(f64),
    Integer(i32),
    Plant(Material),
    Effect(EffectFunction),
    Species(SpeciesTraits),
}

impl AlleleValue {
    #[must_use]
    pub fn kind(&self) -> AlleleKind {
        match self {
            AlleleValue::Double(_) => AlleleKind::Double,
            AlleleValue::Integer(_) => AlleleKind::Integer,
            AlleleValue::Plant(_) => AlleleKind::Plant,
            AlleleValue::Effect(_) => AlleleKind::Effect,
            AlleleValue::Species(_) => AlleleKind::Species,
        }
    }

    /// Numeric value used for sorting and scaling.
    #[must_use]
    pub fn scalar(&self) -> Option<f64> {
        match self {
            AlleleValue::Double(v) => Some(*v),
            AlleleValue::Integer(v) => Some(f64::from(*v)),
            _ => None,
        }
    }
}

/// A registered trait value.
#[derive(Debug)]
pub struct Allele {
    slot: ChromosomeType,
    uid: String,
    name: String,
    display_name: String,
    dominant: bool,
    value: AlleleValue,
}

impl Allele {
    /// Builds an allele for `slot`, validating the uid convention. Whether
    /// the payload fits the slot is checked by [`ensure_slot`](Self::ensure_slot).
    pub fn new(
        slot: ChromosomeType,
        uid: impl Into<String>,
        dominant: bool,
        value: AlleleValue,
    ) -> Result<Self> {
        let uid = uid.into();
        if !is_valid_uid(slot, &uid) {
            return Err(GeneticsError::InvalidUid { slot, uid });
        }
        let name = name_from_uid(&uid);
        let display_name = humanize_snake(&name);
        Ok(Self {
            slot,
            uid,
            name,
            display_name,
            dominant,
            value,
        })
    }

    /// The slot this allele was built for.
    #[must_use]
    pub fn slot(&self) -> ChromosomeType {
        self.slot
    }

    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Upper snake name, e.g. `VERY_LOW`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human name, e.g. `Very Low`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn is_dominant(&self) -> bool {
        self.dominant
    }

    #[must_use]
    pub fn value(&self) -> &AlleleValue {
        &self.value
    }

    #[must_use]
    pub fn kind(&self) -> AlleleKind {
        self.value.kind()
    }

    #[must_use]
    pub fn scalar(&self) -> Option<f64> {
        self.value.scalar()
    }

    /// Fails unless the allele was built for `slot` with the slot's kind.
    pub fn ensure_slot(&self, slot: ChromosomeType) -> Result<()> {
        let expected = slot.allele_kind();
        if self.kind() != expected {
            return Err(GeneticsError::TypeMismatch {
                slot,
                uid: self.uid.clone(),
                expected,
                found: self.kind(),
            });
        }
        if self.slot != slot {
            return Err(GeneticsError::SlotMismatch {
                slot,
                uid: self.uid.clone(),
                owner: self.slot,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn species(&self) -> Option<&SpeciesTraits> {
        match &self.value {
            AlleleValue::Species(traits) => Some(traits),
            _ => None,
        }
    }

    #[must_use]
    pub fn effect(&self) -> Option<&EffectFunction> {
        match &self.value {
            AlleleValue::Effect(effect) => Some(effect),
            _ => None,
        }
    }

    #[must_use]
    pub fn plant(&self) -> Option<&Material> {
        match &self.value {
            AlleleValue::Plant(material) => Some(material),
            _ => None,
        }
    }
}

// Identity is the uid within a slot; payloads are not compared.
impl PartialEq for Allele {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid && self.slot == other.slot
    }
}

impl Eq for Allele {}

/// Builds the uid for a lower-case or spaced name, e.g.
/// `uid_for(Productivity, "very low") == "productivity_very_low"`.
#[must_use]
pub fn uid_for(slot: ChromosomeType, name: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!("{}_{}", slot.prefix(), words.join("_"))
}

/// Strips the slot prefix and upper-cases the rest: `species_forest` -> `FOREST`.
#[must_use]
pub fn name_from_uid(uid: &str) -> String {
    uid.split_once('_')
        .map_or(uid, |(_, rest)| rest)
        .to_uppercase()
}

fn humanize_snake(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `<slot prefix>_<word>(_<word>)*`, words of lower-case ASCII letters or digits.
#[must_use]
pub fn is_valid_uid(slot: ChromosomeType, uid: &str) -> bool {
    let Some(rest) = uid
        .strip_prefix(slot.prefix())
        .and_then(|r| r.strip_prefix('_'))
    else {
        return false;
    };
    !rest.is_empty()
        && rest.split('_').all(|word| {
            !word.is_empty()
                && word
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_derived_from_uid() {
        let allele = Allele::new(
            ChromosomeType::Productivity,
            "productivity_very_low",
            false,
            AlleleValue::Double(0.5),
        )
        .unwrap();
        assert_eq!(allele.name(), "VERY_LOW");
        assert_eq!(allele.display_name(), "Very Low");
        assert_eq!(allele.scalar(), Some(0.5));
    }

    #[test]
    fn test_uid_validation() {
        assert!(is_valid_uid(ChromosomeType::Species, "species_forest"));
        assert!(is_valid_uid(ChromosomeType::Species, "species_glow_berry2"));
        assert!(!is_valid_uid(ChromosomeType::Species, "species_"));
        assert!(!is_valid_uid(ChromosomeType::Species, "species_Forest"));
        assert!(!is_valid_uid(ChromosomeType::Species, "species__forest"));
        assert!(!is_valid_uid(ChromosomeType::Plant, "species_forest"));
        assert!(Allele::new(
            ChromosomeType::Range,
            "rangeshort",
            false,
            AlleleValue::Integer(1)
        )
        .is_err());
    }

    #[test]
    fn test_uid_for() {
        assert_eq!(
            uid_for(ChromosomeType::Productivity, "Very Low"),
            "productivity_very_low"
        );
        assert_eq!(uid_for(ChromosomeType::Species, "forest"), "species_forest");
    }

    #[test]
    fn test_equality_ignores_payload() {
        let a = Allele::new(ChromosomeType::Range, "range_short", true, AlleleValue::Integer(1)).unwrap();
        let b = Allele::new(ChromosomeType::Range, "range_short", false, AlleleValue::Integer(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ensure_slot_checks_owner_and_kind() {
        let fertility = Allele::new(
            ChromosomeType::Fertility,
            "fertility_high",
            false,
            AlleleValue::Integer(3),
        )
        .unwrap();
        assert_eq!(fertility.slot(), ChromosomeType::Fertility);
        assert!(fertility.ensure_slot(ChromosomeType::Fertility).is_ok());
        assert_eq!(
            fertility.ensure_slot(ChromosomeType::Lifespan).unwrap_err(),
            GeneticsError::SlotMismatch {
                slot: ChromosomeType::Lifespan,
                uid: "fertility_high".to_string(),
                owner: ChromosomeType::Fertility,
            }
        );
        assert!(matches!(
            fertility.ensure_slot(ChromosomeType::Productivity),
            Err(GeneticsError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_species_items_set_once() {
        let traits = SpeciesTraits::new(false, true, 600, Vec::new());
        let items = SpeciesItems {
            princess: ItemStack::new("forest_princess", 1),
            drone: ItemStack::new("forest_drone", 1),
        };
        assert!(traits.set_items(items.clone()));
        assert!(!traits.set_items(items));
        assert!(traits.items().is_some());
    }
}
