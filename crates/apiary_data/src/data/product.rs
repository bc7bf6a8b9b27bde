use super::item::ItemStack;
use serde::{Deserialize, Serialize};

/// One line of a species' product table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    /// Item template; the dropped amount replaces its stack size.
    pub item: ItemStack,
    /// Chance of the drop per breeding, in (0, 1].
    pub chance: f64,
    /// Minimum dropped amount (inclusive).
    pub min_count: u32,
    /// Maximum dropped amount (inclusive).
    pub max_count: u32,
}

impl ProductEntry {
    pub fn new(item: ItemStack, chance: f64, min_count: u32, max_count: u32) -> Self {
        Self {
            item,
            chance,
            min_count,
            max_count,
        }
    }

    /// A single guaranteed-size entry (`min == max == 1`).
    pub fn single(item: ItemStack, chance: f64) -> Self {
        Self::new(item, chance, 1, 1)
    }
}
