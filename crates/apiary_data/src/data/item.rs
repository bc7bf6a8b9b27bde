use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Data key under which an item keeps its genome record.
pub const GENOME_KEY: &str = "apiary:genome";

/// A point in the host world, handed to effect functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }
}

/// Symbolic reference to a host material (plants, products).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Material(pub String);

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host item representation as seen by the engine.
///
/// Display metadata (`display_name`, `lore`) belongs to the presentation
/// layer; the engine only ever reads and replaces entries in `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Host item identifier.
    pub id: String,
    /// Stack size.
    pub amount: u32,
    /// Rendered name.
    pub display_name: String,
    /// Rendered description lines.
    pub lore: Vec<String>,
    /// Opaque persistent data keyed by namespaced strings.
    pub data: BTreeMap<String, Vec<u8>>,
}

impl ItemStack {
    pub fn new(id: impl Into<String>, amount: u32) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            amount,
            lore: Vec::new(),
            data: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        let mut copy = self.clone();
        copy.amount = amount;
        copy
    }

    /// Returns a copy with new display metadata, leaving data untouched.
    #[must_use]
    pub fn with_display(&self, display_name: impl Into<String>, lore: Vec<String>) -> Self {
        let mut copy = self.clone();
        copy.display_name = display_name.into();
        copy.lore = lore;
        copy
    }

    #[must_use]
    pub fn data(&self, key: &str) -> Option<&[u8]> {
        self.data.get(key).map(Vec::as_slice)
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.data.insert(key.into(), value);
    }
}

/// Anything that can carry a persisted genome record.
pub trait GenomeCarrier: Clone {
    /// Raw record bytes, `None` when the item is not genetically tracked.
    fn genome_record(&self) -> Option<&[u8]>;

    /// A copy with the record replaced; every other attribute is kept.
    fn with_genome_record(&self, record: Vec<u8>) -> Self;
}

impl GenomeCarrier for ItemStack {
    fn genome_record(&self) -> Option<&[u8]> {
        self.data(GENOME_KEY)
    }

    fn with_genome_record(&self, record: Vec<u8>) -> Self {
        let mut copy = self.clone();
        copy.set_data(GENOME_KEY, record);
        copy
    }
}
