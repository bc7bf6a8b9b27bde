//! Engine configuration.
//!
//! Maps to `apiary.toml`. Every section and field is optional; missing
//! values fall back to the `Default` impls.
//!
//! ## Example `apiary.toml`
//!
//! ```toml
//! [breeding]
//! duration_multiplier = 1.0
//! max_drones = 4
//! productivity_scaling = true
//!
//! [rng]
//! seed = 42
//! deterministic = true
//!
//! [discovery]
//! broadcast_first_discovery = true
//! ledger_path = "discoveries.json"
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Breeding timing, brood size and product scaling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BreedingConfig {
    /// Global factor on every breeding duration.
    pub duration_multiplier: f64,
    /// Fixed drone count; `None` uses the offspring's expressed fertility.
    pub brood_size: Option<u32>,
    pub max_drones: u32,
    /// Mutation chance modifier when the caller does not pass one.
    pub default_modifier: f64,
    /// Multiply product chances by the expressed productivity.
    pub productivity_scaling: bool,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            duration_multiplier: 1.0,
            brood_size: None,
            max_drones: 4,
            default_modifier: 1.0,
            productivity_scaling: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RngConfig {
    pub seed: Option<u64>,
    pub deterministic: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Log an announcement the first time anyone discovers a species.
    pub broadcast_first_discovery: bool,
    pub ledger_path: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            broadcast_first_discovery: true,
            ledger_path: "discoveries.json".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Root configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub breeding: BreedingConfig,
    pub rng: RngConfig,
    pub discovery: DiscoveryConfig,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.breeding.duration_multiplier.is_finite() && self.breeding.duration_multiplier > 0.0,
            "Duration multiplier must be positive"
        );
        anyhow::ensure!(
            self.breeding.default_modifier.is_finite() && self.breeding.default_modifier >= 0.0,
            "Default mutation modifier must be non-negative"
        );
        anyhow::ensure!(
            self.breeding.max_drones <= 64,
            "Max drones too large (max 64)"
        );
        if let Some(brood) = self.breeding.brood_size {
            anyhow::ensure!(
                brood <= self.breeding.max_drones,
                "Brood size cannot exceed max drones"
            );
        }
        anyhow::ensure!(
            !self.rng.deterministic || self.rng.seed.is_some(),
            "Deterministic mode requires a seed"
        );
        anyhow::ensure!(
            !self.discovery.ledger_path.trim().is_empty(),
            "Ledger path must not be empty"
        );
        anyhow::ensure!(
            matches!(
                self.logging.level.to_lowercase().as_str(),
                "trace" | "debug" | "info" | "warn" | "error"
            ),
            "Unknown log level {}",
            self.logging.level
        );
        Ok(())
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or returns the defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Hash of the settings that change breeding results.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.breeding).as_bytes());
        hasher.update(format!("{:?}", self.rng).as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Seeded in deterministic mode, from entropy otherwise.
    #[must_use]
    pub fn rng(&self) -> ChaCha8Rng {
        match (self.rng.deterministic, self.rng.seed) {
            (true, Some(seed)) => ChaCha8Rng::seed_from_u64(seed),
            _ => ChaCha8Rng::from_entropy(),
        }
    }
}
