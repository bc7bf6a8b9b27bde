use anyhow::{Context, Result};
use apiary_core::{
    BreedingEngine, BreedingService, DiscoveryLedger, EngineConfig, Genetics, Metrics,
    RegistryBuilder,
};
use apiary_io::LedgerPersistence;
use std::path::Path;
use std::sync::Arc;

/// A frozen registry with its discovery ledger, metrics and breeding
/// service, wired from one [`EngineConfig`].
pub struct Apiary {
    pub config: EngineConfig,
    genetics: Arc<Genetics>,
    service: BreedingService,
}

impl Apiary {
    /// Freezes `registry` and builds the runtime around it.
    pub fn new(config: EngineConfig, registry: RegistryBuilder) -> Result<Self> {
        config.validate()?;
        let genetics = Arc::new(registry.build()?);
        let ledger = Arc::new(DiscoveryLedger::new(
            config.discovery.broadcast_first_discovery,
        ));
        let engine = BreedingEngine::new(Arc::clone(&genetics), config.breeding.clone());
        let service = BreedingService::new(engine, ledger, Arc::new(Metrics::new()));

        tracing::info!(
            species = genetics.catalog().all_species().len(),
            fingerprint = %config.fingerprint(),
            "Apiary ready"
        );
        Ok(Self {
            config,
            genetics,
            service,
        })
    }

    /// Standard alleles and base species.
    pub fn standard(config: EngineConfig) -> Result<Self> {
        Self::new(config, apiary_core::setup::standard_registry()?)
    }

    /// Standard alleles plus the species in a TOML data file.
    pub fn from_species_file(config: EngineConfig, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let registry = apiary_io::load_registry(path)
            .with_context(|| format!("loading species from {}", path.display()))?;
        Self::new(config, registry)
    }

    #[must_use]
    pub fn genetics(&self) -> &Arc<Genetics> {
        &self.genetics
    }

    #[must_use]
    pub fn service(&self) -> &BreedingService {
        &self.service
    }

    #[must_use]
    pub fn ledger(&self) -> &Arc<DiscoveryLedger> {
        self.service.ledger()
    }

    #[must_use]
    pub fn metrics(&self) -> &Arc<Metrics> {
        self.service.metrics()
    }

    /// Loads the ledger from the configured path. Returns the player count.
    pub fn load_ledger(&self) -> Result<usize> {
        let known = self.genetics.catalog().all_species();
        let players = self.ledger().load(
            &self.config.discovery.ledger_path,
            known.iter().map(|s| s.uid()),
        )?;
        Ok(players)
    }

    pub fn save_ledger(&self) -> Result<()> {
        self.ledger().save(&self.config.discovery.ledger_path)?;
        Ok(())
    }
}
