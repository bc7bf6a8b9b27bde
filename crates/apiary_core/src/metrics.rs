//! Breeding metrics and logging setup.
//!
//! Counters are plain atomics so a `Metrics` can be shared behind an `Arc`
//! by every caller context without locking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// How many breedings between summary log lines.
const SUMMARY_INTERVAL: u64 = 1000;

pub struct Metrics {
    breedings: AtomicU64,
    mutations: AtomicU64,
    products: AtomicU64,
    discoveries: AtomicU64,
    corrupt_records: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            breedings: AtomicU64::new(0),
            mutations: AtomicU64::new(0),
            products: AtomicU64::new(0),
            discoveries: AtomicU64::new(0),
            corrupt_records: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records one finished breeding.
    pub fn record_breeding(&self, mutated: bool, product_units: u64) {
        let total = self.breedings.fetch_add(1, Ordering::Relaxed) + 1;
        if mutated {
            self.mutations.fetch_add(1, Ordering::Relaxed);
        }
        self.products.fetch_add(product_units, Ordering::Relaxed);

        if total % SUMMARY_INTERVAL == 0 {
            tracing::info!(
                breedings = total,
                mutations = self.mutation_count(),
                products = self.product_count(),
                elapsed_ms = self.elapsed().as_millis() as u64,
                "Breeding summary"
            );
        }
    }

    pub fn record_discovery(&self) {
        self.discoveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_corrupt_record(&self) {
        self.corrupt_records.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn breeding_count(&self) -> u64 {
        self.breedings.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn mutation_count(&self) -> u64 {
        self.mutations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn product_count(&self) -> u64 {
        self.products.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn discovery_count(&self) -> u64 {
        self.discoveries.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn corrupt_record_count(&self) -> u64 {
        self.corrupt_records.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` wins over `level`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
