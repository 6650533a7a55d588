use std::sync::Arc;

use log::debug;
use preload_catalog::{Catalog, CyclePolicy};

use crate::driver::Driver;
use crate::error::LoadFailure;
use crate::graph::{plan_with, DependencyGraph, LoadPlan};
use crate::platform::PlatformLoader;
use crate::store::{LoadRecord, LoadRecordStore};

/// Entry point for the embedding application.
///
/// Resolves requested libraries against the catalog, orders them, and loads
/// each one at most once per process. Safe to call from many threads and to
/// call again later: already-resolved libraries are answered from the store.
///
/// ```rust
/// use preload_catalog::Catalog;
/// use preload_engine::platform::FnLoader;
/// use preload_engine::store::LoadRecordStore;
/// use preload_engine::Preloader;
/// use std::sync::Arc;
///
/// let catalog = Catalog::builder()
///     .library("vrcubeworld", ["vrapi"])
///     .leaf("vrapi")
///     .build()
///     .unwrap();
///
/// let preloader = Preloader::with_store(
///     catalog,
///     FnLoader::new(|_| Ok(())),
///     Arc::new(LoadRecordStore::new()),
/// );
/// preloader.ensure_loaded(&["vrcubeworld"]).unwrap();
/// ```
pub struct Preloader {
    catalog: Catalog,
    cycle_policy: CyclePolicy,
    driver: Driver,
}

impl Preloader {
    /// A preloader bound to the process-wide record store.
    pub fn new(catalog: Catalog, platform: impl PlatformLoader + 'static) -> Self {
        Self::with_store(catalog, platform, LoadRecordStore::global())
    }

    /// A preloader bound to an explicit record store.
    pub fn with_store(
        catalog: Catalog,
        platform: impl PlatformLoader + 'static,
        store: Arc<LoadRecordStore>,
    ) -> Self {
        Self {
            catalog,
            cycle_policy: CyclePolicy::default(),
            driver: Driver::new(store, Arc::new(platform)),
        }
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<LoadRecordStore> {
        self.driver.store()
    }

    /// Resolve and order `names` without loading anything.
    pub fn plan<N: AsRef<str>>(&self, names: &[N]) -> Result<LoadPlan, LoadFailure> {
        let graph = DependencyGraph::build(names, &self.catalog)?;
        plan_with(&graph, self.cycle_policy)
    }

    /// Make sure `names` and everything they depend on are loaded.
    ///
    /// Unknown libraries and cycles are reported before any load happens.
    pub fn ensure_loaded<N: AsRef<str>>(&self, names: &[N]) -> Result<(), LoadFailure> {
        let plan = self.plan(names)?;
        debug!("ensuring {} plan step(s) are loaded", plan.len());
        self.driver.load(&plan)
    }

    /// Current store record for `name`, if it has been seen.
    pub fn record(&self, name: &str) -> Option<LoadRecord> {
        self.store().lookup(name)
    }
}
