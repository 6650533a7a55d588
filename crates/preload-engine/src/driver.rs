//! Walks a [`LoadPlan`], loading each library exactly once.

use std::sync::Arc;

use log::{debug, error, info, trace, warn};
use preload_catalog::LibraryName;

use crate::error::{LoadFailure, NativeError};
use crate::graph::LoadPlan;
use crate::platform::PlatformLoader;
use crate::store::{LoadOutcome, LoadRecordStore, LoadState};

/// Executes load plans against a platform loader and a record store.
#[derive(Clone)]
pub struct Driver {
    store: Arc<LoadRecordStore>,
    platform: Arc<dyn PlatformLoader>,
}

impl Driver {
    pub fn new(store: Arc<LoadRecordStore>, platform: Arc<dyn PlatformLoader>) -> Self {
        Self { store, platform }
    }

    pub fn store(&self) -> &Arc<LoadRecordStore> {
        &self.store
    }

    /// Load every library in `plan`, in order.
    ///
    /// Loaded libraries are skipped. The first failure stops the walk:
    /// libraries after it are never handed to the platform. A library is
    /// only attempted once everything before it in the plan is loaded.
    pub fn load(&self, plan: &LoadPlan) -> Result<(), LoadFailure> {
        for step in plan.steps() {
            self.load_one(&step.name, &step.requested_via)?;
        }
        debug!("load plan of {} step(s) complete", plan.len());
        Ok(())
    }

    fn load_one(&self, name: &LibraryName, requested_via: &LibraryName) -> Result<(), LoadFailure> {
        self.store.track(name);

        match self.store.lookup(name.as_str()).map(|record| record.state) {
            Some(LoadState::Loaded) => {
                trace!("'{name}' already loaded");
                return Ok(());
            }
            Some(LoadState::Failed) => {
                warn!("'{name}' failed earlier; not retrying for '{requested_via}'");
                return Err(LoadFailure::DependencyAlreadyFailed {
                    failed: name.clone(),
                    requested_via: requested_via.clone(),
                });
            }
            _ => {}
        }

        loop {
            if self.store.begin_attempt(name) {
                return self.attempt(name);
            }
            // Another caller owns the attempt; share its result.
            match self.store.wait_terminal(name) {
                Some(LoadOutcome::Loaded) => return Ok(()),
                Some(LoadOutcome::Failed(detail)) => {
                    return Err(LoadFailure::NativeLoadFailure { name: name.clone(), detail });
                }
                None => continue,
            }
        }
    }

    fn attempt(&self, name: &LibraryName) -> Result<(), LoadFailure> {
        let pending = PendingAttempt::new(&self.store, name);

        info!("loading native library '{name}'");
        let result = self.platform.load(name);
        let outcome = match &result {
            Ok(()) => LoadOutcome::Loaded,
            Err(detail) => LoadOutcome::Failed(detail.clone()),
        };
        pending.finish(outcome)?;

        match result {
            Ok(()) => {
                info!("native library '{name}' loaded");
                Ok(())
            }
            Err(detail) => {
                error!("native library '{name}' failed to load: {detail}");
                Err(LoadFailure::NativeLoadFailure { name: name.clone(), detail })
            }
        }
    }
}

// ── PendingAttempt ────────────────────────────────────────────────────────

/// Settles a claimed attempt even if the platform call unwinds, so waiters
/// on the same library are never left blocked.
struct PendingAttempt<'a> {
    store: &'a LoadRecordStore,
    name: &'a LibraryName,
    finished: bool,
}

impl<'a> PendingAttempt<'a> {
    fn new(store: &'a LoadRecordStore, name: &'a LibraryName) -> Self {
        Self { store, name, finished: false }
    }

    fn finish(mut self, outcome: LoadOutcome) -> Result<(), LoadFailure> {
        self.finished = true;
        self.store.complete(self.name, outcome)
    }
}

impl Drop for PendingAttempt<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        error!("load of '{}' aborted before completing", self.name);
        // The linker state is unknown after an aborted load; never retry it.
        let aborted = LoadOutcome::Failed(NativeError::new("load attempt aborted"));
        if let Err(err) = self.store.complete(self.name, aborted) {
            error!("{err}");
        }
    }
}
