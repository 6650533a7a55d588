//! Process-wide record of which libraries were loaded, and how that went.
//!
//! The dynamic linker loads a library at most once per process and remembers
//! failures. The store mirrors that at this layer so a failed library is
//! reported to every later requester instead of being handed to the linker
//! again.
//!
//! All mutation goes through [`LoadRecordStore::begin_attempt`] and
//! [`LoadRecordStore::complete`]: exactly one caller wins the attempt for a
//! name; everyone else waits for the record to settle and reads the result.

mod record;

use std::collections::HashMap;
use std::sync::Arc;

use log::{error, trace};
use parking_lot::{Condvar, Mutex};
use preload_catalog::LibraryName;
use state::InitCell;

use crate::error::LoadFailure;
use record::Slot;

pub use record::{LoadOutcome, LoadRecord, LoadState};

static GLOBAL: InitCell<Arc<LoadRecordStore>> = InitCell::new();

/// Shared table of [`LoadRecord`]s guarded by a single-writer-per-name protocol.
#[derive(Debug, Default)]
pub struct LoadRecordStore {
    slots: Mutex<HashMap<LibraryName, Slot>>,
    settled: Condvar,
}

impl LoadRecordStore {
    /// An empty, private store. Mostly useful for tests and sandboxes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The store shared by every loader in this process.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    pub fn lookup(&self, name: &str) -> Option<LoadRecord> {
        let slots = self.slots.lock();
        slots.get_key_value(name).map(|(key, slot)| slot.to_record(key))
    }

    /// Create a `NotAttempted` record if the name has never been seen.
    pub fn track(&self, name: &LibraryName) {
        self.slots
            .lock()
            .entry(name.clone())
            .or_insert(Slot::NotAttempted);
    }

    /// Claim the platform load of `name`.
    ///
    /// Returns `true` for exactly one caller per name, and only while the
    /// record is absent or `NotAttempted`. Losers must call
    /// [`wait_terminal`](Self::wait_terminal).
    pub fn begin_attempt(&self, name: &LibraryName) -> bool {
        let mut slots = self.slots.lock();
        let slot = slots.entry(name.clone()).or_insert(Slot::NotAttempted);
        if matches!(slot, Slot::NotAttempted) {
            *slot = Slot::InProgress;
            trace!("attempt on '{name}' claimed");
            true
        } else {
            false
        }
    }

    /// Record the terminal outcome for `name` and wake all waiters.
    ///
    /// Completing twice with the same outcome is a no-op; a different outcome
    /// is an invariant violation.
    pub fn complete(&self, name: &LibraryName, outcome: LoadOutcome) -> Result<(), LoadFailure> {
        let mut slots = self.slots.lock();
        if let Some(Slot::Settled(existing)) = slots.get(name) {
            if *existing == outcome {
                return Ok(());
            }
            error!("library '{name}' settled as {existing:?}, refusing to overwrite with {outcome:?}");
            return Err(LoadFailure::InconsistentLoadRecord(name.clone()));
        }

        slots.insert(name.clone(), Slot::Settled(outcome));
        drop(slots);
        self.settled.notify_all();
        Ok(())
    }

    /// Block until `name` settles and return its outcome.
    ///
    /// Returns `None` without blocking when nobody holds the attempt, since
    /// waiting then could never end.
    pub fn wait_terminal(&self, name: &LibraryName) -> Option<LoadOutcome> {
        let mut slots = self.slots.lock();
        loop {
            match slots.get(name) {
                Some(Slot::Settled(outcome)) => return Some(outcome.clone()),
                Some(Slot::InProgress) => self.settled.wait(&mut slots),
                Some(Slot::NotAttempted) | None => return None,
            }
        }
    }

    /// Every record, sorted by name.
    pub fn snapshot(&self) -> Vec<LoadRecord> {
        let slots = self.slots.lock();
        let mut records: Vec<LoadRecord> = slots
            .iter()
            .map(|(name, slot)| slot.to_record(name))
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }
}
