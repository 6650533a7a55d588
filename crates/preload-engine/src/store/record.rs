use preload_catalog::LibraryName;

use crate::error::NativeError;

/// Observable state of one library in the store.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoadState {
    NotAttempted,
    /// One caller owns the platform load; others wait for it.
    InProgress,
    Loaded,
    Failed,
}

/// Terminal result of the single platform load of a library.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LoadOutcome {
    Loaded,
    Failed(NativeError),
}

impl LoadOutcome {
    pub const fn state(&self) -> LoadState {
        match self {
            Self::Loaded => LoadState::Loaded,
            Self::Failed(_) => LoadState::Failed,
        }
    }

    pub const fn error(&self) -> Option<&NativeError> {
        match self {
            Self::Loaded => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// Point-in-time copy of a store entry.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LoadRecord {
    pub name: LibraryName,
    pub state: LoadState,
    pub error: Option<NativeError>,
}

/// Internal per-name slot. Moves forward only: a settled slot never changes.
#[derive(Debug, Clone)]
pub(super) enum Slot {
    NotAttempted,
    InProgress,
    Settled(LoadOutcome),
}

impl Slot {
    pub(super) fn to_record(&self, name: &LibraryName) -> LoadRecord {
        let (state, error) = match self {
            Self::NotAttempted => (LoadState::NotAttempted, None),
            Self::InProgress => (LoadState::InProgress, None),
            Self::Settled(outcome) => (outcome.state(), outcome.error().cloned()),
        };
        LoadRecord { name: name.clone(), state, error }
    }
}
