use preload_catalog::LibraryName;
use thiserror::Error as ThisError;

/// Failure detail reported by the platform load primitive.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct NativeError {
    pub message: String,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Why a load request did not complete.
///
/// Exactly one value is returned per failed request and it always names the
/// offending library.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum LoadFailure {
    /// Requested, or depended upon, but absent from the catalog.
    #[error("library '{0}' is not declared in the catalog")]
    UnknownLibrary(LibraryName),

    /// Members of the cycle, starting where the back-edge was found.
    #[error("circular dependency: {}", cycle_path(.0))]
    CyclicDependency(Vec<LibraryName>),

    #[error("failed to load native library '{name}': {detail}")]
    NativeLoadFailure {
        name: LibraryName,
        detail: NativeError,
    },

    /// A library this request needs failed in an earlier attempt.
    #[error("library '{failed}' already failed to load (required by '{requested_via}')")]
    DependencyAlreadyFailed {
        failed: LibraryName,
        requested_via: LibraryName,
    },

    /// The same library was recorded with two different outcomes.
    #[error("library '{0}' was recorded with conflicting load outcomes")]
    InconsistentLoadRecord(LibraryName),
}

impl LoadFailure {
    /// The library the failure is about. For cycles, the first member.
    pub fn library(&self) -> Option<&LibraryName> {
        match self {
            Self::UnknownLibrary(name)
            | Self::NativeLoadFailure { name, .. }
            | Self::InconsistentLoadRecord(name) => Some(name),
            Self::DependencyAlreadyFailed { failed, .. } => Some(failed),
            Self::CyclicDependency(members) => members.first(),
        }
    }

    /// Invariant violations are programmer errors, not load conditions.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InconsistentLoadRecord(_))
    }
}

fn cycle_path(members: &[LibraryName]) -> String {
    let mut path: Vec<&str> = members.iter().map(LibraryName::as_str).collect();
    if let Some(first) = members.first() {
        path.push(first.as_str());
    }
    path.join(" -> ")
}
