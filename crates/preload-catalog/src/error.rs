use std::path::PathBuf;

use thiserror::Error as ThisError;

use crate::name::LibraryName;

/// Errors raised while reading or validating a library catalog.
#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("library name must not be empty")]
    EmptyName,

    #[error("library '{0}' declares an empty dependency name")]
    EmptyDependency(LibraryName),

    #[error("library '{0}' is declared more than once")]
    DuplicateLibrary(LibraryName),

    #[error("library '{0}' lists itself as a dependency")]
    SelfDependency(LibraryName),

    #[error("failed to read catalog config '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed into the expected structure.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
