use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::descriptor::LibraryDescriptor;
use crate::error::CatalogError;

/// What the planner does when the requested libraries contain a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// Fail the request with a cyclic-dependency error before loading anything.
    #[default]
    Refuse,

    /// Drop the edge that closes each cycle and load in discovery order.
    ///
    /// Opt-in only, for hosts whose libraries genuinely declare circular
    /// dependencies and resolve them lazily at symbol-binding time.
    BreakAtBackEdge,
}

/// Loader configuration as supplied by the embedding application.
///
/// ```toml
/// search_paths = ["/data/app/lib/arm64"]
/// cycle_policy = "refuse"
///
/// [[library]]
/// name = "vrcubeworld"
/// dependencies = ["vrapi"]
///
/// [[library]]
/// name = "vrapi"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Directories searched, in order, for library files.
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    #[serde(default)]
    pub cycle_policy: CyclePolicy,

    #[serde(default, rename = "library")]
    pub libraries: Vec<LibraryDescriptor>,
}

impl LoaderConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(src)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    /// Validate the declared libraries into a [`Catalog`].
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::new(self.libraries.iter().cloned())
    }
}
