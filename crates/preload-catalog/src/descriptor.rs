use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::name::LibraryName;

/// A native library and the libraries that must be loaded before it.
///
/// Declared by configuration; nothing is read from binary headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryDescriptor {
    pub name: LibraryName,
    #[serde(default)]
    pub dependencies: Vec<LibraryName>,
}

impl LibraryDescriptor {
    /// A library with no dependencies.
    pub fn new(name: impl Into<LibraryName>) -> Self {
        Self { name: name.into(), dependencies: Vec::new() }
    }

    pub fn with_dependencies<I, D>(name: impl Into<LibraryName>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<LibraryName>,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one dependency.
    pub fn depends_on(mut self, dependency: impl Into<LibraryName>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// Dependencies with repeats removed, in order of first appearance.
    pub fn unique_dependencies(&self) -> Vec<&LibraryName> {
        let mut seen = HashSet::new();
        self.dependencies
            .iter()
            .filter(|dep| seen.insert(*dep))
            .collect()
    }

    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        if self.name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        for dep in &self.dependencies {
            if dep.is_empty() {
                return Err(CatalogError::EmptyDependency(self.name.clone()));
            }
            if *dep == self.name {
                return Err(CatalogError::SelfDependency(self.name.clone()));
            }
        }
        Ok(())
    }
}
