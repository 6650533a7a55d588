use std::collections::HashMap;

use crate::descriptor::LibraryDescriptor;
use crate::error::CatalogError;
use crate::name::LibraryName;

/// Validated set of library descriptors, keyed by name.
///
/// Declaration order is preserved so that "load everything" requests are
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<LibraryName, LibraryDescriptor>,
    order: Vec<LibraryName>,
}

impl Catalog {
    /// Build a catalog, rejecting empty names, self-dependencies and
    /// libraries declared twice.
    ///
    /// Dependencies that are not themselves declared are accepted here; they
    /// surface as unknown libraries only if a load request reaches them.
    pub fn new<I>(descriptors: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = LibraryDescriptor>,
    {
        let mut catalog = Self::default();
        for descriptor in descriptors {
            descriptor.validate()?;
            if catalog.entries.contains_key(&descriptor.name) {
                return Err(CatalogError::DuplicateLibrary(descriptor.name));
            }
            catalog.order.push(descriptor.name.clone());
            catalog.entries.insert(descriptor.name.clone(), descriptor);
        }
        Ok(catalog)
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&LibraryDescriptor> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Declared names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &LibraryName> {
        self.order.iter()
    }

    /// Descriptors, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &LibraryDescriptor> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }
}

// ── CatalogBuilder ────────────────────────────────────────────────────────

/// Fluent construction of a [`Catalog`] in code.
///
/// ```rust
/// use preload_catalog::Catalog;
///
/// let catalog = Catalog::builder()
///     .library("vrcubeworld", ["vrapi"])
///     .leaf("vrapi")
///     .build()
///     .unwrap();
/// assert_eq!(catalog.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    descriptors: Vec<LibraryDescriptor>,
}

impl CatalogBuilder {
    /// Declare a library and its dependencies.
    pub fn library<I, D>(mut self, name: impl Into<LibraryName>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<LibraryName>,
    {
        self.descriptors.push(LibraryDescriptor::with_dependencies(name, dependencies));
        self
    }

    /// Declare a library with no dependencies.
    pub fn leaf(mut self, name: impl Into<LibraryName>) -> Self {
        self.descriptors.push(LibraryDescriptor::new(name));
        self
    }

    pub fn descriptor(mut self, descriptor: LibraryDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        Catalog::new(self.descriptors)
    }
}
