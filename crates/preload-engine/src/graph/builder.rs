use std::collections::{HashMap, VecDeque};

use log::debug;
use preload_catalog::{Catalog, LibraryName};

use crate::error::LoadFailure;

/// The part of a catalog reachable from one load request.
///
/// Edges point from a library to the libraries it depends on. Dependency
/// lists are de-duplicated and keep their declared order, which the planner
/// relies on for deterministic output.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    roots: Vec<LibraryName>,
    nodes: Vec<LibraryName>,
    edges: HashMap<LibraryName, Vec<LibraryName>>,
    /// Root whose closure reached each node first. Roots map to themselves.
    origins: HashMap<LibraryName, LibraryName>,
}

impl DependencyGraph {
    /// Reachability closure of `requested` over `catalog`.
    ///
    /// Repeated request names are ignored after their first appearance.
    /// Fails on the first name, requested or reached, that the catalog does
    /// not declare.
    pub fn build<N: AsRef<str>>(requested: &[N], catalog: &Catalog) -> Result<Self, LoadFailure> {
        let mut graph = Self::default();

        for name in requested {
            let root = LibraryName::from(name.as_ref());
            if graph.origins.contains_key(&root) {
                continue;
            }
            if !catalog.contains(root.as_str()) {
                return Err(LoadFailure::UnknownLibrary(root));
            }
            graph.roots.push(root.clone());
            graph.nodes.push(root.clone());
            graph.origins.insert(root.clone(), root);
        }

        let roots = graph.roots.clone();
        for root in &roots {
            graph.close_over(root, catalog)?;
        }

        debug!(
            "dependency graph: {} root(s), {} librar{}",
            graph.roots.len(),
            graph.nodes.len(),
            if graph.nodes.len() == 1 { "y" } else { "ies" },
        );
        Ok(graph)
    }

    fn close_over(&mut self, root: &LibraryName, catalog: &Catalog) -> Result<(), LoadFailure> {
        let mut queue = VecDeque::from([root.clone()]);

        while let Some(current) = queue.pop_front() {
            if self.edges.contains_key(&current) {
                continue;
            }
            let Some(descriptor) = catalog.get(current.as_str()) else {
                debug!("'{current}' is required under '{root}' but not declared");
                return Err(LoadFailure::UnknownLibrary(current));
            };

            let deps: Vec<LibraryName> = descriptor.unique_dependencies().into_iter().cloned().collect();
            for dep in &deps {
                if !self.origins.contains_key(dep) {
                    self.nodes.push(dep.clone());
                    self.origins.insert(dep.clone(), root.clone());
                }
                if !self.edges.contains_key(dep) {
                    queue.push_back(dep.clone());
                }
            }
            self.edges.insert(current, deps);
        }
        Ok(())
    }

    /// Requested names, de-duplicated, in request order.
    pub fn roots(&self) -> &[LibraryName] {
        &self.roots
    }

    /// Every library in the graph, in discovery order.
    pub fn nodes(&self) -> &[LibraryName] {
        &self.nodes
    }

    pub fn dependencies(&self, name: &str) -> &[LibraryName] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The requested root that pulled `name` into this graph.
    pub fn origin(&self, name: &str) -> Option<&LibraryName> {
        self.origins.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.origins.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
