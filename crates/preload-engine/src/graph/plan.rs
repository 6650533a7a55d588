use preload_catalog::LibraryName;

/// One library in a [`LoadPlan`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PlanStep {
    pub name: LibraryName,
    /// The requested library that caused this one to be loaded.
    pub requested_via: LibraryName,
}

/// Dependency-respecting load order for one request.
///
/// Every library appears after all of the libraries it depends on. Built by
/// the planner and never modified afterwards.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LoadPlan {
    steps: Vec<PlanStep>,
}

impl LoadPlan {
    pub(crate) fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn names(&self) -> impl Iterator<Item = &LibraryName> {
        self.steps.iter().map(|step| &step.name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.name.as_str() == name)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
