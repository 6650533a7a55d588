//! Dependency resolution for a load request.
//!
//! - [`DependencyGraph`]: closure of the requested libraries over the catalog
//! - [`plan`] / [`plan_with`]: depth-first ordering with cycle detection
//! - [`LoadPlan`]: the resulting load order

mod builder;
mod plan;
mod planner;

pub use builder::DependencyGraph;
pub use plan::{LoadPlan, PlanStep};
pub use planner::{plan, plan_with};
