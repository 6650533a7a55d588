use std::collections::HashMap;

use log::{debug, warn};
use preload_catalog::{CyclePolicy, LibraryName};

use super::builder::DependencyGraph;
use super::plan::{LoadPlan, PlanStep};
use crate::error::LoadFailure;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Order `graph` so that dependencies load first, refusing cycles.
pub fn plan(graph: &DependencyGraph) -> Result<LoadPlan, LoadFailure> {
    plan_with(graph, CyclePolicy::Refuse)
}

/// Order `graph` so that dependencies load first.
///
/// Depth-first, post-order. Roots are visited in request order and each
/// library's dependencies in declared order, so identical inputs always
/// give the identical plan.
///
/// A dependency edge into a library that is still being visited closes a
/// cycle. Under [`CyclePolicy::Refuse`] the request fails with the cycle's
/// members, listed from the library the edge points back to. Under
/// [`CyclePolicy::BreakAtBackEdge`] that one edge is ignored. The traversal
/// is iterative and visits each library once, so it always terminates.
pub fn plan_with(graph: &DependencyGraph, policy: CyclePolicy) -> Result<LoadPlan, LoadFailure> {
    let mut marks: HashMap<&LibraryName, Mark> = HashMap::with_capacity(graph.len());
    let mut order: Vec<&LibraryName> = Vec::with_capacity(graph.len());

    for root in graph.roots() {
        if marks.contains_key(root) {
            continue;
        }

        // (library, index of the next dependency to visit)
        let mut stack: Vec<(&LibraryName, usize)> = vec![(root, 0)];
        marks.insert(root, Mark::Visiting);

        while let Some(&(node, next)) = stack.last() {
            let Some(dep) = graph.dependencies(node.as_str()).get(next) else {
                stack.pop();
                marks.insert(node, Mark::Done);
                order.push(node);
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            match marks.get(dep) {
                Some(Mark::Done) => {}
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|(n, _)| *n == dep).unwrap_or(0);
                    let members: Vec<LibraryName> =
                        stack[start..].iter().map(|(n, _)| (*n).clone()).collect();

                    match policy {
                        CyclePolicy::Refuse => {
                            let failure = LoadFailure::CyclicDependency(members);
                            warn!("{failure}");
                            return Err(failure);
                        }
                        CyclePolicy::BreakAtBackEdge => {
                            warn!("ignoring dependency '{node}' -> '{dep}' to break a cycle of {}", members.len());
                        }
                    }
                }
                None => {
                    marks.insert(dep, Mark::Visiting);
                    stack.push((dep, 0));
                }
            }
        }
    }

    let steps: Vec<PlanStep> = order
        .into_iter()
        .map(|name| PlanStep {
            name: name.clone(),
            requested_via: graph.origin(name.as_str()).unwrap_or(name).clone(),
        })
        .collect();

    debug!(
        "load plan: [{}]",
        steps.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", ")
    );
    Ok(LoadPlan::new(steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use preload_catalog::Catalog;

    fn order(plan: &LoadPlan) -> Vec<&str> {
        plan.names().map(LibraryName::as_str).collect()
    }

    fn graph(catalog: &Catalog, requested: &[&str]) -> DependencyGraph {
        DependencyGraph::build(requested, catalog).unwrap()
    }

    fn assert_topological(plan: &LoadPlan, g: &DependencyGraph) {
        for step in plan.steps() {
            let at = plan.position(step.name.as_str()).unwrap();
            for dep in g.dependencies(step.name.as_str()) {
                assert!(plan.position(dep.as_str()).unwrap() < at, "{dep} must precede {}", step.name);
            }
        }
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn shared_dependency_loads_first() {
        let catalog = Catalog::builder()
            .library("A", ["B", "C"])
            .leaf("B")
            .library("C", ["B"])
            .build()
            .unwrap();
        let plan = plan(&graph(&catalog, &["A"])).unwrap();
        assert_eq!(order(&plan), ["B", "C", "A"]);
    }

    #[test]
    fn ties_follow_request_then_declaration_order() {
        let catalog = Catalog::builder()
            .library("app", ["net", "gfx", "audio"])
            .leaf("net")
            .leaf("gfx")
            .leaf("audio")
            .leaf("tools")
            .build()
            .unwrap();
        let plan = plan(&graph(&catalog, &["tools", "app"])).unwrap();
        assert_eq!(order(&plan), ["tools", "net", "gfx", "audio", "app"]);
    }

    #[test]
    fn diamond_is_topological_and_repeatable() {
        let catalog = Catalog::builder()
            .library("main", ["a", "b"])
            .library("a", ["common"])
            .library("b", ["common"])
            .leaf("common")
            .build()
            .unwrap();
        let g = graph(&catalog, &["main"]);
        let first = plan(&g).unwrap();
        assert_topological(&first, &g);
        for _ in 0..10 {
            assert_eq!(plan(&g).unwrap(), first);
        }
    }

    #[test]
    fn requested_via_names_the_root() {
        let catalog = Catalog::builder()
            .library("vrcubeworld", ["vrapi"])
            .leaf("vrapi")
            .build()
            .unwrap();
        let plan = plan(&graph(&catalog, &["vrcubeworld"])).unwrap();
        assert_eq!(plan.steps()[0].name.as_str(), "vrapi");
        assert_eq!(plan.steps()[0].requested_via.as_str(), "vrcubeworld");
        assert_eq!(plan.steps()[1].requested_via.as_str(), "vrcubeworld");
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let depth = 10_000;
        let mut builder = Catalog::builder();
        for i in 0..depth {
            builder = builder.library(format!("lib{i}"), [format!("lib{}", i + 1)]);
        }
        let catalog = builder.leaf(format!("lib{depth}")).build().unwrap();

        let plan = plan(&graph(&catalog, &["lib0"])).unwrap();
        assert_eq!(plan.len(), depth + 1);
        assert_eq!(plan.names().next().unwrap().to_string(), format!("lib{depth}"));
    }

    // ── cycles ────────────────────────────────────────────────────────────

    #[test]
    fn two_cycle_is_refused() {
        let catalog = Catalog::builder()
            .library("X", ["Y"])
            .library("Y", ["X"])
            .build()
            .unwrap();
        let err = plan(&graph(&catalog, &["X"])).unwrap_err();
        assert_eq!(err, LoadFailure::CyclicDependency(vec!["X".into(), "Y".into()]));
    }

    #[test]
    fn cycle_is_reported_from_the_back_edge_target() {
        let catalog = Catalog::builder()
            .library("app", ["a"])
            .library("a", ["b"])
            .library("b", ["c"])
            .library("c", ["a"])
            .build()
            .unwrap();
        let err = plan(&graph(&catalog, &["app"])).unwrap_err();
        assert_eq!(
            err,
            LoadFailure::CyclicDependency(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn repeated_planning_of_a_cycle_is_stable() {
        let catalog = Catalog::builder()
            .library("X", ["Y"])
            .library("Y", ["X"])
            .build()
            .unwrap();
        let g = graph(&catalog, &["Y"]);
        for _ in 0..5 {
            assert_eq!(
                plan(&g).unwrap_err(),
                LoadFailure::CyclicDependency(vec!["Y".into(), "X".into()])
            );
        }
    }

    #[test]
    fn break_at_back_edge_loads_in_discovery_order() {
        let catalog = Catalog::builder()
            .library("app", ["a"])
            .library("a", ["b"])
            .library("b", ["a", "base"])
            .leaf("base")
            .build()
            .unwrap();
        let plan = plan_with(&graph(&catalog, &["app"]), CyclePolicy::BreakAtBackEdge).unwrap();
        assert_eq!(order(&plan), ["base", "b", "a", "app"]);
    }
}
