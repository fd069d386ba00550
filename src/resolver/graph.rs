//! DependencyGraph - the derived `unit -> direct dependencies` view.
//!
//! The graph is computed from each unit's requires and the registry. Node
//! `i` is always the `i`-th unit of the slice it was built from, so node
//! indices double as the original-order stability key.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::{NamespaceRegistry, SourceUnit};
use crate::resolver::ManifestError;

/// What to do with a required namespace nobody provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Fail with [`ManifestError::MissingDependency`].
    #[default]
    Fail,
    /// Drop the edge and carry on.
    Ignore,
}

/// Direct dependency edges between a fixed, ordered set of units.
///
/// An edge `a -> b` means `a` requires a namespace provided by `b`.
/// Self-requires produce no edge, and parallel edges are collapsed.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    units: Vec<SourceUnit>,
    graph: DiGraph<usize, ()>,
}

impl DependencyGraph {
    /// Build the graph over `units`.
    ///
    /// Providers that exist but are not part of `units` contribute no edge.
    pub fn build(
        units: &[SourceUnit],
        registry: &NamespaceRegistry,
        missing: MissingPolicy,
    ) -> Result<Self, ManifestError> {
        let mut graph = DiGraph::with_capacity(units.len(), units.len());
        let mut positions: HashMap<&SourceUnit, NodeIndex> = HashMap::with_capacity(units.len());

        for (i, unit) in units.iter().enumerate() {
            let node = graph.add_node(i);
            positions.insert(unit, node);
        }

        for (i, unit) in units.iter().enumerate() {
            let from = NodeIndex::new(i);
            for namespace in unit.requires() {
                match registry.resolve(namespace) {
                    Some(dep) if dep == unit => {}
                    Some(dep) => match positions.get(dep) {
                        Some(&to) => {
                            if !graph.contains_edge(from, to) {
                                graph.add_edge(from, to, ());
                            }
                        }
                        None => {
                            tracing::trace!(
                                "{} requires `{}` from {}, which is outside the working set",
                                unit,
                                namespace,
                                dep
                            );
                        }
                    },
                    None => match missing {
                        MissingPolicy::Fail => {
                            return Err(ManifestError::MissingDependency {
                                namespace: *namespace,
                                required_by: unit.clone(),
                            });
                        }
                        MissingPolicy::Ignore => {
                            tracing::warn!(
                                "ignoring missing namespace `{}` required by {}",
                                namespace,
                                unit
                            );
                        }
                    },
                }
            }
        }

        Ok(DependencyGraph {
            units: units.to_vec(),
            graph,
        })
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> &SourceUnit {
        &self.units[index]
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of direct dependencies of unit `index`.
    pub fn dependency_count(&self, index: usize) -> usize {
        self.graph
            .neighbors_directed(NodeIndex::new(index), Direction::Outgoing)
            .count()
    }

    /// Direct dependencies of unit `index`, in original order.
    pub fn dependencies(&self, index: usize) -> Vec<usize> {
        self.neighbors(index, Direction::Outgoing)
    }

    /// Units directly depending on unit `index`, in original order.
    pub fn dependents(&self, index: usize) -> Vec<usize> {
        self.neighbors(index, Direction::Incoming)
    }

    fn neighbors(&self, index: usize, direction: Direction) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(index), direction)
            .map(|n| self.graph[n])
            .collect();
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ErrorKind;
    use crate::test_support::{registry_of, unit};

    #[test]
    fn test_edges_follow_requires() {
        let base = unit("base.js", &["goog"], &[]);
        let a = unit("a.js", &["a"], &["goog"]);
        let b = unit("b.js", &["b"], &["a", "goog", "a"]);
        let units = vec![base, a, b];
        let registry = registry_of(&units);

        let graph = DependencyGraph::build(&units, &registry, MissingPolicy::Fail).unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.dependencies(2), vec![0, 1]);
        assert_eq!(graph.dependents(0), vec![1, 2]);
        assert_eq!(graph.dependency_count(0), 0);
    }

    #[test]
    fn test_self_require_is_not_an_edge() {
        let a = unit("a.js", &["a", "a.impl"], &["a.impl"]);
        let units = vec![a];
        let registry = registry_of(&units);

        let graph = DependencyGraph::build(&units, &registry, MissingPolicy::Fail).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_missing_policy() {
        let a = unit("a.js", &["a"], &["nowhere"]);
        let units = vec![a];
        let registry = registry_of(&units);

        let err = DependencyGraph::build(&units, &registry, MissingPolicy::Fail).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);

        let graph = DependencyGraph::build(&units, &registry, MissingPolicy::Ignore).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_provider_outside_working_set() {
        let a = unit("a.js", &["a"], &[]);
        let b = unit("b.js", &["b"], &["a"]);
        let registry = registry_of(&[a, b.clone()]);

        let graph = DependencyGraph::build(&[b], &registry, MissingPolicy::Fail).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }
}
