//! Transitive closure of the entry points.

use std::collections::{HashSet, VecDeque};

use crate::core::{NamespaceRegistry, SourceUnit};
use crate::resolver::{ManifestError, MissingPolicy};

/// Computes which units are reachable from a set of entry points.
pub struct DependencyResolver<'a> {
    registry: &'a NamespaceRegistry,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(registry: &'a NamespaceRegistry) -> Self {
        DependencyResolver { registry }
    }

    /// Breadth-first walk over require edges starting at `entry_units`.
    ///
    /// The result is restricted to, and ordered like, `units_in_order`
    /// (every unit in first-seen order), never traversal order.
    pub fn closure_of<'u>(
        &self,
        entry_units: impl IntoIterator<Item = &'u SourceUnit>,
        units_in_order: &[SourceUnit],
        missing: MissingPolicy,
    ) -> Result<Vec<SourceUnit>, ManifestError> {
        let mut visited: HashSet<SourceUnit> = HashSet::new();
        let mut worklist: VecDeque<SourceUnit> = VecDeque::new();

        for unit in entry_units {
            if visited.insert(unit.clone()) {
                worklist.push_back(unit.clone());
            }
        }
        let entry_count = visited.len();

        while let Some(current) = worklist.pop_front() {
            for namespace in current.requires() {
                match self.registry.resolve(namespace) {
                    Some(dep) => {
                        if dep != &current && visited.insert(dep.clone()) {
                            worklist.push_back(dep.clone());
                        }
                    }
                    None => match missing {
                        MissingPolicy::Fail => {
                            return Err(ManifestError::MissingDependency {
                                namespace: *namespace,
                                required_by: current.clone(),
                            });
                        }
                        MissingPolicy::Ignore => {
                            tracing::debug!(
                                "skipping missing namespace `{}` required by {}",
                                namespace,
                                current
                            );
                        }
                    },
                }
            }
        }

        let closure: Vec<SourceUnit> = units_in_order
            .iter()
            .filter(|unit| visited.contains(*unit))
            .cloned()
            .collect();

        if closure.len() != visited.len() {
            let stray = visited
                .iter()
                .find(|unit| !units_in_order.contains(*unit))
                .map(|unit| unit.id().to_string())
                .unwrap_or_default();
            return Err(ManifestError::invariant(format!(
                "unit `{}` is reachable but was never added",
                stray
            )));
        }

        tracing::debug!(
            "closure of {} entry units: kept {} of {} units",
            entry_count,
            closure.len(),
            units_in_order.len()
        );

        Ok(closure)
    }
}
