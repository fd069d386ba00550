//! Stable topological sorting.
//!
//! Both strategies place every unit after all of its dependencies and break
//! ties by original position. They can disagree when several stable orders
//! exist; depth-first is the canonical strategy and the one the manifest
//! builder uses unless configured otherwise.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::core::SourceUnit;
use crate::resolver::cycle::{cycle_from_trail, cycle_in_remainder};
use crate::resolver::{DependencyGraph, ManifestError};

/// Which topological sort to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortStrategy {
    /// Post-order walk visiting units and dependencies in original order.
    #[default]
    DepthFirst,
    /// Queue of ready units, lowest original index first.
    Kahn,
}

/// Orders the units of a [`DependencyGraph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologicalSorter {
    strategy: SortStrategy,
}

impl TopologicalSorter {
    pub fn new(strategy: SortStrategy) -> Self {
        TopologicalSorter { strategy }
    }

    pub fn strategy(&self) -> SortStrategy {
        self.strategy
    }

    /// Sort the graph's units, or report a cycle.
    pub fn sort(&self, graph: &DependencyGraph) -> Result<Vec<SourceUnit>, ManifestError> {
        let order = match self.strategy {
            SortStrategy::DepthFirst => depth_first(graph)?,
            SortStrategy::Kahn => kahn(graph)?,
        };

        tracing::trace!(
            "sorted {} units ({} edges) with {:?}",
            order.len(),
            graph.edge_count(),
            self.strategy
        );

        Ok(order.into_iter().map(|i| graph.unit(i).clone()).collect())
    }
}

fn kahn(graph: &DependencyGraph) -> Result<Vec<usize>, ManifestError> {
    let n = graph.len();
    let mut pending: Vec<usize> = (0..n).map(|i| graph.dependency_count(i)).collect();
    let mut ready: BinaryHeap<Reverse<usize>> = pending
        .iter()
        .enumerate()
        .filter(|(_, &count)| count == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut sorted = Vec::with_capacity(n);
    while let Some(Reverse(index)) = ready.pop() {
        sorted.push(index);
        for dependent in graph.dependents(index) {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if sorted.len() < n {
        let mut emitted = vec![false; n];
        for &index in &sorted {
            emitted[index] = true;
        }
        return Err(cycle_in_remainder(graph, &emitted));
    }

    Ok(sorted)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct Frame {
    node: usize,
    deps: Vec<usize>,
    cursor: usize,
}

impl Frame {
    fn new(graph: &DependencyGraph, node: usize) -> Self {
        Frame {
            node,
            deps: graph.dependencies(node),
            cursor: 0,
        }
    }
}

// Iterative so that long require chains cannot overflow the stack.
fn depth_first(graph: &DependencyGraph) -> Result<Vec<usize>, ManifestError> {
    let n = graph.len();
    let mut marks = vec![Mark::Unvisited; n];
    let mut sorted = Vec::with_capacity(n);

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        let mut stack = vec![Frame::new(graph, root)];

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            let next = frame.deps.get(frame.cursor).copied();

            match next {
                Some(dep) => {
                    frame.cursor += 1;
                    match marks[dep] {
                        Mark::Done => {}
                        Mark::InProgress => {
                            let trail: Vec<usize> = stack.iter().map(|f| f.node).collect();
                            return Err(cycle_from_trail(graph, &trail, dep));
                        }
                        Mark::Unvisited => {
                            marks[dep] = Mark::InProgress;
                            stack.push(Frame::new(graph, dep));
                        }
                    }
                }
                None => {
                    marks[node] = Mark::Done;
                    sorted.push(node);
                    stack.pop();
                }
            }
        }
    }

    Ok(sorted)
}
