//! Dependency resolution.
//!
//! This module turns registered units into an ordered manifest: the
//! transitive closure of the entry points, the derived dependency graph,
//! and a stable topological sort over it. Everything here is pure and
//! in-memory; callers hand in already-parsed units.

pub mod closure;
pub mod cycle;
pub mod errors;
pub mod graph;
pub mod sort;

pub use closure::DependencyResolver;
pub use errors::{render_cycle, ErrorKind, ManifestError};
pub use graph::{DependencyGraph, MissingPolicy};
pub use sort::{SortStrategy, TopologicalSorter};
