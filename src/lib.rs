//! Closure Manifest - dependency resolution for provide/require source trees
//!
//! Source files declare the namespaces they provide and the namespaces they
//! require. Given the program entry points, this crate computes which files
//! are needed and orders them so every file follows its dependencies,
//! ready to hand to a compiler or concatenator.
//!
//! Parsing source text into provide/require sets happens elsewhere; this
//! crate consumes the resulting [`SourceUnit`]s.

pub mod builder;
pub mod core;
pub mod resolver;
pub mod util;

/// Fixtures shared by the unit tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Namespace, NamespaceRegistry, SourceUnit, SourceUnitBuilder};

pub use builder::ManifestBuilder;
pub use resolver::{
    DependencyGraph, DependencyResolver, ErrorKind, ManifestError, MissingPolicy, SortStrategy,
    TopologicalSorter,
};
pub use util::{Diagnostic, ManifestConfig};
