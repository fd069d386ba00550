//! Test utilities for unit tests.
//!
//! Helpers here build units from plain string slices so tests can describe
//! a dependency graph in a line or two.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{ids, registry_of, unit};
//!
//! let a = unit("a.js", &["a"], &[]);
//! let b = unit("b.js", &["b"], &["a"]);
//! let registry = registry_of(&[a.clone(), b.clone()]);
//! ```

pub mod fixtures;

use crate::core::{NamespaceRegistry, SourceUnit};

pub use fixtures::*;

/// An ordinary unit with no content.
pub fn unit(id: &str, provides: &[&str], requires: &[&str]) -> SourceUnit {
    SourceUnit::new(id, provides.iter().copied(), requires.iter().copied())
}

/// A unit that provides nothing.
pub fn moocher(id: &str, requires: &[&str]) -> SourceUnit {
    unit(id, &[], requires)
}

/// The runtime base, providing the default root namespace.
pub fn runtime_base(id: &str) -> SourceUnit {
    SourceUnit::runtime_base(id, "var goog = goog || {}; // Identifies this file as the Closure base.")
}

/// Register `units` in order, panicking on duplicates.
pub fn registry_of(units: &[SourceUnit]) -> NamespaceRegistry {
    NamespaceRegistry::from_units(units).expect("test units must not share provides")
}

/// Unit identities, for compact assertions.
pub fn ids(units: &[SourceUnit]) -> Vec<&str> {
    units.iter().map(|u| u.id()).collect()
}
