//! Core data structures.
//!
//! - Interned namespace names
//! - Source units and their provide/require declarations
//! - The namespace registry

pub mod namespace;
pub mod registry;
pub mod source_unit;

pub use namespace::{Namespace, DEFAULT_ROOT_NAMESPACE};
pub use registry::NamespaceRegistry;
pub use source_unit::{SourceUnit, SourceUnitBuilder};
