//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod hash;

pub use config::ManifestConfig;
pub use diagnostic::Diagnostic;
