//! Manifest construction.
//!
//! [`ManifestBuilder`] owns the registry for a build session and drives the
//! resolver and sorter whenever a manifest is requested.

pub mod manifest;

pub use manifest::ManifestBuilder;
