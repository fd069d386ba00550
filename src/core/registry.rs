//! NamespaceRegistry - which unit provides which namespace.
//!
//! The registry is a flat lookup table. It has no notion of ordering or
//! graph edges; the dependency view is derived from it on demand by
//! [`crate::resolver::DependencyGraph`].

use std::collections::HashMap;

use crate::core::{Namespace, SourceUnit};
use crate::resolver::ManifestError;

/// Mapping from namespace to the single unit providing it.
///
/// Grows monotonically for the lifetime of a build session.
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    provide_to_unit: HashMap<Namespace, SourceUnit>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        NamespaceRegistry {
            provide_to_unit: HashMap::new(),
        }
    }

    /// Build a registry from `units`, failing on the first duplicate.
    pub fn from_units<'a>(
        units: impl IntoIterator<Item = &'a SourceUnit>,
    ) -> Result<Self, ManifestError> {
        let mut registry = NamespaceRegistry::new();
        for unit in units {
            registry.register(unit)?;
        }
        Ok(registry)
    }

    /// Record every namespace `unit` provides.
    ///
    /// Re-registering the same unit is a no-op. If another unit already
    /// provides one of the namespaces, the namespaces registered before it
    /// stay in place and the session should be abandoned.
    pub fn register(&mut self, unit: &SourceUnit) -> Result<(), ManifestError> {
        for namespace in unit.provides() {
            match self.provide_to_unit.get(namespace) {
                Some(existing) if existing != unit => {
                    return Err(ManifestError::DuplicateProvider {
                        namespace: *namespace,
                        first: existing.clone(),
                        second: unit.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    tracing::trace!("namespace `{}` provided by {}", namespace, unit);
                    self.provide_to_unit.insert(*namespace, unit.clone());
                }
            }
        }
        Ok(())
    }

    /// Register all `units`, collecting every conflict instead of stopping
    /// at the first one.
    pub fn register_all_collecting<'a>(
        &mut self,
        units: impl IntoIterator<Item = &'a SourceUnit>,
    ) -> Result<(), Vec<ManifestError>> {
        let mut conflicts = Vec::new();

        for unit in units {
            for namespace in unit.provides() {
                match self.provide_to_unit.get(namespace) {
                    Some(existing) if existing != unit => {
                        conflicts.push(ManifestError::DuplicateProvider {
                            namespace: *namespace,
                            first: existing.clone(),
                            second: unit.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        self.provide_to_unit.insert(*namespace, unit.clone());
                    }
                }
            }
        }

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(conflicts)
        }
    }

    /// The unit providing `namespace`, if any.
    pub fn resolve(&self, namespace: &str) -> Option<&SourceUnit> {
        self.provide_to_unit.get(namespace)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.provide_to_unit.contains_key(namespace)
    }

    pub fn len(&self) -> usize {
        self.provide_to_unit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provide_to_unit.is_empty()
    }

    /// All registered namespaces, sorted by name.
    pub fn namespaces(&self) -> Vec<Namespace> {
        let mut namespaces: Vec<_> = self.provide_to_unit.keys().copied().collect();
        namespaces.sort();
        namespaces
    }
}
