//! ManifestBuilder - the stateful front end of the resolver.
//!
//! Callers feed units in as entry points ("main" units) or as candidates
//! ("limbo" units that are kept only if something needs them), optionally
//! name namespaces whose providers must become entry points, and then ask
//! for the manifest. The result is cached until the next mutation.

use std::collections::HashMap;

use crate::core::{Namespace, NamespaceRegistry, SourceUnit};
use crate::resolver::{
    DependencyGraph, DependencyResolver, ManifestError, MissingPolicy, SortStrategy,
    TopologicalSorter,
};
use crate::util::hash::short_digest;
use crate::util::ManifestConfig;

/// Where a unit currently stands. A unit has exactly one role, so it can
/// never be both main and in limbo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Main,
    Limbo,
}

/// Builds an ordered manifest from entry points and candidate units.
///
/// Registration errors (duplicate providers) surface immediately and leave
/// the session unusable. Errors from [`ManifestBuilder::to_manifest`] leave
/// the builder exactly as it was, so the caller can fix its inputs and
/// call it again.
#[derive(Debug)]
pub struct ManifestBuilder {
    /// Every unit ever added, in first-seen order.
    all_units: Vec<SourceUnit>,
    positions: HashMap<SourceUnit, usize>,
    /// Parallel to `all_units`.
    roles: Vec<Role>,
    namespace_entry_points: Vec<Namespace>,
    registry: NamespaceRegistry,
    config: ManifestConfig,
    manifest: Option<Vec<SourceUnit>>,
    stale: bool,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::with_config(ManifestConfig::default())
    }

    pub fn with_config(config: ManifestConfig) -> Self {
        ManifestBuilder {
            all_units: Vec::new(),
            positions: HashMap::new(),
            roles: Vec::new(),
            namespace_entry_points: Vec::new(),
            registry: NamespaceRegistry::new(),
            config,
            manifest: None,
            stale: true,
        }
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Add a unit that is a program entry point. It is always kept along
    /// with its transitive dependencies.
    pub fn add_main_unit(&mut self, unit: &SourceUnit) -> Result<&mut Self, ManifestError> {
        match self.positions.get(unit) {
            Some(&index) => {
                if self.roles[index] == Role::Limbo {
                    self.roles[index] = Role::Main;
                    self.stale = true;
                    tracing::debug!("promoted {} from limbo to main", unit);
                }
            }
            None => self.insert_new(unit, Role::Main)?,
        }
        Ok(self)
    }

    pub fn add_main_units<'a>(
        &mut self,
        units: impl IntoIterator<Item = &'a SourceUnit>,
    ) -> Result<&mut Self, ManifestError> {
        for unit in units {
            self.add_main_unit(unit)?;
        }
        Ok(self)
    }

    /// Add a candidate unit. It stays in limbo until something requires it
    /// or a namespace entry point names it; otherwise it is pruned.
    ///
    /// The runtime base is never pruned and goes straight to main.
    pub fn add_unit(&mut self, unit: &SourceUnit) -> Result<&mut Self, ManifestError> {
        if !self.positions.contains_key(unit) {
            let role = if unit.is_runtime_base() {
                Role::Main
            } else {
                Role::Limbo
            };
            self.insert_new(unit, role)?;
        }
        Ok(self)
    }

    pub fn add_units<'a>(
        &mut self,
        units: impl IntoIterator<Item = &'a SourceUnit>,
    ) -> Result<&mut Self, ManifestError> {
        for unit in units {
            self.add_unit(unit)?;
        }
        Ok(self)
    }

    /// Require that the provider of `namespace` becomes an entry point.
    ///
    /// The provider is looked up when the manifest is built, so it does not
    /// need to be registered yet.
    pub fn add_namespace_entry_point(&mut self, namespace: impl Into<Namespace>) -> &mut Self {
        let namespace = namespace.into();
        if !self.namespace_entry_points.contains(&namespace) {
            self.namespace_entry_points.push(namespace);
            self.stale = true;
        }
        self
    }

    pub fn add_namespace_entry_points<I>(&mut self, namespaces: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Namespace>,
    {
        for namespace in namespaces {
            self.add_namespace_entry_point(namespace);
        }
        self
    }

    fn insert_new(&mut self, unit: &SourceUnit, role: Role) -> Result<(), ManifestError> {
        self.registry.register(unit)?;

        self.positions.insert(unit.clone(), self.all_units.len());
        self.all_units.push(unit.clone());
        self.roles.push(role);
        self.stale = true;

        tracing::debug!(
            "added {} as {:?} ({} provides, {} requires, content {})",
            unit,
            role,
            unit.provides().len(),
            unit.requires().len(),
            short_digest(unit.digest())
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Policy
    // ------------------------------------------------------------------

    /// Skip pruning entirely: every added unit is kept.
    pub fn set_keep_all_units(&mut self, keep: bool) -> &mut Self {
        if self.config.keep_all_units != keep {
            self.config.keep_all_units = keep;
            self.stale = true;
        }
        self
    }

    /// Keep moochers (units providing nothing) and their dependencies.
    /// Has no visible effect when all units are kept anyway.
    pub fn set_keep_moochers(&mut self, keep: bool) -> &mut Self {
        if self.config.keep_moochers != keep {
            self.config.keep_moochers = keep;
            self.stale = true;
        }
        self
    }

    /// Return units in the order they were added instead of sorting them.
    pub fn set_keep_original_order(&mut self, keep: bool) -> &mut Self {
        if self.config.keep_original_order != keep {
            self.config.keep_original_order = keep;
            self.stale = true;
        }
        self
    }

    pub fn set_sort_strategy(&mut self, strategy: SortStrategy) -> &mut Self {
        if self.config.sort_strategy != strategy {
            self.config.sort_strategy = strategy;
            self.stale = true;
        }
        self
    }

    /// Replace all policy settings at once.
    pub fn set_config(&mut self, config: ManifestConfig) -> &mut Self {
        self.set_keep_all_units(config.keep_all_units)
            .set_keep_moochers(config.keep_moochers)
            .set_keep_original_order(config.keep_original_order)
            .set_sort_strategy(config.sort_strategy)
    }

    pub fn config(&self) -> ManifestConfig {
        self.config
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Compute the manifest, or return the cached one if nothing changed.
    ///
    /// # Errors
    ///
    /// - [`ManifestError::MissingEntryPoint`] if a namespace entry point has
    ///   no provider
    /// - [`ManifestError::MissingDependency`] if a kept unit requires a
    ///   namespace nobody provides
    /// - [`ManifestError::CircularDependency`] if the kept units form a cycle
    pub fn to_manifest(&mut self) -> Result<&[SourceUnit], ManifestError> {
        if !self.stale {
            tracing::trace!("manifest unchanged, returning cached copy");
            return self
                .manifest
                .as_deref()
                .ok_or_else(|| ManifestError::invariant("manifest is fresh but nothing is cached"));
        }

        // Work on a copy of the roles so a failure leaves the builder as it was.
        let mut roles = self.roles.clone();
        if self.config.keep_moochers {
            self.promote_moochers(&mut roles);
        }
        self.promote_namespace_entry_points(&mut roles)?;

        let working = if self.config.keep_all_units {
            self.all_units.clone()
        } else {
            let mains = self
                .all_units
                .iter()
                .zip(&roles)
                .filter(|(_, role)| **role == Role::Main)
                .map(|(unit, _)| unit);
            DependencyResolver::new(&self.registry).closure_of(
                mains,
                &self.all_units,
                MissingPolicy::Fail,
            )?
        };

        let ordered = if self.config.keep_original_order {
            working
        } else {
            let graph = DependencyGraph::build(&working, &self.registry, MissingPolicy::Fail)?;
            TopologicalSorter::new(self.config.sort_strategy).sort(&graph)?
        };

        tracing::debug!(
            "manifest computed: {} of {} units kept",
            ordered.len(),
            self.all_units.len()
        );

        self.roles = roles;
        self.namespace_entry_points.clear();
        self.stale = false;
        Ok(self.manifest.insert(ordered).as_slice())
    }

    fn promote_moochers(&self, roles: &mut [Role]) {
        for (unit, role) in self.all_units.iter().zip(roles.iter_mut()) {
            if *role == Role::Limbo && unit.is_moocher() {
                tracing::debug!("keeping moocher {}", unit);
                *role = Role::Main;
            }
        }
    }

    fn promote_namespace_entry_points(&self, roles: &mut [Role]) -> Result<(), ManifestError> {
        for namespace in &self.namespace_entry_points {
            let provider = self
                .registry
                .resolve(namespace)
                .ok_or(ManifestError::MissingEntryPoint {
                    namespace: *namespace,
                })?;

            let index = *self.positions.get(provider).ok_or_else(|| {
                ManifestError::invariant(format!(
                    "`{}` provides `{}` but is neither main nor in limbo",
                    provider, namespace
                ))
            })?;

            if roles[index] == Role::Limbo {
                tracing::debug!("namespace `{}` makes {} an entry point", namespace, provider);
                roles[index] = Role::Main;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Every unit added so far, in first-seen order, regardless of pruning.
    pub fn all_units_in_original_order(&self) -> &[SourceUnit] {
        &self.all_units
    }

    /// Current entry-point units, in first-seen order.
    pub fn main_units(&self) -> Vec<SourceUnit> {
        self.units_with_role(Role::Main)
    }

    /// Current candidate units, in first-seen order.
    pub fn limbo_units(&self) -> Vec<SourceUnit> {
        self.units_with_role(Role::Limbo)
    }

    fn units_with_role(&self, wanted: Role) -> Vec<SourceUnit> {
        self.all_units
            .iter()
            .zip(&self.roles)
            .filter(|(_, role)| **role == wanted)
            .map(|(unit, _)| unit.clone())
            .collect()
    }

    /// Namespace entry points not yet consumed by a successful build.
    pub fn namespace_entry_points(&self) -> &[Namespace] {
        &self.namespace_entry_points
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn contains(&self, unit: &SourceUnit) -> bool {
        self.positions.contains_key(unit)
    }

    pub fn is_main(&self, unit: &SourceUnit) -> bool {
        self.positions
            .get(unit)
            .is_some_and(|&index| self.roles[index] == Role::Main)
    }

    /// Whether the next [`ManifestBuilder::to_manifest`] call will recompute.
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
