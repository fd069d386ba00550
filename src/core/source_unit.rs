//! SourceUnit - one input and its declared dependencies.
//!
//! A SourceUnit is produced once by whatever scanned the source text and is
//! immutable afterwards. It is Arc-backed, so cloning hands out another
//! reference to the same unit rather than a copy.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::core::Namespace;
use crate::resolver::ManifestError;
use crate::util::hash::sha256_str;

/// An input artifact with provide/require declarations.
///
/// Two units are equal when both their identity and their content match, so
/// distinct inputs with identical text remain distinct.
#[derive(Clone)]
pub struct SourceUnit {
    inner: Arc<SourceUnitInner>,
}

struct SourceUnitInner {
    id: String,
    content: String,
    digest: String,
    provides: Vec<Namespace>,
    requires: Vec<Namespace>,
    runtime_base: bool,
}

impl SourceUnit {
    /// Start building a unit identified by `id` (usually an absolute path).
    pub fn builder(id: impl Into<String>) -> SourceUnitBuilder {
        SourceUnitBuilder::new(id)
    }

    /// Create an ordinary (non runtime-base) unit with no content.
    pub fn new<P, R>(id: impl Into<String>, provides: P, requires: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<Namespace>,
        R: IntoIterator,
        R::Item: Into<Namespace>,
    {
        let builder = SourceUnitBuilder::new(id).provides(provides).requires(requires);
        builder.finish(false)
    }

    /// Create the runtime base unit, which provides the root namespace.
    pub fn runtime_base(id: impl Into<String>, content: impl Into<String>) -> Self {
        SourceUnitBuilder::new(id).content(content).finish(true)
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn content(&self) -> &str {
        &self.inner.content
    }

    /// SHA-256 digest of the content.
    pub fn digest(&self) -> &str {
        &self.inner.digest
    }

    /// Namespaces defined by this unit, in declaration order.
    pub fn provides(&self) -> &[Namespace] {
        &self.inner.provides
    }

    /// Namespaces this unit depends on, in declaration order.
    pub fn requires(&self) -> &[Namespace] {
        &self.inner.requires
    }

    pub fn is_runtime_base(&self) -> bool {
        self.inner.runtime_base
    }

    /// A moocher provides nothing, though it may require namespaces.
    pub fn is_moocher(&self) -> bool {
        self.inner.provides.is_empty()
    }

    pub fn provides_namespace(&self, namespace: &str) -> bool {
        self.inner.provides.iter().any(|ns| *ns == namespace)
    }

    /// The namespace used to name this unit in cycle paths.
    pub fn representative_namespace(&self) -> Namespace {
        self.inner
            .provides
            .first()
            .copied()
            .unwrap_or_else(|| Namespace::new(&self.inner.id))
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(a: &SourceUnit, b: &SourceUnit) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl PartialEq for SourceUnit {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.id == other.inner.id && self.inner.digest == other.inner.digest)
    }
}

impl Eq for SourceUnit {}

impl Hash for SourceUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
        self.inner.digest.hash(state);
    }
}

impl fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceUnit")
            .field("id", &self.inner.id)
            .field("provides", &self.inner.provides)
            .field("requires", &self.inner.requires)
            .field("runtime_base", &self.inner.runtime_base)
            .finish()
    }
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.id)
    }
}

/// Builder for [`SourceUnit`].
///
/// Duplicate declarations are collapsed, keeping the first occurrence.
#[derive(Debug, Clone)]
pub struct SourceUnitBuilder {
    id: String,
    content: String,
    provides: Vec<Namespace>,
    requires: Vec<Namespace>,
    runtime_base: bool,
    root_namespace: Namespace,
}

impl SourceUnitBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        SourceUnitBuilder {
            id: id.into(),
            content: String::new(),
            provides: Vec::new(),
            requires: Vec::new(),
            runtime_base: false,
            root_namespace: Namespace::root(),
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn provide(mut self, namespace: impl Into<Namespace>) -> Self {
        push_unique(&mut self.provides, namespace.into());
        self
    }

    pub fn provides<I>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Namespace>,
    {
        for ns in namespaces {
            push_unique(&mut self.provides, ns.into());
        }
        self
    }

    pub fn require(mut self, namespace: impl Into<Namespace>) -> Self {
        push_unique(&mut self.requires, namespace.into());
        self
    }

    pub fn requires<I>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Namespace>,
    {
        for ns in namespaces {
            push_unique(&mut self.requires, ns.into());
        }
        self
    }

    /// Mark the unit as the runtime base.
    pub fn runtime_base(mut self, runtime_base: bool) -> Self {
        self.runtime_base = runtime_base;
        self
    }

    /// Override the namespace implicitly provided by a runtime base.
    pub fn root_namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.root_namespace = namespace.into();
        self
    }

    /// Build the unit.
    ///
    /// Fails with [`ManifestError::InvalidRuntimeBase`] when a runtime base
    /// declares explicit provides or requires.
    pub fn build(self) -> Result<SourceUnit, ManifestError> {
        if self.runtime_base && (!self.provides.is_empty() || !self.requires.is_empty()) {
            return Err(ManifestError::InvalidRuntimeBase { unit_id: self.id });
        }
        let runtime_base = self.runtime_base;
        Ok(self.finish(runtime_base))
    }

    fn finish(mut self, runtime_base: bool) -> SourceUnit {
        if runtime_base {
            self.provides = vec![self.root_namespace];
            self.requires.clear();
        }

        let digest = sha256_str(&self.content);
        SourceUnit {
            inner: Arc::new(SourceUnitInner {
                id: self.id,
                content: self.content,
                digest,
                provides: self.provides,
                requires: self.requires,
                runtime_base,
            }),
        }
    }
}

fn push_unique(list: &mut Vec<Namespace>, namespace: Namespace) {
    if !list.contains(&namespace) {
        list.push(namespace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ErrorKind;

    #[test]
    fn test_builder_collapses_duplicates() {
        let unit = SourceUnit::builder("/src/a.js")
            .provides(["a", "a.util", "a"])
            .require("goog")
            .require("goog")
            .build()
            .unwrap();

        assert_eq!(unit.provides(), &[Namespace::new("a"), Namespace::new("a.util")]);
        assert_eq!(unit.requires(), &[Namespace::new("goog")]);
        assert!(!unit.is_moocher());
        assert_eq!(unit.representative_namespace(), "a");
    }

    #[test]
    fn test_runtime_base_provides_root() {
        let base = SourceUnit::runtime_base("/closure/base.js", "var goog = goog || {};");

        assert!(base.is_runtime_base());
        assert_eq!(base.provides(), &[Namespace::root()]);
        assert!(base.requires().is_empty());

        let custom = SourceUnit::builder("/rt/boot.js")
            .runtime_base(true)
            .root_namespace("rt")
            .build()
            .unwrap();
        assert!(custom.provides_namespace("rt"));
    }

    #[test]
    fn test_runtime_base_rejects_declarations() {
        let err = SourceUnit::builder("/closure/base.js")
            .runtime_base(true)
            .provide("goog.extra")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRuntimeBase);

        let err = SourceUnit::builder("/closure/base.js")
            .runtime_base(true)
            .require("other")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRuntimeBase);
    }

    #[test]
    fn test_identity_includes_content() {
        let a = SourceUnit::builder("/src/a.js").content("one").build().unwrap();
        let same = SourceUnit::builder("/src/a.js").content("one").build().unwrap();
        let edited = SourceUnit::builder("/src/a.js").content("two").build().unwrap();
        let elsewhere = SourceUnit::builder("/src/b.js").content("one").build().unwrap();

        assert_eq!(a, same);
        assert!(!SourceUnit::ptr_eq(&a, &same));
        assert_ne!(a, edited);
        assert_ne!(a, elsewhere);
    }

    #[test]
    fn test_clone_shares_allocation() {
        let unit = SourceUnit::new("/src/a.js", ["a"], ["goog"]);
        let other = unit.clone();
        assert!(SourceUnit::ptr_eq(&unit, &other));
    }

    #[test]
    fn test_moocher_representative_falls_back_to_id() {
        let moocher = SourceUnit::new("/src/moocher.js", Vec::<&str>::new(), ["goog"]);
        assert!(moocher.is_moocher());
        assert_eq!(moocher.representative_namespace(), "/src/moocher.js");
    }
}
