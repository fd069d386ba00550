//! Interned namespace names.
//!
//! Every `provide`/`require` declaration names a namespace. The same names
//! appear over and over across a source tree, so they are interned once and
//! compared by pointer afterwards.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{LazyLock, RwLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Namespace provided implicitly by the runtime base unit.
pub const DEFAULT_ROOT_NAMESPACE: &str = "goog";

static NAMESPACES: LazyLock<RwLock<HashSet<&'static str>>> =
    LazyLock::new(|| RwLock::new(HashSet::new()));

/// A namespace name such as `goog.dom` or `app.main`.
///
/// Cloning is a pointer copy. Hashing uses the string contents so that a
/// `HashMap<Namespace, _>` can be queried with a plain `&str`.
#[derive(Clone, Copy)]
pub struct Namespace {
    name: &'static str,
}

impl Namespace {
    /// Intern `name` and return its handle.
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();

        // Poisoning only happens if another thread panicked mid-insert; the
        // set itself is still consistent, so keep using it.
        {
            let table = NAMESPACES.read().unwrap_or_else(|e| e.into_inner());
            if let Some(&interned) = table.get(name) {
                return Namespace { name: interned };
            }
        }

        let mut table = NAMESPACES.write().unwrap_or_else(|e| e.into_inner());
        if let Some(&interned) = table.get(name) {
            return Namespace { name: interned };
        }

        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        table.insert(leaked);
        Namespace { name: leaked }
    }

    /// The reserved root namespace.
    pub fn root() -> Self {
        Namespace::new(DEFAULT_ROOT_NAMESPACE)
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.name
    }
}

impl Deref for Namespace {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.name
    }
}

impl AsRef<str> for Namespace {
    #[inline]
    fn as_ref(&self) -> &str {
        self.name
    }
}

impl Borrow<str> for Namespace {
    #[inline]
    fn borrow(&self) -> &str {
        self.name
    }
}

impl PartialEq for Namespace {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.name, other.name)
    }
}

impl Eq for Namespace {}

impl PartialEq<str> for Namespace {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for Namespace {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl PartialOrd for Namespace {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Namespace {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name)
    }
}

impl Hash for Namespace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.name, f)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name, f)
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Namespace::new(s)
    }
}

impl From<String> for Namespace {
    fn from(s: String) -> Self {
        Namespace::new(s)
    }
}

impl From<&String> for Namespace {
    fn from(s: &String) -> Self {
        Namespace::new(s)
    }
}

impl Serialize for Namespace {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.name.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Namespace::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_same_name_same_pointer() {
        let a = Namespace::new("goog.dom");
        let b = Namespace::from(String::from("goog.dom"));
        let c = Namespace::new("goog.events");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(std::ptr::eq(a.as_str(), b.as_str()));
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Namespace::new("app.main"), 7);

        assert_eq!(map.get("app.main"), Some(&7));
        assert_eq!(map.get("app.other"), None);
    }

    #[test]
    fn test_root_namespace() {
        assert_eq!(Namespace::root(), "goog");
    }
}
