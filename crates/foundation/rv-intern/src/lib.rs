//! String interning for declaration names
//!
//! Every name that flows through lowering (declaration names, receiver names,
//! `componentN` operator names) is interned once and compared by key.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::Arc;

/// Name of the implicit receiver parameter of a class or script
pub const THIS_NAME: &str = "<this>";

/// Name bound by `_` in destructuring declarations
pub const PLACEHOLDER_NAME: &str = "_";

/// Name of the synthetic property holding a script's result value
pub const RESULT_NAME: &str = "$$result";

/// Prefix of the destructuring operator functions (`component1`, ...)
pub const COMPONENT_PREFIX: &str = "component";

/// An interned name
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Name(Spur);

/// Thread-safe string interner
///
/// Cloning is cheap and every clone shares the same storage, so one interner
/// can back several lowering threads of a session.
#[derive(Clone)]
pub struct Interner {
    inner: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Create an empty interner
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Intern a string
    pub fn intern(&self, text: &str) -> Name {
        Name(self.inner.get_or_intern(text))
    }

    /// Resolve a name back to its text
    pub fn resolve(&self, name: Name) -> &str {
        self.inner.resolve(&name.0)
    }

    /// Resolve a name if it was produced by this interner
    pub fn try_resolve(&self, name: Name) -> Option<&str> {
        self.inner.try_resolve(&name.0)
    }

    /// The `<this>` receiver name
    pub fn this_name(&self) -> Name {
        self.intern(THIS_NAME)
    }

    /// The `_` placeholder name
    pub fn placeholder(&self) -> Name {
        self.intern(PLACEHOLDER_NAME)
    }

    /// The script result property name
    pub fn result_name(&self) -> Name {
        self.intern(RESULT_NAME)
    }

    /// `componentN` for a one-based destructuring position
    pub fn component(&self, position: usize) -> Name {
        self.intern(&format!("{COMPONENT_PREFIX}{position}"))
    }

    /// Whether `name` is the unused-variable placeholder
    pub fn is_placeholder(&self, name: Name) -> bool {
        self.try_resolve(name) == Some(PLACEHOLDER_NAME)
    }

    /// Number of distinct interned names
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been interned yet
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Interner")
            .field("len", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let interner = Interner::new();
        let first = interner.intern("pair");
        let second = interner.intern("pair");
        assert_eq!(first, second);
        assert_eq!(interner.resolve(first), "pair");
    }

    #[test]
    fn test_clones_share_storage() {
        let interner = Interner::new();
        let clone = interner.clone();
        let name = clone.intern("shared");
        assert_eq!(interner.resolve(name), "shared");
    }

    #[test]
    fn test_special_names() {
        let interner = Interner::new();
        assert_eq!(interner.resolve(interner.component(2)), "component2");
        assert!(interner.is_placeholder(interner.intern("_")));
        assert!(!interner.is_placeholder(interner.intern("a")));
        assert_eq!(interner.resolve(interner.this_name()), "<this>");
    }
}
