//! Install mode registry
//!
//! Provides [`ModeRegistry`], mapping mode identifiers to handler factories.

use crate::builtin;
use crate::error::ModeError;
use crate::handler::ModeHandler;
use iid_metadata::UpdateObject;
use std::collections::BTreeMap;
use std::fmt;

/// Builds a handler for one object
pub type ModeFactory = fn(&UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError>;

/// Registry of install modes
///
/// Handlers are built per object because the target comes from the object's
/// metadata. Factories are plain function pointers, so the registry is
/// `Send + Sync` and can be shared across evaluations.
#[derive(Default, Clone)]
pub struct ModeRegistry {
    factories: BTreeMap<String, ModeFactory>,
}

impl fmt::Debug for ModeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeRegistry")
            .field("modes", &self.names())
            .finish()
    }
}

impl ModeRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Create registry with built-in modes
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("raw", builtin::raw);
        registry.register("flash", builtin::flash);
        registry.register("test", builtin::test);
        registry.register("copy", builtin::copy);
        registry.register("tarball", builtin::tarball);
        registry.register("ubifs", builtin::ubifs);
        registry.register("imxkobs", builtin::imxkobs);
        registry.register("zephyr", builtin::zephyr);
        registry
    }

    /// Register (or replace) a mode
    pub fn register(&mut self, name: &str, factory: ModeFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Check if mode exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Remove mode
    #[inline]
    pub fn remove(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    /// List registered mode names, sorted
    #[inline]
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Get number of registered modes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Resolve the handler for an object's mode
    ///
    /// # Errors
    /// - [`ModeError::UnknownMode`] if the mode is not registered
    /// - [`ModeError::MissingTarget`] if the mode needs a target the object lacks
    pub fn resolve(&self, object: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
        let factory = self
            .factories
            .get(&object.mode)
            .ok_or_else(|| ModeError::UnknownMode(object.mode.clone()))?;
        factory(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{OpaqueMode, OPAQUE_MODES, TARGET_MODES};

    #[test]
    fn registry_new_empty() {
        let registry = ModeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_defaults() {
        let registry = ModeRegistry::with_defaults();
        assert_eq!(registry.len(), TARGET_MODES.len() + OPAQUE_MODES.len());
        for mode in TARGET_MODES.iter().chain(OPAQUE_MODES) {
            assert!(registry.contains(mode), "missing {mode}");
        }
    }

    #[test]
    fn registry_names_sorted() {
        let registry = ModeRegistry::with_defaults();
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    fn mender(_: &UpdateObject) -> Result<Box<dyn ModeHandler>, ModeError> {
        Ok(Box::new(OpaqueMode::new("mender")))
    }

    #[test]
    fn registry_register_custom() {
        let mut registry = ModeRegistry::new();
        registry.register("mender", mender);
        let handler = registry.resolve(&UpdateObject::new("mender")).unwrap();
        assert_eq!(handler.mode(), "mender");
    }

    #[test]
    fn registry_remove() {
        let mut registry = ModeRegistry::with_defaults();
        assert!(registry.remove("zephyr"));
        assert!(!registry.contains("zephyr"));
        assert!(!registry.remove("zephyr"));
    }

    #[test]
    fn resolve_unknown_mode() {
        let registry = ModeRegistry::with_defaults();
        let err = registry.resolve(&UpdateObject::new("squashfs")).unwrap_err();
        assert!(matches!(err, ModeError::UnknownMode(ref m) if m == "squashfs"));
    }

    #[test]
    fn resolve_target_modes_expose_capability() {
        let registry = ModeRegistry::with_defaults();
        for mode in TARGET_MODES {
            let object = UpdateObject::new(*mode).with_target("/dev/sda1");
            let handler = registry.resolve(&object).unwrap();
            assert!(handler.target_getter().is_some(), "{mode} should expose target");
        }
    }

    #[test]
    fn resolve_opaque_modes_have_no_capability() {
        let registry = ModeRegistry::with_defaults();
        for mode in OPAQUE_MODES {
            let object = UpdateObject::new(*mode).with_target("/dev/sda1");
            let handler = registry.resolve(&object).unwrap();
            assert!(handler.target_getter().is_none(), "{mode} should not expose target");
        }
    }
}
