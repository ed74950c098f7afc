//! Dependency descriptor types.
//!
//! A dependency records one import between modules: the requested specifier,
//! the environment it is resolved in, and the symbols it pulls in.

use super::{Environment, Target};
use crate::utils::hash::content_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Symbol name meaning "every export" (namespace import or `export *`)
pub const NAMESPACE_SYMBOL: &str = "*";

/// Recorded import relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Content hash of the identity fields
    pub id: String,
    /// Asset that contains the import, `None` for entries
    pub source_asset_id: Option<String>,
    pub module_specifier: String,
    pub target: Option<Target>,
    pub env: Environment,
    pub is_entry: bool,
    /// Re-export-only import whose transformation can be deferred
    pub is_weak: bool,
    pub is_optional: bool,
    /// Exported symbol name to the locally used name
    pub symbols: BTreeMap<String, String>,
}

impl Dependency {
    /// Create a new dependency on `module_specifier`
    pub fn new(module_specifier: impl Into<String>, env: Environment) -> Self {
        let mut dependency = Self {
            id: String::new(),
            source_asset_id: None,
            module_specifier: module_specifier.into(),
            target: None,
            env,
            is_entry: false,
            is_weak: false,
            is_optional: false,
            symbols: BTreeMap::new(),
        };
        dependency.refresh_id();
        dependency
    }

    /// Create an entry dependency for `target`
    pub fn entry(module_specifier: impl Into<String>, target: &Target) -> Self {
        let mut dependency = Self::new(module_specifier, target.env.clone()).with_target(target.clone());
        dependency.is_entry = true;
        dependency
    }

    /// Attach the dependency to the asset that imports it
    pub fn with_source_asset(mut self, asset_id: impl Into<String>) -> Self {
        self.source_asset_id = Some(asset_id.into());
        self.refresh_id();
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self.refresh_id();
        self
    }

    /// Mark this dependency as weak (re-export only)
    pub fn weak(mut self) -> Self {
        self.is_weak = true;
        self
    }

    /// Make this dependency optional
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Request `exported` from the target module under the name `local`
    pub fn with_symbol(mut self, exported: impl Into<String>, local: impl Into<String>) -> Self {
        self.symbols.insert(exported.into(), local.into());
        self
    }

    /// Request every export of the target module
    pub fn with_namespace(self, local: impl Into<String>) -> Self {
        self.with_symbol(NAMESPACE_SYMBOL, local)
    }

    /// Check if this dependency imports the whole namespace
    pub fn imports_namespace(&self) -> bool {
        self.symbols.contains_key(NAMESPACE_SYMBOL)
    }

    /// Local name to exported name, the inverse of `symbols`
    pub fn local_symbols(&self) -> BTreeMap<&str, &str> {
        self.symbols
            .iter()
            .map(|(exported, local)| (local.as_str(), exported.as_str()))
            .collect()
    }

    fn refresh_id(&mut self) {
        self.id = content_id(&(
            &self.source_asset_id,
            &self.module_specifier,
            &self.env,
            &self.target,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_creation() {
        let dep = Dependency::new("./utils.js", Environment::browser());

        assert_eq!(dep.module_specifier, "./utils.js");
        assert!(!dep.is_entry);
        assert!(!dep.is_weak);
        assert!(dep.symbols.is_empty());
        assert!(!dep.id.is_empty());
    }

    #[test]
    fn test_identity_is_structural() {
        let a = Dependency::new("./a.js", Environment::node()).with_source_asset("asset1");
        let b = Dependency::new("./a.js", Environment::node()).with_source_asset("asset1");
        assert_eq!(a.id, b.id);

        let other_source = Dependency::new("./a.js", Environment::node()).with_source_asset("asset2");
        let other_env = Dependency::new("./a.js", Environment::browser()).with_source_asset("asset1");
        assert_ne!(a.id, other_source.id);
        assert_ne!(a.id, other_env.id);
    }

    #[test]
    fn test_symbols_do_not_change_identity() {
        let plain = Dependency::new("./a.js", Environment::node());
        let with_symbols = Dependency::new("./a.js", Environment::node())
            .with_symbol("foo", "foo")
            .weak();
        assert_eq!(plain.id, with_symbols.id);
    }

    #[test]
    fn test_entry_dependency() {
        let target = Target::new("main", "dist", Environment::node());
        let dep = Dependency::entry("./index.js", &target);
        assert!(dep.is_entry);
        assert_eq!(dep.env, target.env);
        assert_eq!(dep.target.as_ref(), Some(&target));

        let other = Target::new("legacy", "dist/legacy", Environment::node());
        assert_ne!(dep.id, Dependency::entry("./index.js", &other).id);
    }

    #[test]
    fn test_local_symbols() {
        let dep = Dependency::new("./a.js", Environment::node())
            .with_symbol("default", "a")
            .with_namespace("ns");
        assert!(dep.imports_namespace());

        let locals = dep.local_symbols();
        assert_eq!(locals.get("a"), Some(&"default"));
        assert_eq!(locals.get("ns"), Some(&NAMESPACE_SYMBOL));
    }
}
