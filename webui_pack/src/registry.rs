//! The per-run table of packed assets.
use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
};

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Accumulates `serving key -> array symbol` entries and the generated
/// headers for one packing run.
///
/// Insertion order is kept: the lookup table is emitted in the order assets
/// were packed. A registry is owned by whoever drives the run, so several
/// runs in one process never share state.
#[derive(Debug)]
pub struct Registry {
    key_base: PathBuf,
    entries: IndexMap<String, String>,
    owners: HashMap<String, String>,
    headers: Vec<PathBuf>,
}

impl Registry {
    /// Creates an empty registry.
    ///
    /// `key_base` is stripped from source paths to derive the serving key of
    /// assets packed without an explicit URL path.
    pub fn new(key_base: impl AsRef<Path>) -> Self {
        Self {
            key_base: key_base.as_ref().to_path_buf(),
            entries: IndexMap::new(),
            owners: HashMap::new(),
            headers: Vec::new(),
        }
    }

    /// Serving key for a source file packed without an explicit URL path.
    #[must_use]
    pub fn derive_key(&self, source: &Path) -> String {
        let rel = source.strip_prefix(&self.key_base).unwrap_or(source);
        format!("/{}", slash_path(rel))
    }

    /// The key that currently owns `symbol`, if any.
    #[must_use]
    pub fn owner_of(&self, symbol: &str) -> Option<&str> {
        self.owners.get(symbol).map(String::as_str)
    }

    /// Fails if `symbol` already belongs to a different key.
    ///
    /// # Errors
    /// Returns [`Error::SymbolCollision`] naming both keys.
    pub fn ensure_available(&self, symbol: &str, key: &str) -> Result<()> {
        match self.owner_of(symbol) {
            Some(owner) if owner != key => Err(Error::SymbolCollision {
                symbol: symbol.to_owned(),
                owner: owner.to_owned(),
                key: key.to_owned(),
            }),
            _ => Ok(()),
        }
    }

    /// Records a packed asset.
    ///
    /// Re-registering the same key replaces its symbol in place.
    ///
    /// # Errors
    /// Returns [`Error::SymbolCollision`] if `symbol` is owned by another key.
    pub fn register(&mut self, key: String, symbol: String, header: PathBuf) -> Result<()> {
        self.ensure_available(&symbol, &key)?;
        if let Some(previous) = self.entries.insert(key.clone(), symbol.clone()) {
            self.owners.remove(&previous);
        }
        self.owners.insert(symbol, key);
        if !self.headers.contains(&header) {
            self.headers.push(header);
        }
        Ok(())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The key inserted last.
    #[must_use]
    pub fn last_key(&self) -> Option<&str> {
        self.entries.last().map(|(k, _)| k.as_str())
    }

    /// Generated headers in the order they were written.
    #[must_use]
    pub fn headers(&self) -> &[PathBuf] {
        &self.headers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Joins the normal components of `rel` with `/`, whatever the host separator.
pub(crate) fn slash_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_key_below_base() {
        let registry = Registry::new("/proj/ui");
        assert_eq!(
            registry.derive_key(Path::new("/proj/ui/vnc/core/rfb.js")),
            "/vnc/core/rfb.js"
        );
    }

    #[test]
    fn derives_key_outside_base() {
        let registry = Registry::new("/proj/ui");
        assert_eq!(registry.derive_key(Path::new("other/x.js")), "/other/x.js");
    }

    #[test]
    fn keeps_insertion_order() {
        let mut registry = Registry::new("/");
        for (key, sym) in [("/z", "z"), ("/a", "a"), ("/m", "m")] {
            registry
                .register(key.into(), sym.into(), PathBuf::from(format!("{sym}.h")))
                .unwrap();
        }
        let keys: Vec<_> = registry.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, ["/z", "/a", "/m"]);
        assert_eq!(registry.last_key(), Some("/m"));
        assert_eq!(registry.headers().len(), 3);
    }

    #[test]
    fn rejects_symbol_reuse_by_other_key() {
        let mut registry = Registry::new("/");
        registry
            .register("/a-b.js".into(), "a_b_js".into(), "a_b_js.h".into())
            .unwrap();
        let err = registry
            .register("/a_b.js".into(), "a_b_js".into(), "a_b_js.h".into())
            .unwrap_err();
        assert!(matches!(err, Error::SymbolCollision { ref owner, .. } if owner == "/a-b.js"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_key_replaces_in_place() {
        let mut registry = Registry::new("/");
        registry.register("/a".into(), "a1".into(), "a.h".into()).unwrap();
        registry.register("/b".into(), "b".into(), "b.h".into()).unwrap();
        registry.register("/a".into(), "a2".into(), "a.h".into()).unwrap();

        let entries: Vec<_> = registry.entries().collect();
        assert_eq!(entries, [("/a", "a2"), ("/b", "b")]);
        assert_eq!(registry.owner_of("a1"), None);
        assert_eq!(registry.headers().len(), 2);
    }
}
