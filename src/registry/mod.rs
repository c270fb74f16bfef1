//! Alias-keyed registry of session handles.
//!
//! The registry owns every handle a test suite creates and tracks which alias
//! is "current" (the most recently switched-to). It is plain owned state: the
//! owning [`HttpLibrary`](crate::HttpLibrary) mutates it through `&mut self`,
//! so callers are sequenced by the borrow checker rather than by locks.
//!
//! # Example
//!
//! ```
//! use http_keywords::registry::SessionRegistry;
//!
//! let mut registry = SessionRegistry::new();
//! registry.register("first", "api");
//! registry.register("second", "api");
//!
//! assert_eq!(registry.len(), 1);
//! assert_eq!(*registry.switch("api").unwrap(), "second");
//! assert!(registry.switch("missing").is_err());
//! ```

use crate::error::{KeywordError, Result};
use std::collections::HashMap;

/// Mapping from alias to handle plus the current alias.
#[derive(Debug)]
pub struct SessionRegistry<H> {
    handles: HashMap<String, H>,
    current: Option<String>,
}

impl<H> Default for SessionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> SessionRegistry<H> {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
            current: None,
        }
    }

    /// Registers `handle` under `alias`, replacing any previous handle.
    ///
    /// The current pointer is left alone; if `alias` was current it now
    /// resolves to the new handle. The replaced handle is returned so callers
    /// can observe the overwrite.
    pub fn register(&mut self, handle: H, alias: impl Into<String>) -> Option<H> {
        let alias = alias.into();
        let previous = self.handles.insert(alias.clone(), handle);
        if previous.is_some() {
            tracing::debug!(alias = %alias, "replaced registered handle");
        } else {
            tracing::debug!(alias = %alias, "registered handle");
        }
        previous
    }

    /// Makes `alias` current and returns its handle.
    ///
    /// # Errors
    ///
    /// `KeywordError::AliasNotFound` when nothing is registered under `alias`;
    /// the current pointer is unchanged in that case.
    pub fn switch(&mut self, alias: &str) -> Result<&mut H> {
        match self.handles.get_mut(alias) {
            Some(handle) => {
                self.current = Some(alias.to_string());
                Ok(handle)
            }
            None => Err(KeywordError::AliasNotFound(alias.to_string())),
        }
    }

    /// Drops every handle and clears the current pointer.
    ///
    /// Dropping a handle releases its pooled connections.
    pub fn empty(&mut self) {
        let count = self.handles.len();
        self.handles.clear();
        self.current = None;
        tracing::debug!(count, "registry emptied");
    }

    /// The handle of the current alias, if any.
    pub fn current(&self) -> Option<&H> {
        self.current
            .as_ref()
            .and_then(|alias| self.handles.get(alias))
    }

    pub fn current_alias(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Looks up a handle without changing the current pointer.
    pub fn get(&self, alias: &str) -> Option<&H> {
        self.handles.get(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.handles.contains_key(alias)
    }

    /// Registered aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.handles.keys().cloned().collect();
        aliases.sort();
        aliases
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
