//! Tag registry mapping element names to field handlers.

use std::collections::{HashMap, HashSet};

use super::types::FieldHandler;

/// Registry mapping tag keys to handlers.
///
/// Keys are either a bare local name (`"link"`) or a qualified
/// `prefix:local` name (`"media:content"`).
pub struct TagRegistry<R> {
    handlers: HashMap<&'static str, FieldHandler<R>>,
}

impl<R> TagRegistry<R> {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a tag key, replacing any previous one.
    pub fn register(&mut self, key: &'static str, handler: FieldHandler<R>) {
        self.handlers.insert(key, handler);
    }

    /// Register the same handler under several keys.
    pub fn register_all(&mut self, keys: &[&'static str], handler: FieldHandler<R>) {
        for key in keys {
            self.register(*key, handler);
        }
    }

    /// Get the handler registered for a key.
    #[must_use]
    pub fn get_handler(&self, key: &str) -> Option<FieldHandler<R>> {
        self.handlers.get(key).copied()
    }

    /// Check if a handler is registered for a key.
    #[must_use]
    pub fn has_handler(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Return set of all registered keys.
    #[must_use]
    pub fn registered_tags(&self) -> HashSet<&str> {
        self.handlers.keys().copied().collect()
    }
}

impl<R> Default for TagRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::registry::DispatchContext;
    use roxmltree::Node;

    fn noop(_node: Node<'_, '_>, _record: &mut Vec<String>, _ctx: &DispatchContext<'_>) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry: TagRegistry<Vec<String>> = TagRegistry::new();
        registry.register("title", noop);

        assert!(registry.get_handler("title").is_some());
        assert!(registry.get_handler("link").is_none());
    }

    #[test]
    fn test_registry_register_all() {
        let mut registry: TagRegistry<Vec<String>> = TagRegistry::new();
        registry.register_all(&["summary", "description", "itunes:summary"], noop);

        assert!(registry.has_handler("description"));
        assert!(registry.has_handler("itunes:summary"));
        assert_eq!(registry.registered_tags().len(), 3);
    }
}
