//! Dispatch engine that routes child elements to their field handlers.

use roxmltree::Node;

use super::core::TagRegistry;
use super::types::DispatchContext;
use crate::error::Result;
use crate::xml::{element_children, split_tag};

/// Engine that dispatches the children of a container element.
///
/// For every child element the bare-name handler runs first; a namespaced
/// child whose URI resolves to a known prefix additionally runs the handler
/// registered under its qualified name. Both may fire for the same element.
pub struct DispatchEngine<R> {
    registry: TagRegistry<R>,
}

impl<R> DispatchEngine<R> {
    /// Create a new engine with the given registry.
    #[must_use]
    pub fn new(registry: TagRegistry<R>) -> Self {
        Self { registry }
    }

    /// Get a reference to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &TagRegistry<R> {
        &self.registry
    }

    /// Dispatch every child element of `container` into `record`.
    ///
    /// # Errors
    /// Returns the first handler error; dispatch stops at that element.
    pub fn dispatch(
        &self,
        container: Node<'_, '_>,
        record: &mut R,
        context: &DispatchContext<'_>,
    ) -> Result<()> {
        for child in element_children(container) {
            let (uri, local) = split_tag(child);

            if let Some(handler) = self.registry.get_handler(local) {
                handler(child, record, context)?;
            }

            if let Some(qualified) = context.namespaces.qualify(uri, local) {
                if let Some(handler) = self.registry.get_handler(&qualified) {
                    handler(child, record, context)?;
                }
            }
        }
        Ok(())
    }
}
