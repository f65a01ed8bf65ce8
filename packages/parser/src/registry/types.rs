//! Types for the tag-dispatch system.

use std::fmt;

use roxmltree::Node;

use crate::error::Result;
use crate::sanitize::Sanitizer;
use crate::types::Entry;
use crate::xml::NamespaceMap;

/// A field handler: reads one element and updates the record being built.
pub type FieldHandler<R> = fn(Node<'_, '_>, &mut R, &DispatchContext<'_>) -> Result<()>;

/// Read-only state shared by all handlers during one parse call.
pub struct DispatchContext<'a> {
    /// Reverse namespace map for the document.
    pub namespaces: &'a NamespaceMap,
    /// Sanitizer for HTML-bearing fields.
    pub sanitizer: &'a dyn Sanitizer,
    /// Emit dates as epoch seconds.
    pub unix_timestamps: bool,
    /// Base URL for resolving relative links.
    pub base: Option<&'a str>,
    /// Text the tree was parsed from, used to recover inner markup.
    pub source: &'a str,
}

impl fmt::Debug for DispatchContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("unix_timestamps", &self.unix_timestamps)
            .field("base", &self.base)
            .field("source_len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl<'a> DispatchContext<'a> {
    /// Create a context without a base URL.
    #[must_use]
    pub fn new(
        namespaces: &'a NamespaceMap,
        sanitizer: &'a dyn Sanitizer,
        unix_timestamps: bool,
        source: &'a str,
    ) -> Self {
        Self {
            namespaces,
            sanitizer,
            unix_timestamps,
            base: None,
            source,
        }
    }

    /// Create a copy of this context with a different base URL.
    #[must_use]
    pub fn with_base(&self, base: Option<&'a str>) -> Self {
        Self {
            namespaces: self.namespaces,
            sanitizer: self.sanitizer,
            unix_timestamps: self.unix_timestamps,
            base,
            source: self.source,
        }
    }
}

/// Entry under construction.
///
/// Tracks whether a summary element was present but empty, which the
/// cross-fill step treats differently from a missing summary.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub entry: Entry,
    pub summary_is_null: bool,
}
