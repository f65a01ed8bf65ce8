//! Namespace handling: default-namespace stripping and prefix resolution.
//!
//! Feed documents are dispatched on bare local names, so the default
//! namespace is removed from the text before the tree is built. Prefixed
//! elements keep their namespace and are resolved back to a conventional
//! prefix through [`NamespaceMap`].

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use roxmltree::Node;

use crate::config::{
    EXPANDED_NAMESPACE_SCAN_WINDOW, KNOWN_NAMESPACES, NAMESPACE_SCAN_WINDOW,
    VERBOSE_HEADER_XMLNS_COUNT,
};
use crate::text::decode::head_str;

/// A default (unprefixed) namespace declaration.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DEFAULT_XMLNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\sxmlns\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

/// Remove the first default namespace declaration near the top of a document.
///
/// # Returns
/// The declared URI, if one was found, and the text without that declaration.
/// The text is borrowed unchanged when nothing was stripped.
///
/// # Examples
/// ```
/// use rapidfeed_parser::xml::strip_default_namespace;
///
/// let (uri, text) = strip_default_namespace(r#"<feed xmlns="http://www.w3.org/2005/Atom"><title/></feed>"#);
/// assert_eq!(uri.as_deref(), Some("http://www.w3.org/2005/Atom"));
/// assert_eq!(text, "<feed><title/></feed>");
/// ```
pub fn strip_default_namespace(text: &str) -> (Option<String>, Cow<'_, str>) {
    let mut window = head_str(text, NAMESPACE_SCAN_WINDOW);
    if window.matches("xmlns").count() > VERBOSE_HEADER_XMLNS_COUNT {
        window = head_str(text, EXPANDED_NAMESPACE_SCAN_WINDOW);
    }

    let Some(caps) = DEFAULT_XMLNS.captures(window) else {
        return (None, Cow::Borrowed(text));
    };
    let (Some(whole), Some(uri)) = (caps.get(0), caps.get(1).or_else(|| caps.get(2))) else {
        return (None, Cow::Borrowed(text));
    };

    let mut stripped = String::with_capacity(text.len());
    stripped.push_str(&text[..whole.start()]);
    stripped.push_str(&text[whole.end()..]);
    (Some(uri.as_str().to_string()), Cow::Owned(stripped))
}

/// Reverse namespace map: URI to prefix.
///
/// Falls back to the well-known feed namespaces; prefixes declared by the
/// document override them.
#[derive(Debug, Clone, Default)]
pub struct NamespaceMap {
    declared: HashMap<String, String>,
}

/// Well-known URIs, built once.
static KNOWN_PREFIXES: LazyLock<HashMap<String, String>> = LazyLock::new(|| {
    KNOWN_NAMESPACES
        .iter()
        .map(|(uri, prefix)| ((*uri).to_string(), (*prefix).to_string()))
        .collect()
});

impl NamespaceMap {
    /// Map containing only the well-known namespaces.
    #[must_use]
    pub fn known() -> Self {
        Self::default()
    }

    /// Build the map for a document from the namespaces in scope on its root.
    #[must_use]
    pub fn for_root(root: Node<'_, '_>) -> Self {
        let mut map = Self::known();
        for ns in root.namespaces() {
            if let Some(prefix) = ns.name() {
                map.declared.insert(ns.uri().to_string(), prefix.to_string());
            }
        }
        map
    }

    /// Resolve a namespace URI to its prefix.
    #[must_use]
    pub fn prefix(&self, uri: &str) -> Option<&str> {
        self.declared
            .get(uri)
            .or_else(|| KNOWN_PREFIXES.get(uri))
            .map(String::as_str)
    }

    /// Qualified `prefix:local` name of an element or attribute.
    ///
    /// Returns `None` for un-namespaced names and for unknown URIs.
    #[must_use]
    pub fn qualify(&self, uri: Option<&str>, local: &str) -> Option<String> {
        let prefix = self.prefix(uri?)?;
        Some(format!("{prefix}:{local}"))
    }
}

/// Namespace URI and local name of an element.
pub fn split_tag<'a>(node: Node<'a, '_>) -> (Option<&'a str>, &'a str) {
    let name = node.tag_name();
    (name.namespace(), name.name())
}

/// Namespaces declared on the root, prefix to URI.
///
/// The stripped default namespace is reported under the `""` key.
pub fn declared_namespaces(
    root: Node<'_, '_>,
    default_uri: Option<&str>,
) -> BTreeMap<String, String> {
    let mut declared: BTreeMap<String, String> = root
        .namespaces()
        .filter_map(|ns| Some((ns.name()?.to_string(), ns.uri().to_string())))
        .filter(|(prefix, _)| prefix != "xml")
        .collect();
    if let Some(uri) = default_uri {
        declared.insert(String::new(), uri.to_string());
    }
    declared
}
