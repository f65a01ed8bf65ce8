//! Tree helpers for navigating feed documents and extracting their text.

use roxmltree::Node;

use crate::error::{FeedError, Result};

/// Get the tag name without namespace.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use rapidfeed_parser::xml::get_tag_name;
///
/// let xml = r#"<rss xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:date/></rss>"#;
/// let doc = Document::parse(xml).unwrap();
/// let date = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(date), "date");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first un-namespaced child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use rapidfeed_parser::xml::find_child;
///
/// let doc = Document::parse("<rss><channel/></rss>").unwrap();
/// assert!(find_child(doc.root_element(), "channel").is_some());
/// assert!(find_child(doc.root_element(), "item").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_plain(*child, tag))
}

/// Find all un-namespaced child elements with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use rapidfeed_parser::xml::find_children;
///
/// let doc = Document::parse("<channel><item/><title/><item/></channel>").unwrap();
/// assert_eq!(find_children(doc.root_element(), "item").count(), 2);
/// ```
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |child| is_plain(*child, tag))
}

/// Iterate over element children, skipping text, comments and PIs.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

/// Get an attribute by local name, ignoring its namespace.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name() == name)
        .map(|attr| attr.value())
}

/// Concatenated text of the node's direct text children.
///
/// Returns `None` when the node has no text children at all.
pub fn get_text(node: Node<'_, '_>) -> Option<String> {
    let mut texts = node.children().filter(Node::is_text).peekable();
    texts.peek()?;
    Some(texts.filter_map(|t| t.text()).collect())
}

/// Inner markup of an element.
///
/// A leaf element yields its decoded text. An element with element children
/// yields the source markup between its start and end tags, with CDATA
/// markers removed. `None` when the element is empty.
///
/// # Errors
/// Returns `FeedError::Handler` if the node's source range does not map back
/// onto `source`.
pub fn inner_markup(node: Node<'_, '_>, source: &str) -> Result<Option<String>> {
    if !node.children().any(|child| child.is_element()) {
        return Ok(get_text(node));
    }

    let (Some(first), Some(last)) = (node.first_child(), node.last_child()) else {
        return Ok(None);
    };
    let range = first.range().start..last.range().end;
    let markup = source.get(range.clone()).ok_or_else(|| FeedError::Handler {
        tag: get_tag_name(node).to_string(),
        message: format!("source range {range:?} is outside the document"),
    })?;

    Ok(Some(markup.replace("<![CDATA[", "").replace("]]>", "")))
}

/// Check for an un-namespaced element with the given name.
fn is_plain(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().namespace().is_none() && get_tag_name(node) == tag
}
