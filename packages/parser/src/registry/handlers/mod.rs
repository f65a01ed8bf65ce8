//! Field handlers for feed-level and entry-level elements.
//!
//! Handlers are plain functions registered in a [`TagRegistry`]. The helpers
//! in this module hold the extraction rules shared by both record kinds.
//!
//! [`TagRegistry`]: super::TagRegistry

pub mod entry;
pub mod feed;
pub mod media;

use roxmltree::Node;

use super::types::DispatchContext;
use crate::error::Result;
use crate::links::resolve;
use crate::sanitize::strip_outer_tag;
use crate::text::{clean_text, parse_date, to_parsed_date};
use crate::types::{Attributes, ParsedDate};
use crate::xml::{get_attribute, get_text, inner_markup};

/// Attributes resolved against the base URL when recorded.
const LINK_ATTRS: &[&str] = &["href", "url"];

/// Whether the element carries a namespace.
pub(crate) fn is_namespaced(node: Node<'_, '_>) -> bool {
    node.tag_name().namespace().is_some()
}

/// An alternate-namespace element never overwrites a value that is already set.
pub(crate) fn is_namespaced_duplicate(node: Node<'_, '_>, already_set: bool) -> bool {
    already_set && is_namespaced(node)
}

/// Trimmed direct text of an element.
pub(crate) fn text_value(node: Node<'_, '_>) -> Option<String> {
    clean_text(get_text(node).as_deref())
}

/// Sanitized inner markup, `None` for an empty element.
pub(crate) fn sanitized_markup(
    node: Node<'_, '_>,
    context: &DispatchContext<'_>,
) -> Result<Option<String>> {
    let markup = inner_markup(node, context.source)?;
    Ok(markup.map(|m| context.sanitizer.sanitize(m.trim())))
}

/// Title-like text: sanitized, unwrapped from a single `<p>`/`<div>`,
/// empty when the element has no content.
pub(crate) fn title_value(node: Node<'_, '_>, context: &DispatchContext<'_>) -> Result<String> {
    Ok(sanitized_markup(node, context)?
        .map(|html| strip_outer_tag(&html).trim().to_string())
        .unwrap_or_default())
}

/// Raw date text and its normalized value.
pub(crate) fn date_value(
    node: Node<'_, '_>,
    context: &DispatchContext<'_>,
) -> Option<(String, Option<ParsedDate>)> {
    let raw = text_value(node).filter(|t| !t.is_empty())?;
    let parsed = parse_date(&raw).map(|dt| to_parsed_date(dt, context.unix_timestamps));
    Some((raw, parsed))
}

/// Candidate primary link of a link-family element.
///
/// Text wins, then an alternate `href`, then an `href` without `rel`.
pub(crate) fn link_value(node: Node<'_, '_>, context: &DispatchContext<'_>) -> Option<String> {
    let href = get_attribute(node, "href");
    let candidate = text_value(node)
        .filter(|t| !t.is_empty())
        .or_else(|| match (get_attribute(node, "rel"), href) {
            (Some("alternate"), Some(href)) | (None, Some(href)) => Some(href.to_string()),
            _ => None,
        })?;
    Some(resolve(&candidate, context.base))
}

/// Attribute record of an element, with link attributes made absolute.
pub(crate) fn link_record(node: Node<'_, '_>, context: &DispatchContext<'_>) -> Attributes {
    attribute_record(node, context, LINK_ATTRS)
}

/// Attribute record of an element in document order.
///
/// Namespaced attribute names are written as `prefix:local`. Values of the
/// attributes named in `resolve_attrs` are resolved against the base URL.
pub(crate) fn attribute_record(
    node: Node<'_, '_>,
    context: &DispatchContext<'_>,
    resolve_attrs: &[&str],
) -> Attributes {
    node.attributes()
        .map(|attr| {
            let name = context
                .namespaces
                .qualify(attr.namespace(), attr.name())
                .unwrap_or_else(|| attr.name().to_string());
            let value = if resolve_attrs.contains(&attr.name()) {
                resolve(attr.value(), context.base)
            } else {
                attr.value().to_string()
            };
            (name, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::HtmlCleaner;
    use crate::xml::NamespaceMap;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    fn with_context<T>(
        xml: &str,
        base: Option<&str>,
        f: impl FnOnce(Node<'_, '_>, &DispatchContext<'_>) -> T,
    ) -> T {
        let doc = Document::parse(xml).unwrap();
        let namespaces = NamespaceMap::for_root(doc.root_element());
        let context = DispatchContext::new(&namespaces, &HtmlCleaner, false, xml).with_base(base);
        f(doc.root_element(), &context)
    }

    #[test]
    fn test_link_value_priority() {
        let value = with_context("<link>http://x.com/post</link>", None, link_value);
        assert_eq!(value.as_deref(), Some("http://x.com/post"));

        let value = with_context(
            r#"<link rel="alternate" href="/post"/>"#,
            Some("http://x.com"),
            link_value,
        );
        assert_eq!(value.as_deref(), Some("http://x.com/post"));

        let value = with_context(r#"<link rel="self" href="/feed"/>"#, None, link_value);
        assert_eq!(value, None);

        let value = with_context(r#"<link href="http://x.com/bare"/>"#, None, link_value);
        assert_eq!(value.as_deref(), Some("http://x.com/bare"));
    }

    #[test]
    fn test_link_record_resolves_href() {
        let record = with_context(
            r#"<link rel="enclosure" href="a.mp3" length="10"/>"#,
            Some("http://x.com/"),
            link_record,
        );
        let expected: Attributes = [
            ("rel", "enclosure"),
            ("href", "http://x.com/a.mp3"),
            ("length", "10"),
        ]
        .into_iter()
        .collect();
        assert_eq!(record, expected);
    }

    #[test]
    fn test_attribute_record_qualifies_namespaced_names() {
        let record = with_context(
            r#"<link xml:lang="en" href="http://x.com/"/>"#,
            None,
            |node, ctx| attribute_record(node, ctx, &[]),
        );
        assert_eq!(record.get("xml:lang"), Some("en"));
    }

    #[test]
    fn test_title_value_unwraps_and_cleans() {
        let title = with_context(
            "<title>&lt;p&gt;Hello &lt;script&gt;x&lt;/script&gt;&lt;/p&gt;</title>",
            None,
            |node, ctx| title_value(node, ctx).unwrap(),
        );
        assert_eq!(title, "Hello");
    }

    #[test]
    fn test_title_value_empty_element() {
        let title = with_context("<title/>", None, |node, ctx| title_value(node, ctx).unwrap());
        assert_eq!(title, "");
    }

    #[test]
    fn test_date_value_unparseable_keeps_raw() {
        let value = with_context("<pubDate> someday </pubDate>", None, date_value);
        assert_eq!(value, Some(("someday".to_string(), None)));
    }
}
