//! Base URL detection and relative link resolution.

use roxmltree::Node;

/// Find a base URL declared on an element.
///
/// Returns the value of the first attribute whose local name ends in `base`
/// (e.g. `xml:base`) and whose value is an absolute http(s) URL.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use rapidfeed_parser::links::base_url;
///
/// let doc = Document::parse(r#"<feed xml:base="http://x.com/blog/"/>"#).unwrap();
/// assert_eq!(base_url(doc.root_element()), Some("http://x.com/blog/"));
/// ```
pub fn base_url<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name().ends_with("base") && is_absolute(attr.value()))
        .map(|attr| attr.value())
}

/// Resolve `href` against `base`.
///
/// Absolute http(s) links, `javascript:` links and empty links are returned
/// unchanged, as is everything when there is no base.
///
/// # Examples
/// ```
/// use rapidfeed_parser::links::resolve;
///
/// assert_eq!(resolve("a/b", Some("http://x.com")), "http://x.com/a/b");
/// assert_eq!(resolve("/a/b", Some("http://x.com/")), "http://x.com/a/b");
/// assert_eq!(resolve("https://y.org/", Some("http://x.com")), "https://y.org/");
/// assert_eq!(resolve("a/b", None), "a/b");
/// ```
pub fn resolve(href: &str, base: Option<&str>) -> String {
    let Some(base) = base else {
        return href.to_string();
    };
    if href.is_empty() || href.starts_with("javascript:") || is_absolute(href) {
        return href.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

fn is_absolute(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}
