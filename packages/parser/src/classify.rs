//! Feed format classification.
//!
//! The format is decided from three signals: the detected default
//! namespace, the root element's local name and its `version` attribute.

use roxmltree::Node;

use crate::config::XMLNS_FORMATS;
use crate::error::{FeedError, Result};
use crate::types::FormatToken;
use crate::xml::{get_attribute, get_tag_name};

/// Classify a document from its root element and default namespace.
///
/// # Errors
/// Returns `FeedError::Classification` when the signals do not compose to a
/// known [`FormatToken`].
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use rapidfeed_parser::classify::classify;
/// use rapidfeed_parser::types::FormatToken;
///
/// let doc = Document::parse(r#"<rss version="2.0"/>"#).unwrap();
/// assert_eq!(classify(doc.root_element(), None).unwrap(), FormatToken::Rss20);
/// ```
pub fn classify(root: Node<'_, '_>, default_ns: Option<&str>) -> Result<FormatToken> {
    let root_tag = get_tag_name(root).to_ascii_lowercase();
    let namespace = default_ns.map(|ns| ns.strip_suffix('#').unwrap_or(ns));

    if let Some(token) = namespace.and_then(|ns| namespace_format(ns, &root_tag)) {
        return Ok(token);
    }

    let suffix = match (get_attribute(root, "version"), namespace) {
        (Some(version), _) => version.replace('.', ""),
        (None, Some(ns)) => namespace_version(ns).unwrap_or_else(|| "unk".to_string()),
        (None, None) => "unk".to_string(),
    };

    let family = match root_tag.as_str() {
        "rss" | "rdf" => "rss",
        "feed" => "atom",
        other => other,
    };

    let detected = match (family, suffix.as_str()) {
        ("rss", "10" | "rdf") => "rss010".to_string(),
        ("rss", "09" | "090") => "rss090".to_string(),
        _ => format!("{family}{suffix}"),
    };

    if detected.contains("unk") {
        return Err(classification_error(root, detected));
    }
    FormatToken::from_token(&detected).ok_or_else(|| classification_error(root, detected))
}

/// Format implied by a default namespace that identifies one on its own.
fn namespace_format(namespace: &str, root_tag: &str) -> Option<FormatToken> {
    let lowered = namespace.to_ascii_lowercase();
    let token = XMLNS_FORMATS
        .iter()
        .find(|(uri, _)| *uri == lowered)
        .map(|(_, token)| *token)?;

    match token {
        // RSS 0.90 documents that borrowed the RSS 1.0 namespace.
        FormatToken::Rss010 if root_tag == "rss" => Some(FormatToken::Rss090),
        // Atom elements embedded in an RSS document do not make it Atom.
        token if token.is_atom() && root_tag == "rss" => None,
        token => Some(token),
    }
}

/// Version segment of a namespace URI: the second-to-last path component.
fn namespace_version(namespace: &str) -> Option<String> {
    let segments: Vec<&str> = namespace.split('/').collect();
    let segment = segments.len().checked_sub(2).map(|idx| segments[idx])?;
    (!segment.is_empty()).then(|| segment.replace('.', ""))
}

fn classification_error(root: Node<'_, '_>, detected: String) -> FeedError {
    FeedError::Classification {
        root: get_tag_name(root).to_string(),
        detected,
    }
}
