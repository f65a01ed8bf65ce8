//! Feed-level (channel) parsing.

use roxmltree::Node;

use crate::error::Result;
use crate::registry::{DispatchContext, FormatProfile};
use crate::types::FeedMetadata;

/// Parse the feed-level metadata of a classified document.
///
/// A missing container (an RSS document without `channel`) yields empty
/// metadata rather than an error.
///
/// # Errors
/// Returns the first field-handler error.
pub fn parse_feed(
    root: Node<'_, '_>,
    profile: &FormatProfile,
    context: &DispatchContext<'_>,
) -> Result<FeedMetadata> {
    let mut feed = FeedMetadata::default();
    let Some(container) = profile.layout.feed_container(root) else {
        tracing::debug!(format = profile.name, "no feed container found");
        return Ok(feed);
    };

    profile.feed.dispatch(container, &mut feed, context)?;

    if feed.language.is_none() {
        feed.language = language_attribute(container).or_else(|| language_attribute(root));
    }
    if feed.link.is_empty() {
        if let Some(id) = &feed.id {
            feed.link = id.clone();
        }
    }

    Ok(feed)
}

/// First attribute whose name ends in `lang` (e.g. `xml:lang`).
fn language_attribute(node: Node<'_, '_>) -> Option<String> {
    node.attributes()
        .find(|attr| attr.name().ends_with("lang"))
        .map(|attr| attr.value().to_string())
}
