//! Handlers for channel/feed-level elements.

use roxmltree::Node;

use super::{
    date_value, is_namespaced_duplicate, link_record, link_value, text_value, title_value,
};
use crate::error::Result;
use crate::registry::types::DispatchContext;
use crate::types::FeedMetadata;

/// Feed title.
pub fn title(node: Node<'_, '_>, feed: &mut FeedMetadata, ctx: &DispatchContext<'_>) -> Result<()> {
    if is_namespaced_duplicate(node, !feed.title.is_empty()) {
        return Ok(());
    }
    feed.title = title_value(node, ctx)?;
    Ok(())
}

/// Feed subtitle (`description`, `subtitle`, `tagline`).
pub fn subtitle(
    node: Node<'_, '_>,
    feed: &mut FeedMetadata,
    ctx: &DispatchContext<'_>,
) -> Result<()> {
    if is_namespaced_duplicate(node, feed.subtitle.is_some()) {
        return Ok(());
    }
    feed.subtitle = Some(title_value(node, ctx)?);
    Ok(())
}

/// Feed link. The first usable value becomes the primary link; every
/// element is recorded in `links`.
pub fn link(node: Node<'_, '_>, feed: &mut FeedMetadata, ctx: &DispatchContext<'_>) -> Result<()> {
    if feed.link.is_empty() {
        if let Some(value) = link_value(node, ctx) {
            feed.link = value;
        }
    }
    feed.links.push(link_record(node, ctx));
    Ok(())
}

/// Feed date; the first dated element in document order wins.
pub fn date(node: Node<'_, '_>, feed: &mut FeedMetadata, ctx: &DispatchContext<'_>) -> Result<()> {
    if feed.updated.is_some() {
        return Ok(());
    }
    if let Some((raw, parsed)) = date_value(node, ctx) {
        feed.updated = Some(raw);
        feed.updated_parsed = parsed;
    }
    Ok(())
}

pub fn generator(
    node: Node<'_, '_>,
    feed: &mut FeedMetadata,
    _ctx: &DispatchContext<'_>,
) -> Result<()> {
    feed.generator = text_value(node);
    Ok(())
}

pub fn language(
    node: Node<'_, '_>,
    feed: &mut FeedMetadata,
    _ctx: &DispatchContext<'_>,
) -> Result<()> {
    if is_namespaced_duplicate(node, feed.language.is_some()) {
        return Ok(());
    }
    feed.language = text_value(node).filter(|lang| !lang.is_empty());
    Ok(())
}

pub fn id(node: Node<'_, '_>, feed: &mut FeedMetadata, _ctx: &DispatchContext<'_>) -> Result<()> {
    if is_namespaced_duplicate(node, feed.id.is_some()) {
        return Ok(());
    }
    feed.id = text_value(node);
    Ok(())
}
