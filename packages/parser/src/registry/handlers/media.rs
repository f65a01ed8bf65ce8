//! Handlers for Media RSS elements.

use roxmltree::Node;

use super::attribute_record;
use crate::error::Result;
use crate::registry::types::{DispatchContext, EntryDraft};
use crate::xml::{element_children, split_tag};

/// Prefix the media namespace resolves to.
const MEDIA_PREFIX: &str = "media";

/// Whether `node` is the media element with the given local name.
pub(crate) fn is_media_element(node: Node<'_, '_>, ctx: &DispatchContext<'_>, local: &str) -> bool {
    let (uri, name) = split_tag(node);
    name == local && uri.and_then(|uri| ctx.namespaces.prefix(uri)) == Some(MEDIA_PREFIX)
}

/// `media:content`: record its attributes and any nested thumbnails.
pub fn content(node: Node<'_, '_>, draft: &mut EntryDraft, ctx: &DispatchContext<'_>) -> Result<()> {
    draft.entry.media_content.push(attribute_record(node, ctx, &[]));
    for child in element_children(node) {
        if is_media_element(child, ctx, "thumbnail") {
            thumbnail(child, draft, ctx)?;
        }
    }
    Ok(())
}

/// `media:thumbnail`: record its attributes.
pub fn thumbnail(
    node: Node<'_, '_>,
    draft: &mut EntryDraft,
    ctx: &DispatchContext<'_>,
) -> Result<()> {
    draft
        .entry
        .media_thumbnail
        .push(attribute_record(node, ctx, &[]));
    Ok(())
}

/// `media:group`: route grouped content and thumbnails.
pub fn group(node: Node<'_, '_>, draft: &mut EntryDraft, ctx: &DispatchContext<'_>) -> Result<()> {
    for child in element_children(node) {
        if is_media_element(child, ctx, "content") {
            content(child, draft, ctx)?;
        } else if is_media_element(child, ctx, "thumbnail") {
            thumbnail(child, draft, ctx)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::Passthrough;
    use crate::xml::NamespaceMap;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    fn run_group(xml: &str) -> EntryDraft {
        let doc = Document::parse(xml).unwrap();
        let namespaces = NamespaceMap::for_root(doc.root_element());
        let ctx = DispatchContext::new(&namespaces, &Passthrough, false, xml);
        let mut draft = EntryDraft::default();
        group(doc.root_element(), &mut draft, &ctx).unwrap();
        draft
    }

    #[test]
    fn test_group_routes_children() {
        let draft = run_group(
            r#"<media:group xmlns:media="http://search.yahoo.com/mrss/">
                <media:content url="http://x.com/hi.mp4" medium="video">
                    <media:thumbnail url="http://x.com/hi.jpg"/>
                </media:content>
                <media:content url="http://x.com/lo.mp4"/>
                <media:thumbnail url="http://x.com/group.jpg"/>
                <media:title>ignored</media:title>
            </media:group>"#,
        );

        assert_eq!(draft.entry.media_content.len(), 2);
        assert_eq!(draft.entry.media_content[0].get("medium"), Some("video"));
        let thumbs: Vec<_> = draft
            .entry
            .media_thumbnail
            .iter()
            .filter_map(|t| t.get("url"))
            .collect();
        assert_eq!(thumbs, vec!["http://x.com/hi.jpg", "http://x.com/group.jpg"]);
    }

    #[test]
    fn test_group_ignores_foreign_namespaces() {
        let draft = run_group(
            r#"<media:group xmlns:media="http://search.yahoo.com/mrss/" xmlns:o="urn:other">
                <o:content url="http://x.com/other"/>
            </media:group>"#,
        );
        assert!(draft.entry.media_content.is_empty());
    }
}
