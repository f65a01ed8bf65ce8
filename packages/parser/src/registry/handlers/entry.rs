//! Handlers for item/entry-level elements.

use roxmltree::Node;

use super::{
    attribute_record, date_value, is_namespaced, is_namespaced_duplicate, link_record,
    link_value, media, sanitized_markup, text_value, title_value,
};
use crate::config::PODCAST_NAMESPACES;
use crate::error::Result;
use crate::registry::types::{DispatchContext, EntryDraft};
use crate::text::munge_author;
use crate::types::ContentValue;
use crate::xml::{element_children, get_tag_name, split_tag};

/// Attributes of an enclosure that hold its URL.
const ENCLOSURE_URL_ATTRS: &[&str] = &["url", "href"];

pub fn title(node: Node<'_, '_>, draft: &mut EntryDraft, ctx: &DispatchContext<'_>) -> Result<()> {
    if is_namespaced_duplicate(node, draft.entry.title.is_some()) {
        return Ok(());
    }
    draft.entry.title = Some(title_value(node, ctx)?);
    Ok(())
}

/// Primary entry date (`pubDate`, `dc:date`, `updated`, `modified`).
pub fn date(node: Node<'_, '_>, draft: &mut EntryDraft, ctx: &DispatchContext<'_>) -> Result<()> {
    if let Some((raw, parsed)) = date_value(node, ctx) {
        draft.entry.updated = Some(raw);
        draft.entry.updated_parsed = parsed;
    }
    Ok(())
}

/// Secondary dates (`published`, `issued`, `created`), used only when no
/// primary date has been seen.
pub fn date_fallback(
    node: Node<'_, '_>,
    draft: &mut EntryDraft,
    ctx: &DispatchContext<'_>,
) -> Result<()> {
    if draft.entry.updated.is_some() {
        return Ok(());
    }
    date(node, draft, ctx)
}

/// Author from a plain string or from `name`/`email` children.
pub fn author(node: Node<'_, '_>, draft: &mut EntryDraft, _ctx: &DispatchContext<'_>) -> Result<()> {
    if is_namespaced_duplicate(node, draft.entry.author.is_some()) {
        return Ok(());
    }
    draft.entry.author = Some(author_value(node));
    Ok(())
}

/// Podcast author, only when nothing else supplied one.
pub fn author_fallback(
    node: Node<'_, '_>,
    draft: &mut EntryDraft,
    ctx: &DispatchContext<'_>,
) -> Result<()> {
    if draft.entry.author.is_some() {
        return Ok(());
    }
    author(node, draft, ctx)
}

fn author_value(node: Node<'_, '_>) -> String {
    if element_children(node).next().is_none() {
        return text_value(node)
            .map(|text| munge_author(&text))
            .unwrap_or_default();
    }

    let child_text = |tag: &str| {
        element_children(node)
            .find(|child| get_tag_name(*child) == tag)
            .and_then(text_value)
            .filter(|text| !text.is_empty())
    };

    match (child_text("name"), child_text("email")) {
        (Some(name), Some(email)) => format!("{name} ({email})"),
        (Some(name), None) => name,
        (None, Some(email)) => email,
        (None, None) => String::new(),
    }
}

pub fn comments(
    node: Node<'_, '_>,
    draft: &mut EntryDraft,
    _ctx: &DispatchContext<'_>,
) -> Result<()> {
    if is_namespaced_duplicate(node, draft.entry.comments.is_some()) {
        return Ok(());
    }
    draft.entry.comments = text_value(node);
    Ok(())
}

/// `guid` (RSS) and `id` (Atom).
pub fn guid(node: Node<'_, '_>, draft: &mut EntryDraft, _ctx: &DispatchContext<'_>) -> Result<()> {
    if is_namespaced_duplicate(node, draft.entry.guid.is_some()) {
        return Ok(());
    }
    draft.entry.guid = text_value(node);
    Ok(())
}

/// Entry link. Nested `media:content` elements are handed to the media
/// handler.
pub fn link(node: Node<'_, '_>, draft: &mut EntryDraft, ctx: &DispatchContext<'_>) -> Result<()> {
    if draft.entry.link.is_none() {
        draft.entry.link = link_value(node, ctx);
    }
    draft.entry.links.push(link_record(node, ctx));

    for child in element_children(node) {
        if media::is_media_element(child, ctx, "content") {
            media::content(child, draft, ctx)?;
        }
    }
    Ok(())
}

/// `content:encoded` and Atom `content`.
///
/// A namespaced element named `content` (such as `media:content`) is not
/// entry content, unless it comes from a podcast namespace.
pub fn content(
    node: Node<'_, '_>,
    draft: &mut EntryDraft,
    ctx: &DispatchContext<'_>,
) -> Result<()> {
    let (uri, local) = split_tag(node);
    if local == "content" && is_namespaced(node) {
        let podcast = uri.is_some_and(|uri| PODCAST_NAMESPACES.contains(&uri));
        if !podcast {
            return Ok(());
        }
    }

    let value = sanitized_markup(node, ctx)?.unwrap_or_default();
    draft.entry.content.push(ContentValue::new(value));
    Ok(())
}

/// `description` and `summary`. Existing content takes precedence and is
/// mirrored verbatim.
pub fn summary(
    node: Node<'_, '_>,
    draft: &mut EntryDraft,
    ctx: &DispatchContext<'_>,
) -> Result<()> {
    if is_namespaced_duplicate(node, draft.entry.summary.is_some()) {
        return Ok(());
    }

    if let Some(first) = draft.entry.content.first() {
        draft.entry.summary = Some(first.value.clone());
        return Ok(());
    }

    match sanitized_markup(node, ctx)? {
        Some(value) => draft.entry.summary = Some(value),
        None if draft.entry.summary.is_none() => draft.summary_is_null = true,
        None => {}
    }
    Ok(())
}

/// Podcast summary, only when nothing else supplied one.
pub fn summary_fallback(
    node: Node<'_, '_>,
    draft: &mut EntryDraft,
    ctx: &DispatchContext<'_>,
) -> Result<()> {
    if draft.entry.summary.is_some() {
        return Ok(());
    }
    summary(node, draft, ctx)
}

pub fn enclosure(
    node: Node<'_, '_>,
    draft: &mut EntryDraft,
    ctx: &DispatchContext<'_>,
) -> Result<()> {
    draft
        .entry
        .enclosures
        .push(attribute_record(node, ctx, ENCLOSURE_URL_ATTRS));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::HtmlCleaner;
    use crate::xml::NamespaceMap;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    type Handler = fn(Node<'_, '_>, &mut EntryDraft, &DispatchContext<'_>) -> Result<()>;

    /// Route each child of the root to the handler chosen by `route`.
    fn apply(xml: &str, route: impl Fn(&str) -> Option<Handler>) -> EntryDraft {
        let doc = Document::parse(xml).unwrap();
        let namespaces = NamespaceMap::for_root(doc.root_element());
        let ctx = DispatchContext::new(&namespaces, &HtmlCleaner, false, xml)
            .with_base(Some("http://x.com/"));
        let mut draft = EntryDraft::default();
        for child in element_children(doc.root_element()) {
            let key = namespaces
                .qualify(child.tag_name().namespace(), get_tag_name(child))
                .unwrap_or_else(|| get_tag_name(child).to_string());
            if let Some(handler) = route(&key) {
                handler(child, &mut draft, &ctx).unwrap();
            }
        }
        draft
    }

    #[test]
    fn test_author_munged() {
        let draft = apply("<item><author>jane@x.com (Jane Doe)</author></item>", |_| {
            Some(author)
        });
        assert_eq!(draft.entry.author.as_deref(), Some("Jane Doe (jane@x.com)"));
    }

    #[test]
    fn test_author_from_children() {
        let draft = apply(
            "<entry><author><name>Jane</name><email>jane@x.com</email></author></entry>",
            |_| Some(author),
        );
        assert_eq!(draft.entry.author.as_deref(), Some("Jane (jane@x.com)"));

        let draft = apply("<entry><author><name>Jane</name></author></entry>", |_| {
            Some(author)
        });
        assert_eq!(draft.entry.author.as_deref(), Some("Jane"));

        let draft = apply("<entry><author><email>jane@x.com</email></author></entry>", |_| {
            Some(author)
        });
        assert_eq!(draft.entry.author.as_deref(), Some("jane@x.com"));

        let draft = apply("<entry><author><uri>http://x</uri></author></entry>", |_| {
            Some(author)
        });
        assert_eq!(draft.entry.author.as_deref(), Some(""));
    }

    #[test]
    fn test_podcast_author_is_fallback_only() {
        let route = |key: &str| match key {
            "author" => Some(author as Handler),
            "itunes:author" => Some(author_fallback as Handler),
            _ => None,
        };

        let xml = r#"<item xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
            <author>Writer</author><itunes:author>Pod Person</itunes:author></item>"#;
        assert_eq!(apply(xml, route).entry.author.as_deref(), Some("Writer"));

        let xml = r#"<item xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
            <itunes:author>Pod Person</itunes:author></item>"#;
        assert_eq!(apply(xml, route).entry.author.as_deref(), Some("Pod Person"));
    }

    #[test]
    fn test_media_content_is_not_entry_content() {
        let xml = r#"<item xmlns:media="http://search.yahoo.com/mrss/"
                         xmlns:content="http://purl.org/rss/1.0/modules/content/">
            <media:content url="http://x.com/a.jpg"/>
            <content:encoded>&lt;p&gt;Body&lt;/p&gt;</content:encoded></item>"#;
        let draft = apply(xml, |key| match key {
            "media:content" | "content:encoded" => Some(content),
            _ => None,
        });
        assert_eq!(draft.entry.content, vec![ContentValue::new("<p>Body</p>")]);
    }

    #[test]
    fn test_summary_mirrors_existing_content() {
        let xml = r#"<item xmlns:content="http://purl.org/rss/1.0/modules/content/">
            <content:encoded>Full body</content:encoded>
            <description>Short</description></item>"#;
        let draft = apply(xml, |key| match key {
            "content:encoded" => Some(content),
            "description" => Some(summary),
            _ => None,
        });
        assert_eq!(draft.entry.summary.as_deref(), Some("Full body"));
    }

    #[test]
    fn test_empty_summary_marks_null() {
        let draft = apply("<item><description/></item>", |_| Some(summary));
        assert_eq!(draft.entry.summary, None);
        assert!(draft.summary_is_null);
    }

    #[test]
    fn test_date_fallback_does_not_override() {
        let xml = "<entry><updated>2004-01-01T00:00:00Z</updated>\
                   <published>2003-01-01T00:00:00Z</published></entry>";
        let draft = apply(xml, |key| match key {
            "updated" => Some(date),
            "published" => Some(date_fallback),
            _ => None,
        });
        assert_eq!(draft.entry.updated.as_deref(), Some("2004-01-01T00:00:00Z"));
    }

    #[test]
    fn test_link_records_and_resolves() {
        let xml = r#"<entry>
            <link rel="enclosure" href="audio.mp3"/>
            <link rel="alternate" href="/post/1"/></entry>"#;
        let draft = apply(xml, |_| Some(link));
        assert_eq!(draft.entry.link.as_deref(), Some("http://x.com/post/1"));
        assert_eq!(draft.entry.links.len(), 2);
        assert_eq!(draft.entry.links[0].get("href"), Some("http://x.com/audio.mp3"));
    }

    #[test]
    fn test_link_with_nested_media_content() {
        let xml = r#"<item xmlns:media="http://search.yahoo.com/mrss/">
            <link>http://x.com/post<media:content url="http://x.com/v.mp4"/></link></item>"#;
        let draft = apply(xml, |key| (key == "link").then_some(link as Handler));
        assert_eq!(draft.entry.link.as_deref(), Some("http://x.com/post"));
        assert_eq!(draft.entry.media_content.len(), 1);
    }

    #[test]
    fn test_enclosure_recorded() {
        let xml = r#"<item><enclosure url="ep1.mp3" length="100" type="audio/mpeg"/></item>"#;
        let draft = apply(xml, |_| Some(enclosure));
        assert_eq!(
            draft.entry.enclosures[0].get("url"),
            Some("http://x.com/ep1.mp3")
        );
    }
}
