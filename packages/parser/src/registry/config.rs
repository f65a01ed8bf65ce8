//! Per-format configuration: container layout and tag maps.
//!
//! Each format family gets one [`FormatProfile`], built on first use and
//! shared for the lifetime of the process.

use std::sync::LazyLock;

use roxmltree::Node;

use super::core::TagRegistry;
use super::engine::DispatchEngine;
use super::handlers::{entry, feed, media};
use super::types::EntryDraft;
use crate::types::{FeedMetadata, FormatToken};
use crate::xml::{element_children, find_child, find_children, get_tag_name};

/// Where a format keeps its feed metadata and its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Metadata in `root/channel`; entries at `root/item` and `root/channel/item`.
    Channel,
    /// Metadata on the root; entries at `root/entry`.
    Root,
}

impl Layout {
    /// Element holding the feed-level fields.
    pub fn feed_container<'a, 'input>(self, root: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
        match self {
            Layout::Channel => find_child(root, "channel"),
            Layout::Root => Some(root),
        }
    }

    /// Entry elements in document order.
    pub fn entry_nodes<'a, 'input>(self, root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        match self {
            Layout::Channel => {
                let mut items = Vec::new();
                for child in element_children(root) {
                    if child.tag_name().namespace().is_some() {
                        continue;
                    }
                    match get_tag_name(child) {
                        "item" => items.push(child),
                        "channel" => items.extend(find_children(child, "item")),
                        _ => {}
                    }
                }
                items
            }
            Layout::Root => find_children(root, "entry").collect(),
        }
    }
}

/// Everything needed to parse one format family.
pub struct FormatProfile {
    pub name: &'static str,
    pub layout: Layout,
    pub feed: DispatchEngine<FeedMetadata>,
    pub entry: DispatchEngine<EntryDraft>,
    /// Always copy the first content block into the summary.
    pub mirror_content_to_summary: bool,
}

static RSS_PROFILE: LazyLock<FormatProfile> = LazyLock::new(|| FormatProfile {
    name: "rss",
    layout: Layout::Channel,
    feed: DispatchEngine::new(create_rss_feed_registry()),
    entry: DispatchEngine::new(create_rss_entry_registry()),
    mirror_content_to_summary: false,
});

static RDF_PROFILE: LazyLock<FormatProfile> = LazyLock::new(|| FormatProfile {
    name: "rdf",
    layout: Layout::Channel,
    feed: DispatchEngine::new(create_rss_feed_registry()),
    entry: DispatchEngine::new(create_rdf_entry_registry()),
    mirror_content_to_summary: false,
});

static ATOM_PROFILE: LazyLock<FormatProfile> = LazyLock::new(|| FormatProfile {
    name: "atom",
    layout: Layout::Root,
    feed: DispatchEngine::new(create_atom_feed_registry()),
    entry: DispatchEngine::new(create_atom_entry_registry()),
    mirror_content_to_summary: true,
});

/// Get the profile for a classified document.
#[must_use]
pub fn profile_for(token: FormatToken) -> &'static FormatProfile {
    match token {
        FormatToken::Rss20 | FormatToken::Rss092 | FormatToken::Rss091 => &RSS_PROFILE,
        FormatToken::Rss010 | FormatToken::Rss090 => &RDF_PROFILE,
        FormatToken::Atom10 | FormatToken::Atom03 => &ATOM_PROFILE,
    }
}

/// Feed-level date tags for every family; the first one present wins.
const FEED_DATE_TAGS: &[&str] = &["lastBuildDate", "pubDate", "date", "updated", "modified"];

/// Channel fields of RSS 0.9x/1.0/2.0.
#[must_use]
pub fn create_rss_feed_registry() -> TagRegistry<FeedMetadata> {
    let mut registry = TagRegistry::new();

    registry.register("title", feed::title);
    registry.register("description", feed::subtitle);
    registry.register("link", feed::link);
    registry.register_all(FEED_DATE_TAGS, feed::date);
    registry.register("generator", feed::generator);
    registry.register("language", feed::language);

    registry
}

/// Feed fields of Atom 0.3/1.0.
#[must_use]
pub fn create_atom_feed_registry() -> TagRegistry<FeedMetadata> {
    let mut registry = TagRegistry::new();

    registry.register("title", feed::title);
    registry.register_all(&["subtitle", "tagline"], feed::subtitle);
    registry.register("link", feed::link);
    registry.register_all(FEED_DATE_TAGS, feed::date);
    registry.register("generator", feed::generator);
    registry.register("language", feed::language);
    registry.register("id", feed::id);

    registry
}

/// Fields shared by every entry registry.
fn create_common_entry_registry() -> TagRegistry<EntryDraft> {
    let mut registry = TagRegistry::new();

    registry.register("title", entry::title);
    registry.register("link", entry::link);
    registry.register_all(&["author", "creator"], entry::author);
    registry.register_all(&["itunes:author", "googleplay:author"], entry::author_fallback);
    registry.register("comments", entry::comments);
    registry.register_all(&["encoded", "content"], entry::content);
    registry.register_all(&["summary", "description"], entry::summary);
    registry.register("itunes:summary", entry::summary_fallback);

    // Media RSS
    registry.register("media:content", media::content);
    registry.register("media:thumbnail", media::thumbnail);
    registry.register("media:group", media::group);

    registry
}

/// RSS 0.9x/2.0 items.
#[must_use]
pub fn create_rss_entry_registry() -> TagRegistry<EntryDraft> {
    let mut registry = create_common_entry_registry();

    registry.register_all(&["pubDate", "date", "updated", "modified"], entry::date);
    registry.register_all(&["guid", "id"], entry::guid);
    registry.register("enclosure", entry::enclosure);

    registry
}

/// RSS 0.90/1.0 items, which carry their dates in Dublin Core.
#[must_use]
pub fn create_rdf_entry_registry() -> TagRegistry<EntryDraft> {
    let mut registry = create_common_entry_registry();

    registry.register_all(&["date", "pubDate", "modified"], entry::date);
    registry.register_all(&["issued", "created"], entry::date_fallback);
    registry.register_all(&["guid", "identifier"], entry::guid);

    registry
}

/// Atom 0.3/1.0 entries.
#[must_use]
pub fn create_atom_entry_registry() -> TagRegistry<EntryDraft> {
    let mut registry = create_common_entry_registry();

    registry.register_all(&["updated", "modified"], entry::date);
    registry.register_all(&["published", "issued", "created"], entry::date_fallback);
    registry.register("id", entry::guid);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    #[test]
    fn test_profile_for_families() {
        assert_eq!(profile_for(FormatToken::Rss091).name, "rss");
        assert_eq!(profile_for(FormatToken::Rss010).name, "rdf");
        assert_eq!(profile_for(FormatToken::Atom03).name, "atom");
        assert!(profile_for(FormatToken::Atom10).mirror_content_to_summary);
    }

    #[test]
    fn test_channel_layout_collects_items_from_root_and_channel() {
        let xml = "<RDF><channel><title>t</title><item>1</item></channel><item>2</item><item>3</item></RDF>";
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        let texts: Vec<_> = Layout::Channel
            .entry_nodes(root)
            .into_iter()
            .filter_map(|n| n.text())
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
        assert!(Layout::Channel.feed_container(root).is_some());
    }

    #[test]
    fn test_root_layout() {
        let doc = Document::parse("<feed><entry/><entry/><item/></feed>").unwrap();
        let root = doc.root_element();
        assert_eq!(Layout::Root.entry_nodes(root).len(), 2);
        assert_eq!(Layout::Root.feed_container(root), Some(root));
    }

    #[test]
    fn test_rss_entry_registry_keys() {
        let registry = create_rss_entry_registry();
        for key in ["title", "link", "description", "encoded", "media:content", "enclosure"] {
            assert!(registry.has_handler(key), "missing handler for {key}");
        }
        assert!(!registry.has_handler("published"));
    }

    #[test]
    fn test_feed_registries_share_date_tags() {
        for registry in [create_rss_feed_registry(), create_atom_feed_registry()] {
            for key in FEED_DATE_TAGS {
                assert!(registry.has_handler(key), "missing handler for {key}");
            }
        }
    }
}
