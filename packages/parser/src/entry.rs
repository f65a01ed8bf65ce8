//! Entry-level parsing and post-processing.

use roxmltree::Node;

use crate::error::Result;
use crate::links::resolve;
use crate::registry::{DispatchContext, EntryDraft, FormatProfile};
use crate::types::{ContentValue, Entry};

/// Parse every entry of a classified document.
///
/// `context` must already carry the entry-level base URL.
///
/// # Errors
/// Returns the first field-handler error; no partial entry list is kept.
pub fn parse_entries(
    root: Node<'_, '_>,
    profile: &FormatProfile,
    context: &DispatchContext<'_>,
) -> Result<Vec<Entry>> {
    profile
        .layout
        .entry_nodes(root)
        .into_iter()
        .map(|node| -> Result<Entry> {
            let mut draft = EntryDraft::default();
            profile.entry.dispatch(node, &mut draft, context)?;
            Ok(finish_entry(draft, profile.mirror_content_to_summary, context.base))
        })
        .collect()
}

/// Apply the summary/content cross-fill and the guid link fallback.
///
/// Afterwards an entry has a summary exactly when it has content.
#[must_use]
pub fn finish_entry(draft: EntryDraft, mirror_content_to_summary: bool, base: Option<&str>) -> Entry {
    let EntryDraft {
        mut entry,
        summary_is_null,
    } = draft;

    if mirror_content_to_summary {
        if let Some(first) = entry.content.first() {
            entry.summary = Some(first.value.clone());
        }
    }

    match (&entry.summary, entry.content.first()) {
        (None, Some(first)) => entry.summary = Some(first.value.clone()),
        (Some(summary), None) => entry.content = vec![ContentValue::new(summary.clone())],
        (None, None) if summary_is_null => {
            entry.summary = Some(String::new());
            entry.content = vec![ContentValue::default()];
        }
        _ => {}
    }

    if entry.link.is_none() {
        if let Some(guid) = &entry.guid {
            entry.link = Some(resolve(guid, base));
        }
    }

    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft(summary: Option<&str>, content: &[&str], summary_is_null: bool) -> EntryDraft {
        EntryDraft {
            entry: Entry {
                summary: summary.map(String::from),
                content: content.iter().map(|c| ContentValue::new(*c)).collect(),
                ..Entry::default()
            },
            summary_is_null,
        }
    }

    #[test]
    fn test_summary_from_content() {
        let entry = finish_entry(draft(None, &["body"], false), false, None);
        assert_eq!(entry.summary.as_deref(), Some("body"));
    }

    #[test]
    fn test_content_from_summary() {
        let entry = finish_entry(draft(Some("short"), &[], false), false, None);
        assert_eq!(entry.content, vec![ContentValue::new("short")]);
    }

    #[test]
    fn test_null_summary_without_content() {
        let entry = finish_entry(draft(None, &[], true), false, None);
        assert_eq!(entry.summary.as_deref(), Some(""));
        assert_eq!(entry.content, vec![ContentValue::new("")]);
    }

    #[test]
    fn test_no_summary_no_content() {
        let entry = finish_entry(draft(None, &[], false), false, None);
        assert_eq!(entry.summary, None);
        assert!(entry.content.is_empty());
    }

    #[test]
    fn test_mirroring_overrides_summary() {
        let entry = finish_entry(draft(Some("short"), &["full"], false), true, None);
        assert_eq!(entry.summary.as_deref(), Some("full"));

        let entry = finish_entry(draft(Some("short"), &["full"], false), false, None);
        assert_eq!(entry.summary.as_deref(), Some("short"));
    }

    #[test]
    fn test_guid_becomes_link() {
        let mut d = draft(None, &[], false);
        d.entry.guid = Some("posts/7".to_string());
        let entry = finish_entry(d, false, Some("http://x.com/"));
        assert_eq!(entry.link.as_deref(), Some("http://x.com/posts/7"));
    }

    #[test]
    fn test_existing_link_kept() {
        let mut d = draft(None, &[], false);
        d.entry.guid = Some("http://x.com/guid".to_string());
        d.entry.link = Some("http://x.com/link".to_string());
        let entry = finish_entry(d, false, None);
        assert_eq!(entry.link.as_deref(), Some("http://x.com/link"));
    }
}
