//! Configuration constants and parse options.

use crate::error::{FeedError, Result};
use crate::sanitize::SanitizePolicy;
use crate::types::FormatToken;

/// Number of leading bytes searched for a default `xmlns="..."` declaration.
pub const NAMESPACE_SCAN_WINDOW: usize = 1024;

/// Scan window used when the leading bytes are crowded with declarations.
pub const EXPANDED_NAMESPACE_SCAN_WINDOW: usize = 8192;

/// More `xmlns` occurrences than this in the first window expands the scan.
pub const VERBOSE_HEADER_XMLNS_COUNT: usize = 5;

/// Upper bound on the number of nodes a single document may produce.
pub const MAX_XML_NODES: u32 = 4_000_000;

/// HTTP timeout in seconds for the downloader.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default number of URLs fetched by the `fetch` command.
pub const DEFAULT_FETCH_LIMIT: usize = 1000;

/// Default worker count for the `bench` command.
pub const DEFAULT_JOBS: usize = 4;

/// Well-known feed ecosystem namespaces, URI to conventional prefix.
///
/// Document-declared prefixes are overlaid on top of this table.
pub const KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("http://www.w3.org/2005/Atom", "atom"),
    ("http://purl.org/atom/ns#", "atom03"),
    ("http://purl.org/rss/1.0/", "rss10"),
    ("http://my.netscape.com/rdf/simple/0.9/", "rss090"),
    ("http://purl.org/rss/1.0/modules/content/", "content"),
    ("http://purl.org/dc/elements/1.1/", "dc"),
    ("http://purl.org/dc/terms/", "dcterms"),
    ("http://www.itunes.com/dtds/podcast-1.0.dtd", "itunes"),
    ("http://www.google.com/schemas/play-podcasts/1.0", "googleplay"),
    ("https://podcastindex.org/namespace/1.0", "podcast"),
    ("http://search.yahoo.com/mrss/", "media"),
    ("http://search.yahoo.com/mrss", "media"),
    ("http://purl.org/rss/1.0/modules/syndication/", "sy"),
    ("http://purl.org/rss/1.0/modules/slash/", "slash"),
    ("http://www.georss.org/georss", "georss"),
    ("http://wellformedweb.org/CommentAPI/", "wfw"),
    ("http://rssnamespace.org/feedburner/ext/1.0", "feedburner"),
    ("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "rdf"),
    ("http://www.w3.org/XML/1998/namespace", "xml"),
];

/// Default namespaces that identify a format on their own.
///
/// Keys are lower-cased with any trailing `#` removed.
pub const XMLNS_FORMATS: &[(&str, FormatToken)] = &[
    ("http://www.w3.org/2005/atom", FormatToken::Atom10),
    ("http://purl.org/atom/ns", FormatToken::Atom03),
    ("http://purl.org/rss/1.0/", FormatToken::Rss010),
    ("http://my.netscape.com/rdf/simple/0.9/", FormatToken::Rss090),
];

/// Namespaces whose `content` elements carry entry content.
pub const PODCAST_NAMESPACES: &[&str] = &[
    "http://www.itunes.com/dtds/podcast-1.0.dtd",
    "https://podcastindex.org/namespace/1.0",
];

/// Options controlling a single parse call.
///
/// Options are immutable once built and may be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// How HTML-bearing fields are cleaned.
    pub sanitize: SanitizePolicy,
    /// Emit dates as epoch seconds instead of calendar times.
    pub unix_timestamps: bool,
}

impl ParseOptions {
    /// Options with the default cleaner and calendar-time dates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sanitize(mut self, sanitize: SanitizePolicy) -> Self {
        self.sanitize = sanitize;
        self
    }

    #[must_use]
    pub fn with_unix_timestamps(mut self, unix_timestamps: bool) -> Self {
        self.unix_timestamps = unix_timestamps;
        self
    }
}

/// Validate a worker count.
///
/// # Examples
/// ```
/// use rapidfeed_parser::config::validate_jobs;
///
/// assert!(validate_jobs(4).is_ok());
/// assert!(validate_jobs(0).is_err());
/// ```
pub fn validate_jobs(jobs: usize) -> Result<usize> {
    if jobs == 0 {
        return Err(FeedError::InvalidOption(
            "worker count must be at least 1".to_string(),
        ));
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ParseOptions::new()
            .with_sanitize(SanitizePolicy::None)
            .with_unix_timestamps(true);

        assert!(options.unix_timestamps);
        assert!(matches!(options.sanitize, SanitizePolicy::None));
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(!options.unix_timestamps);
        assert!(matches!(options.sanitize, SanitizePolicy::Default));
    }

    #[test]
    fn test_xmlns_format_keys_are_normalized() {
        for (uri, _) in XMLNS_FORMATS {
            assert_eq!(*uri, uri.to_lowercase());
            assert!(!uri.ends_with('#'));
        }
    }

    #[test]
    fn test_validate_jobs() {
        assert_eq!(validate_jobs(8).ok(), Some(8));
        assert!(validate_jobs(0).is_err());
    }
}
