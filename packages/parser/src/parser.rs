//! Parse orchestration.
//!
//! Runs the pipeline stages in order (namespace strip, XML parse, classify,
//! feed, entries) and turns any stage failure into a bozo result. This is
//! the only place where a [`FeedError`] is converted.

use roxmltree::{Document, ParsingOptions};

use crate::classify::classify;
use crate::config::{ParseOptions, MAX_XML_NODES};
use crate::entry::parse_entries;
use crate::error::{ErrorInfo, FeedError, Stage};
use crate::feed::parse_feed;
use crate::links::base_url;
use crate::registry::{profile_for, DispatchContext};
use crate::text::{declared_encoding, decode_document};
use crate::types::ParsedDocument;
use crate::xml::{declared_namespaces, strip_default_namespace, NamespaceMap};

type StageResult<T> = std::result::Result<T, (Stage, FeedError)>;

/// Tag an error with the stage that produced it.
trait AtStage<T> {
    fn at(self, stage: Stage) -> StageResult<T>;
}

impl<T, E: Into<FeedError>> AtStage<T> for std::result::Result<T, E> {
    fn at(self, stage: Stage) -> StageResult<T> {
        self.map_err(|err| (stage, err.into()))
    }
}

/// Parse a feed document.
///
/// Never fails: malformed or unrecognized input yields a result with
/// `bozo == true` and a description of the failure in `bozo_error`.
///
/// # Examples
/// ```
/// use rapidfeed_parser::{parse, ParseOptions};
///
/// let doc = parse(
///     r#"<rss version="2.0"><channel><title>News</title></channel></rss>"#,
///     &ParseOptions::default(),
/// );
/// assert!(!doc.bozo);
/// assert_eq!(doc.feed.title, "News");
///
/// let broken = parse("<rss><channel>", &ParseOptions::default());
/// assert!(broken.bozo);
/// ```
#[must_use]
pub fn parse(document: &str, options: &ParseOptions) -> ParsedDocument {
    finish(document, declared_encoding(document), options)
}

/// Decode raw bytes and parse the resulting text.
///
/// The reported encoding is the one actually used for decoding.
#[must_use]
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> ParsedDocument {
    let (text, encoding) = decode_document(bytes);
    finish(&text, encoding, options)
}

fn finish(document: &str, encoding: String, options: &ParseOptions) -> ParsedDocument {
    match run_pipeline(document, options) {
        Ok(parsed) => ParsedDocument { encoding, ..parsed },
        Err((stage, err)) => {
            tracing::debug!(%stage, error = %err, "document marked bozo");
            ParsedDocument {
                encoding,
                bozo: true,
                bozo_error: Some(ErrorInfo::capture(stage, &err)),
                ..ParsedDocument::default()
            }
        }
    }
}

fn run_pipeline(document: &str, options: &ParseOptions) -> StageResult<ParsedDocument> {
    let (default_ns, text) = strip_default_namespace(document);

    let xml_options = ParsingOptions {
        allow_dtd: true,
        nodes_limit: MAX_XML_NODES,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(&text, xml_options).at(Stage::XmlParse)?;
    let root = doc.root_element();

    let version = classify(root, default_ns.as_deref()).at(Stage::Classify)?;
    let profile = profile_for(version);
    tracing::debug!(version = %version, profile = profile.name, "classified document");

    let namespaces = NamespaceMap::for_root(root);
    let root_base = base_url(root);
    let context = DispatchContext::new(
        &namespaces,
        options.sanitize.sanitizer(),
        options.unix_timestamps,
        &text,
    )
    .with_base(root_base);

    let feed = parse_feed(root, profile, &context).at(Stage::Feed)?;

    let entry_base = root_base.or_else(|| Some(feed.link.as_str()).filter(|link| !link.is_empty()));
    let entries = parse_entries(root, profile, &context.with_base(entry_base)).at(Stage::Entries)?;
    tracing::debug!(entries = entries.len(), "parsed entries");

    Ok(ParsedDocument {
        version: Some(version),
        encoding: String::new(),
        namespaces: declared_namespaces(root, default_ns.as_deref()),
        feed,
        entries,
        bozo: false,
        bozo_error: None,
    })
}
