//! RapidFeed - fast RSS, RDF and Atom feed parsing.
//!
//! This crate turns feed documents into a uniform [`ParsedDocument`]:
//! feed-level metadata plus a list of entries, with HTML cleaned, dates
//! normalized and relative links resolved. Parsing never fails; a document
//! that cannot be parsed is returned with `bozo` set and an error
//! description attached.
//!
//! # Example
//!
//! ```
//! use rapidfeed_parser::{parse, FormatToken, ParseOptions};
//!
//! let xml = r#"<rss version="2.0"><channel>
//!     <title>Example</title>
//!     <link>http://example.com</link>
//!     <item><guid>posts/1</guid><description>Hello</description></item>
//! </channel></rss>"#;
//!
//! let doc = parse(xml, &ParseOptions::default());
//! assert_eq!(doc.version, Some(FormatToken::Rss20));
//! assert_eq!(doc.entries[0].link.as_deref(), Some("http://example.com/posts/1"));
//! assert_eq!(doc.entries[0].content[0].value, "Hello");
//! ```
//!
//! # Architecture
//!
//! - [`parser`]: Pipeline orchestration and the bozo boundary
//! - [`classify`]: Format detection from the root element
//! - [`feed`]: Feed-level metadata parsing
//! - [`entry`]: Entry parsing and summary/content cross-fill
//! - [`registry`]: Tag-dispatch tables and field handlers
//! - [`xml`]: Tree navigation and namespace handling
//! - [`sanitize`]: HTML cleaning policies
//! - [`links`]: Base URL detection and link resolution
//! - [`text`]: Decoding, dates and author names
//! - [`types`]: Data model
//! - [`config`]: Constants and parse options
//! - [`error`]: Error types and Result alias
//! - [`http`]: feed requests with retries and conditional fetches
//! - [`fetch`]: Batch downloader
//! - [`bench`]: Multi-threaded parse benchmark
//! - [`cli`]: Command-line interface

pub mod bench;
pub mod classify;
pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod http;
pub mod links;
pub mod parser;
pub mod registry;
pub mod sanitize;
pub mod text;
pub mod types;
pub mod xml;

// Re-export main functions
pub use parser::{parse, parse_bytes};

// Re-export commonly used items
pub use config::ParseOptions;
pub use error::{ErrorInfo, ErrorKind, FeedError, Result, Stage};
pub use links::{base_url, resolve};
pub use sanitize::{SanitizePolicy, Sanitizer};
pub use text::{munge_author, parse_date};
pub use types::{
    Attributes, ContentValue, Entry, FeedMetadata, FormatToken, ParsedDate, ParsedDocument,
};
