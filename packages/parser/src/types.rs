//! Core data types for parsed feeds.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ErrorInfo;

/// Canonical feed format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatToken {
    Rss20,
    Rss092,
    Rss091,
    Rss010,
    Rss090,
    Atom10,
    Atom03,
}

impl FormatToken {
    /// All known tokens.
    pub const ALL: [FormatToken; 7] = [
        FormatToken::Rss20,
        FormatToken::Rss092,
        FormatToken::Rss091,
        FormatToken::Rss010,
        FormatToken::Rss090,
        FormatToken::Atom10,
        FormatToken::Atom03,
    ];

    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatToken::Rss20 => "rss20",
            FormatToken::Rss092 => "rss092",
            FormatToken::Rss091 => "rss091",
            FormatToken::Rss010 => "rss010",
            FormatToken::Rss090 => "rss090",
            FormatToken::Atom10 => "atom10",
            FormatToken::Atom03 => "atom03",
        }
    }

    /// Look up a token by its string form.
    ///
    /// # Examples
    /// ```
    /// use rapidfeed_parser::types::FormatToken;
    ///
    /// assert_eq!(FormatToken::from_token("atom10"), Some(FormatToken::Atom10));
    /// assert_eq!(FormatToken::from_token("rssunk"), None);
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == token)
    }

    /// Whether the token belongs to the Atom family.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(self, FormatToken::Atom10 | FormatToken::Atom03)
    }
}

impl fmt::Display for FormatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered attribute record of a single element.
///
/// Serialized as a JSON object in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Get the first value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Normalized date value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParsedDate {
    /// Calendar time in UTC.
    Time(DateTime<Utc>),
    /// Seconds since the Unix epoch.
    Timestamp(i64),
}

/// A single content block of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentValue {
    pub value: String,
}

impl ContentValue {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Channel/feed-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub link: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_parsed: Option<ParsedDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A single item/entry of a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_parsed: Option<ParsedDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media_content: Vec<Attributes>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media_thumbnail: Vec<Attributes>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enclosures: Vec<Attributes>,
}

/// Result of parsing one document.
///
/// When `bozo` is false, `version` is set and `feed`/`entries` are complete.
/// When `bozo` is true, `bozo_error` describes the failure and `feed`/`entries`
/// are left at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedDocument {
    pub version: Option<FormatToken>,
    pub encoding: String,
    pub namespaces: BTreeMap<String, String>,
    pub feed: FeedMetadata,
    pub entries: Vec<Entry>,
    pub bozo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bozo_error: Option<ErrorInfo>,
}
