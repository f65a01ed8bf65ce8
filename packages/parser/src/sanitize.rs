//! HTML sanitization for content-bearing fields.
//!
//! A [`SanitizePolicy`] is chosen per parse call and carried to every field
//! handler through the dispatch context. The default [`HtmlCleaner`] is a
//! stateless value whose patterns are compiled once and shared by all
//! threads.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

/// Cleans an HTML fragment.
pub trait Sanitizer: Send + Sync {
    /// Return a cleaned copy of `html`.
    fn sanitize(&self, html: &str) -> String;
}

/// How HTML-bearing fields are cleaned.
#[derive(Clone, Default)]
pub enum SanitizePolicy {
    /// Use the built-in [`HtmlCleaner`].
    #[default]
    Default,
    /// Leave markup untouched.
    None,
    /// Use a caller-provided sanitizer.
    Custom(Arc<dyn Sanitizer>),
}

impl SanitizePolicy {
    /// Resolve the policy to a sanitizer.
    #[must_use]
    pub fn sanitizer(&self) -> &dyn Sanitizer {
        match self {
            SanitizePolicy::Default => &HtmlCleaner,
            SanitizePolicy::None => &Passthrough,
            SanitizePolicy::Custom(custom) => custom.as_ref(),
        }
    }
}

impl fmt::Debug for SanitizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanitizePolicy::Default => f.write_str("Default"),
            SanitizePolicy::None => f.write_str("None"),
            SanitizePolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Sanitizer that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Sanitizer for Passthrough {
    fn sanitize(&self, html: &str) -> String {
        html.to_string()
    }
}

/// Elements removed together with everything inside them.
const KILL_TAGS: &[&str] = &[
    "script", "style", "object", "embed", "applet", "iframe", "frame", "frameset", "noscript",
];

/// Elements dropped, contents kept.
const UNWRAP_TAGS: &[&str] = &["html", "head", "body", "title", "form", "blink", "marquee"];

/// Void or form elements removed outright.
const REMOVE_TAGS: &[&str] = &[
    "meta", "link", "base", "input", "button", "select", "option", "textarea", "param",
];

/// Attributes kept on surviving elements.
const SAFE_ATTRS: &[&str] = &[
    "abbr", "accept", "accept-charset", "accesskey", "action", "align", "alt", "axis", "border",
    "cellpadding", "cellspacing", "char", "charoff", "charset", "checked", "cite", "class",
    "clear", "cols", "colspan", "color", "compact", "coords", "datetime", "dir", "disabled",
    "enctype", "for", "frame", "headers", "height", "href", "hreflang", "hspace", "id", "ismap",
    "label", "lang", "longdesc", "maxlength", "media", "method", "multiple", "name", "nohref",
    "noshade", "nowrap", "prompt", "readonly", "rel", "rev", "rows", "rowspan", "rules",
    "scope", "selected", "shape", "size", "span", "src", "start", "summary", "tabindex",
    "target", "title", "type", "usemap", "valign", "value", "vspace", "width",
];

/// Attributes whose values are URLs.
const URL_ATTRS: &[&str] = &["href", "src", "action", "cite", "longdesc", "usemap"];

/// URL schemes that execute script.
const SCRIPT_SCHEMES: &[&str] = &["javascript:", "vbscript:", "livescript:"];

/// Named references that can spell out a URL scheme.
const NAMED_REFERENCES: &[(&str, char)] = &[
    ("amp", '&'),
    ("colon", ':'),
    ("tab", '\t'),
    ("newline", '\n'),
    ("nbsp", '\u{a0}'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("sol", '/'),
    ("lpar", '('),
    ("rpar", ')'),
];

/// Upper bound on nested reference decoding.
const MAX_REFERENCE_PASSES: usize = 4;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]{1,8}|#[0-9]{1,10}|[a-zA-Z]{2,8});?").expect("valid regex")
});

/// Comments, doctypes, CDATA sections and processing instructions.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MARKUP_DECLARATIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>|<![^>]*>|<\?.*?\?>").expect("valid regex")
});

/// One pattern per killed element, matching the element and its body.
#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
static KILLED_ELEMENTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    KILL_TAGS
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).expect("valid regex")
        })
        .collect()
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9:_-]*)([^>]*)>").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>"']+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+))?"#).expect("valid regex")
});

/// Default cleaner for feed HTML.
///
/// Removes comments, scripts, styles, embedded objects, frames and page
/// structure, keeps only a safe attribute set and drops `javascript:` URLs.
/// Text between tags is left as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCleaner;

impl HtmlCleaner {
    /// Clean a fragment, borrowing the input when it contains no markup.
    ///
    /// # Examples
    /// ```
    /// use rapidfeed_parser::sanitize::HtmlCleaner;
    ///
    /// let cleaned = HtmlCleaner.clean(r#"<p onclick="x()">Hi<script>alert(1)</script></p>"#);
    /// assert_eq!(cleaned, "<p>Hi</p>");
    /// ```
    pub fn clean<'a>(&self, html: &'a str) -> Cow<'a, str> {
        if !html.contains('<') {
            return Cow::Borrowed(html);
        }

        let mut out = MARKUP_DECLARATIONS.replace_all(html, "").into_owned();
        for killed in KILLED_ELEMENTS.iter() {
            if killed.is_match(&out) {
                out = killed.replace_all(&out, "").into_owned();
            }
        }

        Cow::Owned(TAG.replace_all(&out, rewrite_tag).into_owned())
    }
}

impl Sanitizer for HtmlCleaner {
    fn sanitize(&self, html: &str) -> String {
        self.clean(html).into_owned()
    }
}

/// Remove one redundant `<p>` or `<div>` wrapper around a fragment.
///
/// # Examples
/// ```
/// use rapidfeed_parser::sanitize::strip_outer_tag;
///
/// assert_eq!(strip_outer_tag("<p>Hello <b>world</b></p>"), "Hello <b>world</b>");
/// assert_eq!(strip_outer_tag("<p>a</p><p>b</p>"), "<p>a</p><p>b</p>");
/// ```
pub fn strip_outer_tag(html: &str) -> &str {
    let trimmed = html.trim();
    for (open, close) in [("<p>", "</p>"), ("<div>", "</div>")] {
        let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        else {
            continue;
        };
        let tag = &open[..open.len() - 1];
        if !inner.contains(tag) {
            return inner;
        }
    }
    html
}

fn rewrite_tag(caps: &Captures<'_>) -> String {
    let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
    let name = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();

    if KILL_TAGS.contains(&name.as_str())
        || UNWRAP_TAGS.contains(&name.as_str())
        || REMOVE_TAGS.contains(&name.as_str())
    {
        return String::new();
    }
    if closing {
        return format!("</{name}>");
    }

    let raw_attrs = caps.get(3).map_or("", |m| m.as_str());
    let self_closing = raw_attrs.trim_end().ends_with('/');

    let mut tag = format!("<{name}");
    for attr in ATTRIBUTE.captures_iter(raw_attrs) {
        let Some(attr_name) = attr.get(1).map(|m| m.as_str().to_ascii_lowercase()) else {
            continue;
        };
        if !SAFE_ATTRS.contains(&attr_name.as_str()) {
            continue;
        }
        match attr.get(2).map(|m| m.as_str()) {
            Some(value) => {
                if URL_ATTRS.contains(&attr_name.as_str()) && is_script_url(&attr_name, value) {
                    continue;
                }
                tag.push_str(&format!(" {attr_name}={}", quote(value)));
            }
            None => tag.push_str(&format!(" {attr_name}")),
        }
    }
    if self_closing {
        tag.push_str(" /");
    }
    tag.push('>');
    tag
}

fn quote(value: &str) -> Cow<'_, str> {
    if value.starts_with('"') || value.starts_with('\'') {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("\"{value}\""))
    }
}

/// Whether a URL attribute value would run script or load an active document.
///
/// Character references are decoded and whitespace and control characters
/// removed before the scheme is checked, as a browser would. `data:` URLs are
/// only allowed for raster images on `src`.
fn is_script_url(attr_name: &str, value: &str) -> bool {
    let raw = value.trim_matches(|c| c == '"' || c == '\'');
    let compact: String = decode_references(raw)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    if SCRIPT_SCHEMES.iter().any(|scheme| compact.starts_with(scheme)) {
        return true;
    }
    compact.starts_with("data:")
        && !(attr_name == "src"
            && compact.starts_with("data:image/")
            && !compact.starts_with("data:image/svg"))
}

/// Decode numeric and common named character references, repeatedly, so
/// that nested encodings cannot hide a scheme.
fn decode_references(value: &str) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_REFERENCE_PASSES {
        if !current.contains('&') {
            break;
        }
        let decoded = CHAR_REFERENCE.replace_all(&current, decode_reference);
        if decoded == current {
            break;
        }
        current = decoded.into_owned();
    }
    current
}

fn decode_reference(caps: &Captures<'_>) -> String {
    let whole = caps.get(0).map_or("", |m| m.as_str());
    let body = caps.get(1).map_or("", |m| m.as_str());

    let decoded = if let Some(hex) = body
        .strip_prefix('#')
        .and_then(|b| b.strip_prefix(['x', 'X']))
    {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = body.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        NAMED_REFERENCES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(body))
            .map(|(_, c)| *c)
    };

    decoded.map_or_else(|| whole.to_string(), String::from)
}
