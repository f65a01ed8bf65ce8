//! Byte decoding and text trimming.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;

/// Encoding pseudo-attribute of the XML declaration.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static XML_DECL_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("valid regex")
});

/// Number of leading bytes inspected for an XML declaration.
const DECLARATION_WINDOW: usize = 256;

/// Get the lower-cased encoding named by the XML declaration.
///
/// Defaults to `"utf-8"` when there is no declaration or it names no encoding.
///
/// # Examples
/// ```
/// use rapidfeed_parser::text::declared_encoding;
///
/// assert_eq!(declared_encoding(r#"<?xml version="1.0" encoding="ISO-8859-1"?><rss/>"#), "iso-8859-1");
/// assert_eq!(declared_encoding("<rss/>"), "utf-8");
/// ```
pub fn declared_encoding(text: &str) -> String {
    let head = head_str(text, DECLARATION_WINDOW);
    XML_DECL_ENCODING
        .captures(head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "utf-8".to_string())
}

/// Decode raw document bytes to text.
///
/// A byte order mark wins, then the declared encoding. Undeclared documents
/// that are not valid UTF-8 are decoded as windows-1252.
///
/// # Returns
/// The decoded text and the lower-cased name of the encoding that was used.
pub fn decode_document(bytes: &[u8]) -> (String, String) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text.into_owned(), encoding.name().to_ascii_lowercase());
    }

    let head = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let declared = XML_DECL_ENCODING
        .captures(&String::from_utf8_lossy(head))
        .and_then(|caps| caps.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()));

    // UTF-16 labels in an ASCII-compatible declaration cannot be right.
    let encoding = declared.filter(|enc| enc.is_ascii_compatible());

    match encoding {
        Some(enc) => {
            let (text, _, _) = enc.decode(bytes);
            (text.into_owned(), enc.name().to_ascii_lowercase())
        }
        None => match std::str::from_utf8(bytes) {
            Ok(text) => (text.to_string(), UTF_8.name().to_ascii_lowercase()),
            Err(_) => {
                tracing::debug!("document is not valid UTF-8, decoding as windows-1252");
                let (text, _, _) = WINDOWS_1252.decode(bytes);
                (text.into_owned(), WINDOWS_1252.name().to_ascii_lowercase())
            }
        },
    }
}

/// Trim text, mapping absent text to `None`.
///
/// # Examples
/// ```
/// use rapidfeed_parser::text::clean_text;
///
/// assert_eq!(clean_text(Some("  hello \n")), Some("hello".to_string()));
/// assert_eq!(clean_text(None), None);
/// ```
pub fn clean_text(text: Option<&str>) -> Option<String> {
    text.map(|t| t.trim().to_string())
}

/// Longest prefix of `text` no longer than `limit` bytes, on a char boundary.
pub(crate) fn head_str(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
