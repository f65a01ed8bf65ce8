//! Author string canonicalization.

use std::sync::LazyLock;

use regex::Regex;

/// Loose e-mail matcher, including bracketed IP hosts and `?subject=` tails.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(([a-zA-Z0-9_\-.+]+)@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.)|(([a-zA-Z0-9\-]+\.)+))([a-zA-Z]{2,24}|[0-9]{1,3})(\]?))(\?subject=\S+)?",
    )
    .expect("valid regex")
});

/// Separators left behind once the address is cut out.
const SEPARATORS: [&str; 3] = ["()", "<>", "&lt;&gt;"];

/// Rewrite an author string as `"name (email)"`.
///
/// Strings without an `@` pass through unchanged. Otherwise the first
/// address is moved to a trailing `(email)` suffix and the separators that
/// surrounded it are dropped. When no name remains only the address is
/// returned.
///
/// # Examples
/// ```
/// use rapidfeed_parser::text::munge_author;
///
/// assert_eq!(munge_author("Jane Doe jane@x.com"), "Jane Doe (jane@x.com)");
/// assert_eq!(munge_author("jane@x.com (Jane Doe)"), "Jane Doe (jane@x.com)");
/// assert_eq!(munge_author("Jane Doe"), "Jane Doe");
/// ```
pub fn munge_author(author: &str) -> String {
    if !author.contains('@') {
        return author.to_string();
    }

    let Some(found) = EMAIL_PATTERN.find(author) else {
        return author.to_string();
    };
    let email = found.as_str();

    let mut name = format!("{}{}", &author[..found.start()], &author[found.end()..]);
    for separator in SEPARATORS {
        name = name.replace(separator, "");
    }
    let mut name = name.trim();
    if name.starts_with('(') {
        name = &name[1..];
    }
    if name.ends_with(')') {
        name = &name[..name.len() - 1];
    }
    let name = name.trim();

    if name.is_empty() {
        email.to_string()
    } else {
        format!("{name} ({email})")
    }
}
