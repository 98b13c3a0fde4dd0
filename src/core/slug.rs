//! Title to identifier conversion.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Slug used when a title has no ASCII letters or digits.
pub const DEFAULT_SLUG: &str = "idea";

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());

/// Convert text to a kebab-case ASCII-only slug.
///
/// Each character is kept only if its compatibility decomposition is plain
/// ASCII (so `ﬁ` becomes `fi`); accented and other non-ASCII letters are
/// dropped whole. Runs of remaining non-alphanumerics collapse to a single
/// `-`. Returns [`DEFAULT_SLUG`] when nothing survives.
///
/// ```
/// use aisdlc::core::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("日本語"), "idea");
/// ```
pub fn slugify(text: &str) -> String {
    let ascii: String = text.nfc().filter_map(fold_ascii).collect();
    let slug = NON_ALNUM.replace_all(&ascii, "-").trim_matches('-').to_ascii_lowercase();

    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug
    }
}

/// ASCII folding of a single composed character, if it has one.
fn fold_ascii(c: char) -> Option<String> {
    if c.is_ascii() {
        return Some(c.to_string());
    }
    let folded: String = std::iter::once(c).nfkd().collect();
    folded.is_ascii().then_some(folded)
}
