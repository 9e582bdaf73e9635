//! Slug generation utilities for human-readable record identifiers.
//!
//! ## Summary
//! Turns free text into URL-safe slugs. Slugs are lowercase ASCII word
//! characters separated by single hyphens.

use super::transliterate::transliterate;

/// Generate a URL-safe slug from arbitrary text.
///
/// Folds accented and compatibility characters to ASCII first, then
/// tokenizes the result.
///
/// Examples:
/// - "Hello World" -> "hello-world"
/// - "Crème Brûlée" -> "creme-brulee"
/// - "Ada   Lovelace" -> "ada-lovelace"
#[must_use]
pub fn to_slug(text: &str) -> String {
    tokenize(&transliterate(text))
}

/// Lowercase `text`, turn every character outside `[A-Za-z0-9_]` into a
/// hyphen and collapse hyphen runs.
///
/// Hyphens produced at the edges are kept: `"!foo"` becomes `"-foo"` and a
/// string made only of symbols becomes `"-"`.
#[must_use]
pub fn tokenize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        let c = if is_word_char(c) { c } else { '-' };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug
}

/// ## Summary
/// Returns true if `slug` only contains characters `tokenize` can emit and
/// no repeated hyphens.
#[must_use]
pub fn is_slug(slug: &str) -> bool {
    slug.chars()
        .all(|c| c == '-' || (is_word_char(c) && !c.is_ascii_uppercase()))
        && !slug.contains("--")
}

const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
