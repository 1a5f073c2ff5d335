//! Slug derivation for products and categories.

use deunicode::deunicode;

/// Derives a URL-safe slug from a display name.
///
/// Non-ASCII text is transliterated first ("Ноутбук" becomes "noutbuk"). ASCII letters and
/// digits are then lowercased and kept; every run of other characters becomes a single `-`,
/// and leading or trailing dashes are dropped. The result is deterministic, so two names that
/// differ only in punctuation or case map to the same slug and collide.
#[must_use]
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input);
    let mut slug = String::with_capacity(ascii.len());
    let mut last_dash = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}
