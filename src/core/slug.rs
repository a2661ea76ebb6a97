use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Separator placed between words of a slug
pub const SEPARATOR: char = '-';

/// Derive a URL-safe slug from a display name.
///
/// The name is decomposed (NFKD) and stripped of combining marks, so
/// `Café` and `Cafe\u{301}` both fold to `cafe`. Every run of characters
/// that are not ASCII letters or digits becomes a single separator, and
/// separators at either end are dropped. The output only holds lower-case
/// ASCII alphanumerics and single separators, so running it again yields
/// the same string.
pub fn slugify(name: &str) -> String {
    let mut slug = Slug::default();

    for ch in name.nfkd().filter(|ch| !is_combining_mark(*ch)) {
        match fold_letter(ch) {
            Some(ascii) => ascii.chars().for_each(|c| slug.push(c)),
            None => ch.to_lowercase().for_each(|c| slug.push(c)),
        }
    }

    slug.text
}

/// Latin letters with no canonical decomposition
fn fold_letter(ch: char) -> Option<&'static str> {
    match ch {
        'ß' => Some("ss"),
        'æ' | 'Æ' => Some("ae"),
        'œ' | 'Œ' => Some("oe"),
        'ø' | 'Ø' => Some("o"),
        'đ' | 'Đ' => Some("d"),
        'ł' | 'Ł' => Some("l"),
        'ı' => Some("i"),
        _ => None,
    }
}

#[derive(Default)]
struct Slug {
    text: String,
    pending_separator: bool,
}

impl Slug {
    fn push(&mut self, ch: char) {
        if !ch.is_ascii_alphanumeric() {
            self.pending_separator = true;
            return;
        }
        if self.pending_separator && !self.text.is_empty() {
            self.text.push(SEPARATOR);
        }
        self.pending_separator = false;
        self.text.push(ch.to_ascii_lowercase());
    }
}
