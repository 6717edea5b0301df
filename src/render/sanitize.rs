//! Accented-letter fallbacks.
//!
//! Label fonts on the print path are not guaranteed to carry the Turkish
//! letters operators type, so those are folded to their plain ASCII base
//! letter before drawing.

use std::borrow::Cow;

/// Character → ASCII replacement table.
pub const SUBSTITUTIONS: [(char, char); 12] = [
    ('ç', 'c'),
    ('Ç', 'C'),
    ('ğ', 'g'),
    ('Ğ', 'G'),
    ('ı', 'i'),
    ('İ', 'I'),
    ('ö', 'o'),
    ('Ö', 'O'),
    ('ş', 's'),
    ('Ş', 'S'),
    ('ü', 'u'),
    ('Ü', 'U'),
];

#[inline]
fn substitute(ch: char) -> Option<char> {
    SUBSTITUTIONS
        .iter()
        .find(|&&(from, _)| from == ch)
        .map(|&(_, to)| to)
}

/// Replace table characters with their ASCII fallback. Everything else
/// passes through. Borrows the input when nothing needs replacing.
///
/// ```
/// use labelpress::render::sanitize::sanitize;
///
/// assert_eq!(sanitize("Güç Kaynağı"), "Guc Kaynagi");
/// assert_eq!(sanitize("plain"), "plain");
/// ```
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| substitute(c).is_some()) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| substitute(c).unwrap_or(c))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_table_entries() {
        assert_eq!(sanitize("çÇğĞıİöÖşŞüÜ"), "cCgGiIoOsSuU");
    }

    #[test]
    fn test_passthrough_borrows() {
        let input = "ABC-123 é ß 日本";
        assert!(matches!(sanitize(input), Cow::Borrowed(_)));
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_idempotent() {
        for s in ["", "Şarj Ünitesi", "ığüşöç", "mixed é ç", "ASCII only"] {
            let once = sanitize(s).into_owned();
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_outputs_are_ascii() {
        for &(_, to) in SUBSTITUTIONS.iter() {
            assert!(to.is_ascii());
        }
    }
}
