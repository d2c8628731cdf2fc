// crates/dirsift-core/src/text.rs

//! Text normalization shared by the index, the predicates and the sorter.

/// Lower-cases a token for indexing and matching.
///
/// This is the only normalization applied to names and tags: no trimming, no
/// transliteration. Non-Latin scripts pass through untouched, so `"トヨタ"`
/// stays searchable as `"トヨタ"`.
#[inline]
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
}

/// Normalizes raw user input into a search term: trims, then lower-cases.
#[inline]
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Length in characters. Prefix lengths are counted this way, never in bytes.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Script groups in collation order: symbols, digits, Latin, other
/// alphabets, kana, then Han ideographs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Script {
    Symbol,
    Digit,
    Latin,
    Other,
    Kana,
    Han,
}

/// One collation unit: the script group, then a weight inside it.
pub type CollationUnit = (Script, u32);

/// Sort key for display names.
///
/// Latin letters are folded with `deunicode` so accents and case do not
/// matter. Other scripts keep their own characters: katakana weighs the same
/// as the matching hiragana, Han sorts by code point, and every group sits in
/// a fixed order so `"Zeta" < "アイシン" < "トヨタ" < "日産"`.
///
/// ```rust
/// use dirsift_core::text::collation_key;
///
/// assert_eq!(collation_key("Émile"), collation_key("emile"));
/// assert_eq!(collation_key("トヨタ"), collation_key("とよた"));
/// assert!(collation_key("Zeta") < collation_key("アイシン"));
/// assert!(collation_key("トヨタ") < collation_key("日産"));
/// ```
pub fn collation_key(s: &str) -> Vec<CollationUnit> {
    let mut key = Vec::with_capacity(s.len());
    for c in s.chars() {
        if is_kana(c) {
            key.push((Script::Kana, u32::from(katakana_to_hiragana(c))));
        } else if is_han(c) {
            key.push((Script::Han, u32::from(c)));
        } else if is_latin(c) {
            let folded = deunicode::deunicode_char(c).unwrap_or_default();
            for f in folded.chars().flat_map(char::to_lowercase) {
                key.push((ascii_script(f), u32::from(f)));
            }
        } else if c.is_alphanumeric() {
            key.extend(c.to_lowercase().map(|l| (Script::Other, u32::from(l))));
        } else {
            key.push((Script::Symbol, u32::from(c)));
        }
    }
    key
}

fn ascii_script(c: char) -> Script {
    if c.is_ascii_digit() {
        Script::Digit
    } else if c.is_alphabetic() {
        Script::Latin
    } else {
        Script::Symbol
    }
}

fn is_latin(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{024F}'
        | '\u{1E00}'..='\u{1EFF}'
        | '\u{FF01}'..='\u{FF5E}')
}

fn is_kana(c: char) -> bool {
    matches!(c,
        '\u{3041}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{31F0}'..='\u{31FF}'
        | '\u{FF66}'..='\u{FF9F}')
}

fn is_han(c: char) -> bool {
    matches!(c,
        '\u{3005}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2FA1F}')
}

/// Katakana with a hiragana counterpart maps onto it; everything else is unchanged.
fn katakana_to_hiragana(c: char) -> char {
    match c {
        '\u{30A1}'..='\u{30F6}' => char::from_u32(u32::from(c) - 0x60).unwrap_or(c),
        _ => c,
    }
}

/// Iterates the prefixes of `token` with at least `min_len` characters, shortest first.
///
/// The final prefix is the token itself. Yields nothing when the token is
/// shorter than `min_len`.
pub fn prefixes(token: &str, min_len: usize) -> impl Iterator<Item = &str> + '_ {
    let min_len = min_len.max(1);
    token
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .skip(min_len - 1)
        .map(move |end| &token[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_respect_char_boundaries() {
        let got: Vec<_> = prefixes("トヨタ自動車", 2).collect();
        assert_eq!(got, vec!["トヨ", "トヨタ", "トヨタ自", "トヨタ自動", "トヨタ自動車"]);
    }

    #[test]
    fn prefixes_of_short_token_are_empty() {
        assert_eq!(prefixes("a", 2).count(), 0);
        assert_eq!(prefixes("", 2).count(), 0);
    }

    #[test]
    fn prefixes_include_full_token() {
        let got: Vec<_> = prefixes("acme", 2).collect();
        assert_eq!(got, vec!["ac", "acm", "acme"]);
    }

    #[test]
    fn collation_orders_scripts() {
        let mut names = vec!["トヨタ", "日産", "Zeta", "アイシン", "123 Go", "émile"];
        names.sort_by_cached_key(|n| collation_key(n));
        assert_eq!(names, vec!["123 Go", "émile", "Zeta", "アイシン", "トヨタ", "日産"]);
    }

    #[test]
    fn collation_folds_latin_only() {
        assert_eq!(collation_key("STRASSE"), collation_key("Straße"));
        assert_eq!(collation_key("ＡＢＣ"), collation_key("abc"));
        assert!(collation_key("あい") < collation_key("あいう"));
        assert!(collation_key("アイシン") < collation_key("いすゞ"));
    }

    #[test]
    fn term_is_trimmed_and_lowered() {
        assert_eq!(normalize_term("  AcMe \t"), "acme");
        assert_eq!(char_len("ÉV"), 2);
    }
}
