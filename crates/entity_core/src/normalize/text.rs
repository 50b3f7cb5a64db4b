//! Text folding rules for normalized title/content fields.
//!
//! Rules, applied in order:
//! 1. NFKD decomposition with combining marks dropped; ligatures and letters
//!    without a decomposition (`œ`, `æ`, `ß`, `ø`, `đ`, `ł`) are spelled out.
//! 2. Apostrophes, hyphens and underscores become spaces.
//! 3. Any other char that is not a letter, digit or whitespace is removed.
//! 4. Whitespace runs collapse to one space; the result is trimmed.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"['’‘`´\-_]+").expect("valid separator regex"));
static SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]+").expect("valid symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Folds one value into its normalized search form.
pub fn normalize_text(value: &str) -> String {
    let folded = fold_diacritics(value);
    let separated = SEPARATOR_RE.replace_all(&folded, " ");
    let stripped = SYMBOL_RE.replace_all(&separated, "");
    WHITESPACE_RE
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// Normalizes each part and joins the non-empty ones with one space.
///
/// Returns `None` when no part survives normalization.
pub fn join_normalized<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let joined = parts
        .into_iter()
        .flatten()
        .map(normalize_text)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// Strips diacritics without touching punctuation or spacing.
pub fn fold_diacritics(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for c in value.nfkd() {
        if is_combining_mark(c) {
            continue;
        }
        match spelled_out(c) {
            Some(replacement) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }
    folded
}

fn spelled_out(c: char) -> Option<&'static str> {
    let replacement = match c {
        'œ' => "oe",
        'Œ' => "OE",
        'æ' => "ae",
        'Æ' => "AE",
        'ß' => "ss",
        'ø' => "o",
        'Ø' => "O",
        'đ' => "d",
        'Đ' => "D",
        'ł' => "l",
        'Ł' => "L",
        _ => return None,
    };
    Some(replacement)
}
