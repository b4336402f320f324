use std::borrow::Cow;

use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizeConfig;

/// Main entry point. Returns the comparison form of `word` under the default
/// [`NormalizeConfig`]: marks stripped, composed, case folded.
///
/// The result is idempotent: `normalize(&normalize(w)) == normalize(w)`.
pub fn normalize(word: &str) -> String {
    normalize_with(word, &NormalizeConfig::default())
}

/// Same as [`normalize`] with an explicit configuration.
pub fn normalize_with(word: &str, cfg: &NormalizeConfig) -> String {
    let mut stripped = String::with_capacity(word.len());
    for ch in word.nfd() {
        if cfg.strip_marks && ch.is_mark() {
            continue;
        }
        if cfg.strip_punctuation && ch.is_punctuation() {
            continue;
        }
        stripped.push(ch);
    }
    let composed: String = stripped.nfc().collect();

    // Folding runs last: U+0345 folds to a spacing ι and must already be gone.
    if cfg.casefold {
        caseless::default_case_fold_str(&composed)
    } else {
        composed
    }
}

/// Derives a token's word value from its raw surface form by trimming
/// leading and trailing punctuation.
///
/// Inner punctuation is kept, and so is the modifier-letter apostrophe
/// (U+02BC) used for elision, since it is a letter rather than punctuation.
/// A value made only of punctuation is returned unchanged so that the token
/// stays addressable.
pub fn word_value(value: &str) -> String {
    let trimmed = value.trim_matches(|c: char| c.is_punctuation() || c.is_whitespace());
    if trimmed.is_empty() {
        value.trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Removes ASCII digits, which some sources append to repeated word forms
/// (`καί2` for the second `καί` of a line).
pub fn strip_digits(word: &str) -> Cow<'_, str> {
    if word.bytes().any(|b| b.is_ascii_digit()) {
        Cow::Owned(word.chars().filter(|c| !c.is_ascii_digit()).collect())
    } else {
        Cow::Borrowed(word)
    }
}

/// Returns the trailing ASCII number of `word`, if any (`καί2` → `2`).
pub fn trailing_number(word: &str) -> Option<usize> {
    let digits_start = word
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)?;
    word[digits_start..].parse().ok()
}
