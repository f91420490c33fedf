use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::BANNED_WORDS;

static BANNED_WORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternatives = BANNED_WORDS
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives)).expect("banned word pattern is valid")
});

/// Masks every banned word with asterisks of the same length.
pub fn filter_offensive_content(text: &str) -> String {
    BANNED_WORD_PATTERN
        .replace_all(text, |caps: &regex::Captures| "*".repeat(caps[0].chars().count()))
        .into_owned()
}

pub fn contains_offensive_content(text: &str) -> bool {
    BANNED_WORD_PATTERN.is_match(text)
}
