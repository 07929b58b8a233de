//! Text processing utilities.
//!
//! Turns raw text into the word tokens consumed by
//! [`FrequencyTable::build`](crate::frequency::FrequencyTable::build).
//! Tokens keep their original case; folding happens during counting.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Regex for URLs.
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?://|www\.)\S+").expect("valid regex"));

/// Regex for email addresses.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

/// Replace URLs and email addresses with whitespace.
///
/// Link fragments ("https", "www", domain parts) would otherwise show up as
/// high-frequency words in scraped text.
pub fn strip_links(text: &str) -> Cow<'_, str> {
    match URL_PATTERN.replace_all(text, " ") {
        Cow::Borrowed(_) => EMAIL_PATTERN.replace_all(text, " "),
        Cow::Owned(s) => Cow::Owned(EMAIL_PATTERN.replace_all(&s, " ").into_owned()),
    }
}

/// Split text into word tokens.
///
/// Splits on anything that is not alphanumeric, an apostrophe or a hyphen,
/// then trims leading/trailing apostrophes and hyphens. Tokens without a
/// single alphabetic character (numbers, stray punctuation) are skipped.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '-'))
        .filter(|w| w.chars().any(char::is_alphabetic))
}

/// Extract owned word tokens after removing links.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn extract_words(text: &str) -> Vec<String> {
    let cleaned = strip_links(text);
    words(&cleaned).map(str::to_string).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_and_punctuation() {
        let tokens: Vec<&str> = words("The cat, the mat; the (hat).").collect();
        assert_eq!(tokens, ["The", "cat", "the", "mat", "the", "hat"]);
    }

    #[test]
    fn keeps_contractions_and_hyphenated_words() {
        let tokens: Vec<&str> = words("it's well-known 'quoted'").collect();
        assert_eq!(tokens, ["it's", "well-known", "quoted"]);
    }

    #[test]
    fn skips_numbers_and_punctuation_runs() {
        let tokens: Vec<&str> = words("2016 -- v2 ... 3.14").collect();
        assert_eq!(tokens, ["v2"]);
    }

    #[test]
    fn strips_urls_and_emails() {
        let tokens = extract_words("see https://example.com/a/b or mail me@example.org today");
        assert_eq!(tokens, ["see", "or", "mail", "today"]);
    }

    #[test]
    fn strip_links_borrows_when_clean() {
        assert!(matches!(strip_links("plain words"), Cow::Borrowed(_)));
    }

    #[test]
    fn empty_text_has_no_words() {
        assert!(extract_words("   \n\t").is_empty());
    }
}
