// Utility functions
use chrono::{DateTime, Utc};

/// Words kept lowercase inside a display name.
const CONNECTOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "of", "on", "or", "the",
    "to", "with",
];

/// Parses an RFC 3339 string into `DateTime<Utc>`, if possible.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Capitalizes every word of `text` and collapses inner whitespace.
///
/// With `display` set, connector words ("of", "the", ...) stay lowercase unless
/// they open the name, e.g. `"cloak of shadows"` -> `"Cloak of Shadows"`.
/// Without it every word is capitalized (`"Cloak Of Shadows"`), which is the
/// canonical catalog key form.
pub fn title_case(text: &str, display: bool) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(idx, word)| {
            let lower = word.to_lowercase();
            if display && idx > 0 && CONNECTOR_WORDS.contains(&lower.as_str()) {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Byte index of the last occurrence of `needle` in `haystack`, ignoring ASCII case.
///
/// ASCII lowercasing keeps byte offsets stable, so the index is valid for slicing
/// the original string.
pub fn last_index_of_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .to_ascii_lowercase()
        .rfind(&needle.to_ascii_lowercase())
}

/// Keeps only digits and decimal points.
pub fn strip_non_numeric(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Trims and collapses runs of whitespace into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
