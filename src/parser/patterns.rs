// Pattern predicates and extractors for quantity, qualifier and price tokens
use regex::Regex;
use std::num::ParseFloatError;
use std::sync::LazyLock;

use crate::utils::strip_non_numeric;

/// Digits adjacent to an `x` in either order: `x5`, `5x`, `x 5`, `5 x`.
static QUANTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(x ?[0-9]+|[0-9]+ ?x)").unwrap());

static STACK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bstacks?\b").unwrap());

static PER_UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:each|per|ea)\b").unwrap());

/// A name phrase followed by digits with an optional p/k/m magnitude letter.
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([a-z ]+)([0-9]+[pkm]?)").unwrap());

pub fn has_quantity_token(s: &str) -> bool {
    QUANTITY_RE.is_match(s)
}

/// First quantity token in `s`, e.g. `"x 5"`.
pub fn extract_quantity_token(s: &str) -> Option<&str> {
    QUANTITY_RE.find(s).map(|m| m.as_str())
}

pub fn is_stack_qualified(s: &str) -> bool {
    STACK_RE.is_match(s)
}

pub fn is_per_unit_qualified(s: &str) -> bool {
    PER_UNIT_RE.is_match(s)
}

pub fn has_price_token(s: &str) -> bool {
    PRICE_RE.is_match(s)
}

/// Rightmost price token in `s`, including its magnitude letter.
pub fn extract_price_token(s: &str) -> Option<&str> {
    PRICE_RE
        .captures_iter(s)
        .filter_map(|caps| caps.get(2))
        .last()
        .map(|m| m.as_str())
}

/// Removes every quantity token, not just the first.
pub fn strip_quantity_tokens(s: &str) -> String {
    QUANTITY_RE.replace_all(s, "").into_owned()
}

/// Removes every "stack"/"stacks" word.
pub fn strip_stack_qualifier(s: &str) -> String {
    STACK_RE.replace_all(s, "").into_owned()
}

/// Removes every "each"/"per"/"ea" qualifier word.
pub fn strip_per_unit_qualifier(s: &str) -> String {
    PER_UNIT_RE.replace_all(s, "").into_owned()
}

/// Drops everything but digits and dots, then parses what is left.
pub fn parse_numeric(token: &str) -> Result<f64, ParseFloatError> {
    strip_non_numeric(token).parse::<f64>()
}
