// Price extraction: "iron ore 50p" -> ("Iron Ore", 50.0)
use tracing::debug;

use crate::model::{ExtractError, TokenKind};
use crate::parser::patterns::{extract_price_token, has_price_token, parse_numeric};
use crate::utils::{last_index_of_ignore_case, title_case};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceExtraction {
    pub name: String,
    /// `None` when the name carries no price annotation.
    pub price: Option<f64>,
}

/// Multiplier for a token's trailing magnitude letter.
pub fn magnitude(token: &str) -> f64 {
    match token.chars().last().map(|c| c.to_ascii_lowercase()) {
        Some('k') => 1_000.0,
        Some('m') => 1_000_000.0,
        _ => 1.0,
    }
}

/// Reads the trailing price annotation off a quantity-normalized name.
///
/// The rightmost price token wins, so `"ak47 500k"` prices at 500000 and keeps
/// `"Ak47"` as its name. Anything after the token is discarded.
pub fn extract_price(name: &str) -> Result<PriceExtraction, ExtractError> {
    let unchanged = || PriceExtraction {
        name: name.to_string(),
        price: None,
    };

    if !has_price_token(name) {
        return Ok(unchanged());
    }

    let Some(token) = extract_price_token(name) else {
        return Ok(unchanged());
    };

    let Some(index) = last_index_of_ignore_case(name, token) else {
        return Ok(unchanged());
    };

    let value = parse_numeric(token).map_err(|e| ExtractError::MalformedNumericToken {
        kind: TokenKind::Price,
        token: token.to_string(),
        reason: e.to_string(),
    })?;

    let price = value * magnitude(token);
    let new_name = title_case(name[..index].trim(), false);
    debug!("Price token '{}' -> {:.2}, name '{}'", token, price, new_name);

    Ok(PriceExtraction {
        name: new_name,
        price: Some(price),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_letters() {
        assert_eq!(magnitude("50p"), 1.0);
        assert_eq!(magnitude("50"), 1.0);
        assert_eq!(magnitude("5K"), 1_000.0);
        assert_eq!(magnitude("2m"), 1_000_000.0);
    }

    #[test]
    fn rightmost_token_is_authoritative() {
        let out = extract_price("ak47 500k").unwrap();
        assert_eq!(out.price, Some(500_000.0));
        assert_eq!(out.name, "Ak47");
    }

    #[test]
    fn p_suffix_is_stripped_without_multiplier() {
        let out = extract_price("iron ore 50p").unwrap();
        assert_eq!(out.price, Some(50.0));
        assert_eq!(out.name, "Iron Ore");
    }

    #[test]
    fn trailing_text_after_the_price_is_dropped() {
        let out = extract_price("cloak of shadows 2m obo").unwrap();
        assert_eq!(out.price, Some(2_000_000.0));
        assert_eq!(out.name, "Cloak Of Shadows");
    }

    #[test]
    fn missing_price_leaves_name_alone() {
        let out = extract_price("iron ore").unwrap();
        assert_eq!(out.price, None);
        assert_eq!(out.name, "iron ore");

        let out = extract_price("750k").unwrap();
        assert_eq!(out.price, None);
        assert_eq!(out.name, "750k");
    }
}
