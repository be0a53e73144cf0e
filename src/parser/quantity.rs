// Quantity extraction: "stack of iron ore x5" -> ("of iron ore", 100)
use tracing::debug;

use crate::model::{ExtractError, TokenKind};
use crate::parser::patterns::{
    extract_quantity_token, has_quantity_token, is_per_unit_qualified, is_stack_qualified,
    parse_numeric, strip_per_unit_qualifier, strip_quantity_tokens, strip_stack_qualifier,
};
use crate::utils::collapse_whitespace;

/// Units in one stack.
pub const STACK_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct QuantityExtraction {
    pub name: String,
    pub quantity: u32,
}

/// Pulls the quantity token out of `name`.
///
/// Qualifier words are removed before the token is searched, so the token is
/// located on the already stripped string. Listings without a token keep their
/// name and get a quantity of 1.
pub fn extract_quantity(name: &str) -> Result<QuantityExtraction, ExtractError> {
    if !has_quantity_token(name) {
        return Ok(QuantityExtraction {
            name: name.to_string(),
            quantity: 1,
        });
    }

    let mut working = name.to_string();

    let is_stack = is_stack_qualified(&working);
    if is_stack {
        working = collapse_whitespace(&strip_stack_qualifier(&working));
        debug!("Name without stack qualifier: {}", working);
    }

    if is_per_unit_qualified(&working) {
        working = collapse_whitespace(&strip_per_unit_qualifier(&working));
        debug!("Name without per-unit qualifier: {}", working);
    }

    read_quantity(working, is_stack)
}

/// Parses the first quantity token of an already qualifier-stripped name and
/// removes every quantity token from it.
fn read_quantity(working: String, is_stack: bool) -> Result<QuantityExtraction, ExtractError> {
    let Some(token) = extract_quantity_token(&working).map(str::to_string) else {
        // Qualifier removal swallowed the only token.
        debug!("Quantity token vanished after qualifier removal: {}", working);
        return Ok(QuantityExtraction {
            name: working,
            quantity: 1,
        });
    };

    let name = collapse_whitespace(&strip_quantity_tokens(&working));

    let value = parse_numeric(&token).map_err(|e| ExtractError::MalformedNumericToken {
        kind: TokenKind::Quantity,
        token: token.clone(),
        reason: e.to_string(),
    })?;

    let multiplier = if is_stack { STACK_SIZE as f64 } else { 1.0 };
    let total = (value * multiplier).round();
    if total < 1.0 || total > u32::MAX as f64 {
        return Err(ExtractError::MalformedNumericToken {
            kind: TokenKind::Quantity,
            token,
            reason: format!("{total} is not a positive quantity"),
        });
    }

    debug!("Quantity token '{}' -> {}", token, total);
    Ok(QuantityExtraction {
        name,
        quantity: total as u32,
    })
}
