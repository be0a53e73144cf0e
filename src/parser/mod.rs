// Listing parser: pattern library plus the quantity and price extractors

pub mod patterns;
pub mod price;
pub mod quantity;

pub use price::{extract_price, PriceExtraction};
pub use quantity::{extract_quantity, QuantityExtraction, STACK_SIZE};
