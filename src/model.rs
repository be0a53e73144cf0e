// Core structs: Item, CatalogEntry and the error taxonomy
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::utils::title_case;

/// A normalized listing: canonical name, total price and quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    /// Human-friendly form of `name`, connector words kept lowercase.
    pub display_name: String,
    pub price: f64,
    pub quantity: u32,
}

impl Item {
    /// Fresh item for a raw listing, carrying the documented defaults.
    pub fn new(raw: &str) -> Self {
        let name = raw.trim().to_string();
        Self {
            display_name: title_case(&name, true),
            name,
            price: 0.0,
            quantity: 1,
        }
    }
}

/// A row of the persistent catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Quantity,
    Price,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Quantity => write!(f, "quantity"),
            TokenKind::Price => write!(f, "price"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("malformed {kind} token '{token}': {reason}")]
    MalformedNumericToken {
        kind: TokenKind,
        token: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(String),
    #[error("unexpected status {0}")]
    InvalidResponse(u16),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid selector: {0}")]
    Selector(String),
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("worker aborted: {0}")]
    WorkerAborted(String),
}
