pub mod config;
pub mod dispatcher;
pub mod model;
pub mod parser;
pub mod processor;
pub mod source;
pub mod storage;
pub mod utils;

pub use dispatcher::{BatchSummary, Dispatcher};
pub use model::{Item, ListingError, StorageError};
pub use processor::{normalize, CatalogStatus, ListingProcessor, ListingReport, NormalizedListing};
pub use storage::{CatalogStore, MemoryCatalog, SqliteStorage};
