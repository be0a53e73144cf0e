// One listing through extraction and the catalog
use crate::model::{ExtractError, Item, ListingError, StorageError};
use crate::parser::{extract_price, extract_quantity};
use crate::storage::CatalogStore;
use crate::utils::title_case;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the catalog made of a normalized listing.
#[derive(Debug)]
pub enum CatalogStatus {
    /// A row already matched the name; nothing was inserted.
    Existing,
    Created,
    /// The insert was ignored by the uniqueness constraint.
    AlreadyPresent,
    /// Empty names are never cataloged.
    Skipped,
    Failed(StorageError),
}

#[derive(Debug)]
pub struct NormalizedListing {
    pub item: Item,
    pub catalog: CatalogStatus,
}

#[derive(Debug)]
pub struct ListingReport {
    pub raw: String,
    pub outcome: Result<NormalizedListing, ListingError>,
}

impl ListingReport {
    pub fn item(&self) -> Option<&Item> {
        self.outcome.as_ref().ok().map(|listing| &listing.item)
    }
}

/// Runs both extractors in order: quantity first, then price.
pub fn normalize(raw: &str) -> Result<Item, ExtractError> {
    let mut item = Item::new(raw);

    let quantity = extract_quantity(&item.name)?;
    item.name = quantity.name;
    item.quantity = quantity.quantity;

    let price = extract_price(&item.name)?;
    item.name = price.name;
    if let Some(value) = price.price {
        item.price = value;
    }
    item.display_name = title_case(&item.name, true);

    debug!("Normalized '{}' -> {:?}", raw, item);
    Ok(item)
}

pub struct ListingProcessor<S: CatalogStore + ?Sized> {
    store: Arc<S>,
}

impl<S: CatalogStore + ?Sized> Clone for ListingProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: CatalogStore + ?Sized> ListingProcessor<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Normalizes `raw` and makes sure its item is cataloged.
    ///
    /// Store failures are recorded in the report next to the extracted item;
    /// only a malformed numeric token fails the listing itself.
    pub async fn process(&self, raw: &str) -> ListingReport {
        let outcome = match normalize(raw) {
            Ok(item) => {
                let catalog = self.catalog(&item).await;
                Ok(NormalizedListing { item, catalog })
            }
            Err(e) => {
                warn!("Dropping listing '{}': {}", raw, e);
                Err(ListingError::from(e))
            }
        };

        ListingReport {
            raw: raw.to_string(),
            outcome,
        }
    }

    async fn catalog(&self, item: &Item) -> CatalogStatus {
        if item.name.is_empty() {
            debug!("Listing has no name left, not cataloging");
            return CatalogStatus::Skipped;
        }

        // Rows are keyed by the title-cased form; unpriced names keep raw casing
        let name = title_case(&item.name, false);
        let mut lookups = vec![item.name.as_str()];
        if name != item.name {
            lookups.push(name.as_str());
        }

        for lookup in lookups {
            match self.store.exists(lookup).await {
                Ok(true) => {
                    debug!("Already cataloged: {}", lookup);
                    return CatalogStatus::Existing;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("Catalog lookup failed for '{}': {}", lookup, e);
                    return CatalogStatus::Failed(e);
                }
            }
        }

        let display_name = &item.display_name;
        match self.store.insert_if_absent(&name, display_name).await {
            Ok(true) => {
                info!("✅ Cataloged new item: {}", display_name);
                CatalogStatus::Created
            }
            Ok(false) => {
                debug!("Item already exists: {}", name);
                CatalogStatus::AlreadyPresent
            }
            Err(e) => {
                warn!("Catalog insert failed for '{}': {}", name, e);
                CatalogStatus::Failed(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryCatalog;

    /// Store that is always down.
    pub(crate) struct UnavailableCatalog;

    #[async_trait::async_trait]
    impl CatalogStore for UnavailableCatalog {
        async fn exists(&self, _name: &str) -> Result<bool, StorageError> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        async fn insert_if_absent(&self, _: &str, _: &str) -> Result<bool, StorageError> {
            Err(StorageError::Unavailable("connection refused".into()))
        }
    }

    #[test]
    fn normalize_runs_quantity_before_price() {
        let item = normalize("iron ore x3 50p").unwrap();
        assert_eq!(
            item,
            Item {
                name: "Iron Ore".into(),
                display_name: "Iron Ore".into(),
                price: 50.0,
                quantity: 3
            }
        );
    }

    #[test]
    fn normalize_handles_stack_and_each() {
        let item = normalize("stack of iron ore x5 20k each").unwrap();
        assert_eq!(item.name, "Of Iron Ore");
        assert_eq!(item.price, 20_000.0);
        assert_eq!(item.quantity, 100);
    }

    #[test]
    fn normalize_defaults_when_nothing_matches() {
        let item = normalize("  enchanted lute ").unwrap();
        assert_eq!(item.name, "enchanted lute");
        assert_eq!(item.price, 0.0);
        assert_eq!(item.quantity, 1);
    }

    #[tokio::test]
    async fn new_item_is_inserted_with_key_and_display_forms() {
        let store = Arc::new(MemoryCatalog::new());
        let processor = ListingProcessor::new(store.clone());

        let report = processor.process("cloak of shadows 2m").await;
        let listing = report.outcome.unwrap();
        assert!(matches!(listing.catalog, CatalogStatus::Created));

        let entry = store.get("Cloak Of Shadows").await.unwrap();
        assert_eq!(entry.display_name, "Cloak of Shadows");
    }

    #[tokio::test]
    async fn second_run_reports_existing_with_identical_item() {
        let store = Arc::new(MemoryCatalog::new());
        let processor = ListingProcessor::new(store.clone());

        let first = processor.process("iron ore x3 50p").await;
        let second = processor.process("iron ore x3 50p").await;

        let first = first.outcome.unwrap();
        let second = second.outcome.unwrap();
        assert!(matches!(first.catalog, CatalogStatus::Created));
        assert!(matches!(second.catalog, CatalogStatus::Existing));
        assert_eq!(first.item, second.item);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn unpriced_listing_is_found_on_second_run() {
        let store = Arc::new(MemoryCatalog::new());
        let processor = ListingProcessor::new(store.clone());

        let first = processor.process("iron ore x5").await.outcome.unwrap();
        let second = processor.process("iron ore x5").await.outcome.unwrap();

        assert_eq!(first.item.name, "iron ore");
        assert!(matches!(first.catalog, CatalogStatus::Created));
        assert!(matches!(second.catalog, CatalogStatus::Existing));
        assert_eq!(first.item, second.item);
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn later_quantity_tokens_are_not_read_as_price() {
        let item = normalize("ore x2 bar x3").unwrap();
        assert_eq!(item.name, "ore bar");
        assert_eq!(item.display_name, "Ore Bar");
        assert_eq!(item.price, 0.0);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn display_name_keeps_connectors_lowercase() {
        let item = normalize("cloak of shadows 2m").unwrap();
        assert_eq!(item.name, "Cloak Of Shadows");
        assert_eq!(item.display_name, "Cloak of Shadows");
    }

    #[tokio::test]
    async fn store_failure_still_returns_item() {
        let processor = ListingProcessor::new(Arc::new(UnavailableCatalog));

        let report = processor.process("ak47 500k").await;
        let listing = report.outcome.unwrap();
        assert_eq!(listing.item.price, 500_000.0);
        assert_eq!(listing.item.name, "Ak47");
        assert!(matches!(
            listing.catalog,
            CatalogStatus::Failed(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn malformed_quantity_fails_only_that_listing() {
        let processor = ListingProcessor::new(Arc::new(MemoryCatalog::new()));

        let report = processor.process("iron ore x0 5k").await;
        assert!(matches!(report.outcome, Err(ListingError::Extract(_))));
        assert!(report.item().is_none());
    }

    #[tokio::test]
    async fn empty_name_is_not_cataloged() {
        let store = Arc::new(MemoryCatalog::new());
        let processor = ListingProcessor::new(store.clone());

        let report = processor.process("x5").await;
        let listing = report.outcome.unwrap();
        assert_eq!(listing.item.quantity, 5);
        assert!(matches!(listing.catalog, CatalogStatus::Skipped));
        assert_eq!(store.len().await, 0);
    }
}
