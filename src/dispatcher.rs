// Fans a batch of listings out to one task each and gathers every report
use crate::model::ListingError;
use crate::processor::{CatalogStatus, ListingProcessor, ListingReport};
use crate::storage::CatalogStore;
use futures::future::join_all;
use tracing::{error, info};

pub struct Dispatcher<S: CatalogStore + ?Sized> {
    processor: ListingProcessor<S>,
}

impl<S: CatalogStore + ?Sized + 'static> Dispatcher<S> {
    pub fn new(processor: ListingProcessor<S>) -> Self {
        Self { processor }
    }

    /// Processes every listing concurrently and returns once all of them are done.
    ///
    /// The result holds exactly one report per input listing. Report order is
    /// not meaningful.
    pub async fn dispatch(&self, listings: Vec<String>) -> Vec<ListingReport> {
        info!("Dispatching {} listings...", listings.len());

        let tasks: Vec<_> = listings
            .iter()
            .cloned()
            .map(|raw| {
                let processor = self.processor.clone();
                tokio::spawn(async move { processor.process(&raw).await })
            })
            .collect();

        // Barrier: every worker has to finish before the batch returns
        let joined = join_all(tasks).await;

        let reports: Vec<ListingReport> = joined
            .into_iter()
            .zip(listings)
            .map(|(joined, raw)| match joined {
                Ok(report) => report,
                Err(e) => {
                    error!("Worker for '{}' aborted: {}", raw, e);
                    ListingReport {
                        raw,
                        outcome: Err(ListingError::WorkerAborted(e.to_string())),
                    }
                }
            })
            .collect();

        info!("Batch finished: {} reports", reports.len());
        reports
    }
}

/// Per-batch tallies of how listings ended up.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub created: usize,
    pub existing: usize,
    pub already_present: usize,
    pub skipped: usize,
    pub store_failed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[ListingReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            ..Self::default()
        };

        for report in reports {
            match &report.outcome {
                Ok(listing) => match listing.catalog {
                    CatalogStatus::Created => summary.created += 1,
                    CatalogStatus::Existing => summary.existing += 1,
                    CatalogStatus::AlreadyPresent => summary.already_present += 1,
                    CatalogStatus::Skipped => summary.skipped += 1,
                    CatalogStatus::Failed(_) => summary.store_failed += 1,
                },
                Err(_) => summary.failed += 1,
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::tests::UnavailableCatalog;
    use crate::storage::MemoryCatalog;
    use std::sync::Arc;

    fn listings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn every_listing_gets_a_report() {
        let store = Arc::new(MemoryCatalog::new());
        let dispatcher = Dispatcher::new(ListingProcessor::new(store.clone()));

        let batch = listings(&[
            "iron ore x3 50p",
            "ak47 500k",
            "iron ore x0 5k",
            "enchanted lute",
            "x5",
        ]);
        let reports = dispatcher.dispatch(batch.clone()).await;

        assert_eq!(reports.len(), batch.len());
        let mut raws: Vec<_> = reports.iter().map(|r| r.raw.clone()).collect();
        let mut expected = batch;
        raws.sort();
        expected.sort();
        assert_eq!(raws, expected);

        let summary = BatchSummary::from_reports(&reports);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.created, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn duplicate_listings_in_one_batch_create_one_row() {
        let store = Arc::new(MemoryCatalog::new());
        let dispatcher = Dispatcher::new(ListingProcessor::new(store.clone()));

        let reports = dispatcher
            .dispatch(vec!["iron ore x3 50p".to_string(); 8])
            .await;

        let summary = BatchSummary::from_reports(&reports);
        assert_eq!(summary.total, 8);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.existing + summary.already_present, 7);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn store_outage_does_not_stop_the_batch() {
        let dispatcher = Dispatcher::new(ListingProcessor::new(Arc::new(UnavailableCatalog)));

        let reports = dispatcher
            .dispatch(listings(&["iron ore x3 50p", "ak47 500k"]))
            .await;

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.item().is_some()));
        assert_eq!(BatchSummary::from_reports(&reports).store_failed, 2);
    }

    #[tokio::test]
    async fn empty_batch_returns_immediately() {
        let dispatcher = Dispatcher::new(ListingProcessor::new(Arc::new(MemoryCatalog::new())));
        assert!(dispatcher.dispatch(Vec::new()).await.is_empty());
    }
}
