use futures::future::join_all;
use listing_catalog::config::{load_config, AppConfig};
use listing_catalog::source::{FileSource, HtmlSource, ListingSource, StaticSource};
use listing_catalog::{BatchSummary, Dispatcher, ListingProcessor, SqliteStorage};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("😱 Panic occurred: {}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error ({}): {}", config_path, e);
            return;
        }
    };

    let storage = match SqliteStorage::new(&config.db_path) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    let sources = match build_sources(&config) {
        Ok(sources) => sources,
        Err(e) => {
            error!("Failed to set up listing sources: {}", e);
            return;
        }
    };
    if sources.is_empty() {
        warn!("No listing sources configured, nothing to do.");
        return;
    }

    let dispatcher = Dispatcher::new(ListingProcessor::new(storage.clone()));

    loop {
        info!("Collecting listings from {} sources...", sources.len());
        let listings = collect_listings(&sources).await;

        let reports = dispatcher.dispatch(listings).await;
        for report in &reports {
            match &report.outcome {
                Ok(listing) => info!(
                    "{} | qty {} | {:.2} | {:?}",
                    listing.item.name, listing.item.quantity, listing.item.price, listing.catalog
                ),
                Err(e) => warn!("'{}' failed: {}", report.raw, e),
            }
        }

        let summary = BatchSummary::from_reports(&reports);
        info!(
            "Batch: {} listings, {} created, {} existing, {} already present, {} skipped, {} store errors, {} failed",
            summary.total,
            summary.created,
            summary.existing,
            summary.already_present,
            summary.skipped,
            summary.store_failed,
            summary.failed
        );
        match storage.count().await {
            Ok(count) => info!("Catalog now holds {} items", count),
            Err(e) => warn!("Catalog count failed: {}", e),
        }

        let Some(interval) = config.check_interval_seconds else {
            break;
        };

        info!("Waiting {}s for the next batch...", interval);
        tokio::select! {
            _ = sleep(Duration::from_secs(interval)) => {
                info!("Timer triggered.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested.");
                break;
            }
        }
    }
}

fn build_sources(
    config: &AppConfig,
) -> Result<Vec<Box<dyn ListingSource>>, listing_catalog::model::SourceError> {
    let mut sources: Vec<Box<dyn ListingSource>> = Vec::new();

    if !config.listings.is_empty() {
        sources.push(Box::new(StaticSource::new(config.listings.clone())));
    }
    if let Some(path) = &config.listings_file {
        sources.push(Box::new(FileSource::new(path)));
    }
    if !config.sources.is_empty() {
        let client = HtmlSource::build_client()?;
        for page in &config.sources {
            sources.push(Box::new(HtmlSource::new(
                client.clone(),
                page.url.clone(),
                page.selector.clone(),
            )));
        }
    }

    Ok(sources)
}

/// Fetches every source concurrently; a failing source is logged and skipped.
async fn collect_listings(sources: &[Box<dyn ListingSource>]) -> Vec<String> {
    let fetched = join_all(sources.iter().map(|source| source.fetch())).await;

    let mut listings = Vec::new();
    for (source, result) in sources.iter().zip(fetched) {
        match result {
            Ok(found) => {
                info!("{}: {} listings", source.name(), found.len());
                listings.extend(found);
            }
            Err(e) => warn!("Source {} failed: {}", source.name(), e),
        }
    }
    listings
}
