// Listing pages: fetch over HTTP, pull listing text out by CSS selector
use crate::model::SourceError;
use crate::source::ListingSource;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

pub struct HtmlSource {
    client: Client,
    url: String,
    selector: String,
}

impl HtmlSource {
    pub fn new(client: Client, url: String, selector: String) -> Self {
        Self {
            client,
            url,
            selector,
        }
    }

    pub fn build_client() -> Result<Client, SourceError> {
        Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) ListingCatalogBot/0.1")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))
    }
}

/// Text of every element matching `selector`, whitespace collapsed.
pub fn parse_listings(html: &str, selector: &str) -> Result<Vec<String>, SourceError> {
    let document = Html::parse_document(html);
    let item_selector =
        Selector::parse(selector).map_err(|e| SourceError::Selector(e.to_string()))?;

    let listings = document
        .select(&item_selector)
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect();

    Ok(listings)
}

#[async_trait::async_trait]
impl ListingSource for HtmlSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<String>, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::InvalidResponse(response.status().as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let listings = parse_listings(&html, &self.selector)?;
        debug!("{} listings on {}", listings.len(), self.url);
        Ok(listings)
    }
}
