// Where raw listing strings come from
pub mod file;
pub mod html;

pub use file::FileSource;
pub use html::HtmlSource;

use crate::model::SourceError;

#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> String;

    async fn fetch(&self) -> Result<Vec<String>, SourceError>;
}

/// Listings given inline in the configuration.
pub struct StaticSource {
    listings: Vec<String>,
}

impl StaticSource {
    pub fn new(listings: Vec<String>) -> Self {
        Self { listings }
    }
}

#[async_trait::async_trait]
impl ListingSource for StaticSource {
    fn name(&self) -> String {
        "config".to_string()
    }

    async fn fetch(&self) -> Result<Vec<String>, SourceError> {
        Ok(self
            .listings
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}
