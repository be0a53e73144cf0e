use crate::model::SourceError;
use crate::source::ListingSource;
use std::path::PathBuf;

/// A text file with one listing per line.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ListingSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<String>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
