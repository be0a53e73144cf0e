use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlSourceConfig {
    pub url: String,
    /// CSS selector matching one element per listing.
    pub selector: String,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default)]
    pub listings: Vec<String>,
    #[serde(default)]
    pub listings_file: Option<String>,
    #[serde(default)]
    pub sources: Vec<HtmlSourceConfig>,
    /// Repeat the batch on this interval; run once when absent.
    #[serde(default)]
    pub check_interval_seconds: Option<u64>,
}

fn default_db_path() -> String {
    "catalog.db".to_string()
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
