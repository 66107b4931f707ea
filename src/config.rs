//! Scraper configuration
//!
//! Loaded from YAML. Every section has defaults matching the 2024 QS world
//! university rankings, so an empty file (or no file) is a valid config.

use crate::error::{Error, Result, ResultExt};
use crate::http::{default_user_agent, HttpClientConfig, RateLimiterConfig};
use crate::schema::ConflictPolicy;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Highest page index the ranking site serves
pub const MAX_PAGE_LIMIT: u32 = 100;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete scraper configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Which pages to scrape
    pub site: SiteConfig,
    /// CSS selectors for ranking and detail pages
    pub selectors: SelectorConfig,
    /// HTTP client settings
    pub http: HttpConfig,
    /// Detail-page extraction settings
    pub extraction: ExtractionConfig,
    /// Schema inference settings
    pub schema: SchemaConfig,
    /// Output files
    pub output: OutputConfig,
    /// Logo and campus image collection
    pub media: MediaConfig,
}

impl ScrapeConfig {
    /// Parse a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ScrapeConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.trim().is_empty() {
            return Err(Error::invalid_value("site.base_url", "must not be empty"));
        }
        url::Url::parse(&self.site.base_url)?;
        if self.site.page_param.trim().is_empty() {
            return Err(Error::invalid_value("site.page_param", "must not be empty"));
        }
        if self.site.start_page > self.site.max_page {
            return Err(Error::invalid_value(
                "site.max_page",
                format!(
                    "must be >= start_page ({}), got {}",
                    self.site.start_page, self.site.max_page
                ),
            ));
        }
        if self.site.max_page > MAX_PAGE_LIMIT {
            return Err(Error::invalid_value(
                "site.max_page",
                format!("must be <= {MAX_PAGE_LIMIT}, got {}", self.site.max_page),
            ));
        }
        if self.extraction.detail_concurrency == 0 {
            return Err(Error::invalid_value(
                "extraction.detail_concurrency",
                "must be at least 1",
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be at least 1"));
        }
        Ok(())
    }

    /// Build the HTTP client config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let http = &self.http;
        HttpClientConfig {
            timeout: Duration::from_secs(http.timeout_secs),
            max_retries: http.max_retries,
            initial_backoff: Duration::from_millis(http.initial_backoff_ms),
            max_backoff: Duration::from_millis(http.max_backoff_ms),
            backoff_type: http.backoff,
            rate_limit: http
                .requests_per_second
                .map(|rps| RateLimiterConfig::new(rps, http.burst_size.unwrap_or(rps))),
            default_headers: http.headers.clone(),
            user_agent: http.user_agent.clone().unwrap_or_else(default_user_agent),
        }
    }
}

// ============================================================================
// Site
// ============================================================================

/// Ranking site and page range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host, e.g. `https://www.topuniversities.com`
    pub base_url: String,
    /// Path segments of the ranking listing
    pub ranking_path: Vec<String>,
    /// Query parameter carrying the page index
    pub page_param: String,
    /// First page index (inclusive)
    pub start_page: u32,
    /// Last page index (inclusive)
    pub max_page: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.topuniversities.com".to_string(),
            ranking_path: vec![
                "university-rankings".to_string(),
                "world-university-rankings".to_string(),
                "2024".to_string(),
            ],
            page_param: "page".to_string(),
            start_page: 0,
            max_page: 0,
        }
    }
}

// ============================================================================
// Selectors
// ============================================================================

/// CSS selectors used by the extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One element per ranked institution
    pub row: String,
    /// Link with the institution name; its `href` is the detail page
    pub name_link: String,
    pub score: String,
    /// `City, Country` text
    pub location: String,
    /// Tuition badge on the detail page
    pub tuition_fee: String,
    /// Text stripped from the tuition badge
    pub tuition_fee_label: String,
    /// One pane per program; the pane id names the program
    pub program_pane: String,
    pub course_header: String,
    /// Degrees inside the element following a course header
    pub degree: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            row: ".api-ranking-css.normal-row".to_string(),
            name_link: ".uni-link".to_string(),
            score: ".overall-score-span".to_string(),
            location: ".location".to_string(),
            tuition_fee: r#"div.single-badge[data-href="expenses_Tab"] h3"#.to_string(),
            tuition_fee_label: "Tuition Fee/year".to_string(),
            program_pane: r#"#aptabsContent.tab-content .tab-pane.fade[role="tabpanel"]"#
                .to_string(),
            course_header: ".class-header".to_string(),
            degree: ".width-100.inside-tabs._gtmtrackDeptProgram_js".to_string(),
        }
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff: BackoffType,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// `None` disables rate limiting
    pub requests_per_second: Option<u32>,
    /// Defaults to `requests_per_second`
    pub burst_size: Option<u32>,
    pub user_agent: Option<String>,
    pub headers: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            backoff: BackoffType::Exponential,
            initial_backoff_ms: 100,
            max_backoff_ms: 60_000,
            requests_per_second: Some(5),
            burst_size: None,
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Detail-page extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Detail pages fetched at once per ranking page
    pub detail_concurrency: usize,
    /// Emit the record without detail data when its page cannot be fetched
    pub skip_failed_details: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            detail_concurrency: 8,
            skip_failed_details: false,
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Schema inference settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub on_type_conflict: ConflictPolicy,
    /// Title of the generated type schema
    pub title: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            on_type_conflict: ConflictPolicy::Overwrite,
            title: "University".to_string(),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Output directory and file names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub data_file: String,
    pub schema_file: String,
    pub type_schema_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            data_file: "university_data.json".to_string(),
            schema_file: "schema.json".to_string(),
            type_schema_file: "type_schema.json".to_string(),
        }
    }
}

impl OutputConfig {
    /// Path of the scraped data file
    pub fn data_path(&self) -> PathBuf {
        self.dir.join(&self.data_file)
    }

    /// Path of the schema descriptor file
    pub fn schema_path(&self) -> PathBuf {
        self.dir.join(&self.schema_file)
    }

    /// Path of the JSON Schema file
    pub fn type_schema_path(&self) -> PathBuf {
        self.dir.join(&self.type_schema_file)
    }
}

// ============================================================================
// Media
// ============================================================================

/// Default image search endpoint
pub const DEFAULT_IMAGE_SEARCH_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/images/search";

/// Logo and campus image collection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Image search API endpoint
    pub endpoint: String,
    /// API key; falls back to the `api_key_env` variable
    pub api_key: Option<String>,
    pub api_key_env: String,
    /// Header carrying the API key on search requests only
    pub api_key_header: String,
    /// Logos searched per institution
    pub logo_count: u32,
    /// Campus images searched per institution
    pub image_count: u32,
    /// `license` search parameter
    pub license: Option<String>,
    /// `imageFilters` search parameter
    pub image_filters: Option<String>,
    /// Image downloads in flight per search
    pub download_concurrency: usize,
    /// Image root, relative to the output directory
    pub image_dir: PathBuf,
    pub urls_file: String,
    pub urls_csv_file: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_IMAGE_SEARCH_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: "BING_API_KEY".to_string(),
            api_key_header: "Ocp-Apim-Subscription-Key".to_string(),
            logo_count: 10,
            image_count: 30,
            license: Some("ShareCommercially".to_string()),
            image_filters: Some("Size:Medium+Size:Large".to_string()),
            download_concurrency: 4,
            image_dir: PathBuf::from("img"),
            urls_file: "urls.json".to_string(),
            urls_csv_file: "urls.csv".to_string(),
        }
    }
}

impl MediaConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.endpoint)?;
        if self.logo_count == 0 && self.image_count == 0 {
            return Err(Error::invalid_value(
                "media.logo_count",
                "logo_count and image_count cannot both be 0",
            ));
        }
        if self.download_concurrency == 0 {
            return Err(Error::invalid_value(
                "media.download_concurrency",
                "must be at least 1",
            ));
        }
        if self.api_key_header.trim().is_empty() {
            return Err(Error::invalid_value("media.api_key_header", "must not be empty"));
        }
        Ok(())
    }

    /// API key from the config, else from the environment
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            return Ok(key.to_string());
        }
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Error::config(format!(
                "no image search API key: set media.api_key or {}",
                self.api_key_env
            ))),
        }
    }

    /// Directory holding `<id>/logos` and `<id>/images`
    pub fn image_root(&self, output: &OutputConfig) -> PathBuf {
        output.dir.join(&self.image_dir)
    }

    /// Path of the collected URL list
    pub fn urls_path(&self, output: &OutputConfig) -> PathBuf {
        output.dir.join(&self.urls_file)
    }

    /// Path of the CSV export of the URL list
    pub fn urls_csv_path(&self, output: &OutputConfig) -> PathBuf {
        output.dir.join(&self.urls_csv_file)
    }
}
