//! Image search API client

use super::types::SearchResponse;
use crate::config::MediaConfig;
use crate::error::{Result, ResultExt};
use crate::http::HttpClient;
use tracing::debug;
use url::Url;

/// Image search requests against a Bing-compatible endpoint
#[derive(Clone)]
pub struct ImageSearch {
    endpoint: Url,
    api_key_header: String,
    api_key: String,
    license: Option<String>,
    image_filters: Option<String>,
}

impl ImageSearch {
    /// Create a search client, resolving the API key from config or environment
    pub fn new(config: &MediaConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Self::with_api_key(config, api_key)
    }

    /// Create a search client with an explicit API key
    pub fn with_api_key(config: &MediaConfig, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: Url::parse(&config.endpoint)?,
            api_key_header: config.api_key_header.clone(),
            api_key: api_key.into(),
            license: config.license.clone(),
            image_filters: config.image_filters.clone(),
        })
    }

    /// Request URL for a query
    pub fn request_url(&self, query: &str, count: u32) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            pairs.append_pair("count", &count.to_string());
            if let Some(license) = &self.license {
                pairs.append_pair("license", license);
            }
            if let Some(filters) = &self.image_filters {
                pairs.append_pair("imageFilters", filters);
            }
        }
        url
    }

    /// Content URLs of up to `count` images matching `query`
    pub async fn search(&self, client: &HttpClient, query: &str, count: u32) -> Result<Vec<String>> {
        let url = self.request_url(query, count);
        let response = client
            .get_with_headers(url.as_str(), &[(self.api_key_header.as_str(), self.api_key.as_str())])
            .await?;
        let body = response.text().await?;
        let results: SearchResponse = serde_json::from_str(&body)
            .with_context(|| format!("unexpected image search response for '{query}'"))?;

        debug!(query, results = results.value.len(), "Image search");
        Ok(results
            .value
            .into_iter()
            .take(count as usize)
            .map(|result| result.content_url)
            .collect())
    }
}

impl std::fmt::Debug for ImageSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSearch")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key_header", &self.api_key_header)
            .field("license", &self.license)
            .field("image_filters", &self.image_filters)
            .finish_non_exhaustive()
    }
}
