//! Ranking site record source

use super::extract::RankingExtractor;
use super::pages::RankingPages;
use super::types::{DetailData, RankingRow, University};
use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::source::RecordSource;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// Scrapes one ranking page at a time, fetching each row's detail page
#[derive(Debug)]
pub struct RankingScraper {
    client: HttpClient,
    pages: RankingPages,
    extractor: RankingExtractor,
    remaining: RangeInclusive<u32>,
    detail_concurrency: usize,
    skip_failed_details: bool,
}

impl RankingScraper {
    /// Create a scraper with an HTTP client built from `config`
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = HttpClient::with_config(config.http_client_config())?;
        Self::with_client(config, client)
    }

    /// Create a scraper using an existing client
    pub fn with_client(config: &ScrapeConfig, client: HttpClient) -> Result<Self> {
        let pages = RankingPages::new(&config.site)?;
        let remaining = pages.pages();
        Ok(Self {
            client,
            pages,
            extractor: RankingExtractor::new(&config.selectors)?,
            remaining,
            detail_concurrency: config.extraction.detail_concurrency.max(1),
            skip_failed_details: config.extraction.skip_failed_details,
        })
    }

    /// Page URL generator
    pub fn pages(&self) -> &RankingPages {
        &self.pages
    }

    /// Fetch and extract every institution on one ranking page, in row order
    pub async fn scrape_page(&self, page: u32) -> Result<Vec<University>> {
        let url = self.pages.url(page);
        info!(page, %url, "Scraping ranking page");

        let html = self.client.get_text(url.as_str()).await?;
        let rows = self.extractor.parse_ranking_page(&html, &url);
        if rows.is_empty() {
            warn!(page, %url, "No ranking rows found");
            return Ok(Vec::new());
        }

        // buffered() keeps row order while fetching concurrently
        stream::iter(rows)
            .map(|row| self.university(row))
            .buffered(self.detail_concurrency)
            .try_collect()
            .await
    }

    async fn university(&self, row: RankingRow) -> Result<University> {
        let detail = match &row.detail_url {
            Some(detail_url) => match self.client.get_text(detail_url.as_str()).await {
                Ok(html) => self.extractor.parse_detail_page(&html),
                Err(e) if self.skip_failed_details => {
                    warn!(name = %row.name, %detail_url, "Skipping detail page: {e}");
                    DetailData::default()
                }
                Err(e) => return Err(e),
            },
            None => {
                debug!(name = %row.name, "Row has no detail link");
                DetailData::default()
            }
        };
        Ok(University::from_parts(row, detail))
    }
}

#[async_trait]
impl RecordSource for RankingScraper {
    type Item = University;

    async fn next_page(&mut self) -> Result<Option<Vec<University>>> {
        match self.remaining.next() {
            Some(page) => self.scrape_page(page).await.map(Some),
            None => Ok(None),
        }
    }
}
