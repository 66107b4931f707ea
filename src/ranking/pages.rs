//! Ranking page URLs

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use std::ops::RangeInclusive;
use url::Url;

/// Generates the URL of each ranking page
#[derive(Debug, Clone)]
pub struct RankingPages {
    base: Url,
    page_param: String,
    start_page: u32,
    max_page: u32,
}

impl RankingPages {
    /// Build from the site config
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let mut base = Url::parse(&site.base_url)?;
        {
            let mut segments = base
                .path_segments_mut()
                .map_err(|()| Error::config(format!("base URL cannot have a path: {}", site.base_url)))?;
            segments.pop_if_empty();
            for segment in site.ranking_path.iter().filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        base.set_query(None);

        Ok(Self {
            base,
            page_param: site.page_param.clone(),
            start_page: site.start_page,
            max_page: site.max_page,
        })
    }

    /// URL of page `page`, e.g. `.../2024?page=1`
    pub fn url(&self, page: u32) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair(&self.page_param, &page.to_string());
        url
    }

    /// Page indexes to scrape, inclusive
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start_page..=self.max_page
    }

    /// Every page URL in scrape order
    pub fn urls(&self) -> impl Iterator<Item = Url> + '_ {
        self.pages().map(|page| self.url(page))
    }
}
