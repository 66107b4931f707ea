//! Logo and campus image collection

use super::search::ImageSearch;
use super::types::{ImageKind, MediaEntry, MediaTarget};
use crate::config::ScrapeConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Entries collected before the run finished or failed
#[derive(Debug)]
pub struct MediaReport {
    pub entries: Vec<MediaEntry>,
    /// Error that stopped the run; `entries` holds everything before it
    pub error: Option<Error>,
}

/// Searches and downloads logos and campus images per institution
#[derive(Debug)]
pub struct MediaCollector {
    client: HttpClient,
    search: ImageSearch,
    image_root: PathBuf,
    logo_count: u32,
    image_count: u32,
    download_concurrency: usize,
}

impl MediaCollector {
    /// Create a collector with an HTTP client built from `config`
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = HttpClient::with_config(config.http_client_config())?;
        Self::with_client(config, client)
    }

    /// Create a collector using an existing client
    pub fn with_client(config: &ScrapeConfig, client: HttpClient) -> Result<Self> {
        let media = &config.media;
        media.validate()?;
        Ok(Self {
            client,
            search: ImageSearch::new(media)?,
            image_root: media.image_root(&config.output),
            logo_count: media.logo_count,
            image_count: media.image_count,
            download_concurrency: media.download_concurrency.max(1),
        })
    }

    /// Root directory images are saved under
    pub fn image_root(&self) -> &Path {
        &self.image_root
    }

    /// Search and save logos and campus images of one institution
    pub async fn collect(&self, target: &MediaTarget) -> Result<MediaEntry> {
        let logo = self.collect_kind(target, ImageKind::Logo, self.logo_count).await?;
        let images = self
            .collect_kind(target, ImageKind::Campus, self.image_count)
            .await?;
        Ok(MediaEntry {
            id: target.id.clone(),
            name: target.name.clone(),
            logo,
            images,
        })
    }

    /// Collect every institution in order, stopping at the first search failure
    pub async fn collect_all(&self, targets: &[MediaTarget]) -> MediaReport {
        let mut entries = Vec::with_capacity(targets.len());

        for (index, target) in targets.iter().enumerate() {
            match self.collect(target).await {
                Ok(entry) => {
                    info!(
                        institution = index + 1,
                        total = targets.len(),
                        logos = entry.logo.len(),
                        images = entry.images.len(),
                        "Processed institution"
                    );
                    entries.push(entry);
                }
                Err(e) => {
                    error!(name = %target.name, "Media collection stopped: {e}");
                    return MediaReport {
                        entries,
                        error: Some(e),
                    };
                }
            }
        }

        MediaReport {
            entries,
            error: None,
        }
    }

    /// Search one kind of image and download the results.
    ///
    /// A failed download is logged and its URL left out; a failed search is an error.
    async fn collect_kind(
        &self,
        target: &MediaTarget,
        kind: ImageKind,
        count: u32,
    ) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let urls = self
            .search
            .search(&self.client, &kind.query(&target.name), count)
            .await?;
        if urls.is_empty() {
            warn!(name = %target.name, ?kind, "No images found");
            return Ok(Vec::new());
        }

        let dir = self.image_root.join(&target.id).join(kind.dir_name());
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            Error::output(format!("cannot create directory {}: {e}", dir.display()))
        })?;

        let dir = &dir;
        let saved: Vec<Option<String>> = stream::iter(urls.into_iter().enumerate())
            .map(|(index, url)| {
                let path = dir.join(kind.file_name(&target.name, index + 1));
                async move {
                    match self.download(&url, &path).await {
                        Ok(()) => Some(url),
                        Err(e) => {
                            warn!(name = %target.name, %url, "Failed to save image: {e}");
                            None
                        }
                    }
                }
            })
            .buffered(self.download_concurrency)
            .collect()
            .await;

        Ok(saved.into_iter().flatten().collect())
    }

    async fn download(&self, url: &str, path: &Path) -> Result<()> {
        let bytes = self.client.get_bytes(url).await?;
        tokio::fs::write(path, &bytes).await?;
        debug!(%url, path = %path.display(), bytes = bytes.len(), "Saved image");
        Ok(())
    }
}
