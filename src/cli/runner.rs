//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::media::{self, MediaCollector, MediaTarget};
use crate::output::read_json;
use crate::pipeline::{self, ArtifactSet};
use crate::ranking::{RankingPages, RankingScraper};
use crate::source::VecSource;
use crate::types::JsonValue;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Scrape {
                max_page,
                start_page,
                skip_failed_details,
            } => {
                let mut config = self.load_config()?;
                if let Some(max_page) = max_page {
                    config.site.max_page = *max_page;
                }
                if let Some(start_page) = start_page {
                    config.site.start_page = *start_page;
                }
                if *skip_failed_details {
                    config.extraction.skip_failed_details = true;
                }
                self.scrape(&config).await
            }
            Commands::Infer { input } => {
                let config = self.load_config()?;
                self.infer(&config, input).await
            }
            Commands::Media {
                input,
                logo_count,
                image_count,
            } => {
                let mut config = self.load_config()?;
                if let Some(count) = logo_count {
                    config.media.logo_count = *count;
                }
                if let Some(count) = image_count {
                    config.media.image_count = *count;
                }
                self.media(&config, input.as_deref()).await
            }
            Commands::Pages { max_page } => {
                let mut config = self.load_config()?;
                if let Some(max_page) = max_page {
                    config.site.max_page = *max_page;
                }
                self.pages(&config)
            }
        }
    }

    /// Load the config file (or defaults) and apply global overrides
    fn load_config(&self) -> Result<ScrapeConfig> {
        let mut config = match &self.cli.config {
            Some(path) => {
                debug!(path = %path.display(), "Loading config");
                ScrapeConfig::from_file(path)?
            }
            None => ScrapeConfig::default(),
        };

        if let Some(dir) = &self.cli.output_dir {
            config.output.dir.clone_from(dir);
        }
        if let Some(policy) = self.cli.on_type_conflict {
            config.schema.on_type_conflict = policy;
        }
        Ok(config)
    }

    async fn scrape(&self, config: &ScrapeConfig) -> Result<()> {
        config.validate()?;
        info!(
            pages = ?(config.site.start_page..=config.site.max_page),
            policy = ?config.schema.on_type_conflict,
            "Scraping data, please wait"
        );

        let mut scraper = RankingScraper::new(config)?;
        let output = pipeline::run(&mut scraper, config.schema.on_type_conflict).await?;
        let written = pipeline::write_artifacts(
            &output,
            &config.output,
            &config.schema.title,
            ArtifactSet::all(),
        )?;

        print_written(&written);
        Ok(())
    }

    async fn infer(&self, config: &ScrapeConfig, input: &Path) -> Result<()> {
        let items: Vec<JsonValue> = read_json(input)?;
        info!(path = %input.display(), records = items.len(), "Inferring schema from data file");

        let mut source = VecSource::single_page(items);
        let output = pipeline::run(&mut source, config.schema.on_type_conflict).await?;
        let written = pipeline::write_artifacts(
            &output,
            &config.output,
            &config.schema.title,
            ArtifactSet::schemas_only(),
        )?;

        print_written(&written);
        Ok(())
    }

    async fn media(&self, config: &ScrapeConfig, input: Option<&Path>) -> Result<()> {
        let input = input.map_or_else(|| config.output.data_path(), Path::to_path_buf);
        let targets: Vec<MediaTarget> = read_json(&input)?;
        info!(
            path = %input.display(),
            institutions = targets.len(),
            "Collecting logos and images, please wait"
        );

        let collector = MediaCollector::new(config)?;
        let report = collector.collect_all(&targets).await;

        let urls_path = config.media.urls_path(&config.output);
        let csv_path = config.media.urls_csv_path(&config.output);
        media::write_urls_json(&urls_path, &report.entries)?;
        media::convert_urls_to_csv(&urls_path, &csv_path)?;
        print_written(&[urls_path, csv_path]);

        match report.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn pages(&self, config: &ScrapeConfig) -> Result<()> {
        config.validate()?;
        let pages = RankingPages::new(&config.site)?;
        for url in pages.urls() {
            println!("{url}");
        }
        Ok(())
    }
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", path.display());
    }
}
