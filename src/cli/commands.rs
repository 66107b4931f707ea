//! CLI commands and argument parsing

use crate::schema::ConflictPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// University ranking scraper
#[derive(Parser, Debug)]
#[command(name = "uni-rank-scraper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// How to handle a field seen with two different types (overrides config)
    #[arg(long, global = true, value_enum)]
    pub on_type_conflict: Option<ConflictPolicy>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape the ranking site and write data, schema and type schema
    Scrape {
        /// Last page index to scrape, inclusive
        #[arg(long)]
        max_page: Option<u32>,

        /// First page index to scrape
        #[arg(long)]
        start_page: Option<u32>,

        /// Keep records whose detail page cannot be fetched
        #[arg(long)]
        skip_failed_details: bool,
    },

    /// Infer schema and type schema from an existing data file
    Infer {
        /// Data file (JSON array of records)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Search and download logos and campus images for scraped institutions
    Media {
        /// Data file (defaults to the configured data file)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Logos per institution
        #[arg(long)]
        logo_count: Option<u32>,

        /// Campus images per institution
        #[arg(long)]
        image_count: Option<u32>,
    },

    /// Print the ranking page URLs that would be scraped
    Pages {
        /// Last page index, inclusive
        #[arg(long)]
        max_page: Option<u32>,
    },
}
