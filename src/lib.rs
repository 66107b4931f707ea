//! # uni-rank-scraper
//!
//! Scrapes a paginated university ranking site into one JSON record per
//! institution and infers a schema across the heterogeneous records. A
//! second step collects logos and campus images for the scraped institutions.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use uni_rank_scraper::config::ScrapeConfig;
//! use uni_rank_scraper::pipeline::{self, ArtifactSet};
//! use uni_rank_scraper::ranking::RankingScraper;
//!
//! #[tokio::main]
//! async fn main() -> uni_rank_scraper::Result<()> {
//!     let config = ScrapeConfig::default();
//!     let mut scraper = RankingScraper::new(&config)?;
//!     let output = pipeline::run(&mut scraper, config.schema.on_type_conflict).await?;
//!     pipeline::write_artifacts(&output, &config.output, "University", ArtifactSet::all())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! RankingPages ──► HttpClient ──► RankingExtractor ──► University records
//!                                                            │
//!                                   (RecordSource, one batch per page)
//!                                                            │
//!                          Pipeline: Record conversion, sequential fold
//!                                                            │
//!            ┌───────────────────────────┬───────────────────┴──────────┐
//!      university_data.json     schema.json (SchemaSink)       type_schema.json
//!            │
//!   MediaCollector (image search + downloads) ──► img/<id>/, urls.json, urls.csv
//! ```

#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Short SHA-256 digests
pub mod digest;

/// Tagged record values
pub mod record;

/// Schema inference
pub mod schema;

/// Record sources
pub mod source;

/// HTTP client with retry and rate limiting
pub mod http;

/// Ranking site scraping
pub mod ranking;

/// JSON and CSV output
pub mod output;

/// Logo and campus image collection
pub mod media;

/// Fetch, fold and write
pub mod pipeline;

/// Scraper configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use record::{FieldValue, Record};
pub use schema::{ConflictPolicy, InferredSchema, SchemaAccumulator, SchemaDescriptor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
