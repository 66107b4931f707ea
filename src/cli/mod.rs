//! CLI module
//!
//! Command-line interface for the scraper.
//!
//! # Commands
//!
//! - `scrape` - Scrape the ranking site and write all artifacts
//! - `infer` - Re-infer schemas from an existing data file
//! - `pages` - Print the page URLs a scrape would visit

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
