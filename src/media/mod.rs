//! Institution media collection
//!
//! Reads the scraped data file and, for each institution, searches an image
//! search API for logos and campus images:
//!
//! - [`ImageSearch`] builds and sends search requests
//! - [`MediaCollector`] downloads results to `<image_root>/<id>/logos|images/`
//! - [`write_urls_json`] and [`convert_urls_to_csv`] write the URL lists

mod collect;
mod export;
mod search;
mod types;

pub use collect::{MediaCollector, MediaReport};
pub use export::{convert_urls_to_csv, write_urls_json};
pub use search::ImageSearch;
pub use types::{file_stem, ImageKind, MediaEntry, MediaTarget};
