//! Ranking site scraping
//!
//! Turns the paginated ranking listing and each institution's detail page
//! into [`University`] records:
//!
//! - [`RankingPages`] builds page URLs
//! - [`RankingExtractor`] parses ranking rows and detail pages
//! - [`RankingScraper`] ties both to the HTTP client as a
//!   [`RecordSource`](crate::source::RecordSource)

mod extract;
mod pages;
mod scrape;
mod types;

pub use extract::RankingExtractor;
pub use pages::RankingPages;
pub use scrape::RankingScraper;
pub use types::{split_location, Course, DetailData, Program, RankingRow, University};
