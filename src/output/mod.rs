//! Output module
//!
//! Writes the JSON artifacts of a run:
//! - the scraped data file
//! - the finalized schema descriptor, through a [`SchemaSink`]
//! - the generated type schema
//!
//! and the CSV export of collected media URLs.

mod table;
mod writer;

pub use table::write_csv;
pub use writer::{read_json, write_json_pretty, JsonFileSink, SchemaSink};
