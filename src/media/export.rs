//! `urls.json` and `urls.csv` files

use super::types::MediaEntry;
use crate::error::Result;
use crate::output::{read_json, write_csv, write_json_pretty};
use std::path::Path;
use tracing::info;

/// Write the collected entries as pretty JSON
pub fn write_urls_json(path: &Path, entries: &[MediaEntry]) -> Result<()> {
    write_json_pretty(path, entries)?;
    info!(path = %path.display(), entries = entries.len(), "Media URLs saved");
    Ok(())
}

/// Convert a `urls.json` file to CSV with `id,name,logo,images` columns
pub fn convert_urls_to_csv(json_path: &Path, csv_path: &Path) -> Result<usize> {
    let entries: Vec<MediaEntry> = read_json(json_path)?;
    let rows = entries
        .iter()
        .map(MediaEntry::csv_row)
        .collect::<serde_json::Result<Vec<_>>>()?;
    let written = write_csv(csv_path, &MediaEntry::CSV_HEADER, rows)?;
    info!(path = %csv_path.display(), rows = written, "Media CSV saved");
    Ok(written)
}
