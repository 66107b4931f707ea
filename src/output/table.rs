//! CSV file writer

use super::writer::ensure_parent_dir;
use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Write a header row followed by `rows` as CSV, creating parent directories
pub fn write_csv<I>(path: &Path, header: &[&str], rows: I) -> Result<usize>
where
    I: IntoIterator<Item = Vec<String>>,
{
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header)?;
    let mut written = 0;
    for row in rows {
        writer.write_record(&row)?;
        written += 1;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = written, "Wrote CSV file");
    Ok(written)
}
