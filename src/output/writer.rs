//! JSON file writer
//!
//! Provides pretty JSON writing and the schema sink.

use crate::error::{Error, Result};
use crate::schema::InferredSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Accepts the finalized schema for persistence
pub trait SchemaSink {
    /// Persist the schema
    fn persist(&self, schema: &InferredSchema) -> Result<()>;
}

/// Writes the schema as pretty JSON to a file
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Create a sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchemaSink for JsonFileSink {
    fn persist(&self, schema: &InferredSchema) -> Result<()> {
        write_json_pretty(&self.path, schema)
    }
}

/// Write `value` as pretty-printed JSON, creating parent directories
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;

    let file = File::create(path)
        .map_err(|e| Error::output(format!("cannot create {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    debug!(path = %path.display(), "Wrote JSON file");
    Ok(())
}

/// Create the parent directory of `path` if it has one
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::output(format!("cannot create directory {}: {e}", parent.display()))
        })?;
    }
    Ok(())
}

/// Read a JSON file
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
