//! Scrape pipeline
//!
//! Drains a [`RecordSource`] page by page, converts each item to a
//! [`Record`], and folds the records into one [`SchemaAccumulator`] strictly
//! in page-then-row order. Extraction inside a page may be concurrent; the
//! fold never is.

use crate::config::OutputConfig;
use crate::error::Result;
use crate::output::{write_json_pretty, JsonFileSink, SchemaSink};
use crate::record::Record;
use crate::schema::{ConflictPolicy, InferredSchema, SchemaAccumulator, TypeSchema, TypeSchemaBuilder};
use crate::source::RecordSource;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput<T> {
    /// Items as yielded by the source
    pub items: Vec<T>,
    /// Items as records, same order
    pub records: Vec<Record>,
    /// Finalized schema descriptor
    pub schema: InferredSchema,
    /// Number of pages drained
    pub pages: usize,
}

impl<T> PipelineOutput<T> {
    /// Build the JSON Schema document for the records
    pub fn type_schema(&self, title: &str) -> TypeSchema {
        TypeSchemaBuilder::new(title)
            .with_records(&self.records)
            .build()
    }
}

/// Drain `source` and infer the schema of everything it yields
pub async fn run<S: RecordSource>(
    source: &mut S,
    policy: ConflictPolicy,
) -> Result<PipelineOutput<S::Item>> {
    let started = Instant::now();
    let mut accumulator = SchemaAccumulator::with_policy(policy);
    let mut items = Vec::new();
    let mut records = Vec::new();
    let mut pages = 0;

    while let Some(batch) = source.next_page().await? {
        let page_records = batch
            .iter()
            .map(Record::from_serialize)
            .collect::<Result<Vec<_>>>()?;
        accumulator.observe_all(&page_records)?;

        info!(
            page = pages,
            records = page_records.len(),
            total = accumulator.records_observed(),
            "Page processed"
        );

        pages += 1;
        items.extend(batch);
        records.extend(page_records);
    }

    let schema = accumulator.finalize();
    info!(
        pages,
        records = records.len(),
        fields = schema.data_type.len(),
        optional = schema.optional_keys.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Schema inferred"
    );

    Ok(PipelineOutput {
        items,
        records,
        schema,
        pages,
    })
}

/// Which artifacts to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactSet {
    pub data: bool,
    pub schema: bool,
    pub type_schema: bool,
}

impl ArtifactSet {
    /// All three files
    pub fn all() -> Self {
        Self {
            data: true,
            schema: true,
            type_schema: true,
        }
    }

    /// Schema files only, for re-inferring an existing data file
    pub fn schemas_only() -> Self {
        Self {
            data: false,
            ..Self::all()
        }
    }
}

/// Write the selected artifacts, returning the paths written
pub fn write_artifacts<T: Serialize>(
    output: &PipelineOutput<T>,
    config: &OutputConfig,
    title: &str,
    artifacts: ArtifactSet,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if artifacts.data {
        let path = config.data_path();
        write_json_pretty(&path, &output.items)?;
        info!(path = %path.display(), records = output.items.len(), "Data saved");
        written.push(path);
    }

    if artifacts.schema {
        let sink = JsonFileSink::new(config.schema_path());
        sink.persist(&output.schema)?;
        info!(path = %sink.path().display(), "Schema saved");
        written.push(sink.path().to_path_buf());
    }

    if artifacts.type_schema {
        let path = config.type_schema_path();
        write_json_pretty(&path, &output.type_schema(title))?;
        info!(path = %path.display(), "Type schema saved");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::output::read_json;
    use crate::source::VecSource;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_folds_pages_in_order() {
        let mut source = VecSource::new(vec![
            vec![json!({"id": "1", "name": "A"}), json!({"id": "2"})],
            vec![],
            vec![json!({"id": "3", "name": "C", "tuitionFee": "9"})],
        ]);

        let output = run(&mut source, ConflictPolicy::Overwrite).await.unwrap();

        assert_eq!(output.pages, 3);
        assert_eq!(output.items.len(), 3);
        assert_eq!(output.records.len(), 3);
        assert_eq!(output.schema.optional_keys, vec!["name", "tuitionFee"]);
        assert_eq!(output.schema.type_of("id"), Some("string"));
        assert_eq!(output.schema.type_of("tuitionFee"), Some("Optional<string>"));
    }

    #[tokio::test]
    async fn test_run_empty_source() {
        let mut source: VecSource<Value> = VecSource::new(vec![]);
        let output = run(&mut source, ConflictPolicy::Error).await.unwrap();

        assert_eq!(output.pages, 0);
        assert!(output.schema.is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_non_mapping_items() {
        let mut source = VecSource::single_page(vec![json!({"id": "1"}), json!("oops")]);
        let err = run(&mut source, ConflictPolicy::Overwrite).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn test_run_propagates_type_conflict() {
        let mut source = VecSource::new(vec![
            vec![json!({"tuition": "10000"})],
            vec![json!({"tuition": 10000})],
        ]);
        let err = run(&mut source, ConflictPolicy::Error).await.unwrap_err();
        assert!(matches!(err, Error::TypeConflict { ref field, .. } if field == "tuition"));
    }

    #[tokio::test]
    async fn test_write_artifacts() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            dir: dir.path().to_path_buf(),
            ..OutputConfig::default()
        };
        let mut source = VecSource::single_page(vec![
            json!({"id": "1", "score": "99"}),
            json!({"id": "2"}),
        ]);
        let output = run(&mut source, ConflictPolicy::Overwrite).await.unwrap();

        let written = write_artifacts(&output, &config, "University", ArtifactSet::all()).unwrap();
        assert_eq!(
            written,
            vec![
                config.data_path(),
                config.schema_path(),
                config.type_schema_path()
            ]
        );

        let data: Value = read_json(&config.data_path()).unwrap();
        assert_eq!(data, json!([{"id": "1", "score": "99"}, {"id": "2"}]));

        let schema: Value = read_json(&config.schema_path()).unwrap();
        assert_eq!(
            schema,
            json!({"optionalKeys": ["score"], "dataType": {"id": "string", "score": "Optional<string>"}})
        );

        let type_schema: TypeSchema = read_json(&config.type_schema_path()).unwrap();
        assert_eq!(type_schema.required, vec!["id"]);
    }

    #[tokio::test]
    async fn test_write_schemas_only_skips_data() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            dir: dir.path().to_path_buf(),
            ..OutputConfig::default()
        };
        let mut source = VecSource::single_page(vec![json!({"id": "1"})]);
        let output = run(&mut source, ConflictPolicy::Overwrite).await.unwrap();

        let written =
            write_artifacts(&output, &config, "University", ArtifactSet::schemas_only()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(!config.data_path().exists());
    }
}
