//! Parquet container for canonical tables.
//!
//! A container is a single Parquet file. Column 0 holds the index as
//! `Int64`, the remaining columns hold the values as `Float64`, and the
//! ordered label list (index label first) is recorded in the schema metadata
//! under [`LABELS_KEY`]. On load the label list must match the data columns
//! one for one, otherwise the file is reported as corrupt.

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use klines_types::{CanonicalTable, Column};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{Result, StoreError};

/// Schema metadata key holding the JSON array of column labels.
pub const LABELS_KEY: &str = "klines.columns";

/// File extension of containers.
pub const EXTENSION: &str = "parquet";

/// Returns the container path for `path`.
///
/// Appends `.parquet` unless the path already has that extension, so
/// `data/btcusdt` and `data/btcusdt.parquet` name the same container.
#[must_use]
pub fn container_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.extension().is_some_and(|ext| ext == EXTENSION) {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// A canonical table bound to a container file.
#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
    compression: Compression,
}

impl TableStore {
    /// Creates a store for the container derived from `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: container_path(path),
            compression: Compression::SNAPPY,
        }
    }

    /// Sets the compression codec. Every codec is lossless.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Returns the container path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a file exists at the container path.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes the table, replacing any existing container.
    ///
    /// The table is encoded into a temporary file in the same directory
    /// which is then renamed over the container, so a failed save leaves
    /// the previous container intact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be created, written or
    /// renamed (for example when the parent directory is missing, read-only
    /// or full) and [`StoreError::Parquet`] if encoding fails.
    pub fn save(&self, table: &CanonicalTable) -> Result<()> {
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
        write_table(table, temp.as_file_mut(), self.compression, &self.path)?;
        temp.as_file().sync_all().map_err(io_error)?;
        temp.persist(&self.path).map_err(|e| io_error(e.error))?;

        info!(
            path = %self.path.display(),
            rows = table.len(),
            "saved table"
        );
        Ok(())
    }

    /// Reads the table back.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if there is no container,
    /// [`StoreError::Io`] if it cannot be opened and [`StoreError::Corrupt`]
    /// if it is not a valid container.
    pub fn load(&self) -> Result<CanonicalTable> {
        let file = File::open(&self.path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Io {
                path: self.path.clone(),
                source,
            },
        })?;
        let table = read_table(file).map_err(|reason| StoreError::Corrupt {
            path: self.path.clone(),
            reason,
        })?;

        info!(
            path = %self.path.display(),
            rows = table.len(),
            "loaded table"
        );
        Ok(table)
    }
}

/// Saves a table to the container derived from `path`.
///
/// # Errors
///
/// See [`TableStore::save`].
pub fn save(table: &CanonicalTable, path: impl AsRef<Path>) -> Result<()> {
    TableStore::new(path).save(table)
}

/// Loads a table from the container derived from `path`.
///
/// # Errors
///
/// See [`TableStore::load`].
pub fn load(path: impl AsRef<Path>) -> Result<CanonicalTable> {
    TableStore::new(path).load()
}

fn container_schema(table: &CanonicalTable) -> Result<Schema> {
    let labels: Vec<&str> = std::iter::once(table.index_label())
        .chain(table.column_names())
        .collect();
    let labels_json =
        serde_json::to_string(&labels).map_err(|e| StoreError::Parquet(e.to_string()))?;

    let index = Field::new(table.index_label(), DataType::Int64, false);
    let fields: Vec<Field> = std::iter::once(index)
        .chain(
            table
                .column_names()
                .map(|name| Field::new(name, DataType::Float64, false)),
        )
        .collect();

    Ok(Schema::new_with_metadata(
        fields,
        HashMap::from([(LABELS_KEY.to_string(), labels_json)]),
    ))
}

/// Encodes `table` into `writer`. `path` names the destination in errors.
fn write_table<W: Write + Send>(
    table: &CanonicalTable,
    writer: W,
    compression: Compression,
    path: &Path,
) -> Result<()> {
    let schema: SchemaRef = Arc::new(container_schema(table)?);

    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns().len() + 1);
    arrays.push(Arc::new(Int64Array::from(table.index().to_vec())));
    for column in table.columns() {
        arrays.push(Arc::new(Float64Array::from(column.values().to_vec())));
    }

    let batch = RecordBatch::try_new(Arc::clone(&schema), arrays)
        .map_err(|e| StoreError::Parquet(e.to_string()))?;

    let props = WriterProperties::builder()
        .set_compression(compression)
        .build();
    let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(props))
        .map_err(|e| encode_error(path, e))?;
    arrow_writer
        .write(&batch)
        .map_err(|e| encode_error(path, e))?;
    arrow_writer.close().map_err(|e| encode_error(path, e))?;

    Ok(())
}

/// Splits writer failures from encoding failures.
///
/// The parquet writer wraps I/O errors of the underlying sink in
/// [`ParquetError::External`].
fn encode_error(path: &Path, err: ParquetError) -> StoreError {
    match err {
        ParquetError::External(inner) => match inner.downcast::<std::io::Error>() {
            Ok(source) => StoreError::Io {
                path: path.to_path_buf(),
                source: *source,
            },
            Err(inner) => StoreError::Parquet(inner.to_string()),
        },
        other => StoreError::Parquet(other.to_string()),
    }
}

/// Decodes a container, returning a human-readable reason on failure.
fn read_table(file: File) -> std::result::Result<CanonicalTable, String> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| format!("not a parquet file: {e}"))?;

    let schema = Arc::clone(builder.schema());
    let labels = match schema.metadata().get(LABELS_KEY) {
        Some(json) => Some(json.clone()),
        None => builder
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .and_then(|kv| kv.iter().find(|e| e.key == LABELS_KEY))
            .and_then(|e| e.value.clone()),
    }
    .ok_or_else(|| format!("missing '{LABELS_KEY}' label metadata"))?;
    let labels: Vec<String> =
        serde_json::from_str(&labels).map_err(|e| format!("unreadable label metadata: {e}"))?;

    check_layout(&schema, &labels)?;
    debug!(columns = ?labels, "container layout verified");

    let reader = builder.build().map_err(|e| e.to_string())?;
    let mut index: Vec<i64> = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); labels.len() - 1];

    for batch in reader {
        let batch = batch.map_err(|e| e.to_string())?;

        let times = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or("index column is not Int64")?;
        if times.null_count() > 0 {
            return Err("index column contains nulls".to_string());
        }
        index.extend_from_slice(times.values());

        for (position, column) in values.iter_mut().enumerate() {
            let array = batch
                .column(position + 1)
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| format!("column '{}' is not Float64", labels[position + 1]))?;
            if array.null_count() > 0 {
                return Err(format!("column '{}' contains nulls", labels[position + 1]));
            }
            column.extend_from_slice(array.values());
        }
    }

    let mut labels = labels.into_iter();
    let index_label = labels.next().unwrap_or_default();
    let columns = labels
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    CanonicalTable::new(index_label, index, columns).map_err(|e| e.to_string())
}

/// Verifies that the label list and the data columns agree.
fn check_layout(schema: &Schema, labels: &[String]) -> std::result::Result<(), String> {
    let fields = schema.fields();
    if labels.len() != fields.len() {
        return Err(format!(
            "label list has {} entries but data has {} columns",
            labels.len(),
            fields.len()
        ));
    }
    if labels.is_empty() {
        return Err("container has no index column".to_string());
    }
    for (position, (label, field)) in labels.iter().zip(fields.iter()).enumerate() {
        if field.name() != label {
            return Err(format!(
                "column {position} is named '{}' but labelled '{label}'",
                field.name()
            ));
        }
        let expected = if position == 0 {
            DataType::Int64
        } else {
            DataType::Float64
        };
        if *field.data_type() != expected {
            return Err(format!(
                "column '{label}' has type {}, expected {expected}",
                field.data_type()
            ));
        }
    }
    Ok(())
}
