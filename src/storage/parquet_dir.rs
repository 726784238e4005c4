//! Directory of Parquet files, one `<name>.parquet` per dataset

use super::{validate_name, DatasetStore};
use crate::table::SampleTable;
use crate::{Error, Result};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const EXTENSION: &str = "parquet";

/// Parquet-backed dataset store
#[derive(Debug, Clone)]
pub struct ParquetDatasetStore {
    root: PathBuf,
}

impl ParquetDatasetStore {
    /// Open a store rooted at `root`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// The directory cannot be created
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            Error::StorageError(format!(
                "Failed to create dataset directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    /// Directory holding the files
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.{EXTENSION}")))
    }
}

/// Read every batch of a Parquet file into one table
fn read_parquet(path: &Path) -> Result<SampleTable> {
    let file = File::open(path)
        .map_err(|e| Error::StorageError(format!("Failed to open Parquet file: {e}")))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::StorageError(format!("Failed to parse Parquet file: {e}")))?;
    let schema = builder.schema().clone();

    let reader = builder
        .build()
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet reader: {e}")))?;

    let mut batches = Vec::new();
    for batch in reader {
        let batch = batch
            .map_err(|e| Error::StorageError(format!("Failed to read record batch: {e}")))?;
        batches.push(batch);
    }

    let batch = match batches.len() {
        0 => RecordBatch::new_empty(schema),
        1 => batches.remove(0),
        _ => arrow::compute::concat_batches(&schema, &batches)?,
    };
    Ok(SampleTable::new(batch))
}

fn write_parquet(path: &Path, table: &SampleTable) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet file: {e}")))?;
    let mut writer = ArrowWriter::try_new(file, table.schema(), None)?;
    writer.write(table.batch())?;
    writer.close()?;
    Ok(())
}

impl DatasetStore for ParquetDatasetStore {
    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<SampleTable> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(Error::DatasetNotFound(name.to_string()));
        }
        let table = read_parquet(&path)?;
        tracing::debug!(
            dataset = name,
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Loaded dataset"
        );
        Ok(table)
    }

    fn save(&self, name: &str, table: &SampleTable) -> Result<()> {
        let path = self.path_for(name)?;
        // Write beside the target and rename so readers never see a torn file
        let staging = self.root.join(format!(".{name}.{EXTENSION}.tmp"));
        if let Err(e) = write_parquet(&staging, table) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        fs::rename(&staging, &path)?;
        tracing::debug!(dataset = name, rows = table.num_rows(), "Saved dataset");
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path_for(name)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "petrolog-store-{tag}-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample() -> SampleTable {
        SampleTable::builder()
            .f64("DEPTH", vec![1000.0, 1000.5, 1001.0])
            .f64("GR", vec![45.0, f64::NAN, 120.0])
            .i64("IQUAL", vec![1, 0, 1])
            .text("WELL_NAME", vec!["W1", "W1", "W2"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_round_trip_keeps_schema_and_values() {
        let dir = scratch("roundtrip");
        let store = ParquetDatasetStore::open(&dir).unwrap();
        store.save("fix_pass_qc", &sample()).unwrap();

        let loaded = store.load("fix_pass_qc").unwrap();
        assert_eq!(loaded.column_names(), sample().column_names());
        assert_eq!(loaded.numeric("DEPTH").unwrap(), vec![1000.0, 1000.5, 1001.0]);
        assert!(loaded.numeric("GR").unwrap()[1].is_nan());
        assert_eq!(
            loaded.text("WELL_NAME").unwrap()[2].as_deref(),
            Some("W2")
        );
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_list_only_parquet_files() {
        let dir = scratch("list");
        let store = ParquetDatasetStore::open(&dir).unwrap();
        store.save("b", &sample()).unwrap();
        store.save("a", &sample()).unwrap();
        fs::write(dir.join("notes.txt"), "x").unwrap();

        assert_eq!(store.list().unwrap(), vec!["a", "b"]);
        assert!(store.exists("a").unwrap());
        store.delete("a").unwrap();
        store.delete("a").unwrap();
        assert_eq!(store.list().unwrap(), vec!["b"]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_and_invalid_names() {
        let dir = scratch("missing");
        let store = ParquetDatasetStore::open(&dir).unwrap();
        assert!(matches!(store.load("absent"), Err(Error::DatasetNotFound(_))));
        assert!(matches!(
            store.save("../escape", &sample()),
            Err(Error::InvalidInput(_))
        ));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_empty_table_round_trip() {
        let dir = scratch("empty");
        let store = ParquetDatasetStore::open(&dir).unwrap();
        let empty = SampleTable::builder().f64("DEPTH", vec![]).build().unwrap();
        store.save("empty", &empty).unwrap();
        let loaded = store.load("empty").unwrap();
        assert_eq!(loaded.num_rows(), 0);
        assert!(loaded.has_column("DEPTH"));
        fs::remove_dir_all(dir).unwrap();
    }
}
