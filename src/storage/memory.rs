//! In-memory dataset store using `DashMap`.
//!
//! Data is lost on process restart; use [`ParquetDatasetStore`] for
//! persistence.
//!
//! [`ParquetDatasetStore`]: super::ParquetDatasetStore

use super::{validate_name, DatasetStore};
use crate::table::SampleTable;
use crate::{Error, Result};
use dashmap::DashMap;

/// Concurrent in-memory store. Tables are reference counted, so load and
/// save are cheap clones.
pub struct MemoryDatasetStore {
    tables: DashMap<String, SampleTable>,
}

impl MemoryDatasetStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
        }
    }

    /// Number of stored datasets
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Remove everything
    pub fn clear(&self) {
        self.tables.clear();
    }
}

impl Default for MemoryDatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore for MemoryDatasetStore {
    fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.tables.iter().map(|e| e.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<SampleTable> {
        self.tables
            .get(name)
            .map(|t| t.value().clone())
            .ok_or_else(|| Error::DatasetNotFound(name.to_string()))
    }

    fn save(&self, name: &str, table: &SampleTable) -> Result<()> {
        validate_name(name)?;
        self.tables.insert(name.to_string(), table.clone());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.tables.remove(name);
        Ok(())
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.tables.contains_key(name))
    }
}
