//! Dataset storage (Arrow/Parquet)
//!
//! Sample tables are read and written whole, by name. The calculation core
//! never touches a store; the session loads a table, hands it to the
//! analyzer and saves the result.
//!
//! # Example
//!
//! ```rust
//! use petrolog::storage::{DatasetStore, MemoryDatasetStore};
//! use petrolog::SampleTable;
//!
//! # fn example() -> petrolog::Result<()> {
//! let store = MemoryDatasetStore::new();
//! let table = SampleTable::builder().f64("DEPTH", vec![1.0, 2.0]).build()?;
//!
//! store.save("well_a", &table)?;
//! assert_eq!(store.list()?, vec!["well_a".to_string()]);
//! assert_eq!(store.load("well_a")?.num_rows(), 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod memory;
mod parquet_dir;

pub use memory::MemoryDatasetStore;
pub use parquet_dir::ParquetDatasetStore;

use crate::table::SampleTable;
use crate::{Error, Result};

/// Named table storage
pub trait DatasetStore: Send + Sync {
    /// Dataset names, sorted
    ///
    /// # Errors
    ///
    /// Backend I/O failure
    fn list(&self) -> Result<Vec<String>>;

    /// Load a dataset
    ///
    /// # Errors
    ///
    /// [`Error::DatasetNotFound`] for an unknown name, or a backend failure
    fn load(&self, name: &str) -> Result<SampleTable>;

    /// Store a dataset, replacing any previous one with the same name
    ///
    /// # Errors
    ///
    /// Invalid name or backend failure
    fn save(&self, name: &str, table: &SampleTable) -> Result<()>;

    /// Remove a dataset; no-op if absent
    ///
    /// # Errors
    ///
    /// Backend failure
    fn delete(&self, name: &str) -> Result<()>;

    /// Whether a dataset exists
    ///
    /// # Errors
    ///
    /// Backend failure
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.list()?.iter().any(|n| n == name))
    }
}

/// Reject names that are empty or could escape a storage directory
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let bad = name.trim().is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == ".."
        || name.contains('\0');
    if bad {
        Err(Error::InvalidInput(format!("Invalid dataset name '{name}'")))
    } else {
        Ok(())
    }
}
