//! Async analysis session
//!
//! An [`AnalysisSession`] is the explicit context a front end holds for one
//! user: a dataset store, an analyzer and the currently selected table. The
//! numeric work and all store I/O run on tokio's blocking pool so the async
//! request handlers never stall.
//!
//! Runs are serialised per session. A calculation replaces the current table
//! only when it succeeds; a failed run leaves the previous table in place.

use crate::plotting::{ensure_crossplot_norms, extract_markers, MarkerInterval};
use crate::storage::DatasetStore;
use crate::table::columns;
use crate::{Analyzer, Calculation, Error, ParamSet, Result, SampleTable};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Summary of the selected dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    /// Dataset name in the store
    pub dataset_name: String,
    /// Number of samples
    pub total_rows: usize,
    /// Column names in table order
    pub columns: Vec<String>,
    /// Distinct `WELL_NAME` values in first-seen order
    pub wells: Vec<String>,
    /// Distinct non-empty `MARKER` values in first-seen order
    pub markers: Vec<String>,
    /// `(min, max)` of `DEPTH`, ignoring NaN
    pub depth_range: Option<(f64, f64)>,
}

/// Outcome of one successful calculation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationReport {
    /// What ran
    pub calculation: Calculation,
    /// Dataset it ran on
    pub dataset: String,
    /// Rows in the output table
    pub rows_processed: usize,
    /// Rows removed by the calculation (DNS-DNSV drops incomplete samples)
    pub rows_dropped: usize,
    /// Columns that did not exist before the run
    pub columns_added: Vec<String>,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// Run end
    pub finished_at: DateTime<Utc>,
    /// Human-readable summary
    pub message: String,
}

#[derive(Default)]
struct SessionState {
    dataset: Option<String>,
    table: Option<SampleTable>,
}

impl SessionState {
    fn selected(&self) -> Result<(&str, &SampleTable)> {
        match (&self.dataset, &self.table) {
            (Some(name), Some(table)) => Ok((name, table)),
            _ => Err(Error::NoDatasetSelected),
        }
    }
}

/// Per-user analysis context
pub struct AnalysisSession<S: DatasetStore + 'static> {
    store: Arc<S>,
    analyzer: Analyzer,
    state: RwLock<SessionState>,
    run_lock: Mutex<()>,
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::StorageError(format!("Storage task failed: {e}")))?
}

fn distinct(values: Vec<Option<String>>) -> Vec<String> {
    let mut seen = rustc_hash::FxHashSet::default();
    values
        .into_iter()
        .flatten()
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

fn describe(name: &str, table: &SampleTable) -> Result<DatasetInfo> {
    let wells = if table.has_column(columns::WELL_NAME) {
        distinct(table.text(columns::WELL_NAME)?)
    } else {
        Vec::new()
    };
    let markers = if table.has_column(columns::MARKER) {
        distinct(table.text(columns::MARKER)?)
    } else {
        Vec::new()
    };
    let depth_range = if table.has_column(columns::DEPTH) {
        let (lo, hi) = table
            .numeric(columns::DEPTH)?
            .into_iter()
            .filter(|d| !d.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            });
        (lo <= hi).then_some((lo, hi))
    } else {
        None
    };
    Ok(DatasetInfo {
        dataset_name: name.to_string(),
        total_rows: table.num_rows(),
        columns: table.column_names(),
        wells,
        markers,
        depth_range,
    })
}

impl<S: DatasetStore + 'static> AnalysisSession<S> {
    /// Session over `store` with a default analyzer
    pub fn new(store: S) -> Self {
        Self::with_analyzer(Arc::new(store), Analyzer::default())
    }

    /// Session sharing `store` with other sessions
    pub fn with_analyzer(store: Arc<S>, analyzer: Analyzer) -> Self {
        Self {
            store,
            analyzer,
            state: RwLock::new(SessionState::default()),
            run_lock: Mutex::new(()),
        }
    }

    /// Underlying store
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Names of datasets in the store
    ///
    /// # Errors
    ///
    /// Store failure
    pub async fn available_datasets(&self) -> Result<Vec<String>> {
        let store = Arc::clone(&self.store);
        blocking(move || store.list()).await
    }

    /// Load `name` and make it the current table
    ///
    /// # Errors
    ///
    /// [`Error::DatasetNotFound`] or a store failure; the previous selection
    /// is kept on error
    pub async fn select_dataset(&self, name: &str) -> Result<DatasetInfo> {
        let _run = self.run_lock.lock().await;
        let store = Arc::clone(&self.store);
        let owned = name.to_string();
        let table = blocking(move || store.load(&owned)).await?;
        let info = describe(name, &table)?;

        let mut state = self.state.write().await;
        state.dataset = Some(name.to_string());
        state.table = Some(table);
        tracing::info!(
            dataset = name,
            rows = info.total_rows,
            wells = info.wells.len(),
            "Dataset selected"
        );
        Ok(info)
    }

    /// Name of the selected dataset
    pub async fn current_dataset(&self) -> Option<String> {
        self.state.read().await.dataset.clone()
    }

    /// Snapshot of the current table
    ///
    /// # Errors
    ///
    /// [`Error::NoDatasetSelected`]
    pub async fn current_table(&self) -> Result<SampleTable> {
        let state = self.state.read().await;
        Ok(state.selected()?.1.clone())
    }

    /// Summary of the selected dataset
    ///
    /// # Errors
    ///
    /// [`Error::NoDatasetSelected`]
    pub async fn dataset_info(&self) -> Result<DatasetInfo> {
        let state = self.state.read().await;
        let (name, table) = state.selected()?;
        describe(name, table)
    }

    /// Distinct wells in the selected dataset
    ///
    /// # Errors
    ///
    /// [`Error::NoDatasetSelected`]
    pub async fn well_names(&self) -> Result<Vec<String>> {
        Ok(self.dataset_info().await?.wells)
    }

    /// Columns of the selected dataset
    ///
    /// # Errors
    ///
    /// [`Error::NoDatasetSelected`]
    pub async fn available_columns(&self) -> Result<Vec<String>> {
        let state = self.state.read().await;
        Ok(state.selected()?.1.column_names())
    }

    /// Check the selected dataset against a calculation's inputs
    ///
    /// # Errors
    ///
    /// [`Error::NoDatasetSelected`], [`Error::MissingColumns`] or
    /// [`Error::InvalidParameter`]
    pub async fn validate_calculation(
        &self,
        calculation: Calculation,
        params: &ParamSet,
    ) -> Result<()> {
        let state = self.state.read().await;
        let (_, table) = state.selected()?;
        self.analyzer.validate(calculation, table, params)
    }

    /// Run a calculation on the selected dataset and keep the result as the
    /// new current table.
    ///
    /// # Errors
    ///
    /// Whatever [`Analyzer::run`] returns; a panicked worker becomes
    /// [`Error::CalculationFailed`]
    pub async fn run_calculation(
        &self,
        calculation: Calculation,
        params: ParamSet,
    ) -> Result<CalculationReport> {
        let _run = self.run_lock.lock().await;
        let (dataset, input) = {
            let state = self.state.read().await;
            let (name, table) = state.selected()?;
            (name.to_string(), table.clone())
        };

        let started_at = Utc::now();
        let analyzer = self.analyzer.clone();
        let before = input.clone();
        let output = tokio::task::spawn_blocking(move || analyzer.run(calculation, &input, &params))
            .await
            .map_err(|e| Error::CalculationFailed {
                calculation: calculation.name().to_string(),
                message: e.to_string(),
            })??;
        let finished_at = Utc::now();

        let columns_added: Vec<String> = output
            .column_names()
            .into_iter()
            .filter(|c| !before.has_column(c))
            .collect();
        let rows_dropped = before.num_rows().saturating_sub(output.num_rows());
        let message = format!(
            "{} completed on {} rows, {} new columns",
            calculation.title(),
            output.num_rows(),
            columns_added.len()
        );
        let report = CalculationReport {
            calculation,
            dataset,
            rows_processed: output.num_rows(),
            rows_dropped,
            columns_added,
            started_at,
            finished_at,
            message,
        };

        self.state.write().await.table = Some(output);
        Ok(report)
    }

    /// Rows of the current table belonging to `well`
    ///
    /// # Errors
    ///
    /// [`Error::NoDatasetSelected`], no `WELL_NAME` column, or unknown well
    pub async fn well_table(&self, well: &str) -> Result<SampleTable> {
        let table = self.current_table().await?;
        table.require("well_table", &[columns::WELL_NAME])?;
        let names = table.text(columns::WELL_NAME)?;
        let mask: Vec<bool> = names.iter().map(|n| n.as_deref() == Some(well)).collect();
        if !mask.iter().any(|&m| m) {
            return Err(Error::InvalidInput(format!("Unknown well '{well}'")));
        }
        table.filter_rows(&mask)
    }

    /// Table ready for plotting: one well (or all) with crossplot norms added
    ///
    /// # Errors
    ///
    /// See [`Self::well_table`]
    pub async fn plot_table(&self, well: Option<&str>) -> Result<SampleTable> {
        let table = match well {
            Some(well) => self.well_table(well).await?,
            None => self.current_table().await?,
        };
        ensure_crossplot_norms(&table)
    }

    /// Marker intervals of one well (or the whole table); empty without a
    /// `MARKER` column
    ///
    /// # Errors
    ///
    /// See [`Self::well_table`]
    pub async fn markers(&self, well: Option<&str>) -> Result<Vec<MarkerInterval>> {
        let table = match well {
            Some(well) => self.well_table(well).await?,
            None => self.current_table().await?,
        };
        if !table.has_column(columns::MARKER) {
            return Ok(Vec::new());
        }
        extract_markers(&table, columns::MARKER)
    }

    /// Write the current table back to the store, under `name` or the
    /// selected dataset's own name
    ///
    /// # Errors
    ///
    /// [`Error::NoDatasetSelected`] or a store failure
    pub async fn save_current(&self, name: Option<&str>) -> Result<String> {
        let (target, table) = {
            let state = self.state.read().await;
            let (dataset, table) = state.selected()?;
            (name.unwrap_or(dataset).to_string(), table.clone())
        };
        let store = Arc::clone(&self.store);
        let key = target.clone();
        blocking(move || store.save(&key, &table)).await?;
        tracing::info!(dataset = target.as_str(), "Dataset saved");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDatasetStore;

    fn seeded() -> AnalysisSession<MemoryDatasetStore> {
        let store = MemoryDatasetStore::new();
        let table = SampleTable::builder()
            .f64("DEPTH", vec![1000.0, 1000.5, 1001.0, 2000.0])
            .f64("GR", vec![30.0, 75.0, 120.0, 60.0])
            .text("WELL_NAME", vec!["A", "A", "A", "B"])
            .text("MARKER", vec!["TOP_1", "TOP_1", "TOP_2", ""])
            .build()
            .unwrap();
        store.save("field", &table).unwrap();
        AnalysisSession::new(store)
    }

    #[tokio::test]
    async fn test_nothing_selected() {
        let session = seeded();
        assert!(matches!(
            session.dataset_info().await,
            Err(Error::NoDatasetSelected)
        ));
        assert!(session.current_dataset().await.is_none());
    }

    #[tokio::test]
    async fn test_select_describes_dataset() {
        let session = seeded();
        let info = session.select_dataset("field").await.unwrap();
        assert_eq!(info.total_rows, 4);
        assert_eq!(info.wells, vec!["A", "B"]);
        assert_eq!(info.markers, vec!["TOP_1", "TOP_2"]);
        assert_eq!(info.depth_range, Some((1000.0, 2000.0)));
        assert_eq!(session.well_names().await.unwrap(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_run_replaces_table_on_success_only() {
        let session = seeded();
        session.select_dataset("field").await.unwrap();

        let report = session
            .run_calculation(Calculation::Vsh, ParamSet::new())
            .await
            .unwrap();
        assert_eq!(report.columns_added, vec!["VSH_GR"]);
        assert_eq!(report.rows_processed, 4);
        assert!(report.finished_at >= report.started_at);
        assert!(session.available_columns().await.unwrap().contains(&"VSH_GR".to_string()));

        let before = session.available_columns().await.unwrap();
        let err = session
            .run_calculation(Calculation::Porosity, ParamSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumns { .. }));
        assert_eq!(session.available_columns().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_well_table_and_markers() {
        let session = seeded();
        session.select_dataset("field").await.unwrap();
        assert_eq!(session.well_table("B").await.unwrap().num_rows(), 1);
        assert!(session.well_table("Z").await.is_err());

        let markers = session.markers(Some("A")).await.unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].name, "TOP_2");
    }

    #[tokio::test]
    async fn test_save_current_under_new_name() {
        let session = seeded();
        session.select_dataset("field").await.unwrap();
        session
            .run_calculation(Calculation::Vsh, ParamSet::new())
            .await
            .unwrap();
        let saved = session.save_current(Some("field_vsh")).await.unwrap();
        assert_eq!(saved, "field_vsh");
        assert_eq!(
            session.available_datasets().await.unwrap(),
            vec!["field", "field_vsh"]
        );
        assert!(session.store().load("field_vsh").unwrap().has_column("VSH_GR"));
        assert!(!session.store().load("field").unwrap().has_column("VSH_GR"));
    }
}
