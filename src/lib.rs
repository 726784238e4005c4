//! # petrolog: Petrophysical Well-Log Calculation Pipeline
//!
//! **Version**: 0.1.0
//!
//! petrolog turns depth-indexed well-log tables (gamma ray, resistivity,
//! neutron porosity, bulk density) into derived petrophysical properties:
//! shale volume, porosity, water saturation, apparent water resistivity and
//! zone-based fluid indicators.
//!
//! ## Design Principles
//!
//! - **Pure transforms**: every calculation is `(SampleTable, Params) -> SampleTable`;
//!   the input table is never mutated
//! - **No partial writes**: a failed calculation returns one error and no table
//! - **Local degeneracy**: division by zero or a degenerate zone fit becomes
//!   NaN for that sample or zone, never an error
//! - **Data parallel**: the salinity sweep, zone regressions and per-well runs
//!   fan out on rayon (Scalar == Parallel, tested)
//!
//! ## Example Usage
//!
//! ```rust
//! use petrolog::{Analyzer, Backend, Calculation, ParamSet, SampleTable};
//!
//! let table = SampleTable::builder()
//!     .f64("DEPTH", vec![1000.0, 1000.5, 1001.0])
//!     .f64("GR", vec![25.0, 75.0, 140.0])
//!     .build()?;
//!
//! let analyzer = Analyzer::builder().backend(Backend::Scalar).build()?;
//! let params = ParamSet::new().with("GR_MA", 30.0).with("GR_SH", 120.0);
//! let out = analyzer.run(Calculation::Vsh, &table, &params)?;
//!
//! assert_eq!(out.num_rows(), 3);
//! assert_eq!(out.numeric("VSH_GR")?, vec![0.0, 0.5, 1.0]);
//! # Ok::<(), petrolog::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod backend;
pub mod catalog;
pub mod equations;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod plotting;
pub mod regression;
pub mod segment;
#[cfg(feature = "tokio")]
pub mod session;
pub mod storage;
pub mod sweep;
pub mod table;
pub mod telemetry;

pub use error::{Error, Result};
pub use params::ParamSet;
pub use pipeline::Calculation;
pub use table::{ColumnData, SampleTable};

use backend::BackendDispatcher;
use std::time::Instant;
use table::columns;

/// Hidden column carrying original row positions through a per-well split
const ROW_ID: &str = "__PETROLOG_ROW_ID";

/// Backend selection strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Parallel only when the job is large enough to pay for it
    #[default]
    CostBased,
    /// Force rayon execution
    Parallel,
    /// Force single-threaded execution
    Scalar,
}

/// Calculation runner
#[derive(Debug, Clone)]
pub struct Analyzer {
    backend: Backend,
    per_well: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            backend: Backend::CostBased,
            per_well: true,
        }
    }
}

impl Analyzer {
    /// Create a new analyzer builder
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }

    /// Configured backend
    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Whether multi-well tables are processed well by well
    #[must_use]
    pub const fn per_well(&self) -> bool {
        self.per_well
    }

    /// Check that `table` has what `calculation` needs
    ///
    /// # Errors
    ///
    /// [`Error::MissingColumns`] or [`Error::InvalidParameter`]
    pub fn validate(
        &self,
        calculation: Calculation,
        table: &SampleTable,
        params: &ParamSet,
    ) -> Result<()> {
        calculation.validate_requirements(table, params)
    }

    /// Run one calculation and return the augmented table.
    ///
    /// With per-well mode on and a `WELL_NAME` column present, each well is
    /// computed on its own and the results are put back in the input row
    /// order.
    ///
    /// # Errors
    ///
    /// Structural errors ([`Error::MissingColumns`], [`Error::TypeCoercion`],
    /// [`Error::InvalidParameter`]) are returned as-is; anything else becomes
    /// a single [`Error::CalculationFailed`].
    pub fn run(
        &self,
        calculation: Calculation,
        table: &SampleTable,
        params: &ParamSet,
    ) -> Result<SampleTable> {
        let span = tracing::info_span!("calculation", kind = calculation.name());
        let _enter = span.enter();
        let started = Instant::now();
        tracing::info!(
            rows = table.num_rows(),
            backend = ?self.backend,
            "Starting {} calculation",
            calculation.name()
        );

        let result = if self.per_well && table.has_column(columns::WELL_NAME) {
            self.run_per_well(calculation, table, params)
        } else {
            calculation.execute(table, params, self.backend)
        };

        match result {
            Ok(out) => {
                tracing::info!(
                    rows = out.num_rows(),
                    columns = out.num_columns(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "Calculation complete"
                );
                Ok(out)
            }
            Err(e) if e.is_structural() => {
                tracing::warn!(error = %e, "Calculation rejected");
                Err(e)
            }
            Err(e) => {
                tracing::error!(error = %e, "Calculation failed");
                Err(Error::CalculationFailed {
                    calculation: calculation.name().to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    fn run_per_well(
        &self,
        calculation: Calculation,
        table: &SampleTable,
        params: &ParamSet,
    ) -> Result<SampleTable> {
        let row_ids = (0..table.num_rows())
            .map(|i| i64::try_from(i).map_err(|_| Error::InvalidInput("Too many rows".into())))
            .collect::<Result<Vec<i64>>>()?;
        let indexed = table.with_columns([(ROW_ID, ColumnData::Int(row_ids))])?;
        let wells = indexed.partition_by(columns::WELL_NAME)?;
        if wells.len() <= 1 {
            return calculation.execute(table, params, self.backend);
        }

        tracing::debug!(wells = wells.len(), "Splitting by well");
        let backend = self.backend;
        let results = BackendDispatcher::map(backend, table.num_rows(), &wells, |(well, part)| {
            tracing::debug!(well = well.as_str(), rows = part.num_rows(), "Processing well");
            calculation.execute(part, params, backend)
        });
        let parts = results.into_iter().collect::<Result<Vec<_>>>()?;
        let merged = SampleTable::concat(&parts)?;

        let ids = merged.numeric(ROW_ID)?;
        let mut order: Vec<usize> = (0..merged.num_rows()).collect();
        order.sort_by(|&a, &b| ids[a].total_cmp(&ids[b]));
        merged.take_rows(&order)?.without_column(ROW_ID)
    }
}

/// Analyzer builder
#[derive(Debug, Clone)]
pub struct AnalyzerBuilder {
    backend: Backend,
    per_well: bool,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        let defaults = Analyzer::default();
        Self {
            backend: defaults.backend,
            per_well: defaults.per_well,
        }
    }
}

impl AnalyzerBuilder {
    /// Set backend selection strategy
    #[must_use]
    pub const fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Process multi-well tables well by well (default on)
    #[must_use]
    pub const fn per_well(mut self, per_well: bool) -> Self {
        self.per_well = per_well;
        self
    }

    /// Build the analyzer
    ///
    /// Without the `rayon` feature a forced parallel backend runs scalar.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for backends that need setup
    pub fn build(self) -> Result<Analyzer> {
        if self.backend == Backend::Parallel && !cfg!(feature = "rayon") {
            tracing::warn!("Parallel backend requested without the `rayon` feature; running scalar");
        }
        Ok(Analyzer {
            backend: self.backend,
            per_well: self.per_well,
        })
    }
}
