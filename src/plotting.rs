//! Plot-data preparation
//!
//! The plotting layer draws from fixed column names. This module derives the
//! normalised crossplot twins it expects and the markers side table; it does
//! no drawing itself.

use crate::segment::Zones;
use crate::table::{columns, ColumnData, SampleTable};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Min-max scale to `[0, 1]` ignoring NaN; all zeros when the series is
/// empty, all-NaN or constant.
#[must_use]
pub fn normalize_series(values: &[f64]) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if max <= min || !min.is_finite() || !max.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / (max - min)).collect()
}

/// Add `<A>_NORM` and `<B>_NORM_<A>` for the crossover pair `(a, b)`
///
/// # Errors
///
/// Missing or uncoercible `a` / `b`
pub fn normalize_xover(table: &SampleTable, a: &str, b: &str) -> Result<SampleTable> {
    table.require("normalize_xover", &[a, b])?;
    let a_norm = normalize_series(&table.numeric(a)?);
    let b_norm = normalize_series(&table.numeric(b)?);
    table.with_columns([
        (format!("{a}_NORM"), ColumnData::Float(a_norm)),
        (format!("{b}_NORM_{a}"), ColumnData::Float(b_norm)),
    ])
}

/// Crossplot pairs and the normalised columns the plots read
const CROSSPLOT_NORMS: [(&str, &str, &str, &str); 3] = [
    (columns::RT, columns::RHOB, "RT_NORM", "RHOB_NORM_RT"),
    (columns::NPHI, columns::RHOB, "NPHI_NORM", "RHOB_NORM_NPHI"),
    (columns::RT, columns::GR, "RT_NORM", "GR_NORM_RT"),
];

/// Add any missing crossplot norm columns whose inputs exist.
///
/// Existing norm columns are kept untouched.
///
/// # Errors
///
/// Uncoercible input columns
pub fn ensure_crossplot_norms(table: &SampleTable) -> Result<SampleTable> {
    let mut out = table.clone();
    for (a, b, a_norm, b_norm) in CROSSPLOT_NORMS {
        if !(out.has_column(a) && out.has_column(b)) {
            continue;
        }
        let mut updates = Vec::with_capacity(2);
        if !out.has_column(a_norm) {
            updates.push((a_norm, ColumnData::Float(normalize_series(&out.numeric(a)?))));
        }
        if !out.has_column(b_norm) {
            updates.push((b_norm, ColumnData::Float(normalize_series(&out.numeric(b)?))));
        }
        if !updates.is_empty() {
            out = out.with_columns(updates)?;
        }
    }
    Ok(out)
}

/// One contiguous marker interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerInterval {
    /// Marker name
    pub name: String,
    /// Shallowest depth
    pub top: f64,
    /// Deepest depth
    pub bottom: f64,
    /// Mean depth (label position)
    pub mean_depth: f64,
}

/// Contiguous runs of a categorical column with their depth extent.
///
/// Null and empty names are not markers.
///
/// # Errors
///
/// Missing `DEPTH` or `column`
#[allow(clippy::cast_precision_loss)]
pub fn extract_markers(table: &SampleTable, column: &str) -> Result<Vec<MarkerInterval>> {
    table.require("extract_markers", &[columns::DEPTH, column])?;
    let depth = table.numeric(columns::DEPTH)?;
    let names = table.text(column)?;

    let zones = Zones::from_flags(&names);
    let mut intervals = Vec::with_capacity(zones.len());
    for (_, rows) in zones.iter() {
        let Some(name) = names[rows.start].as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        let depths: Vec<f64> = depth[rows].iter().copied().filter(|d| !d.is_nan()).collect();
        if depths.is_empty() {
            continue;
        }
        let top = depths.iter().copied().fold(f64::INFINITY, f64::min);
        let bottom = depths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean_depth = depths.iter().sum::<f64>() / depths.len() as f64;
        intervals.push(MarkerInterval {
            name: name.to_string(),
            top,
            bottom,
            mean_depth,
        });
    }
    Ok(intervals)
}
