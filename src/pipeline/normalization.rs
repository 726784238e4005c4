//! Per-interval min-max normalisation of one log

use super::Calculation;
use crate::table::{columns, ColumnData, SampleTable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationParams {
    /// Log to normalise
    #[serde(rename = "LOG_IN")]
    pub log_in: String,
    /// Column to write
    #[serde(rename = "LOG_OUT")]
    pub log_out: String,
    /// Marker names whose samples are rescaled to `[0, 1]`
    #[serde(alias = "INTERVALS")]
    pub intervals: Vec<String>,
}

impl Default for NormalizationParams {
    fn default() -> Self {
        Self {
            log_in: columns::GR.to_string(),
            log_out: "GR_NORM".to_string(),
            intervals: Vec::new(),
        }
    }
}

/// Columns read
#[must_use]
pub fn required_columns(params: &NormalizationParams) -> Vec<String> {
    vec![params.log_in.clone(), columns::MARKER.to_string()]
}

/// Copy `LOG_IN` to `LOG_OUT`, min-max scaling the samples of each listed
/// marker interval by that interval's own range. Intervals with no samples
/// or no spread are left as copied.
///
/// # Errors
///
/// Missing input log or `MARKER`, or `LOG_OUT == LOG_IN`
pub fn run(table: &SampleTable, params: &NormalizationParams) -> Result<SampleTable> {
    if params.log_out.trim().is_empty() || params.log_out == params.log_in {
        return Err(Error::InvalidParameter {
            name: "LOG_OUT".to_string(),
            reason: format!("must name a new column, got '{}'", params.log_out),
        });
    }
    table.require(
        Calculation::Normalization.name(),
        &[params.log_in.as_str(), columns::MARKER],
    )?;
    let values = table.numeric(&params.log_in)?;
    let markers = table.text(columns::MARKER)?;

    tracing::info!(
        rows = values.len(),
        intervals = params.intervals.len(),
        "Normalising {} into {}",
        params.log_in,
        params.log_out
    );
    let mut out = values.clone();
    for interval in &params.intervals {
        let rows: Vec<usize> = markers
            .iter()
            .enumerate()
            .filter(|(_, m)| m.as_deref() == Some(interval.as_str()))
            .map(|(i, _)| i)
            .collect();
        let (min, max) = rows
            .iter()
            .map(|&i| values[i])
            .filter(|v| !v.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if max > min {
            for &i in &rows {
                out[i] = (values[i] - min) / (max - min);
            }
        } else {
            tracing::debug!(interval = interval.as_str(), "Interval has no spread; left as is");
        }
    }

    table.with_columns([(params.log_out.as_str(), ColumnData::Float(out))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSet;

    fn table() -> SampleTable {
        SampleTable::builder()
            .f64("GR", vec![20.0, 60.0, 100.0, 50.0, 70.0])
            .text("MARKER", vec!["A", "A", "A", "B", "B"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_only_listed_intervals_rescaled() {
        let params: NormalizationParams = ParamSet::new()
            .with("intervals", serde_json::json!(["A"]))
            .parse()
            .unwrap();
        let out = run(&table(), &params).unwrap();
        assert_eq!(
            out.numeric("GR_NORM").unwrap(),
            vec![0.0, 0.5, 1.0, 50.0, 70.0]
        );
    }

    #[test]
    fn test_no_intervals_copies() {
        let out = run(&table(), &NormalizationParams::default()).unwrap();
        assert_eq!(out.numeric("GR_NORM").unwrap(), out.numeric("GR").unwrap());
    }

    #[test]
    fn test_requires_marker() {
        let table = SampleTable::builder()
            .f64("GR", vec![1.0])
            .build()
            .unwrap();
        let err = run(&table, &NormalizationParams::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required columns for normalization: MARKER"
        );
    }
}
