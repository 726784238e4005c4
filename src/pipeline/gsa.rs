//! GSA smoothing: centred rolling means of RT, NPHI and RHOB

use super::{report_nan_heavy, Calculation};
use crate::params::lenient;
use crate::table::{columns, ColumnData, SampleTable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GsaParams {
    /// Samples per window
    #[serde(rename = "window_size", alias = "WINDOW_SIZE", deserialize_with = "lenient::usize")]
    pub window: usize,
}

impl Default for GsaParams {
    fn default() -> Self {
        Self { window: 50 }
    }
}

const INPUTS: [&str; 4] = [columns::GR, columns::RT, columns::NPHI, columns::RHOB];

/// Columns read
#[must_use]
pub fn required_columns() -> Vec<String> {
    INPUTS.iter().map(ToString::to_string).collect()
}

/// Centred rolling mean.
///
/// Sample `i` averages rows `i + (w-1)/2 + 1 - w ..= i + (w-1)/2`; windows
/// that run off either end, or that contain a NaN, give NaN.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn centered_rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    if window == 0 {
        return vec![f64::NAN; n];
    }
    let mut sum = Vec::with_capacity(n + 1);
    let mut nan = Vec::with_capacity(n + 1);
    sum.push(0.0);
    nan.push(0usize);
    for &v in values {
        let (s, c) = (sum[sum.len() - 1], nan[nan.len() - 1]);
        if v.is_nan() {
            sum.push(s);
            nan.push(c + 1);
        } else {
            sum.push(s + v);
            nan.push(c);
        }
    }

    let offset = (window - 1) / 2;
    (0..n)
        .map(|i| {
            let end = i + offset + 1;
            if end < window || end > n {
                return f64::NAN;
            }
            let start = end - window;
            if nan[end] - nan[start] > 0 {
                f64::NAN
            } else {
                (sum[end] - sum[start]) / window as f64
            }
        })
        .collect()
}

/// `RGSA`, `NGSA`, `DGSA`
///
/// # Errors
///
/// Missing inputs or a zero window
pub fn run(table: &SampleTable, params: &GsaParams) -> Result<SampleTable> {
    if params.window == 0 {
        return Err(Error::InvalidParameter {
            name: "window_size".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    table.require(Calculation::Gsa.name(), &INPUTS)?;
    tracing::info!(rows = table.num_rows(), window = params.window, "Calculating GSA");

    let mut updates = Vec::with_capacity(3);
    for (input, output) in [
        (columns::RT, columns::RGSA),
        (columns::NPHI, columns::NGSA),
        (columns::RHOB, columns::DGSA),
    ] {
        let smoothed = centered_rolling_mean(&table.numeric(input)?, params.window);
        report_nan_heavy(Calculation::Gsa, output, &smoothed);
        updates.push((output, ColumnData::Float(smoothed)));
    }
    table.with_columns(updates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_window() {
        let out = centered_rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(out[0].is_nan());
        assert_eq!(&out[1..4], &[2.0, 3.0, 4.0]);
        assert!(out[4].is_nan());
    }

    #[test]
    fn test_even_window_leans_forward() {
        // w = 4: sample i averages i-2 ..= i+1
        let out = centered_rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 4);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert!((out[2] - 2.5).abs() < 1e-12);
        assert!((out[4] - 4.5).abs() < 1e-12);
        assert!(out[5].is_nan());
    }

    #[test]
    fn test_nan_poisons_window_and_short_input() {
        let out = centered_rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 3);
        assert!(out[1].is_nan() && out[2].is_nan());
        assert!((out[3] - 4.0).abs() < 1e-12);
        assert!(centered_rolling_mean(&[1.0, 2.0], 50).iter().all(|v| v.is_nan()));
        assert_eq!(centered_rolling_mean(&[7.0], 1), vec![7.0]);
    }

    #[test]
    fn test_pipeline_writes_three_columns() {
        let table = SampleTable::builder()
            .f64("GR", vec![50.0; 5])
            .f64("RT", vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .f64("NPHI", vec![0.2; 5])
            .f64("RHOB", vec![2.3; 5])
            .build()
            .unwrap();
        let params = GsaParams { window: 3 };
        let out = run(&table, &params).unwrap();
        assert!((out.numeric("RGSA").unwrap()[2] - 3.0).abs() < 1e-12);
        assert!((out.numeric("NGSA").unwrap()[2] - 0.2).abs() < 1e-12);
        assert!((out.numeric("DGSA").unwrap()[2] - 2.3).abs() < 1e-12);

        assert!(run(&table, &GsaParams { window: 0 }).is_err());
    }
}
