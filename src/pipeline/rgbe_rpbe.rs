//! RGBE / RPBE fluid indicators
//!
//! Samples with every input present are split into zones of constant
//! reservoir quality (`IQUAL`). Within each zone RT is regressed on GR and on
//! PHIE; the slopes and correlations, rounded to one decimal, are spread over
//! the zone's reservoir-quality samples. Non-reservoir samples and samples
//! with a missing input keep NaN.

use super::{report_nan_heavy, reservoir_quality, Calculation};
use crate::params::lenient;
use crate::regression::{broadcast, round1, GroupRegression};
use crate::segment::Zones;
use crate::table::{columns, ColumnData, SampleTable};
use crate::{Backend, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RgbeRpbeParams {
    /// IQUAL requires `PHIE` above this
    #[serde(rename = "PHIE_CUTOFF", deserialize_with = "lenient::f64")]
    pub phie_cutoff: f64,
    /// IQUAL requires `VSH` below this
    #[serde(rename = "VSH_CUTOFF", deserialize_with = "lenient::f64")]
    pub vsh_cutoff: f64,
}

impl Default for RgbeRpbeParams {
    fn default() -> Self {
        Self {
            phie_cutoff: 0.1,
            vsh_cutoff: 0.5,
        }
    }
}

const INPUTS: [&str; 4] = [columns::GR, columns::RT, columns::PHIE, columns::VSH];

/// Columns read
#[must_use]
pub fn required_columns() -> Vec<String> {
    INPUTS.iter().map(ToString::to_string).collect()
}

/// `IQUAL`, `RGBE`, `R_RGBE`, `RPBE`, `R_RPBE`
///
/// # Errors
///
/// Missing or uncoercible GR/RT/PHIE/VSH
pub fn run(table: &SampleTable, params: &RgbeRpbeParams, backend: Backend) -> Result<SampleTable> {
    table.require(Calculation::RgbeRpbe.name(), &INPUTS)?;
    let gr = table.numeric(columns::GR)?;
    let rt = table.numeric(columns::RT)?;
    let phie = table.numeric(columns::PHIE)?;
    let vsh = table.numeric(columns::VSH)?;
    let rows = table.num_rows();

    let iqual = reservoir_quality(&phie, &vsh, params.phie_cutoff, params.vsh_cutoff);

    // Regression runs on complete rows only, zoned in their own order
    let complete: Vec<usize> = (0..rows)
        .filter(|&i| !(gr[i].is_nan() || rt[i].is_nan() || phie[i].is_nan() || vsh[i].is_nan()))
        .collect();
    let pick = |values: &[f64]| -> Vec<f64> { complete.iter().map(|&i| values[i]).collect() };
    let (gr_c, rt_c, phie_c) = (pick(&gr), pick(&rt), pick(&phie));
    let iqual_c: Vec<i64> = complete.iter().map(|&i| iqual[i]).collect();

    tracing::info!(rows, complete = complete.len(), "Calculating RGBE-RPBE");
    let zones = Zones::from_flags(&iqual_c);
    let fits = GroupRegression::new(&zones)
        .screen(&gr_c)
        .screen(&phie_c)
        .screen(&rt_c)
        .pair(&gr_c, &rt_c)
        .pair(&phie_c, &rt_c)
        .run(backend);
    if fits.len() < zones.len() {
        tracing::warn!(
            zones = zones.len(),
            fitted = fits.len(),
            "Some RGBE-RPBE zones were too small or too uniform to fit"
        );
    }

    let n = complete.len();
    let per_zone = [
        broadcast(n, &fits, |f| round1(100.0 * f.slope(0))),
        broadcast(n, &fits, |f| round1(f.r(0))),
        broadcast(n, &fits, |f| round1(f.slope(1))),
        broadcast(n, &fits, |f| round1(f.r(1))),
    ];

    let mut outputs = [
        vec![f64::NAN; rows],
        vec![f64::NAN; rows],
        vec![f64::NAN; rows],
        vec![f64::NAN; rows],
    ];
    for (k, &row) in complete.iter().enumerate() {
        if iqual[row] > 0 {
            for (out, zone_values) in outputs.iter_mut().zip(&per_zone) {
                out[row] = zone_values[k];
            }
        }
    }
    let [rgbe, r_rgbe, rpbe, r_rpbe] = outputs;
    report_nan_heavy(Calculation::RgbeRpbe, columns::RGBE, &rgbe);

    table.with_columns([
        (columns::IQUAL, ColumnData::Int(iqual)),
        (columns::RGBE, ColumnData::Float(rgbe)),
        (columns::R_RGBE, ColumnData::Float(r_rgbe)),
        (columns::RPBE, ColumnData::Float(rpbe)),
        (columns::R_RPBE, ColumnData::Float(r_rpbe)),
    ])
}
