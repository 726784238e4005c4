//! RT-R0 fluid typing
//!
//! Wet resistivity R0 is computed per sample, samples are zoned by
//! reservoir quality, and each zone gets two fits: R0 on RT and `RT - R0` on
//! PHIE. A positive PHIE-RTR0 slope labels the zone gas (`G`), otherwise
//! water (`W`).
//!
//! The Archie constants may be overridden per sample by `A`, `M`, `RTSH` and
//! `RW` columns already in the table; those columns are read, never written.

use super::{report_nan_heavy, reservoir_quality, Calculation};
use crate::equations::resistivity::{r0, rwa_archie};
use crate::params::lenient;
use crate::regression::{broadcast, FluidLabel, GroupRegression};
use crate::segment::Zones;
use crate::table::{columns, ColumnData, SampleTable};
use crate::{Backend, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtR0Params {
    /// Tortuosity factor
    #[serde(rename = "A", alias = "A_PARAM", deserialize_with = "lenient::f64")]
    pub a: f64,
    /// Cementation exponent
    #[serde(rename = "M", alias = "M_PARAM", deserialize_with = "lenient::f64")]
    pub m: f64,
    /// Shale resistivity
    #[serde(rename = "RTSH", alias = "RT_SH", deserialize_with = "lenient::f64")]
    pub rt_sh: f64,
    /// Water resistivity
    #[serde(rename = "RW", deserialize_with = "lenient::f64")]
    pub rw: f64,
    /// IQUAL requires `PHIE` above this
    #[serde(rename = "PHIE_CUTOFF", deserialize_with = "lenient::f64")]
    pub phie_cutoff: f64,
    /// IQUAL requires `VSH` below this
    #[serde(rename = "VSH_CUTOFF", deserialize_with = "lenient::f64")]
    pub vsh_cutoff: f64,
}

impl Default for RtR0Params {
    fn default() -> Self {
        Self {
            a: 1.0,
            m: 1.8,
            rt_sh: 1.0,
            rw: 1.0,
            phie_cutoff: 0.1,
            vsh_cutoff: 0.5,
        }
    }
}

const INPUTS: [&str; 3] = [columns::RT, columns::PHIE, columns::VSH];

/// Columns read (override columns are optional)
#[must_use]
pub fn required_columns() -> Vec<String> {
    INPUTS.iter().map(ToString::to_string).collect()
}

/// Per-sample constant: the table column when present, else the parameter
fn per_sample(table: &SampleTable, name: &str, default: f64) -> Result<Vec<f64>> {
    if table.has_column(name) {
        tracing::debug!(column = name, "Using per-sample override");
        table.numeric(name)
    } else {
        Ok(vec![default; table.num_rows()])
    }
}

/// `IQUAL`, `RWA`, `R0`, `RTR0`, `GROUP_ID`, `RT_R0_GRAD`, `PHIE_RTR0_GRAD`,
/// `FLUID_RTROPHIE`
///
/// # Errors
///
/// Missing or uncoercible RT/PHIE/VSH or override columns
pub fn run(table: &SampleTable, params: &RtR0Params, backend: Backend) -> Result<SampleTable> {
    table.require(Calculation::RtR0.name(), &INPUTS)?;
    let rt = table.numeric(columns::RT)?;
    let phie = table.numeric(columns::PHIE)?;
    let vsh = table.numeric(columns::VSH)?;
    let a = per_sample(table, "A", params.a)?;
    let m = per_sample(table, "M", params.m)?;
    let rt_sh = per_sample(table, "RTSH", params.rt_sh)?;
    let rw = per_sample(table, "RW", params.rw)?;
    let rows = table.num_rows();

    tracing::info!(rows, "Calculating RT-R0");
    let iqual = reservoir_quality(&phie, &vsh, params.phie_cutoff, params.vsh_cutoff);
    let rwa: Vec<f64> = (0..rows).map(|i| rwa_archie(rt[i], phie[i], m[i])).collect();
    let wet: Vec<f64> = (0..rows)
        .map(|i| r0(phie[i], vsh[i], a[i], m[i], rw[i], rt_sh[i]))
        .collect();
    let rtr0: Vec<f64> = rt.iter().zip(&wet).map(|(t, w)| t - w).collect();

    let zones = Zones::from_flags(&iqual);
    let fits = GroupRegression::new(&zones)
        .screen(&phie)
        .screen(&rt)
        .pair(&rt, &wet)
        .pair(&phie, &rtr0)
        .require_finite(1)
        .run(backend);
    if fits.len() < zones.len() {
        tracing::warn!(
            zones = zones.len(),
            fitted = fits.len(),
            "Some RT-R0 zones could not be fitted"
        );
    }

    let rt_r0_grad = broadcast(rows, &fits, |f| f.slope(0));
    let phie_rtr0_grad = broadcast(rows, &fits, |f| f.slope(1));
    let mut fluid: Vec<Option<String>> = vec![None; rows];
    for fit in &fits {
        let label = FluidLabel::from_slope(fit.slope(1)).code();
        for slot in &mut fluid[fit.rows.clone()] {
            *slot = Some(label.to_string());
        }
    }
    report_nan_heavy(Calculation::RtR0, columns::R0, &wet);

    table.with_columns([
        (columns::IQUAL, ColumnData::Int(iqual)),
        (columns::RWA, ColumnData::Float(rwa)),
        (columns::R0, ColumnData::Float(wet)),
        (columns::RTR0, ColumnData::Float(rtr0)),
        (columns::GROUP_ID, ColumnData::Int(zones.ids_i64())),
        (columns::RT_R0_GRAD, ColumnData::Float(rt_r0_grad)),
        (columns::PHIE_RTR0_GRAD, ColumnData::Float(phie_rtr0_grad)),
        (columns::FLUID_RTROPHIE, ColumnData::Text(fluid)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SampleTable {
        SampleTable::builder()
            .f64("DEPTH", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .f64("RT", vec![20.0, 30.0, 45.0, 2.0, 3.0, 4.0])
            .f64("PHIE", vec![0.15, 0.2, 0.25, 0.05, 0.04, 0.03])
            .f64("VSH", vec![0.1, 0.1, 0.1, 0.7, 0.8, 0.9])
            .build()
            .unwrap()
    }

    #[test]
    fn test_outputs_and_labels() {
        let out = run(&table(), &RtR0Params::default(), Backend::Scalar).unwrap();
        assert_eq!(out.num_rows(), 6);
        assert_eq!(
            out.numeric("GROUP_ID").unwrap(),
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]
        );
        let fluid = out.text("FLUID_RTROPHIE").unwrap();
        // RT rises with PHIE far faster than R0 falls: positive slope
        assert_eq!(fluid[0].as_deref(), Some("G"));
        assert_eq!(fluid[2].as_deref(), Some("G"));

        let rwa = out.numeric("RWA").unwrap();
        assert!((rwa[0] - 20.0 * 0.15f64.powf(1.8)).abs() < 1e-12);
        let rtr0 = out.numeric("RTR0").unwrap();
        let r0 = out.numeric("R0").unwrap();
        assert!((rtr0[1] - (30.0 - r0[1])).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_zone_is_skipped() {
        let table = SampleTable::builder()
            .f64("RT", vec![20.0, 2.0, 3.0])
            .f64("PHIE", vec![0.2, 0.05, 0.06])
            .f64("VSH", vec![0.1, 0.7, 0.7])
            .build()
            .unwrap();
        let out = run(&table, &RtR0Params::default(), Backend::Scalar).unwrap();
        let grad = out.numeric("PHIE_RTR0_GRAD").unwrap();
        assert!(grad[0].is_nan());
        assert!(grad[1].is_finite());
        assert_eq!(out.text("FLUID_RTROPHIE").unwrap()[0], None);
    }

    #[test]
    fn test_override_columns_are_read_not_written() {
        let base = table();
        let with_rw = base.with_f64("RW", vec![0.5; 6]).unwrap();
        let out = run(&with_rw, &RtR0Params::default(), Backend::Scalar).unwrap();
        assert_eq!(out.numeric("RW").unwrap(), vec![0.5; 6]);
        assert!(!out.has_column("A"));

        let default_rw = run(&base, &RtR0Params::default(), Backend::Scalar).unwrap();
        let r0_half = out.numeric("R0").unwrap();
        let r0_one = default_rw.numeric("R0").unwrap();
        assert!(r0_half[0] < r0_one[0]);
    }

    #[test]
    fn test_param_aliases() {
        let params: RtR0Params = crate::params::ParamSet::new()
            .with("A_PARAM", 0.8)
            .with("M_PARAM", "2.1")
            .parse()
            .unwrap();
        assert!((params.a - 0.8).abs() < f64::EPSILON);
        assert!((params.m - 2.1).abs() < f64::EPSILON);
    }
}
