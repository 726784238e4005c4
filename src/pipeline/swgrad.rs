//! Saturation sensitivity to formation-water salinity

use super::{report_nan_heavy, Calculation};
use crate::equations::resistivity::formation_temperature;
use crate::equations::safe_div;
use crate::equations::saturation::ArchieExponents;
use crate::params::lenient;
use crate::sweep::{SalinitySweep, SweepConstants, SweepInputs, SALINITY_STEPS};
use crate::table::{columns, ColumnData, SampleTable};
use crate::{Backend, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwgradParams {
    /// Tortuosity factor
    #[serde(rename = "A", alias = "A_PARAM", deserialize_with = "lenient::f64")]
    pub a: f64,
    /// Cementation exponent
    #[serde(rename = "M", alias = "M_PARAM", deserialize_with = "lenient::f64")]
    pub m: f64,
    /// Saturation exponent
    #[serde(rename = "N", alias = "N_PARAM", deserialize_with = "lenient::f64")]
    pub n: f64,
    /// Shale resistivity
    #[serde(rename = "RTSH", alias = "RT_SH", deserialize_with = "lenient::f64")]
    pub rt_sh: f64,
    /// Surface temperature (deg F)
    #[serde(rename = "SURFACE_TEMP", deserialize_with = "lenient::f64")]
    pub surface_temp: f64,
    /// Geothermal gradient (deg F per depth unit)
    #[serde(rename = "GEOTHERMAL_GRADIENT", deserialize_with = "lenient::f64")]
    pub gradient: f64,
    /// Constant formation temperature; replaces the depth relation
    #[serde(rename = "FTEMP", deserialize_with = "lenient::opt_f64")]
    pub ftemp: Option<f64>,
}

impl Default for SwgradParams {
    fn default() -> Self {
        Self {
            a: 1.0,
            m: 1.8,
            n: 1.8,
            rt_sh: 1.0,
            surface_temp: 75.0,
            gradient: 0.05,
            ftemp: None,
        }
    }
}

/// Columns read (`DEPTH` only when temperature comes from depth)
#[must_use]
pub fn required_columns(params: &SwgradParams) -> Vec<String> {
    let mut names = vec![columns::RT, columns::VSH, columns::PHIE];
    if params.ftemp.is_none() {
        names.push(columns::DEPTH);
    }
    names.into_iter().map(ToString::to_string).collect()
}

/// `SWARRAY_1` ..= `SWARRAY_25`, `SWGRAD`, `CT`, `FTEMP`
///
/// # Errors
///
/// Missing or uncoercible RT/VSH/PHIE/DEPTH
pub fn run(table: &SampleTable, params: &SwgradParams, backend: Backend) -> Result<SampleTable> {
    let required = required_columns(params);
    let names: Vec<&str> = required.iter().map(String::as_str).collect();
    table.require(Calculation::Swgrad.name(), &names)?;

    let rt = table.numeric(columns::RT)?;
    let vsh = table.numeric(columns::VSH)?;
    let phie = table.numeric(columns::PHIE)?;
    let ftemp = match params.ftemp {
        Some(t) => vec![t; table.num_rows()],
        None => table
            .numeric(columns::DEPTH)?
            .into_iter()
            .map(|d| formation_temperature(d, params.surface_temp, params.gradient))
            .collect(),
    };
    let ct: Vec<f64> = rt.iter().map(|&r| safe_div(1.0, r)).collect();

    tracing::info!(rows = rt.len(), steps = SALINITY_STEPS, "Calculating SWGRAD");
    let constants = SweepConstants {
        archie: ArchieExponents {
            a: params.a,
            m: params.m,
            n: params.n,
        },
        rt_sh: params.rt_sh,
    };
    let inputs = SweepInputs {
        ct: &ct,
        vsh: &vsh,
        phie: &phie,
        ftemp: &ftemp,
    };
    let sweep = SalinitySweep::compute(inputs, &constants, backend);
    let gradient = sweep.gradient().to_vec();
    report_nan_heavy(Calculation::Swgrad, columns::SWGRAD, &gradient);

    let mut updates: Vec<(String, ColumnData)> = (1..=SALINITY_STEPS)
        .map(|j| (columns::swarray(j), ColumnData::Float(sweep.column(j))))
        .collect();
    updates.push((columns::SWGRAD.to_string(), ColumnData::Float(gradient)));
    updates.push((columns::CT.to_string(), ColumnData::Float(ct)));
    updates.push((columns::FTEMP.to_string(), ColumnData::Float(ftemp)));
    table.with_columns(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSet;

    #[test]
    fn test_writes_full_sweep() {
        let table = SampleTable::builder()
            .f64("DEPTH", vec![1000.0, 1500.0])
            .f64("RT", vec![10.0, 0.0])
            .f64("VSH", vec![0.3, 0.3])
            .f64("PHIE", vec![0.2, 0.2])
            .build()
            .unwrap();
        let out = run(&table, &SwgradParams::default(), Backend::Scalar).unwrap();
        for j in 1..=SALINITY_STEPS {
            assert!(out.has_column(&format!("SWARRAY_{j}")));
        }
        let ftemp = out.numeric("FTEMP").unwrap();
        assert!((ftemp[0] - 125.0).abs() < 1e-12);
        assert!((ftemp[1] - 150.0).abs() < 1e-12);

        let ct = out.numeric("CT").unwrap();
        assert!((ct[0] - 0.1).abs() < 1e-12);
        // Zero RT has no conductivity reading
        assert!(ct[1].is_nan());
        let grad = out.numeric("SWGRAD").unwrap();
        assert!(grad[0].is_finite());
        assert!(grad[1].is_nan());
    }

    #[test]
    fn test_constant_temperature_needs_no_depth() {
        let params: SwgradParams = ParamSet::new().with("FTEMP", "180").parse().unwrap();
        let table = SampleTable::builder()
            .f64("RT", vec![10.0])
            .f64("VSH", vec![0.3])
            .f64("PHIE", vec![0.2])
            .build()
            .unwrap();
        let out = run(&table, &params, Backend::Scalar).unwrap();
        assert!((out.numeric("FTEMP").unwrap()[0] - 180.0).abs() < f64::EPSILON);

        let err = run(&table, &SwgradParams::default(), Backend::Scalar).unwrap_err();
        assert_eq!(err.to_string(), "Missing required columns for swgrad: DEPTH");
    }
}
