//! Shale volume from the density-neutron crossplot

use super::{report_nan_heavy, Calculation};
use crate::equations::{vsh_density_neutron, DensityNeutronEndpoints};
use crate::params::lenient;
use crate::table::{columns, ColumnData, SampleTable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VshDnParams {
    /// Matrix density
    #[serde(rename = "RHO_MA", deserialize_with = "lenient::f64")]
    pub rho_ma: f64,
    /// Shale density
    #[serde(rename = "RHO_SH", deserialize_with = "lenient::f64")]
    pub rho_sh: f64,
    /// Fluid density
    #[serde(rename = "RHO_FL", deserialize_with = "lenient::f64")]
    pub rho_fl: f64,
    /// Matrix neutron porosity
    #[serde(rename = "NPHI_MA", deserialize_with = "lenient::f64")]
    pub nphi_ma: f64,
    /// Shale neutron porosity
    #[serde(rename = "NPHI_SH", deserialize_with = "lenient::f64")]
    pub nphi_sh: f64,
    /// Fluid neutron porosity
    #[serde(rename = "NPHI_FL", deserialize_with = "lenient::f64")]
    pub nphi_fl: f64,
    /// Density log to read
    #[serde(rename = "RHOB")]
    pub rhob_log: String,
    /// Neutron log to read
    #[serde(rename = "NPHI")]
    pub nphi_log: String,
    /// Column to write
    #[serde(rename = "VSH")]
    pub output_log: String,
}

impl Default for VshDnParams {
    fn default() -> Self {
        let endpoints = DensityNeutronEndpoints::default();
        Self {
            rho_ma: endpoints.rho_ma,
            rho_sh: endpoints.rho_sh,
            rho_fl: endpoints.rho_fl,
            nphi_ma: endpoints.nphi_ma,
            nphi_sh: endpoints.nphi_sh,
            nphi_fl: endpoints.nphi_fl,
            rhob_log: columns::RHOB.to_string(),
            nphi_log: columns::NPHI.to_string(),
            output_log: columns::VSH_DN.to_string(),
        }
    }
}

impl VshDnParams {
    /// Crossplot endpoints
    #[must_use]
    pub const fn endpoints(&self) -> DensityNeutronEndpoints {
        DensityNeutronEndpoints {
            rho_ma: self.rho_ma,
            rho_sh: self.rho_sh,
            rho_fl: self.rho_fl,
            nphi_ma: self.nphi_ma,
            nphi_sh: self.nphi_sh,
            nphi_fl: self.nphi_fl,
        }
    }
}

/// Columns read
#[must_use]
pub fn required_columns(params: &VshDnParams) -> Vec<String> {
    vec![params.rhob_log.clone(), params.nphi_log.clone()]
}

/// Crossplot shale volume, plus `VSH_DIFF = VSH_GR - VSH_DN` when a
/// gamma-ray shale volume exists.
///
/// # Errors
///
/// Missing or uncoercible density/neutron logs, or an `output_log` that is
/// empty or names one of the input logs
pub fn run(table: &SampleTable, params: &VshDnParams) -> Result<SampleTable> {
    let output = params.output_log.trim();
    if output.is_empty() || output == params.rhob_log || output == params.nphi_log {
        return Err(Error::InvalidParameter {
            name: "output_log".to_string(),
            reason: format!("must name a new column, got '{}'", params.output_log),
        });
    }
    table.require(
        Calculation::VshDn.name(),
        &[params.rhob_log.as_str(), params.nphi_log.as_str()],
    )?;
    let rhob = table.numeric(&params.rhob_log)?;
    let nphi = table.numeric(&params.nphi_log)?;

    let endpoints = params.endpoints();
    if endpoints.denominator() == 0.0 {
        tracing::warn!("Density-neutron endpoints are collinear; VSH_DN is undefined");
    }
    tracing::info!(rows = rhob.len(), "Calculating VSH from density-neutron");
    let vsh_dn = vsh_density_neutron(&rhob, &nphi, &endpoints);
    report_nan_heavy(Calculation::VshDn, &params.output_log, &vsh_dn);

    let mut updates = Vec::with_capacity(2);
    if table.has_column(columns::VSH_GR) && params.output_log != columns::VSH_GR {
        let vsh_gr = table.numeric(columns::VSH_GR)?;
        let diff = vsh_gr.iter().zip(&vsh_dn).map(|(g, d)| g - d).collect();
        updates.push((columns::VSH_DIFF.to_string(), ColumnData::Float(diff)));
    }
    updates.insert(0, (params.output_log.clone(), ColumnData::Float(vsh_dn)));
    table.with_columns(updates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_point_is_clean() {
        let params = VshDnParams::default();
        let table = SampleTable::builder()
            .f64("RHOB", vec![params.rho_ma])
            .f64("NPHI", vec![params.nphi_ma])
            .build()
            .unwrap();
        let out = run(&table, &params).unwrap();
        assert!(out.numeric("VSH_DN").unwrap()[0].abs() < 1e-12);
        assert!(!out.has_column("VSH_DIFF"));
    }

    #[test]
    fn test_diff_against_gamma_ray() {
        let params = VshDnParams::default();
        let table = SampleTable::builder()
            .f64("RHOB", vec![params.rho_sh, params.rho_ma])
            .f64("NPHI", vec![params.nphi_sh, params.nphi_ma])
            .f64("VSH_GR", vec![0.8, 0.1])
            .build()
            .unwrap();
        let out = run(&table, &params).unwrap();
        let vsh = out.numeric("VSH_DN").unwrap();
        assert!((vsh[0] - 1.0).abs() < 1e-9);
        let diff = out.numeric("VSH_DIFF").unwrap();
        assert!((diff[0] + 0.2).abs() < 1e-9);
        assert!((diff[1] - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_endpoints_give_nan() {
        let params = VshDnParams {
            rho_sh: 2.645,
            nphi_sh: -0.02,
            ..VshDnParams::default()
        };
        let table = SampleTable::builder()
            .f64("RHOB", vec![2.4])
            .f64("NPHI", vec![0.2])
            .build()
            .unwrap();
        let out = run(&table, &params).unwrap();
        assert!(out.numeric("VSH_DN").unwrap()[0].is_nan());
    }

    #[test]
    fn test_output_cannot_overwrite_inputs() {
        let table = SampleTable::builder()
            .f64("RHOB", vec![2.4, 2.5])
            .f64("NPHI", vec![0.2, 0.3])
            .build()
            .unwrap();
        for output in ["RHOB", "NPHI", " "] {
            let params = VshDnParams {
                output_log: output.to_string(),
                ..VshDnParams::default()
            };
            let err = run(&table, &params).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { ref name, .. } if name == "output_log"));
        }
        assert_eq!(table.numeric("RHOB").unwrap(), vec![2.4, 2.5]);
    }

    #[test]
    fn test_rerun_is_stable() {
        let table = SampleTable::builder()
            .f64("RHOB", vec![2.4, 2.5])
            .f64("NPHI", vec![0.2, 0.3])
            .build()
            .unwrap();
        let params = VshDnParams::default();
        let once = run(&table, &params).unwrap();
        let twice = run(&once, &params).unwrap();
        assert_eq!(once.numeric("VSH_DN").unwrap(), twice.numeric("VSH_DN").unwrap());
    }

    #[test]
    fn test_parameter_names() {
        let params: VshDnParams = crate::params::ParamSet::new()
            .with("RHOB", "RHOZ")
            .with("RHO_MA", "2.71")
            .parse()
            .unwrap();
        assert_eq!(params.rhob_log, "RHOZ");
        assert!((params.rho_ma - 2.71).abs() < f64::EPSILON);
    }
}
