//! Effective porosity

use super::{report_nan_heavy, Calculation};
use crate::equations::{porosity_combined, porosity_density, porosity_neutron};
use crate::params::lenient;
use crate::table::{columns, ColumnData, SampleTable};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Which logs porosity is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PorosityMethod {
    /// Bulk density only
    #[default]
    Density,
    /// Neutron only
    Neutron,
    /// Root-mean-square of density and neutron porosity
    Combined,
}

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PorosityParams {
    /// Source logs
    #[serde(rename = "PHIE_METHOD", alias = "method")]
    pub method: PorosityMethod,
    /// Matrix density
    #[serde(rename = "RHO_MA", deserialize_with = "lenient::f64")]
    pub rho_ma: f64,
    /// Fluid density
    #[serde(rename = "RHO_FL", deserialize_with = "lenient::f64")]
    pub rho_fl: f64,
    /// Matrix neutron reading
    #[serde(rename = "NPHI_MA", deserialize_with = "lenient::f64")]
    pub nphi_ma: f64,
    /// Fluid neutron reading
    #[serde(rename = "NPHI_FL", deserialize_with = "lenient::f64")]
    pub nphi_fl: f64,
}

impl Default for PorosityParams {
    fn default() -> Self {
        Self {
            method: PorosityMethod::Density,
            rho_ma: 2.65,
            rho_fl: 1.0,
            nphi_ma: 0.0,
            nphi_fl: 1.0,
        }
    }
}

/// Columns read
#[must_use]
pub fn required_columns(params: &PorosityParams) -> Vec<String> {
    let names: &[&str] = match params.method {
        PorosityMethod::Density => &[columns::RHOB],
        PorosityMethod::Neutron => &[columns::NPHI],
        PorosityMethod::Combined => &[columns::RHOB, columns::NPHI],
    };
    names.iter().map(ToString::to_string).collect()
}

/// Effective porosity into `PHIE`
///
/// # Errors
///
/// Missing or uncoercible RHOB/NPHI for the chosen method
pub fn run(table: &SampleTable, params: &PorosityParams) -> Result<SampleTable> {
    let required = required_columns(params);
    let names: Vec<&str> = required.iter().map(String::as_str).collect();
    table.require(Calculation::Porosity.name(), &names)?;

    tracing::info!(rows = table.num_rows(), method = ?params.method, "Calculating porosity");
    let phie = match params.method {
        PorosityMethod::Density => {
            porosity_density(&table.numeric(columns::RHOB)?, params.rho_ma, params.rho_fl)
        }
        PorosityMethod::Neutron => {
            porosity_neutron(&table.numeric(columns::NPHI)?, params.nphi_ma, params.nphi_fl)
        }
        PorosityMethod::Combined => {
            let phi_d =
                porosity_density(&table.numeric(columns::RHOB)?, params.rho_ma, params.rho_fl);
            let phi_n =
                porosity_neutron(&table.numeric(columns::NPHI)?, params.nphi_ma, params.nphi_fl);
            porosity_combined(&phi_d, &phi_n)
        }
    };
    report_nan_heavy(Calculation::Porosity, columns::PHIE, &phie);

    table.with_columns([(columns::PHIE, ColumnData::Float(phie))])
}
