//! Apparent water resistivity

use super::{report_nan_heavy, Calculation};
use crate::equations::rwa;
use crate::params::lenient;
use crate::table::{columns, ColumnData, SampleTable};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RwaParams {
    /// Tortuosity factor
    #[serde(rename = "A", alias = "A_PARAM", deserialize_with = "lenient::f64")]
    pub a: f64,
    /// Cementation exponent
    #[serde(rename = "M", alias = "M_PARAM", deserialize_with = "lenient::f64")]
    pub m: f64,
    /// Shale resistivity
    #[serde(rename = "RT_SH", alias = "RTSH", deserialize_with = "lenient::f64")]
    pub rt_sh: f64,
}

impl Default for RwaParams {
    fn default() -> Self {
        Self {
            a: 1.0,
            m: 2.0,
            rt_sh: 5.0,
        }
    }
}

/// Columns read
#[must_use]
pub fn required_columns() -> Vec<String> {
    [columns::PHIE, columns::RT, columns::VSH]
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// `RWA_FULL`, `RWA_SIMPLE` and `RWA_TAR`
///
/// # Errors
///
/// Missing or uncoercible PHIE/RT/VSH
pub fn run(table: &SampleTable, params: &RwaParams) -> Result<SampleTable> {
    table.require(
        Calculation::Rwa.name(),
        &[columns::PHIE, columns::RT, columns::VSH],
    )?;
    let phie = table.numeric(columns::PHIE)?;
    let rt = table.numeric(columns::RT)?;
    let vsh = table.numeric(columns::VSH)?;

    tracing::info!(rows = phie.len(), rt_sh = params.rt_sh, "Calculating RWA");
    let values = rwa(&phie, &rt, &vsh, params.a, params.m, params.rt_sh);
    let full: Vec<f64> = values.iter().map(|v| v.full).collect();
    let simple: Vec<f64> = values.iter().map(|v| v.simple).collect();
    let tar: Vec<f64> = values.iter().map(|v| v.tar).collect();
    report_nan_heavy(Calculation::Rwa, columns::RWA_FULL, &full);

    table.with_columns([
        (columns::RWA_FULL, ColumnData::Float(full)),
        (columns::RWA_SIMPLE, ColumnData::Float(simple)),
        (columns::RWA_TAR, ColumnData::Float(tar)),
    ])
}
