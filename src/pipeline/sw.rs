//! Water saturation

use super::{report_nan_heavy, Calculation};
use crate::equations::resistivity::rw_at_temperature;
use crate::equations::saturation::ArchieExponents;
use crate::equations::{water_saturation_archie, water_saturation_indonesia, IndonesiaVariant};
use crate::params::lenient;
use crate::table::{columns, ColumnData, SampleTable};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Saturation equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwMethod {
    /// Indonesia with `VSH^2`
    #[default]
    Simple,
    /// Indonesia with `VSH^(2 - VSH)`
    Full,
    /// Indonesia with `VSH^(2 - 2*VSH)`
    #[serde(alias = "tar_sand", alias = "tarsand")]
    Tar,
    /// Clean-sand Archie
    Archie,
}

impl SwMethod {
    const fn indonesia(self) -> Option<IndonesiaVariant> {
        match self {
            Self::Simple => Some(IndonesiaVariant::Simple),
            Self::Full => Some(IndonesiaVariant::Full),
            Self::Tar => Some(IndonesiaVariant::Tar),
            Self::Archie => None,
        }
    }
}

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwParams {
    /// Equation
    #[serde(rename = "SW_METHOD", alias = "method")]
    pub method: SwMethod,
    /// Water resistivity at sample temperature
    #[serde(rename = "RWS", deserialize_with = "lenient::f64")]
    pub rws: f64,
    /// Temperature at which `RWS` was measured
    #[serde(rename = "RWT", deserialize_with = "lenient::f64")]
    pub rwt: f64,
    /// Formation temperature
    #[serde(rename = "FTEMP", deserialize_with = "lenient::f64")]
    pub ftemp: f64,
    /// Shale resistivity
    #[serde(rename = "RT_SH", alias = "RTSH", deserialize_with = "lenient::f64")]
    pub rt_sh: f64,
    /// Water resistivity for the Archie method
    #[serde(rename = "RW", alias = "rw", deserialize_with = "lenient::f64")]
    pub rw: f64,
    /// Tortuosity factor
    #[serde(rename = "A", alias = "a", deserialize_with = "lenient::f64")]
    pub a: f64,
    /// Cementation exponent
    #[serde(rename = "M", alias = "m", deserialize_with = "lenient::f64")]
    pub m: f64,
    /// Saturation exponent
    #[serde(rename = "N", alias = "n", deserialize_with = "lenient::f64")]
    pub n: f64,
}

impl Default for SwParams {
    fn default() -> Self {
        Self {
            method: SwMethod::Simple,
            rws: 0.529,
            rwt: 227.0,
            ftemp: 80.0,
            rt_sh: 2.2,
            rw: 0.1,
            a: 1.0,
            m: 2.0,
            n: 2.0,
        }
    }
}

impl SwParams {
    /// Archie constants
    #[must_use]
    pub const fn archie(&self) -> ArchieExponents {
        ArchieExponents {
            a: self.a,
            m: self.m,
            n: self.n,
        }
    }

    /// Water resistivity converted to formation temperature
    #[must_use]
    pub fn rw_temp(&self) -> f64 {
        rw_at_temperature(self.rws, self.rwt, self.ftemp)
    }
}

/// Columns read
#[must_use]
pub fn required_columns(params: &SwParams) -> Vec<String> {
    let names: &[&str] = match params.method {
        SwMethod::Archie => &[columns::RT, columns::PHIE],
        _ => &[columns::RT, columns::PHIE, columns::VSH],
    };
    names.iter().map(ToString::to_string).collect()
}

/// Water saturation into `SW`; Indonesia methods also write `RW_TEMP`
///
/// # Errors
///
/// Missing or uncoercible RT/PHIE/VSH
pub fn run(table: &SampleTable, params: &SwParams) -> Result<SampleTable> {
    let required = required_columns(params);
    let names: Vec<&str> = required.iter().map(String::as_str).collect();
    table.require(Calculation::Sw.name(), &names)?;

    let rt = table.numeric(columns::RT)?;
    let phie = table.numeric(columns::PHIE)?;
    let archie = params.archie();
    let rows = rt.len();

    let Some(variant) = params.method.indonesia() else {
        tracing::info!(rows, rw = params.rw, "Calculating water saturation (Archie)");
        let sw = water_saturation_archie(&phie, &rt, params.rw, &archie);
        report_nan_heavy(Calculation::Sw, columns::SW, &sw);
        return table.with_columns([(columns::SW, ColumnData::Float(sw))]);
    };

    let vsh = table.numeric(columns::VSH)?;
    let rw_temp = params.rw_temp();
    tracing::info!(rows, rw_temp, variant = ?variant, "Calculating water saturation (Indonesia)");
    let sw = water_saturation_indonesia(&vsh, &phie, &rt, rw_temp, params.rt_sh, &archie, variant);
    report_nan_heavy(Calculation::Sw, columns::SW, &sw);

    table.with_columns([
        (columns::RW_TEMP, ColumnData::Float(vec![rw_temp; rows])),
        (columns::SW, ColumnData::Float(sw)),
    ])
}
