//! Pipeline orchestrators
//!
//! Each calculation is a pure transform `(SampleTable, Params) -> SampleTable`:
//!
//! 1. check the required columns (all missing names reported at once)
//! 2. coerce inputs to `f64`
//! 3. run the equation / segmentation / regression / sweep kernels
//! 4. write every derived column back in a single `with_columns` call
//!
//! Outputs are always recomputed from base columns, so re-running a
//! calculation on its own output gives the same table.
//!
//! [`Calculation`] is the registry: it parses front-end names, resolves
//! typed parameters and dispatches to the module that implements the
//! calculation.

pub mod dns_dnsv;
pub mod gsa;
pub mod normalization;
pub mod porosity;
pub mod rgbe_rpbe;
pub mod rt_r0;
pub mod rwa;
pub mod sw;
pub mod swgrad;
pub mod vsh;
pub mod vsh_dn;

use crate::equations::nan_fraction;
use crate::params::ParamSet;
use crate::table::SampleTable;
use crate::{Backend, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fraction of NaN in an output column above which the run is reported as a
/// partial failure
pub const NAN_WARN_FRACTION: f64 = 0.5;

/// Named analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Calculation {
    /// Shale volume from gamma ray
    Vsh,
    /// Shale volume from density-neutron
    VshDn,
    /// Effective porosity
    Porosity,
    /// Rolling-mean smoothing of RT / NPHI / RHOB
    Gsa,
    /// Water saturation
    Sw,
    /// Apparent water resistivity
    Rwa,
    /// Zone regression fluid indicators
    RgbeRpbe,
    /// RT-R0 fluid typing
    RtR0,
    /// Saturation sensitivity to salinity
    Swgrad,
    /// Density-neutron separation
    DnsDnsv,
    /// Per-interval min-max normalisation
    Normalization,
}

impl Calculation {
    /// Every calculation in menu order
    pub const ALL: [Self; 11] = [
        Self::Vsh,
        Self::VshDn,
        Self::Porosity,
        Self::Gsa,
        Self::Sw,
        Self::Rwa,
        Self::RgbeRpbe,
        Self::RtR0,
        Self::Swgrad,
        Self::DnsDnsv,
        Self::Normalization,
    ];

    /// Front-end name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vsh => "vsh",
            Self::VshDn => "vsh_dn",
            Self::Porosity => "porosity",
            Self::Gsa => "gsa",
            Self::Sw => "sw",
            Self::Rwa => "rwa",
            Self::RgbeRpbe => "rgbe_rpbe",
            Self::RtR0 => "rt_r0",
            Self::Swgrad => "swgrad",
            Self::DnsDnsv => "dns_dnsv",
            Self::Normalization => "normalization",
        }
    }

    /// Human-readable title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Vsh => "VSH Calculation",
            Self::VshDn => "VSH Density-Neutron Calculation",
            Self::Porosity => "Porosity Calculation",
            Self::Gsa => "GSA Smoothing",
            Self::Sw => "Water Saturation Calculation",
            Self::Rwa => "RWA Calculation",
            Self::RgbeRpbe => "RGBE-RPBE Calculation",
            Self::RtR0 => "RT-R0 Calculation",
            Self::Swgrad => "SWGRAD Calculation",
            Self::DnsDnsv => "DNS-DNSV Calculation",
            Self::Normalization => "Interval Normalization",
        }
    }

    /// Columns the calculation reads, given its parameters
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `params` does not parse
    pub fn required_columns(self, params: &ParamSet) -> Result<Vec<String>> {
        let columns = match self {
            Self::Vsh => vsh::required_columns(&params.parse()?),
            Self::VshDn => vsh_dn::required_columns(&params.parse()?),
            Self::Porosity => porosity::required_columns(&params.parse()?),
            Self::Gsa => gsa::required_columns(),
            Self::Sw => sw::required_columns(&params.parse()?),
            Self::Rwa => rwa::required_columns(),
            Self::RgbeRpbe => rgbe_rpbe::required_columns(),
            Self::RtR0 => rt_r0::required_columns(),
            Self::Swgrad => swgrad::required_columns(&params.parse()?),
            Self::DnsDnsv => dns_dnsv::required_columns(),
            Self::Normalization => normalization::required_columns(&params.parse()?),
        };
        Ok(columns)
    }

    /// Check a table against [`Calculation::required_columns`] without
    /// running anything.
    ///
    /// DNS/DNSV accepts `VSH_LINEAR` in place of a missing `VSH`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingColumns`] naming every absent column, or
    /// [`Error::InvalidParameter`] if `params` does not parse
    pub fn validate_requirements(self, table: &SampleTable, params: &ParamSet) -> Result<()> {
        if self == Self::DnsDnsv {
            return dns_dnsv::validate(table);
        }
        let required = self.required_columns(params)?;
        let names: Vec<&str> = required.iter().map(String::as_str).collect();
        table.require(self.name(), &names)
    }

    /// Run the calculation on one table
    pub(crate) fn execute(
        self,
        table: &SampleTable,
        params: &ParamSet,
        backend: Backend,
    ) -> Result<SampleTable> {
        match self {
            Self::Vsh => vsh::run(table, &params.parse()?),
            Self::VshDn => vsh_dn::run(table, &params.parse()?),
            Self::Porosity => porosity::run(table, &params.parse()?),
            Self::Gsa => gsa::run(table, &params.parse()?),
            Self::Sw => sw::run(table, &params.parse()?),
            Self::Rwa => rwa::run(table, &params.parse()?),
            Self::RgbeRpbe => rgbe_rpbe::run(table, &params.parse()?, backend),
            Self::RtR0 => rt_r0::run(table, &params.parse()?, backend),
            Self::Swgrad => swgrad::run(table, &params.parse()?, backend),
            Self::DnsDnsv => dns_dnsv::run(table, &params.parse()?),
            Self::Normalization => normalization::run(table, &params.parse()?),
        }
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Calculation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.name() == key)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown calculation '{s}'")))
    }
}

/// Reservoir-quality flag: 1 where `PHIE > phie_cutoff` and
/// `VSH < vsh_cutoff`, else 0 (NaN inputs are 0)
#[must_use]
pub fn reservoir_quality(phie: &[f64], vsh: &[f64], phie_cutoff: f64, vsh_cutoff: f64) -> Vec<i64> {
    phie.iter()
        .zip(vsh)
        .map(|(&p, &v)| i64::from(p > phie_cutoff && v < vsh_cutoff))
        .collect()
}

/// Warn when an output column is mostly NaN
pub(crate) fn report_nan_heavy(calculation: Calculation, column: &str, values: &[f64]) {
    let fraction = nan_fraction(values);
    if fraction > NAN_WARN_FRACTION {
        tracing::warn!(
            calculation = calculation.name(),
            column,
            nan_fraction = fraction,
            "Output column is mostly NaN"
        );
    }
}
