//! Density-neutron separation
//!
//! The one calculation that removes rows: samples without RHOB, NPHI or VSH
//! (after numeric coercion) are dropped before DNS and DNSV are written.
//! A table without `VSH` but with the legacy `VSH_LINEAR` uses the latter and
//! gains a `VSH` column.

use super::{report_nan_heavy, Calculation};
use crate::equations::{dns, dnsv};
use crate::params::lenient;
use crate::table::{columns, ColumnData, SampleTable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsDnsvParams {
    /// Shale bulk density
    #[serde(rename = "RHOB_SH", deserialize_with = "lenient::f64")]
    pub rhob_sh: f64,
    /// Shale neutron porosity
    #[serde(rename = "NPHI_SH", deserialize_with = "lenient::f64")]
    pub nphi_sh: f64,
}

impl Default for DnsDnsvParams {
    fn default() -> Self {
        Self {
            rhob_sh: 2.528,
            nphi_sh: 0.35,
        }
    }
}

/// Columns read
#[must_use]
pub fn required_columns() -> Vec<String> {
    [columns::RHOB, columns::NPHI, columns::VSH]
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Shale-volume column to read: `VSH`, else `VSH_LINEAR`
fn shale_column(table: &SampleTable) -> &'static str {
    if !table.has_column(columns::VSH) && table.has_column(columns::VSH_LINEAR) {
        columns::VSH_LINEAR
    } else {
        columns::VSH
    }
}

/// Check inputs, accepting `VSH_LINEAR` for a missing `VSH`
///
/// # Errors
///
/// [`Error::MissingColumns`] naming every absent column
pub fn validate(table: &SampleTable) -> Result<()> {
    let missing: Vec<&str> = table
        .missing(&[columns::RHOB, columns::NPHI, shale_column(table)])
        .into_iter()
        .map(|name| if name == columns::VSH_LINEAR { columns::VSH } else { name })
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::missing_columns(Calculation::DnsDnsv.name(), missing))
    }
}

/// `DNS` and `DNSV`, dropping rows with missing inputs
///
/// # Errors
///
/// Missing or uncoercible RHOB/NPHI/VSH
pub fn run(table: &SampleTable, params: &DnsDnsvParams) -> Result<SampleTable> {
    validate(table)?;
    let vsh_column = shale_column(table);
    let rhob = table.numeric(columns::RHOB)?;
    let nphi = table.numeric(columns::NPHI)?;
    let vsh = table.numeric(vsh_column)?;

    let keep: Vec<bool> = (0..rhob.len())
        .map(|i| !(rhob[i].is_nan() || nphi[i].is_nan() || vsh[i].is_nan()))
        .collect();
    let retain = |values: Vec<f64>| -> Vec<f64> {
        values
            .into_iter()
            .zip(&keep)
            .filter_map(|(v, &k)| k.then_some(v))
            .collect()
    };
    let (rhob, nphi, vsh) = (retain(rhob), retain(nphi), retain(vsh));
    let dropped = keep.len() - rhob.len();
    if dropped > 0 {
        tracing::warn!(dropped, "Dropping samples without RHOB/NPHI/VSH");
    }

    tracing::info!(rows = rhob.len(), vsh = vsh_column, "Calculating DNS-DNSV");
    let dns_values = dns(&rhob, &nphi);
    let dnsv_values = dnsv(&rhob, &nphi, params.rhob_sh, params.nphi_sh, &vsh);
    report_nan_heavy(Calculation::DnsDnsv, columns::DNSV, &dnsv_values);

    let kept = table.filter_rows(&keep)?;
    let mut updates = Vec::with_capacity(3);
    if vsh_column != columns::VSH {
        updates.push((columns::VSH, ColumnData::Float(vsh)));
    }
    updates.push((columns::DNS, ColumnData::Float(dns_values)));
    updates.push((columns::DNSV, ColumnData::Float(dnsv_values)));
    kept.with_columns(updates)
}
