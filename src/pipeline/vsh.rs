//! Shale volume from gamma ray

use super::{report_nan_heavy, Calculation};
use crate::equations::vsh_from_gr;
use crate::params::lenient;
use crate::table::{columns, ColumnData, SampleTable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VshParams {
    /// Clean-sand gamma ray
    #[serde(rename = "GR_MA", deserialize_with = "lenient::f64")]
    pub gr_ma: f64,
    /// Shale gamma ray
    #[serde(rename = "GR_SH", deserialize_with = "lenient::f64")]
    pub gr_sh: f64,
    /// Gamma-ray log to read
    #[serde(alias = "INPUT_LOG")]
    pub input_log: String,
    /// Column to write
    #[serde(alias = "OUTPUT_LOG")]
    pub output_log: String,
}

impl Default for VshParams {
    fn default() -> Self {
        Self {
            gr_ma: 30.0,
            gr_sh: 120.0,
            input_log: columns::GR.to_string(),
            output_log: columns::VSH_GR.to_string(),
        }
    }
}

/// Columns read
#[must_use]
pub fn required_columns(params: &VshParams) -> Vec<String> {
    vec![params.input_log.clone()]
}

/// Linear gamma-ray index into `output_log`
///
/// # Errors
///
/// Missing input log, uncoercible input, or `output_log == input_log`
pub fn run(table: &SampleTable, params: &VshParams) -> Result<SampleTable> {
    if params.output_log.trim().is_empty() || params.output_log == params.input_log {
        return Err(Error::InvalidParameter {
            name: "output_log".to_string(),
            reason: format!("must name a new column, got '{}'", params.output_log),
        });
    }
    table.require(Calculation::Vsh.name(), &[params.input_log.as_str()])?;
    let gr = table.numeric(&params.input_log)?;

    tracing::info!(
        rows = gr.len(),
        gr_ma = params.gr_ma,
        gr_sh = params.gr_sh,
        "Calculating VSH from {}",
        params.input_log
    );
    let vsh = vsh_from_gr(&gr, params.gr_ma, params.gr_sh);
    report_nan_heavy(Calculation::Vsh, &params.output_log, &vsh);

    table.with_columns([(params.output_log.as_str(), ColumnData::Float(vsh))])
}
