//! Water saturation
//!
//! The Indonesia equation written in conductance form:
//!
//! ```text
//! 1/RT = SW^n * ( PHIE^m/(a*RW) + 2*sqrt(V*PHIE^m/(a*RW*RT_SH)) + V/RT_SH )
//! ```
//!
//! where `V` is the shale term selected by [`IndonesiaVariant`].

use super::{clip_unit, safe_div};
use serde::{Deserialize, Serialize};

/// Porosity below which a sample is treated as fully water bearing
pub const MIN_EFFECTIVE_POROSITY: f64 = 0.005;

/// Shale-term exponent of the Indonesia family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndonesiaVariant {
    /// `VSH^(2 - VSH)`
    Full,
    /// `VSH^2`
    #[default]
    Simple,
    /// `VSH^(2 - 2*VSH)`
    #[serde(alias = "tar_sand", alias = "tarsand")]
    Tar,
}

impl IndonesiaVariant {
    /// Shale term `V` for one sample
    #[inline]
    #[must_use]
    pub fn shale_term(self, vsh: f64) -> f64 {
        match self {
            Self::Full => vsh.powf(2.0 - vsh),
            Self::Simple => vsh * vsh,
            Self::Tar => vsh.powf(2.0 - 2.0 * vsh),
        }
    }
}

/// Archie constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchieExponents {
    /// Tortuosity factor
    pub a: f64,
    /// Cementation exponent
    pub m: f64,
    /// Saturation exponent
    pub n: f64,
}

impl Default for ArchieExponents {
    fn default() -> Self {
        Self {
            a: 1.0,
            m: 2.0,
            n: 2.0,
        }
    }
}

/// Sum of the three conductance terms (without the `SW^n` factor).
///
/// Zero `a*RW/PHIE^m` yields NaN.
#[inline]
#[must_use]
pub fn indonesia_conductance(
    shale_term: f64,
    phie: f64,
    rw: f64,
    rt_sh: f64,
    archie: &ArchieExponents,
) -> f64 {
    let ff_rw = (archie.a / phie.powf(archie.m)) * rw;
    let ff_rw = if ff_rw == 0.0 { f64::NAN } else { ff_rw };
    let clean = 1.0 / ff_rw;
    let cross = 2.0 * (shale_term / (ff_rw * rt_sh)).sqrt();
    let shale = shale_term / rt_sh;
    clean + cross + shale
}

/// Indonesia water saturation for one sample.
///
/// Zero denominators give NaN, `PHIE < 0.005` forces 1.0 and the result is
/// clipped to `[0, 1]`.
#[must_use]
pub fn sw_indonesia(
    vsh: f64,
    phie: f64,
    rt: f64,
    rw: f64,
    rt_sh: f64,
    archie: &ArchieExponents,
    variant: IndonesiaVariant,
) -> f64 {
    let denom = indonesia_conductance(variant.shale_term(vsh), phie, rw, rt_sh, archie);
    let sw = safe_div(1.0, rt * denom).powf(1.0 / archie.n);
    if phie < MIN_EFFECTIVE_POROSITY {
        1.0
    } else {
        clip_unit(sw)
    }
}

/// Indonesia saturation from formation conductivity `CT = 1/RT`.
///
/// This is the form evaluated by the salinity sweep: full-Indonesia shale
/// term, a zero conductance sum means no formation water can be resolved
/// and is reported as fully water bearing.
#[inline]
#[must_use]
pub fn sw_indonesia_conductive(
    ct: f64,
    vsh: f64,
    phie: f64,
    rw: f64,
    rt_sh: f64,
    archie: &ArchieExponents,
) -> f64 {
    let v = IndonesiaVariant::Full.shale_term(vsh);
    let pm = phie.powf(archie.m);
    let shale = v / rt_sh;
    let clean = pm / (archie.a * rw);
    let cross = 2.0 * ((v * pm) / (archie.a * rw * rt_sh)).sqrt();
    let denom = shale + clean + cross;
    if denom == 0.0 {
        return 1.0;
    }
    clip_unit((ct / denom).powf(1.0 / archie.n))
}

/// Indonesia water saturation for whole columns
#[must_use]
pub fn water_saturation_indonesia(
    vsh: &[f64],
    phie: &[f64],
    rt: &[f64],
    rw: f64,
    rt_sh: f64,
    archie: &ArchieExponents,
    variant: IndonesiaVariant,
) -> Vec<f64> {
    vsh.iter()
        .zip(phie)
        .zip(rt)
        .map(|((&v, &p), &r)| sw_indonesia(v, p, r, rw, rt_sh, archie, variant))
        .collect()
}

/// Archie water saturation `((a*RW)/(RT*PHIE^m))^(1/n)`, clipped to `[0, 1]`
#[must_use]
pub fn water_saturation_archie(
    phie: &[f64],
    rt: &[f64],
    rw: f64,
    archie: &ArchieExponents,
) -> Vec<f64> {
    phie.iter()
        .zip(rt)
        .map(|(&p, &r)| {
            let sw = safe_div(archie.a * rw, r * p.powf(archie.m)).powf(1.0 / archie.n);
            clip_unit(sw)
        })
        .collect()
}
