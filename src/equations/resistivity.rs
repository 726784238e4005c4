//! Water resistivity relations

use super::saturation::IndonesiaVariant;
use super::{clip_non_negative, safe_div};

/// Apparent water resistivity for the three Indonesia variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RwaValues {
    /// Full Indonesia (`VSH^(2-VSH)`)
    pub full: f64,
    /// Simple Indonesia (`VSH^2`)
    pub simple: f64,
    /// Tar sand (`VSH^(2-2*VSH)`)
    pub tar: f64,
}

/// Apparent water resistivity for one sample.
///
/// Inverts the Indonesia equation at `SW = 1`. Zero `PHIE` or `RT` gives
/// NaN; every variant is clipped below at zero.
#[must_use]
pub fn rwa_sample(phie: f64, rt: f64, vsh: f64, a: f64, m: f64, rt_sh: f64) -> RwaValues {
    let phie = if phie == 0.0 { f64::NAN } else { phie };
    let rt = if rt == 0.0 { f64::NAN } else { rt };
    let f1 = phie.powf(m) / a;
    let f2 = 1.0 / rt;

    let per_variant = |variant: IndonesiaVariant| {
        let v = variant.shale_term(vsh);
        let f3 = v / rt_sh;
        let f4 = (v / (rt * rt_sh)).sqrt();
        clip_non_negative(safe_div(f1, f2 + f3 - f4))
    };

    RwaValues {
        full: per_variant(IndonesiaVariant::Full),
        simple: per_variant(IndonesiaVariant::Simple),
        tar: per_variant(IndonesiaVariant::Tar),
    }
}

/// Apparent water resistivity for whole columns
#[must_use]
pub fn rwa(phie: &[f64], rt: &[f64], vsh: &[f64], a: f64, m: f64, rt_sh: f64) -> Vec<RwaValues> {
    phie.iter()
        .zip(rt)
        .zip(vsh)
        .map(|((&p, &r), &v)| rwa_sample(p, r, v, a, m, rt_sh))
        .collect()
}

/// Archie apparent water resistivity `RT * PHIE^m`
#[inline]
#[must_use]
pub fn rwa_archie(rt: f64, phie: f64, m: f64) -> f64 {
    rt * phie.powf(m)
}

/// Wet resistivity R0: the RT the rock would read fully water saturated.
///
/// `1 / (aa + 2*sqrt(aa*bb) + bb)` with `aa = PHIE^m/(a*RW)` and
/// `bb = VSH^(2-VSH)/RT_SH`.
#[inline]
#[must_use]
pub fn r0(phie: f64, vsh: f64, a: f64, m: f64, rw: f64, rt_sh: f64) -> f64 {
    let aa = phie.powf(m) / (a * rw);
    let bb = vsh.powf(2.0 - vsh) / rt_sh;
    safe_div(1.0, aa + 2.0 * (aa * bb).sqrt() + bb)
}

/// Arps conversion of a water resistivity measured at `rw_temp_measured`
/// to `formation_temp` (both in the same units as the 21.5 offset, deg C).
#[inline]
#[must_use]
pub fn rw_at_temperature(rw: f64, rw_temp_measured: f64, formation_temp: f64) -> f64 {
    safe_div(rw * (rw_temp_measured + 21.5), formation_temp + 21.5)
}

/// Linear geothermal approximation of formation temperature (deg F)
#[inline]
#[must_use]
pub fn formation_temperature(depth: f64, surface_temp: f64, gradient: f64) -> f64 {
    surface_temp + gradient * depth
}

/// NaCl water resistivity at 75 deg F for a salinity in ppm
#[inline]
#[must_use]
pub fn rw75_from_salinity(salinity_ppm: f64) -> f64 {
    0.0123 + 3647.5 / salinity_ppm.powf(0.955)
}

/// NaCl water resistivity at formation temperature (deg F)
#[inline]
#[must_use]
pub fn rw_from_salinity(salinity_ppm: f64, formation_temp_f: f64) -> f64 {
    safe_div(rw75_from_salinity(salinity_ppm) * 81.77, formation_temp_f + 6.77)
}
