//! Shale volume

use super::{clip_unit, safe_div};
use serde::{Deserialize, Serialize};

/// Linear gamma-ray index for one sample, clipped to `[0, 1]`.
///
/// `gr_sh == gr_ma` gives NaN.
#[inline]
#[must_use]
pub fn vsh_gr(gr: f64, gr_ma: f64, gr_sh: f64) -> f64 {
    clip_unit(safe_div(gr - gr_ma, gr_sh - gr_ma))
}

/// Linear gamma-ray shale volume for a column
#[must_use]
pub fn vsh_from_gr(gr: &[f64], gr_ma: f64, gr_sh: f64) -> Vec<f64> {
    gr.iter().map(|&g| vsh_gr(g, gr_ma, gr_sh)).collect()
}

/// Matrix, shale and fluid points of the density-neutron crossplot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityNeutronEndpoints {
    /// Matrix density (g/cc)
    pub rho_ma: f64,
    /// Shale density (g/cc)
    pub rho_sh: f64,
    /// Fluid density (g/cc)
    pub rho_fl: f64,
    /// Matrix neutron porosity
    pub nphi_ma: f64,
    /// Shale neutron porosity
    pub nphi_sh: f64,
    /// Fluid neutron porosity
    pub nphi_fl: f64,
}

impl Default for DensityNeutronEndpoints {
    fn default() -> Self {
        Self {
            rho_ma: 2.645,
            rho_sh: 2.61,
            rho_fl: 0.85,
            nphi_ma: -0.02,
            nphi_sh: 0.398,
            nphi_fl: 0.85,
        }
    }
}

impl DensityNeutronEndpoints {
    /// Denominator of the crossplot solution; zero means the shale point is
    /// collinear with the matrix-fluid line and VSH is undefined.
    #[must_use]
    pub fn denominator(&self) -> f64 {
        let c = (self.rho_ma - self.rho_fl) * (self.nphi_fl - self.nphi_sh);
        let d = (self.rho_sh - self.rho_fl) * (self.nphi_fl - self.nphi_ma);
        c - d
    }

    /// Shale volume for one (RHOB, NPHI) sample, clipped to `[0, 1]`
    #[inline]
    #[must_use]
    pub fn vsh(&self, rhob: f64, nphi: f64) -> f64 {
        let a = (self.rho_ma - self.rho_fl) * (self.nphi_fl - nphi);
        let b = (rhob - self.rho_fl) * (self.nphi_fl - self.nphi_ma);
        clip_unit(safe_div(a - b, self.denominator()))
    }
}

/// Shale volume from the density-neutron crossplot for a column pair
#[must_use]
pub fn vsh_density_neutron(
    rhob: &[f64],
    nphi: &[f64],
    endpoints: &DensityNeutronEndpoints,
) -> Vec<f64> {
    rhob.iter()
        .zip(nphi)
        .map(|(&r, &n)| endpoints.vsh(r, n))
        .collect()
}
