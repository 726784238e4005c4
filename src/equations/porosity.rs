//! Porosity

use super::{clip_unit, safe_div};

/// Density porosity for one sample, clipped to `[0, 1]`
#[inline]
#[must_use]
pub fn phi_density(rhob: f64, rho_ma: f64, rho_fl: f64) -> f64 {
    clip_unit(safe_div(rho_ma - rhob, rho_ma - rho_fl))
}

/// Neutron porosity corrected to the matrix/fluid scale, clipped to `[0, 1]`
#[inline]
#[must_use]
pub fn phi_neutron(nphi: f64, nphi_ma: f64, nphi_fl: f64) -> f64 {
    clip_unit(safe_div(nphi - nphi_ma, nphi_fl - nphi_ma))
}

/// Density porosity for a column
#[must_use]
pub fn porosity_density(rhob: &[f64], rho_ma: f64, rho_fl: f64) -> Vec<f64> {
    rhob.iter().map(|&r| phi_density(r, rho_ma, rho_fl)).collect()
}

/// Neutron porosity for a column
#[must_use]
pub fn porosity_neutron(nphi: &[f64], nphi_ma: f64, nphi_fl: f64) -> Vec<f64> {
    nphi.iter().map(|&n| phi_neutron(n, nphi_ma, nphi_fl)).collect()
}

/// Root-mean-square of density and neutron porosity (gas-tolerant average)
#[must_use]
pub fn porosity_combined(phi_d: &[f64], phi_n: &[f64]) -> Vec<f64> {
    phi_d
        .iter()
        .zip(phi_n)
        .map(|(&d, &n)| clip_unit(((d * d + n * n) / 2.0).sqrt()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_porosity() {
        assert!(phi_density(2.65, 2.65, 1.0).abs() < f64::EPSILON);
        assert!((phi_density(1.0, 2.65, 1.0) - 1.0).abs() < f64::EPSILON);
        let phi = phi_density(2.32, 2.65, 1.0);
        assert!((phi - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_density_porosity_clipped_and_degenerate() {
        assert!(phi_density(2.9, 2.65, 1.0).abs() < f64::EPSILON);
        assert!((phi_density(0.5, 2.65, 1.0) - 1.0).abs() < f64::EPSILON);
        assert!(phi_density(2.3, 1.0, 1.0).is_nan());
    }

    #[test]
    fn test_combined_of_equal_inputs_is_identity() {
        let out = porosity_combined(&[0.2, 0.1], &[0.2, 0.1]);
        assert!((out[0] - 0.2).abs() < 1e-12);
        assert!((out[1] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_neutron_porosity() {
        let out = porosity_neutron(&[0.25, -0.1], 0.0, 1.0);
        assert!((out[0] - 0.25).abs() < f64::EPSILON);
        assert!(out[1].abs() < f64::EPSILON);
    }
}
