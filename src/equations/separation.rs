//! Density-neutron separation

/// Limestone-scaled density porosity minus neutron porosity
#[inline]
#[must_use]
pub fn dns_sample(rhob: f64, nphi: f64) -> f64 {
    ((2.71 - rhob) / 1.71) - nphi
}

/// Separation after removing the shale contribution from both logs
#[inline]
#[must_use]
pub fn dnsv_sample(rhob: f64, nphi: f64, rhob_sh: f64, nphi_sh: f64, vsh: f64) -> f64 {
    let rhob_corrected = rhob + vsh * (2.65 - rhob_sh);
    let nphi_corrected = nphi + vsh * (0.0 - nphi_sh);
    dns_sample(rhob_corrected, nphi_corrected)
}

/// DNS for a column pair
#[must_use]
pub fn dns(rhob: &[f64], nphi: &[f64]) -> Vec<f64> {
    rhob.iter().zip(nphi).map(|(&r, &n)| dns_sample(r, n)).collect()
}

/// DNSV for whole columns
#[must_use]
pub fn dnsv(rhob: &[f64], nphi: &[f64], rhob_sh: f64, nphi_sh: f64, vsh: &[f64]) -> Vec<f64> {
    rhob.iter()
        .zip(nphi)
        .zip(vsh)
        .map(|((&r, &n), &v)| dnsv_sample(r, n, rhob_sh, nphi_sh, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns_boundaries() {
        assert!(dns_sample(2.71, 0.0).abs() < 1e-12);
        assert!((dns_sample(2.71 - 1.71, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dnsv_without_shale_equals_dns() {
        let a = dnsv(&[2.3], &[0.2], 2.528, 0.35, &[0.0]);
        let b = dns(&[2.3], &[0.2]);
        assert!((a[0] - b[0]).abs() < 1e-12);
    }

    #[test]
    fn test_dnsv_shale_correction_direction() {
        // Removing the shale contribution pulls the separation toward zero
        let raw = dns_sample(2.45, 0.3);
        let corrected = dnsv_sample(2.45, 0.3, 2.528, 0.35, 0.5);
        assert!(corrected > raw);
    }
}
