//! Petrophysical equations
//!
//! Pure per-sample kernels plus slice helpers that map them over whole
//! columns. Nothing here fails: a division by zero or a non-numeric input
//! produces NaN for that sample and the caller decides whether a NaN-heavy
//! output is worth reporting.
//!
//! | Module | Quantity |
//! |--------|----------|
//! | [`shale`] | VSH from gamma ray and from the density-neutron crossplot |
//! | [`porosity`] | PHIE from density / neutron logs |
//! | [`saturation`] | Indonesia and Archie water saturation |
//! | [`resistivity`] | RWA, R0, water resistivity vs temperature and salinity |
//! | [`separation`] | DNS / DNSV |

pub mod porosity;
pub mod resistivity;
pub mod saturation;
pub mod separation;
pub mod shale;

pub use porosity::{porosity_combined, porosity_density, porosity_neutron};
pub use resistivity::{rwa, RwaValues};
pub use saturation::{water_saturation_archie, water_saturation_indonesia, IndonesiaVariant};
pub use separation::{dns, dnsv};
pub use shale::{vsh_density_neutron, vsh_from_gr, DensityNeutronEndpoints};

/// Divide, mapping a zero denominator to NaN
#[inline]
#[must_use]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Clip to `[0, 1]`, NaN passes through
#[inline]
#[must_use]
pub fn clip_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Clip below at zero, NaN passes through
#[inline]
#[must_use]
pub fn clip_non_negative(value: f64) -> f64 {
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Fraction of NaN values in a column (0 for an empty column)
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn nan_fraction(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| v.is_nan()).count() as f64 / values.len() as f64
}
