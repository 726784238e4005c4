//! Segment regression
//!
//! Ordinary least squares per zone. A zone is fitted only when it has more
//! than one sample and every screened column varies inside it; a zone that
//! fails the screen produces no [`GroupFit`], which the caller broadcasts back
//! as NaN.

use crate::backend::BackendDispatcher;
use crate::segment::Zones;
use crate::Backend;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Slope of y on x
    pub slope: f64,
    /// Intercept
    pub intercept: f64,
    /// Pearson correlation coefficient.
    ///
    /// NaN when `y` is constant, where scipy's `linregress` reports 0.0.
    /// Callers screen constant groups out before reading it.
    pub r: f64,
    /// Number of points fitted
    pub n: usize,
}

impl LinearFit {
    /// Whether slope and correlation are both finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.slope.is_finite() && self.r.is_finite()
    }
}

/// Least-squares fit of `y` on `x`.
///
/// Returns `None` for fewer than two points or zero variance in `x`. NaN in
/// either input propagates into the returned fit.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let count = n as f64;
    let mean_x = x.iter().sum::<f64>() / count;
    let mean_y = y.iter().sum::<f64>() / count;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let r = if syy == 0.0 {
        f64::NAN
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        r,
        n,
    })
}

/// Whether `values` holds more than one distinct non-NaN value
#[must_use]
pub fn has_variation(values: &[f64]) -> bool {
    let mut finite = values.iter().filter(|v| !v.is_nan());
    match finite.next() {
        Some(first) => finite.any(|v| v != first),
        None => false,
    }
}

/// Round to one decimal, ties to even on the exact binary value
#[must_use]
pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Fluid label from the sign of a fitted slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluidLabel {
    /// Positive slope
    Gas,
    /// Zero or negative slope
    Water,
}

impl FluidLabel {
    /// Classify a slope; exactly zero is water
    #[must_use]
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            Self::Gas
        } else {
            Self::Water
        }
    }

    /// One-letter code written to the table
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Gas => "G",
            Self::Water => "W",
        }
    }
}

/// Fits for one zone, in the order the pairs were registered
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFit {
    /// Zone id
    pub group: usize,
    /// Rows covered
    pub rows: Range<usize>,
    /// One fit per registered pair (`None` when that pair has no x variance)
    pub fits: Vec<Option<LinearFit>>,
}

impl GroupFit {
    /// Slope of pair `index`, NaN if it was not fitted
    #[must_use]
    pub fn slope(&self, index: usize) -> f64 {
        self.fit(index).map_or(f64::NAN, |f| f.slope)
    }

    /// Correlation of pair `index`, NaN if it was not fitted
    #[must_use]
    pub fn r(&self, index: usize) -> f64 {
        self.fit(index).map_or(f64::NAN, |f| f.r)
    }

    fn fit(&self, index: usize) -> Option<LinearFit> {
        self.fits.get(index).copied().flatten()
    }
}

/// Per-zone regression of column pairs
pub struct GroupRegression<'a> {
    zones: &'a Zones,
    screens: Vec<&'a [f64]>,
    pairs: Vec<(&'a [f64], &'a [f64])>,
    finite: Vec<usize>,
}

impl<'a> GroupRegression<'a> {
    /// Regression over `zones`; columns must be aligned with the zoned rows
    #[must_use]
    pub const fn new(zones: &'a Zones) -> Self {
        Self {
            zones,
            screens: Vec::new(),
            pairs: Vec::new(),
            finite: Vec::new(),
        }
    }

    /// Skip zones where `column` has a single distinct value
    #[must_use]
    pub fn screen(mut self, column: &'a [f64]) -> Self {
        self.screens.push(column);
        self
    }

    /// Fit `y` on `x`
    #[must_use]
    pub fn pair(mut self, x: &'a [f64], y: &'a [f64]) -> Self {
        self.pairs.push((x, y));
        self
    }

    /// Skip zones whose fit of pair `index` is missing or not finite
    #[must_use]
    pub fn require_finite(mut self, index: usize) -> Self {
        self.finite.push(index);
        self
    }

    /// Fit every qualifying zone
    #[must_use]
    pub fn run(&self, backend: Backend) -> Vec<GroupFit> {
        let groups: Vec<(usize, Range<usize>)> = self.zones.iter().collect();
        let rows = self.zones.ids().len();
        let fitted = BackendDispatcher::map(backend, rows, &groups, |(group, rows)| {
            self.fit_group(*group, rows.clone())
        });

        let total = groups.len();
        let fitted: Vec<GroupFit> = fitted.into_iter().flatten().collect();
        tracing::debug!(
            groups = total,
            fitted = fitted.len(),
            skipped = total - fitted.len(),
            "Segment regression complete"
        );
        fitted
    }

    fn fit_group(&self, group: usize, rows: Range<usize>) -> Option<GroupFit> {
        if rows.len() <= 1 {
            return None;
        }
        if self
            .screens
            .iter()
            .any(|column| !has_variation(&column[rows.clone()]))
        {
            return None;
        }
        let fits: Vec<Option<LinearFit>> = self
            .pairs
            .iter()
            .map(|(x, y)| linear_fit(&x[rows.clone()], &y[rows.clone()]))
            .collect();
        let rejected = self
            .finite
            .iter()
            .any(|&i| !fits.get(i).copied().flatten().is_some_and(|f| f.is_finite()));
        if rejected {
            return None;
        }
        Some(GroupFit { group, rows, fits })
    }
}

/// Spread a per-zone value over every row of its zone; rows of zones without
/// a fit get NaN.
#[must_use]
pub fn broadcast<F>(num_rows: usize, fits: &[GroupFit], value: F) -> Vec<f64>
where
    F: Fn(&GroupFit) -> f64,
{
    let mut out = vec![f64::NAN; num_rows];
    for fit in fits {
        let v = value(fit);
        for slot in &mut out[fit.rows.clone()] {
            *slot = v;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let fit = linear_fit(&[1.0, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r - 1.0).abs() < 1e-12);
        assert_eq!(fit.n, 4);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(linear_fit(&[1.0], &[2.0]).is_none());
        assert!(linear_fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
        let flat = linear_fit(&[1.0, 2.0], &[5.0, 5.0]).unwrap();
        assert!(flat.slope.abs() < f64::EPSILON);
        assert!(flat.r.is_nan());
        assert!(!flat.is_finite());
    }

    #[test]
    fn test_variation_ignores_nan() {
        assert!(!has_variation(&[1.0, f64::NAN, 1.0]));
        assert!(has_variation(&[1.0, f64::NAN, 2.0]));
        assert!(!has_variation(&[f64::NAN]));
        assert!(!has_variation(&[]));
    }

    #[test]
    fn test_round1_ties_to_even() {
        assert!((round1(0.25) - 0.2).abs() < 1e-12);
        assert!((round1(-0.25) + 0.2).abs() < 1e-12);
        assert!((round1(12.25) - 12.2).abs() < 1e-12);
        assert!((round1(0.75) - 0.8).abs() < 1e-12);
        // 0.35 is stored just below the tie
        assert!((round1(0.35) - 0.3).abs() < 1e-12);
        assert!((round1(-48.04) + 48.0).abs() < 1e-12);
        assert!(round1(f64::NAN).is_nan());
        assert_eq!(round1(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_constant_y_has_nan_correlation() {
        let fit = linear_fit(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).unwrap();
        assert!(fit.slope.abs() < 1e-12);
        assert!(fit.r.is_nan());
        assert!(!fit.is_finite());
    }

    #[test]
    fn test_label_tie_is_water() {
        assert_eq!(FluidLabel::from_slope(0.0), FluidLabel::Water);
        assert_eq!(FluidLabel::from_slope(1e-9).code(), "G");
        assert_eq!(FluidLabel::from_slope(f64::NAN), FluidLabel::Water);
    }

    #[test]
    fn test_groups_skip_single_sample_and_constant_x() {
        // zone 0: rows 0..3 fittable, zone 1: row 3 alone, zone 2: constant x
        let flags = [1i64, 1, 1, 0, 1, 1];
        let zones = Zones::from_flags(&flags);
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 5.0];
        let y = [2.0, 4.0, 6.0, 1.0, 3.0, 4.0];
        for backend in [Backend::Scalar, Backend::Parallel] {
            let fits = GroupRegression::new(&zones)
                .screen(&x)
                .screen(&y)
                .pair(&x, &y)
                .run(backend);
            assert_eq!(fits.len(), 1);
            assert_eq!(fits[0].group, 0);
            let slopes = broadcast(x.len(), &fits, |f| f.slope(0));
            assert!((slopes[0] - 2.0).abs() < 1e-12);
            assert!((slopes[2] - 2.0).abs() < 1e-12);
            assert!(slopes[3..].iter().all(|v| v.is_nan()));
        }
    }

    #[test]
    fn test_require_finite_rejects_nan_fit() {
        let zones = Zones::from_flags(&[1i64, 1, 1]);
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, f64::NAN, 3.0];
        let fits = GroupRegression::new(&zones)
            .pair(&x, &y)
            .require_finite(0)
            .run(Backend::Scalar);
        assert!(fits.is_empty());

        let fits = GroupRegression::new(&zones).pair(&x, &y).run(Backend::Scalar);
        assert_eq!(fits.len(), 1);
        assert!(fits[0].slope(0).is_nan());
    }
}
