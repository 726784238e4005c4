//! Salinity sweep
//!
//! For every sample the Indonesia saturation is evaluated at 25 trial
//! formation-water salinities (1,000 to 25,000 ppm). Results live in one
//! row-major `samples x 25` buffer so the sweep is a single pass over
//! contiguous memory; rows are independent and are filled in parallel on the
//! parallel backend.
//!
//! The saturation gradient is the least-squares slope of the sweep at 10k,
//! 15k, 20k and 25k ppm against `[10, 15, 20, 25]`.

use crate::backend::BackendDispatcher;
use crate::equations::resistivity::rw_from_salinity;
use crate::equations::saturation::{sw_indonesia_conductive, ArchieExponents};
use crate::regression::linear_fit;
use crate::Backend;

/// Trial salinities per sample
pub const SALINITY_STEPS: usize = 25;

/// Salinity increment between trials (ppm)
pub const SALINITY_STEP_PPM: f64 = 1000.0;

/// 1-based sweep indices used for the gradient fit
pub const GRADIENT_INDICES: [usize; 4] = [10, 15, 20, 25];

/// Salinity (ppm) of 1-based sweep index `j`
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn salinity_ppm(j: usize) -> f64 {
    j as f64 * SALINITY_STEP_PPM
}

/// Sweep inputs that are constant across samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConstants {
    /// Archie `a`, `m`, `n`
    pub archie: ArchieExponents,
    /// Shale resistivity
    pub rt_sh: f64,
}

/// Per-sample inputs, all columns of equal length
#[derive(Debug, Clone, Copy)]
pub struct SweepInputs<'a> {
    /// Formation conductivity `1/RT`
    pub ct: &'a [f64],
    /// Shale volume
    pub vsh: &'a [f64],
    /// Effective porosity
    pub phie: &'a [f64],
    /// Formation temperature (deg F)
    pub ftemp: &'a [f64],
}

impl SweepInputs<'_> {
    fn len(&self) -> usize {
        self.ct
            .len()
            .min(self.vsh.len())
            .min(self.phie.len())
            .min(self.ftemp.len())
    }
}

/// Saturation at every trial salinity plus the per-sample gradient
#[derive(Debug, Clone, PartialEq)]
pub struct SalinitySweep {
    values: Vec<f64>,
    gradient: Vec<f64>,
}

impl SalinitySweep {
    /// Run the sweep over every sample
    #[must_use]
    pub fn compute(inputs: SweepInputs<'_>, constants: &SweepConstants, backend: Backend) -> Self {
        let samples = inputs.len();
        let salinities: Vec<f64> = (1..=SALINITY_STEPS).map(salinity_ppm).collect();
        let mut values = vec![f64::NAN; samples * SALINITY_STEPS];

        BackendDispatcher::for_each_row_mut(backend, &mut values, SALINITY_STEPS, |i, row| {
            let (ct, vsh, phie, ftemp) =
                (inputs.ct[i], inputs.vsh[i], inputs.phie[i], inputs.ftemp[i]);
            for (slot, &ppm) in row.iter_mut().zip(&salinities) {
                let rw = rw_from_salinity(ppm, ftemp);
                *slot = sw_indonesia_conductive(ct, vsh, phie, rw, constants.rt_sh, &constants.archie);
            }
        });

        let gradient = values.chunks(SALINITY_STEPS).map(sweep_gradient).collect();
        tracing::debug!(samples, steps = SALINITY_STEPS, "Salinity sweep complete");
        Self { values, gradient }
    }

    /// Number of samples swept
    #[must_use]
    pub fn len(&self) -> usize {
        self.gradient.len()
    }

    /// Whether no samples were swept
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gradient.is_empty()
    }

    /// The 25 saturations of sample `i`
    #[must_use]
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.values.get(i * SALINITY_STEPS..(i + 1) * SALINITY_STEPS)
    }

    /// Saturation at 1-based sweep index `j` for every sample
    #[must_use]
    pub fn column(&self, j: usize) -> Vec<f64> {
        if j == 0 || j > SALINITY_STEPS {
            return vec![f64::NAN; self.len()];
        }
        self.values
            .chunks(SALINITY_STEPS)
            .map(|row| row[j - 1])
            .collect()
    }

    /// Gradient per sample
    #[must_use]
    pub fn gradient(&self) -> &[f64] {
        &self.gradient
    }
}

/// Least-squares slope of one sweep row at [`GRADIENT_INDICES`]; NaN when
/// the fit is degenerate.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn sweep_gradient(row: &[f64]) -> f64 {
    if row.len() < SALINITY_STEPS {
        return f64::NAN;
    }
    let x = GRADIENT_INDICES.map(|j| j as f64);
    let y = GRADIENT_INDICES.map(|j| row[j - 1]);
    linear_fit(&x, &y).map_or(f64::NAN, |fit| fit.slope)
}
