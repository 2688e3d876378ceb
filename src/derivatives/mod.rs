//! Spatial derivatives of gridded potential fields
//!
//! Horizontal derivatives default to finite differences: second-order
//! central differences in the interior and first-order one-sided differences
//! on the first and last node of each line. They can also be computed in the
//! frequency domain.
//!
//! The upward derivative is always computed in the frequency domain, since a
//! grid holds a single height level. For a field harmonic above its sources
//! the transform of the derivative is `-|k|` times the transform of the
//! field, so the `n`-th derivative uses the multiplier `(-|k|)^n`. The zero
//! wavenumber term (the grid mean) is removed, as the derivative of a
//! constant is zero.
//!
//! FFT derivatives assume the grid is periodic. Without padding, edge
//! discontinuities leak into the result near the borders; [`FftPadding`]
//! extends the grid by replicating its edge values before transforming and
//! crops the result afterwards. No padding is the default.

use ndarray::{Array2, Axis, Zip};
use rustfft::num_complex::Complex64;

use crate::coordinates::grid::RegularGrid;
use crate::{GravMagError, Result};

pub(crate) mod fft;

/// Padding applied before frequency-domain derivatives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FftPadding {
    /// Nodes of edge-replicated padding added on every side of the grid
    pub cells: usize,
}

impl FftPadding {
    /// Pad by `cells` nodes on every side
    pub fn new(cells: usize) -> Self {
        FftPadding { cells }
    }
}

/// How horizontal derivatives are computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DerivativeMethod {
    /// Central differences, one-sided on the edges
    #[default]
    FiniteDifference,
    /// Multiplication by `i k` in the frequency domain
    Fft(FftPadding),
}

fn check_order(order: u32) -> Result<()> {
    if order == 0 {
        return Err(GravMagError::InvalidArgument(
            "derivative order must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// First derivative along `axis` by finite differences
fn gradient(values: &Array2<f64>, axis: Axis, spacing: f64) -> Array2<f64> {
    let mut out = Array2::zeros(values.dim());
    Zip::from(out.lanes_mut(axis))
        .and(values.lanes(axis))
        .for_each(|mut o, v| {
            let n = v.len();
            o[0] = (v[1] - v[0]) / spacing;
            o[n - 1] = (v[n - 1] - v[n - 2]) / spacing;
            for i in 1..n - 1 {
                o[i] = (v[i + 1] - v[i - 1]) / (2.0 * spacing);
            }
        });
    out
}

fn horizontal_derivative(
    grid: &RegularGrid,
    axis: Axis,
    order: u32,
    method: DerivativeMethod,
) -> Result<Array2<f64>> {
    check_order(order)?;
    let spacing = if axis == Axis(1) {
        grid.spacing_easting()
    } else {
        grid.spacing_northing()
    };

    match method {
        DerivativeMethod::FiniteDifference => {
            let mut result = gradient(grid.values(), axis, spacing);
            for _ in 1..order {
                result = gradient(&result, axis, spacing);
            }
            Ok(result)
        }
        DerivativeMethod::Fft(padding) => Ok(fft::apply_filter(
            grid.values(),
            grid.spacing_easting(),
            grid.spacing_northing(),
            padding.cells,
            |k_east, k_north| {
                let k = if axis == Axis(1) { k_east } else { k_north };
                Complex64::new(0.0, k).powu(order)
            },
        )),
    }
}

/// Derivative of a gridded field along the easting direction
pub fn derivative_easting(grid: &RegularGrid, order: u32, method: DerivativeMethod) -> Result<Array2<f64>> {
    horizontal_derivative(grid, Axis(1), order, method)
}

/// Derivative of a gridded field along the northing direction
pub fn derivative_northing(grid: &RegularGrid, order: u32, method: DerivativeMethod) -> Result<Array2<f64>> {
    horizontal_derivative(grid, Axis(0), order, method)
}

/// Upward derivative of a gridded field, computed without padding
pub fn derivative_upward(grid: &RegularGrid, order: u32) -> Result<Array2<f64>> {
    derivative_upward_padded(grid, order, FftPadding::default())
}

/// Upward derivative of a gridded field with explicit FFT padding
pub fn derivative_upward_padded(grid: &RegularGrid, order: u32, padding: FftPadding) -> Result<Array2<f64>> {
    check_order(order)?;
    Ok(fft::apply_filter(
        grid.values(),
        grid.spacing_easting(),
        grid.spacing_northing(),
        padding.cells,
        |k_east, k_north| {
            let k = (k_east * k_east + k_north * k_north).sqrt();
            Complex64::new((-k).powi(order as i32), 0.0)
        },
    ))
}
