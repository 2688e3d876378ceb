//! Two-dimensional FFT filtering of gridded fields
//!
//! Grids are transformed with a row pass followed by a column pass. Filters
//! are functions of the angular wavenumbers `(k_easting, k_northing)` in
//! rad/m, laid out in the standard FFT order.

use log::debug;
use ndarray::{Array2, Axis};
use rustfft::{num_complex::Complex64, FftPlanner};

/// Angular wavenumbers of an FFT of `n` samples taken `spacing` apart
pub(crate) fn wavenumbers(n: usize, spacing: f64) -> Vec<f64> {
    let scale = 2.0 * std::f64::consts::PI / (n as f64 * spacing);
    (0..n)
        .map(|i| {
            let index = if i < (n + 1) / 2 {
                i as f64
            } else {
                i as f64 - n as f64
            };
            index * scale
        })
        .collect()
}

/// In-place 2-D FFT; the inverse transform is normalized by the grid size
pub(crate) fn fft2(data: &mut Array2<Complex64>, inverse: bool) {
    let (rows, cols) = data.dim();
    let mut planner = FftPlanner::new();
    let mut buffer: Vec<Complex64> = Vec::with_capacity(rows.max(cols));

    for (axis, len) in [(Axis(1), cols), (Axis(0), rows)] {
        let fft = if inverse {
            planner.plan_fft_inverse(len)
        } else {
            planner.plan_fft_forward(len)
        };
        for mut lane in data.lanes_mut(axis) {
            buffer.clear();
            buffer.extend(lane.iter().copied());
            fft.process(&mut buffer);
            for (dst, src) in lane.iter_mut().zip(buffer.iter()) {
                *dst = *src;
            }
        }
    }

    if inverse {
        let norm = 1.0 / (rows * cols) as f64;
        data.mapv_inplace(|v| v * norm);
    }
}

/// Replicate the edge values of `values` outward by `cells` on every side
fn pad_edges(values: &Array2<f64>, cells: usize) -> Array2<f64> {
    let (rows, cols) = values.dim();
    Array2::from_shape_fn((rows + 2 * cells, cols + 2 * cells), |(i, j)| {
        let r = i.saturating_sub(cells).min(rows - 1);
        let c = j.saturating_sub(cells).min(cols - 1);
        values[[r, c]]
    })
}

/// Multiply the spectrum of `values` by `filter` and return the real part of
/// the inverse transform, cropped back to the input shape
pub(crate) fn apply_filter<F>(
    values: &Array2<f64>,
    spacing_easting: f64,
    spacing_northing: f64,
    padding: usize,
    filter: F,
) -> Array2<f64>
where
    F: Fn(f64, f64) -> Complex64,
{
    let (rows, cols) = values.dim();
    let padded = if padding > 0 {
        debug!("padding {}x{} grid by {} cells", rows, cols, padding);
        pad_edges(values, padding)
    } else {
        values.clone()
    };

    let (prows, pcols) = padded.dim();
    let mut spectrum = padded.mapv(|v| Complex64::new(v, 0.0));
    fft2(&mut spectrum, false);

    let k_east = wavenumbers(pcols, spacing_easting);
    let k_north = wavenumbers(prows, spacing_northing);
    for ((i, j), value) in spectrum.indexed_iter_mut() {
        *value *= filter(k_east[j], k_north[i]);
    }

    fft2(&mut spectrum, true);
    Array2::from_shape_fn((rows, cols), |(i, j)| spectrum[[i + padding, j + padding]].re)
}
