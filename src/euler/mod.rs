//! Euler deconvolution
//!
//! Estimates the location of a potential field source and the base level of
//! the data from Euler's homogeneity equation,
//!
//! ```text
//! (e - e0) df/de + (n - n0) df/dn + (u - u0) df/du = -SI (f - b)
//! ```
//!
//! where `SI` is the structural index of the source and `b` the base level.
//! Each observation contributes one row of an overdetermined linear system in
//! `(e0, n0, u0, b)` that is solved by least squares through the normal
//! equations.
//!
//! Rows holding a non-finite value in any input are discarded before solving.

use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use ndarray::{ArrayBase, Data, Dimension};
use serde::{Deserialize, Serialize};

use crate::coordinates::Coordinates;
use crate::{GravMagError, Result};

/// Number of unknowns: three location coordinates and the base level
const N_PARAMETERS: usize = 4;

/// Summary of a fitted Euler deconvolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerFit {
    /// Estimated `(easting, northing, upward)` of the source
    pub location: [f64; 3],
    /// Estimated base level of the field
    pub base_level: f64,
    /// Structural index used in the fit
    pub structural_index: f64,
    /// Observations used after discarding non-finite rows
    pub rows_used: usize,
}

/// Euler deconvolution estimator for a fixed structural index
///
/// The structural index describes how fast the field decays with distance
/// (0 for contacts, 1 for sheets and dikes, 2 for pipes and horizontal
/// cylinders, 3 for spheres and dipoles). It is a model assumption and is
/// not estimated.
///
/// ```rust,ignore
/// let mut euler = EulerDeconvolution::new(3.0);
/// euler.fit(&coordinates, &tfa, &d_east, &d_north, &d_up)?;
/// let [e0, n0, u0] = euler.location().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EulerDeconvolution {
    structural_index: f64,
    fit: Option<EulerFit>,
}

impl EulerDeconvolution {
    /// Creates an unfitted estimator
    pub fn new(structural_index: f64) -> Self {
        EulerDeconvolution {
            structural_index,
            fit: None,
        }
    }

    /// The structural index given at construction
    pub fn structural_index(&self) -> f64 {
        self.structural_index
    }

    /// Estimated source location, `None` before [`fit`](Self::fit)
    pub fn location(&self) -> Option<[f64; 3]> {
        self.fit.map(|f| f.location)
    }

    /// Estimated base level, `None` before [`fit`](Self::fit)
    pub fn base_level(&self) -> Option<f64> {
        self.fit.map(|f| f.base_level)
    }

    /// Full result of the last fit
    pub fn report(&self) -> Option<EulerFit> {
        self.fit
    }

    /// Estimate the source location and base level
    ///
    /// # Arguments
    ///
    /// * `coordinates` - Cartesian `(easting, northing, upward)` of the data
    /// * `field` - Field values at each data point
    /// * `east_deriv`, `north_deriv`, `up_deriv` - Derivatives of the field
    ///   along easting, northing and upward
    ///
    /// All arrays must have the shape of `coordinates`. A new fit replaces the
    /// previous estimate; a failed fit leaves the estimator unfitted.
    ///
    /// # Errors
    ///
    /// * [`GravMagError::InvalidArgument`] on shape mismatches
    /// * [`GravMagError::Underdetermined`] when fewer than 4 finite rows remain
    /// * [`GravMagError::CalculationError`] when the normal equations are singular
    pub fn fit<S1, S2, S3, S4, D1, D2, D3, D4>(
        &mut self,
        coordinates: &Coordinates,
        field: &ArrayBase<S1, D1>,
        east_deriv: &ArrayBase<S2, D2>,
        north_deriv: &ArrayBase<S3, D3>,
        up_deriv: &ArrayBase<S4, D4>,
    ) -> Result<&mut Self>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        S3: Data<Elem = f64>,
        S4: Data<Elem = f64>,
        D1: Dimension,
        D2: Dimension,
        D3: Dimension,
        D4: Dimension,
    {
        self.fit = None;

        for (name, shape) in [
            ("field", field.shape()),
            ("east_deriv", east_deriv.shape()),
            ("north_deriv", north_deriv.shape()),
            ("up_deriv", up_deriv.shape()),
        ] {
            if shape != coordinates.shape() {
                return Err(GravMagError::InvalidArgument(format!(
                    "{} has shape {:?} but coordinates have shape {:?}",
                    name,
                    shape,
                    coordinates.shape()
                )));
            }
        }

        let si = self.structural_index;
        let rows: Vec<([f64; N_PARAMETERS], f64)> = coordinates
            .iter_points()
            .zip(field.iter())
            .zip(east_deriv.iter())
            .zip(north_deriv.iter())
            .zip(up_deriv.iter())
            .map(|((((p, &f), &de), &dn), &du)| {
                let row = [de, dn, du, si];
                let rhs = p[0] * de + p[1] * dn + p[2] * du + si * f;
                (row, rhs)
            })
            .filter(|(row, rhs)| rhs.is_finite() && row.iter().all(|v| v.is_finite()))
            .collect();

        let discarded = coordinates.len() - rows.len();
        if discarded > 0 {
            debug!("discarded {} rows with non-finite values", discarded);
        }
        if rows.len() < N_PARAMETERS {
            return Err(GravMagError::Underdetermined {
                usable: rows.len(),
                required: N_PARAMETERS,
            });
        }

        let estimate = solve_least_squares(&rows)?;
        let fit = EulerFit {
            location: [estimate[0], estimate[1], estimate[2]],
            base_level: estimate[3],
            structural_index: si,
            rows_used: rows.len(),
        };
        info!(
            "Euler fit with SI={} over {} rows: location {:?}, base level {}",
            si, fit.rows_used, fit.location, fit.base_level
        );
        self.fit = Some(fit);
        Ok(self)
    }
}

/// Solve the least-squares system through the normal equations
fn solve_least_squares(rows: &[([f64; N_PARAMETERS], f64)]) -> Result<DVector<f64>> {
    let matrix = DMatrix::from_fn(rows.len(), N_PARAMETERS, |i, j| rows[i].0[j]);
    let data = DVector::from_iterator(rows.len(), rows.iter().map(|(_, rhs)| *rhs));

    let normal = matrix.tr_mul(&matrix);
    let rhs = matrix.tr_mul(&data);
    normal.lu().solve(&rhs).ok_or_else(|| {
        GravMagError::CalculationError("singular Euler normal equations".to_string())
    })
}
