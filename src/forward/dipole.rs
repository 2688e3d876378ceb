//! Magnetic field of point dipoles
//!
//! For a dipole with moment `m` (A m²) and `r` the vector from the dipole to
//! the observation point, the field is
//!
//! ```text
//! B = mu_0 / (4 pi) * (3 (m . r) r / |r|^5 - m / |r|^3)
//! ```
//!
//! returned in nT as `(b_e, b_n, b_u)` components. Only Cartesian
//! coordinates are supported.

use nalgebra::Vector3;
use ndarray::ArrayD;
use std::fmt;
use std::str::FromStr;

use super::{accumulate, accumulate_with};
use crate::constants::{MAGNETIC_PREFACTOR, TESLA_TO_NT};
use crate::coordinates::{reshape, CoordinateSystem, Coordinates, PointSources};
use crate::magnetic::MagneticVector;
use crate::{GravMagError, Result};

/// Single component of the dipole magnetic field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagneticComponent {
    /// `b_e`
    Easting,
    /// `b_n`
    Northing,
    /// `b_u`
    Upward,
}

impl MagneticComponent {
    fn axis(&self) -> usize {
        match self {
            MagneticComponent::Easting => 0,
            MagneticComponent::Northing => 1,
            MagneticComponent::Upward => 2,
        }
    }

    /// Name used when parsing and displaying the component
    pub fn as_str(&self) -> &'static str {
        match self {
            MagneticComponent::Easting => "b_e",
            MagneticComponent::Northing => "b_n",
            MagneticComponent::Upward => "b_u",
        }
    }
}

impl fmt::Display for MagneticComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MagneticComponent {
    type Err = GravMagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "b_e" => Ok(MagneticComponent::Easting),
            "b_n" => Ok(MagneticComponent::Northing),
            "b_u" => Ok(MagneticComponent::Upward),
            other => Err(GravMagError::InvalidArgument(format!(
                "invalid magnetic field '{}', expected 'b_e', 'b_n' or 'b_u'",
                other
            ))),
        }
    }
}

/// Field of a unit-prefactor dipole `moment` at offset `r`, all components
#[inline]
fn dipole_kernel(r: &Vector3<f64>, moment: &Vector3<f64>) -> Vector3<f64> {
    let distance = r.norm();
    let r3 = distance * distance * distance;
    let r5 = r3 * distance * distance;
    r * (3.0 * moment.dot(r) / r5) - moment / r3
}

fn check_dipole_inputs(
    sources: &PointSources,
    moments: &[[f64; 3]],
    coordinate_system: CoordinateSystem,
) -> Result<()> {
    sources.check_weights(moments.len(), "magnetic moments")?;
    match coordinate_system {
        CoordinateSystem::Cartesian => Ok(()),
        CoordinateSystem::Spherical => Err(GravMagError::NotImplemented(
            "dipole magnetic fields are not implemented in spherical coordinates".to_string(),
        )),
    }
}

/// Field vector in nT at every observation point
fn field_sums(
    observations: &[Vector3<f64>],
    dipoles: &[Vector3<f64>],
    moments: &[Vector3<f64>],
    parallel: bool,
) -> Vec<Vector3<f64>> {
    let scale = MAGNETIC_PREFACTOR * TESLA_TO_NT;
    accumulate_with(
        observations.len(),
        dipoles.len(),
        Vector3::zeros(),
        |i, j| dipole_kernel(&(observations[i] - dipoles[j]), &moments[j]),
        parallel,
    )
    .into_iter()
    .map(|v| v * scale)
    .collect()
}

/// Single field component in nT at every observation point
fn component_sums(
    observations: &[Vector3<f64>],
    dipoles: &[Vector3<f64>],
    moments: &[Vector3<f64>],
    axis: usize,
    parallel: bool,
) -> Vec<f64> {
    let scale = MAGNETIC_PREFACTOR * TESLA_TO_NT;
    accumulate(
        observations.len(),
        dipoles.len(),
        |i, j| dipole_kernel(&(observations[i] - dipoles[j]), &moments[j])[axis],
        parallel,
    )
    .into_iter()
    .map(|v| v * scale)
    .collect()
}

fn to_vectors(points: impl Iterator<Item = [f64; 3]>) -> Vec<Vector3<f64>> {
    points.map(Vector3::from).collect()
}

/// Compute the three components of the magnetic field of a set of dipoles
///
/// `moments` holds the `(easting, northing, upward)` magnetic moment of each
/// dipole in A m². Results are in nT with the shape of `coordinates`.
pub fn dipole_magnetic(
    coordinates: &Coordinates,
    dipoles: &PointSources,
    moments: &[[f64; 3]],
    coordinate_system: CoordinateSystem,
    parallel: bool,
) -> Result<MagneticVector<ArrayD<f64>>> {
    check_dipole_inputs(dipoles, moments, coordinate_system)?;
    let observations = to_vectors(coordinates.iter_points());
    let sources = to_vectors(dipoles.points().into_iter());
    let moments = to_vectors(moments.iter().copied());

    let fields = field_sums(&observations, &sources, &moments, parallel);
    let shape = coordinates.shape();
    Ok(MagneticVector {
        easting: reshape(shape, fields.iter().map(|b| b.x).collect())?,
        northing: reshape(shape, fields.iter().map(|b| b.y).collect())?,
        upward: reshape(shape, fields.iter().map(|b| b.z).collect())?,
    })
}

/// Compute a single component of the magnetic field of a set of dipoles
pub fn dipole_magnetic_component(
    coordinates: &Coordinates,
    dipoles: &PointSources,
    moments: &[[f64; 3]],
    component: MagneticComponent,
    coordinate_system: CoordinateSystem,
    parallel: bool,
) -> Result<ArrayD<f64>> {
    check_dipole_inputs(dipoles, moments, coordinate_system)?;
    let observations = to_vectors(coordinates.iter_points());
    let sources = to_vectors(dipoles.points().into_iter());
    let moments = to_vectors(moments.iter().copied());

    reshape(
        coordinates.shape(),
        component_sums(&observations, &sources, &moments, component.axis(), parallel),
    )
}
