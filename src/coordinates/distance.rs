//! Distances between points in Cartesian and geocentric spherical coordinates
//!
//! The spherical helpers here are shared with the forward kernels so the
//! angle convention never drifts between distance and field computations.

use ndarray::ArrayD;

use super::{broadcast_shape, broadcast_to, reshape, CoordinateSystem, Coordinates};
use crate::constants::DEG2RAD;
use crate::Result;

/// A point in geocentric spherical coordinates with its latitude trigonometry
/// precomputed
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SphericalPoint {
    /// Longitude in radians
    pub longitude: f64,
    /// Cosine of the latitude
    pub cosphi: f64,
    /// Sine of the latitude
    pub sinphi: f64,
    /// Radius in meters
    pub radius: f64,
}

impl SphericalPoint {
    /// Build from longitude and latitude in degrees and radius in meters
    pub fn from_degrees(longitude: f64, latitude: f64, radius: f64) -> Self {
        let phi = latitude * DEG2RAD;
        SphericalPoint {
            longitude: longitude * DEG2RAD,
            cosphi: phi.cos(),
            sinphi: phi.sin(),
            radius,
        }
    }

    /// Build from a `[longitude, latitude, radius]` triple
    pub fn from_triple(point: [f64; 3]) -> Self {
        Self::from_degrees(point[0], point[1], point[2])
    }
}

/// Euclidean distance between two Cartesian points
#[inline]
pub(crate) fn cartesian_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let de = a[0] - b[0];
    let dn = a[1] - b[1];
    let du = a[2] - b[2];
    (de * de + dn * dn + du * du).sqrt()
}

/// Cosine of the angle between the position vectors of two spherical points
///
/// The value is clipped to [-1, 1] so rounding near coincident or antipodal
/// points never leaves the domain of `acos` or makes `1 - cos` negative.
#[inline]
pub(crate) fn cos_angle(a: &SphericalPoint, b: &SphericalPoint) -> f64 {
    let coslambda = (b.longitude - a.longitude).cos();
    (b.sinphi * a.sinphi + b.cosphi * a.cosphi * coslambda).clamp(-1.0, 1.0)
}

/// Distance between two spherical points together with the cosine of the
/// angle between their position vectors
///
/// Uses `(r - r')^2 + 2 r r' (1 - cos psi)` instead of the textbook law of
/// cosines, which loses all precision when the points are close.
#[inline]
pub(crate) fn spherical_geometry(a: &SphericalPoint, b: &SphericalPoint) -> (f64, f64) {
    let cospsi = cos_angle(a, b);
    let dr = a.radius - b.radius;
    let distance_sq = dr * dr + 2.0 * a.radius * b.radius * (1.0 - cospsi);
    (distance_sq.sqrt(), cospsi)
}

/// Apply `metric` element-wise to two coordinate triples broadcast against
/// each other
fn pairwise<F>(point_a: &Coordinates, point_b: &Coordinates, metric: F) -> Result<ArrayD<f64>>
where
    F: Fn([f64; 3], [f64; 3]) -> f64,
{
    let shape = broadcast_shape(&[point_a.shape(), point_b.shape()])?;
    let a = Coordinates {
        first: broadcast_to(point_a.first(), &shape)?,
        second: broadcast_to(point_a.second(), &shape)?,
        third: broadcast_to(point_a.third(), &shape)?,
    };
    let b = Coordinates {
        first: broadcast_to(point_b.first(), &shape)?,
        second: broadcast_to(point_b.second(), &shape)?,
        third: broadcast_to(point_b.third(), &shape)?,
    };
    let values = a
        .iter_points()
        .zip(b.iter_points())
        .map(|(p, q)| metric(p, q))
        .collect();
    reshape(&shape, values)
}

/// Euclidean distance between two sets of Cartesian points
///
/// Both triples are `(easting, northing, upward)` and are broadcast against
/// each other. Coincident points give a distance of zero.
pub fn distance_cartesian(point_a: &Coordinates, point_b: &Coordinates) -> Result<ArrayD<f64>> {
    pairwise(point_a, point_b, |p, q| cartesian_distance(&p, &q))
}

/// Distance between two sets of points in geocentric spherical coordinates
///
/// Both triples are `(longitude, latitude, radius)` with angles in degrees.
pub fn distance_spherical(point_a: &Coordinates, point_b: &Coordinates) -> Result<ArrayD<f64>> {
    pairwise(point_a, point_b, |p, q| {
        spherical_geometry(&SphericalPoint::from_triple(p), &SphericalPoint::from_triple(q)).0
    })
}

/// Distance between two sets of points in the given coordinate system
pub fn distance(
    point_a: &Coordinates,
    point_b: &Coordinates,
    coordinate_system: CoordinateSystem,
) -> Result<ArrayD<f64>> {
    match coordinate_system {
        CoordinateSystem::Cartesian => distance_cartesian(point_a, point_b),
        CoordinateSystem::Spherical => distance_spherical(point_a, point_b),
    }
}
