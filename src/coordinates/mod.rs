//! Coordinate triples and point source sets
//!
//! Observation points are described by a [`Coordinates`] triple of arrays that
//! share one shape after broadcasting. The meaning of each axis depends on the
//! [`CoordinateSystem`]:
//!
//! - **Cartesian**: easting, northing, upward (meters)
//! - **Spherical**: longitude (degrees), spherical latitude (degrees), radius (meters)
//!
//! Sources are stored flat in a [`PointSources`] set, since kernels iterate
//! over them one at a time.

use ndarray::{arr0, Array1, ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{GravMagError, Result};

pub mod distance;
pub mod grid;

/// Coordinate system of a coordinate triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    /// Easting, northing, upward in meters
    Cartesian,
    /// Longitude and latitude in degrees, radius in meters
    Spherical,
}

impl CoordinateSystem {
    /// Name used when parsing and displaying the coordinate system
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSystem::Cartesian => "cartesian",
            CoordinateSystem::Spherical => "spherical",
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateSystem {
    type Err = GravMagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cartesian" => Ok(CoordinateSystem::Cartesian),
            "spherical" => Ok(CoordinateSystem::Spherical),
            other => Err(GravMagError::InvalidArgument(format!(
                "invalid coordinate system '{}', expected 'cartesian' or 'spherical'",
                other
            ))),
        }
    }
}

/// Compute the shape that all `shapes` broadcast to, following the usual
/// trailing-axis rules.
pub(crate) fn broadcast_shape(shapes: &[&[usize]]) -> Result<Vec<usize>> {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1; ndim];

    for shape in shapes {
        let offset = ndim - shape.len();
        for (axis, &len) in shape.iter().enumerate() {
            let target = &mut out[offset + axis];
            if *target == 1 {
                *target = len;
            } else if len != 1 && len != *target {
                return Err(GravMagError::InvalidArgument(format!(
                    "arrays with shapes {:?} cannot be broadcast together",
                    shapes
                )));
            }
        }
    }

    Ok(out)
}

/// Broadcast `array` to `shape` and return an owned copy
pub(crate) fn broadcast_to(array: &ArrayD<f64>, shape: &[usize]) -> Result<ArrayD<f64>> {
    array
        .broadcast(IxDyn(shape))
        .map(|view| view.to_owned())
        .ok_or_else(|| {
            GravMagError::InvalidArgument(format!(
                "array with shape {:?} cannot be broadcast to {:?}",
                array.shape(),
                shape
            ))
        })
}

/// Lay out flat `values` (in logical iteration order) with the given shape
pub(crate) fn reshape(shape: &[usize], values: Vec<f64>) -> Result<ArrayD<f64>> {
    ArrayD::from_shape_vec(IxDyn(shape), values)
        .map_err(|e| GravMagError::CalculationError(e.to_string()))
}

/// Triple of coordinate arrays sharing a common shape
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    first: ArrayD<f64>,
    second: ArrayD<f64>,
    third: ArrayD<f64>,
}

impl Coordinates {
    /// Creates a coordinate triple, broadcasting the three arrays to a common shape
    ///
    /// Fails with [`GravMagError::InvalidArgument`] when the shapes are not
    /// broadcast compatible.
    pub fn new(first: ArrayD<f64>, second: ArrayD<f64>, third: ArrayD<f64>) -> Result<Self> {
        let shape = broadcast_shape(&[first.shape(), second.shape(), third.shape()])?;
        Ok(Coordinates {
            first: broadcast_to(&first, &shape)?,
            second: broadcast_to(&second, &shape)?,
            third: broadcast_to(&third, &shape)?,
        })
    }

    /// Creates a coordinate triple from three 1-D vectors
    ///
    /// Vectors of length one are broadcast against the others.
    pub fn from_vecs(first: Vec<f64>, second: Vec<f64>, third: Vec<f64>) -> Result<Self> {
        Self::new(
            Array1::from(first).into_dyn(),
            Array1::from(second).into_dyn(),
            Array1::from(third).into_dyn(),
        )
    }

    /// Creates a zero-dimensional coordinate triple holding a single point
    pub fn point(first: f64, second: f64, third: f64) -> Self {
        Coordinates {
            first: arr0(first).into_dyn(),
            second: arr0(second).into_dyn(),
            third: arr0(third).into_dyn(),
        }
    }

    /// First axis (easting or longitude)
    pub fn first(&self) -> &ArrayD<f64> {
        &self.first
    }

    /// Second axis (northing or latitude)
    pub fn second(&self) -> &ArrayD<f64> {
        &self.second
    }

    /// Third axis (upward or radius)
    pub fn third(&self) -> &ArrayD<f64> {
        &self.third
    }

    /// Common shape of the three arrays
    pub fn shape(&self) -> &[usize] {
        self.first.shape()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// True when the triple holds no points
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Iterate over the points in logical (row-major) order
    pub fn iter_points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.first
            .iter()
            .zip(self.second.iter())
            .zip(self.third.iter())
            .map(|((a, b), c)| [*a, *b, *c])
    }

    /// Collect the points in logical (row-major) order
    pub fn points(&self) -> Vec<[f64; 3]> {
        self.iter_points().collect()
    }
}

/// Ordered set of point sources (point masses or dipoles)
///
/// The three coordinate vectors always have the same non-zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSources {
    first: Vec<f64>,
    second: Vec<f64>,
    third: Vec<f64>,
}

impl PointSources {
    /// Creates a source set from three coordinate vectors of equal length
    pub fn new(first: Vec<f64>, second: Vec<f64>, third: Vec<f64>) -> Result<Self> {
        if first.len() != second.len() || first.len() != third.len() {
            return Err(GravMagError::InvalidArgument(format!(
                "source coordinates have different lengths ({}, {}, {})",
                first.len(),
                second.len(),
                third.len()
            )));
        }
        if first.is_empty() {
            return Err(GravMagError::InvalidArgument(
                "at least one source is required".to_string(),
            ));
        }
        Ok(PointSources {
            first,
            second,
            third,
        })
    }

    /// Creates a set holding a single source
    pub fn single(first: f64, second: f64, third: f64) -> Self {
        PointSources {
            first: vec![first],
            second: vec![second],
            third: vec![third],
        }
    }

    /// Flattens a coordinate triple into a source set
    pub fn from_coordinates(coordinates: &Coordinates) -> Result<Self> {
        Self::new(
            coordinates.first().iter().copied().collect(),
            coordinates.second().iter().copied().collect(),
            coordinates.third().iter().copied().collect(),
        )
    }

    /// Number of sources
    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// Always false; a source set holds at least one source
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Coordinates of the source at `index`
    pub fn point(&self, index: usize) -> [f64; 3] {
        [self.first[index], self.second[index], self.third[index]]
    }

    /// Collect all source coordinates
    pub fn points(&self) -> Vec<[f64; 3]> {
        (0..self.len()).map(|i| self.point(i)).collect()
    }

    /// Check that a per-source weight array has one entry per source
    pub(crate) fn check_weights(&self, weights: usize, name: &str) -> Result<()> {
        if weights != self.len() {
            return Err(GravMagError::InvalidArgument(format!(
                "number of elements in {} ({}) mismatch the number of sources ({})",
                name,
                weights,
                self.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_coordinate_system_parsing() {
        assert_eq!(
            "cartesian".parse::<CoordinateSystem>().unwrap(),
            CoordinateSystem::Cartesian
        );
        assert_eq!(
            "spherical".parse::<CoordinateSystem>().unwrap(),
            CoordinateSystem::Spherical
        );
        let err = "this-is-not-a-valid-coordinate-system".parse::<CoordinateSystem>();
        assert!(matches!(err, Err(GravMagError::InvalidArgument(_))));
        assert_eq!(CoordinateSystem::Spherical.to_string(), "spherical");
    }

    #[test]
    fn test_broadcast_shape_rules() {
        assert_eq!(broadcast_shape(&[&[3], &[], &[1]]).unwrap(), vec![3]);
        assert_eq!(broadcast_shape(&[&[2, 3], &[3], &[2, 1]]).unwrap(), vec![2, 3]);
        assert!(broadcast_shape(&[&[2], &[3]]).is_err());
    }

    #[test]
    fn test_coordinates_broadcast() {
        let easting = array![0.0, 1.0, 2.0].into_dyn();
        let northing = array![5.0].into_dyn();
        let upward = arr0(-1.0).into_dyn();
        let coords = Coordinates::new(easting, northing, upward).unwrap();

        assert_eq!(coords.shape(), &[3]);
        assert_eq!(coords.len(), 3);
        assert_eq!(
            coords.points(),
            vec![[0.0, 5.0, -1.0], [1.0, 5.0, -1.0], [2.0, 5.0, -1.0]]
        );
    }

    #[test]
    fn test_coordinates_two_dimensional() {
        let easting = Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 0.0, 1.0])
            .unwrap()
            .into_dyn();
        let northing = array![[10.0], [20.0]].into_dyn();
        let coords = Coordinates::new(easting, northing, arr0(0.0).into_dyn()).unwrap();

        assert_eq!(coords.shape(), &[2, 2]);
        assert_eq!(coords.points()[2], [0.0, 20.0, 0.0]);
    }

    #[test]
    fn test_coordinates_incompatible_shapes() {
        let result = Coordinates::from_vecs(vec![0.0, 1.0], vec![0.0, 1.0, 2.0], vec![0.0]);
        assert!(matches!(result, Err(GravMagError::InvalidArgument(_))));
    }

    #[test]
    fn test_single_point() {
        let coords = Coordinates::point(1.0, 2.0, 3.0);
        assert!(coords.shape().is_empty());
        assert_eq!(coords.len(), 1);
        assert_eq!(coords.points(), vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_point_sources_validation() {
        assert!(PointSources::new(vec![0.0, 1.0], vec![0.0], vec![0.0, 1.0]).is_err());
        assert!(PointSources::new(vec![], vec![], vec![]).is_err());

        let sources = PointSources::new(vec![0.0, 1.0], vec![2.0, 3.0], vec![4.0, 5.0]).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources.point(1), [1.0, 3.0, 5.0]);
        assert!(sources.check_weights(2, "masses").is_ok());
        assert!(matches!(
            sources.check_weights(3, "masses"),
            Err(GravMagError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_point_sources_from_coordinates() {
        let coords = Coordinates::from_vecs(vec![1.0, 2.0], vec![3.0], vec![4.0]).unwrap();
        let sources = PointSources::from_coordinates(&coords).unwrap();
        assert_eq!(sources.points(), vec![[1.0, 3.0, 4.0], [2.0, 3.0, 4.0]]);
    }
}
