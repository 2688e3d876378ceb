//! Regular grids and scattered points
//!
//! Helpers for building observation layouts: a [`Region`] bounding box,
//! gridded coordinates, seeded random scatter, and the [`RegularGrid`] used
//! by the derivative operators.

use ndarray::{Array1, Array2, Axis};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::{Coordinates, PointSources};
use crate::{GravMagError, Result};

/// Relative tolerance used when checking that grid axes are evenly spaced
const SPACING_TOLERANCE: f64 = 1e-6;

/// Horizontal bounding box `[west, east, south, north]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Region {
    /// Creates a region after checking that its bounds are ordered and finite
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Result<Self> {
        let region = Region {
            west,
            east,
            south,
            north,
        };
        region.validate()?;
        Ok(region)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let bounds = [self.west, self.east, self.south, self.north];
        if bounds.iter().any(|b| !b.is_finite()) || self.west >= self.east || self.south >= self.north
        {
            return Err(GravMagError::InvalidArgument(format!(
                "invalid region {:?}: bounds must be finite with west < east and south < north",
                bounds
            )));
        }
        Ok(())
    }
}

/// Evenly spaced values between `start` and `stop` (both included) with a
/// step as close as possible to `spacing`
fn axis_values(start: f64, stop: f64, spacing: f64) -> Array1<f64> {
    let size = ((stop - start) / spacing).round() as usize + 1;
    Array1::linspace(start, stop, size.max(2))
}

/// Build regular grid coordinates over `region`
///
/// Returns 2-D arrays of shape `(n_northing, n_easting)` with a constant third
/// coordinate `upward`. The spacing is adjusted so the grid fits the region
/// exactly.
pub fn grid_coordinates(region: &Region, spacing: f64, upward: f64) -> Result<Coordinates> {
    region.validate()?;
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(GravMagError::InvalidArgument(format!(
            "grid spacing must be positive and finite, got {}",
            spacing
        )));
    }

    let easting = axis_values(region.west, region.east, spacing);
    let northing = axis_values(region.south, region.north, spacing);
    let shape = (northing.len(), easting.len());

    let east_grid = Array2::from_shape_fn(shape, |(_, j)| easting[j]);
    let north_grid = Array2::from_shape_fn(shape, |(i, _)| northing[i]);
    let up_grid = Array2::from_elem(shape, upward);

    Coordinates::new(
        east_grid.into_dyn(),
        north_grid.into_dyn(),
        up_grid.into_dyn(),
    )
}

/// Draw `size` points uniformly inside `region` at a constant `upward`
/// coordinate, reproducibly from `seed`
pub fn scatter_points(region: &Region, size: usize, upward: f64, seed: u64) -> Result<PointSources> {
    region.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let east_dist = Uniform::new(region.west, region.east);
    let north_dist = Uniform::new(region.south, region.north);

    let easting: Vec<f64> = (0..size).map(|_| east_dist.sample(&mut rng)).collect();
    let northing: Vec<f64> = (0..size).map(|_| north_dist.sample(&mut rng)).collect();

    PointSources::new(easting, northing, vec![upward; size])
}

/// A scalar field sampled on a regular 2-D grid
///
/// Rows follow the northing axis and columns the easting axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularGrid {
    easting: Array1<f64>,
    northing: Array1<f64>,
    values: Array2<f64>,
}

impl RegularGrid {
    /// Creates a grid after checking that the axes are evenly spaced, strictly
    /// increasing, have at least two nodes, and match the value shape
    pub fn new(easting: Array1<f64>, northing: Array1<f64>, values: Array2<f64>) -> Result<Self> {
        check_axis(&easting, "easting")?;
        check_axis(&northing, "northing")?;
        if values.dim() != (northing.len(), easting.len()) {
            return Err(GravMagError::InvalidArgument(format!(
                "grid values have shape {:?}, expected ({}, {})",
                values.shape(),
                northing.len(),
                easting.len()
            )));
        }
        Ok(RegularGrid {
            easting,
            northing,
            values,
        })
    }

    /// Build a grid from gridded coordinates (as returned by
    /// [`grid_coordinates`]) and matching values
    pub fn from_coordinates(coordinates: &Coordinates, values: Array2<f64>) -> Result<Self> {
        if coordinates.shape().len() != 2 {
            return Err(GravMagError::InvalidArgument(format!(
                "gridded coordinates must be 2-D, got shape {:?}",
                coordinates.shape()
            )));
        }
        let easting: Array1<f64> = coordinates
            .first()
            .index_axis(Axis(0), 0)
            .to_owned()
            .into_dimensionality()
            .map_err(|e| GravMagError::InvalidArgument(e.to_string()))?;
        let northing: Array1<f64> = coordinates
            .second()
            .index_axis(Axis(1), 0)
            .to_owned()
            .into_dimensionality()
            .map_err(|e| GravMagError::InvalidArgument(e.to_string()))?;
        Self::new(easting, northing, values)
    }

    /// Easting coordinates of the grid columns
    pub fn easting(&self) -> &Array1<f64> {
        &self.easting
    }

    /// Northing coordinates of the grid rows
    pub fn northing(&self) -> &Array1<f64> {
        &self.northing
    }

    /// Grid values, shape `(n_northing, n_easting)`
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Grid shape `(n_northing, n_easting)`
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Node spacing along the easting axis
    pub fn spacing_easting(&self) -> f64 {
        self.easting[1] - self.easting[0]
    }

    /// Node spacing along the northing axis
    pub fn spacing_northing(&self) -> f64 {
        self.northing[1] - self.northing[0]
    }

    /// Same grid geometry carrying different values
    pub fn with_values(&self, values: Array2<f64>) -> Result<Self> {
        Self::new(self.easting.clone(), self.northing.clone(), values)
    }

    /// Coordinates of every node at a constant upward coordinate
    pub fn coordinates(&self, upward: f64) -> Result<Coordinates> {
        let shape = self.dim();
        let east_grid = Array2::from_shape_fn(shape, |(_, j)| self.easting[j]);
        let north_grid = Array2::from_shape_fn(shape, |(i, _)| self.northing[i]);
        Coordinates::new(
            east_grid.into_dyn(),
            north_grid.into_dyn(),
            Array2::from_elem(shape, upward).into_dyn(),
        )
    }
}

fn check_axis(axis: &Array1<f64>, name: &str) -> Result<()> {
    if axis.len() < 2 {
        return Err(GravMagError::InvalidArgument(format!(
            "{} axis needs at least two nodes, got {}",
            name,
            axis.len()
        )));
    }
    let spacing = axis[1] - axis[0];
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(GravMagError::InvalidArgument(format!(
            "{} axis must be strictly increasing",
            name
        )));
    }
    for (a, b) in axis.iter().zip(axis.iter().skip(1)) {
        let step = b - a;
        if (step - spacing).abs() > SPACING_TOLERANCE * spacing {
            return Err(GravMagError::InvalidArgument(format!(
                "{} axis is not evenly spaced ({} vs {})",
                name, step, spacing
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_region_validation() {
        assert!(Region::new(0.0, 1.0, 0.0, 1.0).is_ok());
        assert!(Region::new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(Region::new(0.0, 1.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_grid_coordinates_shape() {
        let region = Region::new(-100e3, 100e3, -80e3, 80e3).unwrap();
        let coords = grid_coordinates(&region, 500.0, 500.0).unwrap();
        assert_eq!(coords.shape(), &[321, 401]);
        assert_eq!(coords.first()[[0, 0]], -100e3);
        assert_eq!(coords.first()[[0, 400]], 100e3);
        assert_eq!(coords.second()[[320, 0]], 80e3);
        assert!(coords.third().iter().all(|&u| u == 500.0));
    }

    #[test]
    fn test_grid_coordinates_invalid_spacing() {
        let region = Region::new(0.0, 10.0, 0.0, 10.0).unwrap();
        assert!(grid_coordinates(&region, 0.0, 0.0).is_err());
        assert!(grid_coordinates(&region, -1.0, 0.0).is_err());
    }

    #[test]
    fn test_scatter_points_reproducible() {
        let region = Region::new(2e3, 10e3, -3e3, 5e3).unwrap();
        let a = scatter_points(&region, 30, -1e3, 0).unwrap();
        let b = scatter_points(&region, 30, -1e3, 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 30);
        for [e, n, u] in a.points() {
            assert!((2e3..10e3).contains(&e));
            assert!((-3e3..5e3).contains(&n));
            assert_eq!(u, -1e3);
        }
    }

    #[test]
    fn test_regular_grid_roundtrip_coordinates() {
        let region = Region::new(0.0, 40.0, 10.0, 30.0).unwrap();
        let coords = grid_coordinates(&region, 10.0, 7.0).unwrap();
        let values = Array2::zeros((3, 5));
        let grid = RegularGrid::from_coordinates(&coords, values).unwrap();

        assert_eq!(grid.dim(), (3, 5));
        assert_relative_eq!(grid.spacing_easting(), 10.0);
        assert_relative_eq!(grid.spacing_northing(), 10.0);
        assert_eq!(grid.coordinates(7.0).unwrap(), coords);
    }

    #[test]
    fn test_regular_grid_rejects_irregular_axes() {
        let values = Array2::zeros((2, 3));
        let result = RegularGrid::new(array![0.0, 1.0, 3.0], array![0.0, 1.0], values.clone());
        assert!(matches!(result, Err(GravMagError::InvalidArgument(_))));

        let result = RegularGrid::new(array![0.0, 1.0], array![0.0, 1.0], values);
        assert!(matches!(result, Err(GravMagError::InvalidArgument(_))));
    }
}
