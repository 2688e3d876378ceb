//! Gravmag: point-source potential field modelling and Euler deconvolution
//!
//! This crate computes the gravitational and magnetic fields of point sources
//! (point masses and magnetic dipoles) in Cartesian and geocentric spherical
//! coordinates, the spatial derivatives of gridded potential fields, and
//! estimates source locations from those derivatives with Euler deconvolution.

use thiserror::Error;

pub mod constants;
pub mod coordinates;
pub mod derivatives;
pub mod euler;
pub mod forward;
pub mod magnetic;
pub mod synthetic;

// Re-export commonly used types
pub use coordinates::distance::{distance, distance_cartesian, distance_spherical};
pub use coordinates::grid::{grid_coordinates, scatter_points, Region, RegularGrid};
pub use coordinates::{CoordinateSystem, Coordinates, PointSources};
pub use derivatives::{
    derivative_easting, derivative_northing, derivative_upward, DerivativeMethod, FftPadding,
};
pub use euler::{EulerDeconvolution, EulerFit};
#[allow(deprecated)]
pub use forward::point::point_mass_gravity;
pub use forward::point::{point_gravity, GravityField};
pub use forward::dipole::{dipole_magnetic, dipole_magnetic_component, MagneticComponent};
pub use magnetic::{magnetic_angles_to_vec, magnetic_vec_to_angles, MagneticAngles, MagneticVector};

/// Main error type for the gravmag library
#[derive(Debug, Error)]
pub enum GravMagError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Underdetermined system: {usable} usable rows, at least {required} required")]
    Underdetermined {
        /// Rows left after discarding non-finite data
        usable: usize,
        /// Minimum number of rows for a unique solution
        required: usize,
    },

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for gravmag operations
pub type Result<T> = std::result::Result<T, GravMagError>;
