//! Gravitational fields of point masses
//!
//! Supported fields per coordinate system:
//!
//! | field | Cartesian | spherical | unit |
//! |---|---|---|---|
//! | `potential` | yes | yes | m²/s² |
//! | `g_z` | yes | yes | mGal |
//! | `g_northing`, `g_easting` | yes | no | mGal |
//! | `g_ee`, `g_nn`, `g_zz`, `g_en`, `g_ez`, `g_nz` | yes | no | Eötvös |
//!
//! `g_z` is the downward component of the acceleration, so a mass below the
//! observation point gives a positive value. The horizontal components are
//! the derivatives of the potential along easting and northing. Tensor
//! components are second derivatives of the potential, with `z` pointing
//! down in the mixed terms.

use log::warn;
use ndarray::ArrayD;
use std::fmt;
use std::str::FromStr;

use super::accumulate;
use crate::constants::{GRAVITATIONAL_CONST, SI_TO_EOTVOS, SI_TO_MGAL};
use crate::coordinates::distance::{spherical_geometry, SphericalPoint};
use crate::coordinates::{reshape, CoordinateSystem, Coordinates, PointSources};
use crate::{GravMagError, Result};

/// Gravitational field computed by [`point_gravity`]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GravityField {
    Potential,
    GZ,
    GNorthing,
    GEasting,
    GEE,
    GNN,
    GZZ,
    GEN,
    GEZ,
    GNZ,
}

impl GravityField {
    /// All fields, in declaration order
    pub const ALL: [GravityField; 10] = [
        GravityField::Potential,
        GravityField::GZ,
        GravityField::GNorthing,
        GravityField::GEasting,
        GravityField::GEE,
        GravityField::GNN,
        GravityField::GZZ,
        GravityField::GEN,
        GravityField::GEZ,
        GravityField::GNZ,
    ];

    /// Name used when parsing and displaying the field
    pub fn as_str(&self) -> &'static str {
        match self {
            GravityField::Potential => "potential",
            GravityField::GZ => "g_z",
            GravityField::GNorthing => "g_northing",
            GravityField::GEasting => "g_easting",
            GravityField::GEE => "g_ee",
            GravityField::GNN => "g_nn",
            GravityField::GZZ => "g_zz",
            GravityField::GEN => "g_en",
            GravityField::GEZ => "g_ez",
            GravityField::GNZ => "g_nz",
        }
    }

    /// Factor converting the SI value of the field to its output unit
    pub fn unit_factor(&self) -> f64 {
        match self {
            GravityField::Potential => 1.0,
            GravityField::GZ | GravityField::GNorthing | GravityField::GEasting => SI_TO_MGAL,
            GravityField::GEE
            | GravityField::GNN
            | GravityField::GZZ
            | GravityField::GEN
            | GravityField::GEZ
            | GravityField::GNZ => SI_TO_EOTVOS,
        }
    }
}

impl fmt::Display for GravityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GravityField {
    type Err = GravMagError;

    fn from_str(s: &str) -> Result<Self> {
        GravityField::ALL
            .iter()
            .find(|field| field.as_str() == s)
            .copied()
            .ok_or_else(|| GravMagError::InvalidArgument(format!("invalid gravity field '{}'", s)))
    }
}

/// Per unit mass kernel, without the gravitational constant or unit factor
enum GravityKernel {
    Cartesian(fn(&[f64; 3], &[f64; 3]) -> f64),
    Spherical(fn(&SphericalPoint, &SphericalPoint) -> f64),
}

/// Select the kernel of a (field, coordinate system) pair
fn gravity_kernel(field: GravityField, coordinate_system: CoordinateSystem) -> Result<GravityKernel> {
    use CoordinateSystem::{Cartesian, Spherical};
    use GravityField::*;

    let kernel = match (coordinate_system, field) {
        (Cartesian, Potential) => GravityKernel::Cartesian(kernel_potential_cartesian),
        (Cartesian, GZ) => GravityKernel::Cartesian(kernel_g_z_cartesian),
        (Cartesian, GNorthing) => GravityKernel::Cartesian(kernel_g_northing_cartesian),
        (Cartesian, GEasting) => GravityKernel::Cartesian(kernel_g_easting_cartesian),
        (Cartesian, GEE) => GravityKernel::Cartesian(kernel_g_ee_cartesian),
        (Cartesian, GNN) => GravityKernel::Cartesian(kernel_g_nn_cartesian),
        (Cartesian, GZZ) => GravityKernel::Cartesian(kernel_g_zz_cartesian),
        (Cartesian, GEN) => GravityKernel::Cartesian(kernel_g_en_cartesian),
        (Cartesian, GEZ) => GravityKernel::Cartesian(kernel_g_ez_cartesian),
        (Cartesian, GNZ) => GravityKernel::Cartesian(kernel_g_nz_cartesian),
        (Spherical, Potential) => GravityKernel::Spherical(kernel_potential_spherical),
        (Spherical, GZ) => GravityKernel::Spherical(kernel_g_z_spherical),
        (Spherical, GNorthing | GEasting | GEE | GNN | GZZ | GEN | GEZ | GNZ) => {
            return Err(GravMagError::NotImplemented(format!(
                "'{}' field is not implemented in spherical coordinates",
                field
            )))
        }
    };
    Ok(kernel)
}

/// Compute the gravitational field of a set of point masses
///
/// # Arguments
///
/// * `coordinates` - Observation points, in the order of the coordinate system
/// * `sources` - Point mass locations, in the same coordinate system
/// * `masses` - Mass of every source in kg
/// * `field` - Field to compute
/// * `coordinate_system` - Cartesian or geocentric spherical
/// * `parallel` - Split the sum over sources across the rayon pool
///
/// The result has the shape of `coordinates`. Accelerations are returned in
/// mGal, tensor components in Eötvös and the potential in SI units.
///
/// # Errors
///
/// * [`GravMagError::InvalidArgument`] when `masses` and `sources` differ in length
/// * [`GravMagError::NotImplemented`] for fields without a spherical kernel
pub fn point_gravity(
    coordinates: &Coordinates,
    sources: &PointSources,
    masses: &[f64],
    field: GravityField,
    coordinate_system: CoordinateSystem,
    parallel: bool,
) -> Result<ArrayD<f64>> {
    sources.check_weights(masses.len(), "masses")?;
    let kernel = gravity_kernel(field, coordinate_system)?;

    let n_obs = coordinates.len();
    let n_src = sources.len();
    let sums = match kernel {
        GravityKernel::Cartesian(f) => {
            let observations = coordinates.points();
            let points = sources.points();
            accumulate(
                n_obs,
                n_src,
                |i, j| masses[j] * f(&observations[i], &points[j]),
                parallel,
            )
        }
        GravityKernel::Spherical(f) => {
            let observations: Vec<SphericalPoint> = coordinates
                .iter_points()
                .map(SphericalPoint::from_triple)
                .collect();
            let points: Vec<SphericalPoint> = sources
                .points()
                .into_iter()
                .map(SphericalPoint::from_triple)
                .collect();
            accumulate(
                n_obs,
                n_src,
                |i, j| masses[j] * f(&observations[i], &points[j]),
                parallel,
            )
        }
    };

    let scale = GRAVITATIONAL_CONST * field.unit_factor();
    reshape(coordinates.shape(), sums.into_iter().map(|v| v * scale).collect())
}

/// Previous name of [`point_gravity`]
///
/// Logs a deprecation warning once per call and delegates to [`point_gravity`].
#[deprecated(since = "0.1.0", note = "use `point_gravity` instead")]
pub fn point_mass_gravity(
    coordinates: &Coordinates,
    sources: &PointSources,
    masses: &[f64],
    field: GravityField,
    coordinate_system: CoordinateSystem,
    parallel: bool,
) -> Result<ArrayD<f64>> {
    warn!(
        target: "gravmag::deprecation",
        "point_mass_gravity is deprecated and will be removed in a future release, use point_gravity instead"
    );
    point_gravity(
        coordinates,
        sources,
        masses,
        field,
        coordinate_system,
        parallel,
    )
}

/// Observation minus source differences and distance
#[inline]
fn differences(obs: &[f64; 3], src: &[f64; 3]) -> (f64, f64, f64, f64) {
    let de = obs[0] - src[0];
    let dn = obs[1] - src[1];
    let du = obs[2] - src[2];
    (de, dn, du, (de * de + dn * dn + du * du).sqrt())
}

fn kernel_potential_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (_, _, _, r) = differences(obs, src);
    1.0 / r
}

fn kernel_g_z_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (_, _, du, r) = differences(obs, src);
    du / (r * r * r)
}

fn kernel_g_northing_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (_, dn, _, r) = differences(obs, src);
    -dn / (r * r * r)
}

fn kernel_g_easting_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (de, _, _, r) = differences(obs, src);
    -de / (r * r * r)
}

fn kernel_g_ee_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (de, _, _, r) = differences(obs, src);
    let r2 = r * r;
    (3.0 * de * de - r2) / (r2 * r2 * r)
}

fn kernel_g_nn_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (_, dn, _, r) = differences(obs, src);
    let r2 = r * r;
    (3.0 * dn * dn - r2) / (r2 * r2 * r)
}

fn kernel_g_zz_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (_, _, du, r) = differences(obs, src);
    let r2 = r * r;
    (3.0 * du * du - r2) / (r2 * r2 * r)
}

fn kernel_g_en_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (de, dn, _, r) = differences(obs, src);
    3.0 * de * dn / r.powi(5)
}

fn kernel_g_ez_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (de, _, du, r) = differences(obs, src);
    -3.0 * de * du / r.powi(5)
}

fn kernel_g_nz_cartesian(obs: &[f64; 3], src: &[f64; 3]) -> f64 {
    let (_, dn, du, r) = differences(obs, src);
    -3.0 * dn * du / r.powi(5)
}

fn kernel_potential_spherical(obs: &SphericalPoint, src: &SphericalPoint) -> f64 {
    let (r, _) = spherical_geometry(obs, src);
    1.0 / r
}

/// Radial component: the source direction projected on the local vertical of
/// the observation point
fn kernel_g_z_spherical(obs: &SphericalPoint, src: &SphericalPoint) -> f64 {
    let (r, cospsi) = spherical_geometry(obs, src);
    (obs.radius - src.radius * cospsi) / (r * r * r)
}
