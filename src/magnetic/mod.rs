//! Conversions between magnetic angles and Cartesian vectors
//!
//! Inclination is the dip below the horizontal plane (positive downward) and
//! declination the azimuth from geographic north (positive eastward). Vectors
//! are `(easting, northing, upward)`, so a positive inclination gives a
//! negative upward component.

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::constants::{DEG2RAD, RAD2DEG};
use crate::coordinates::{reshape, Coordinates};
use crate::Result;

/// Cartesian components of a magnetic vector (or of one array per component)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagneticVector<T> {
    pub easting: T,
    pub northing: T,
    pub upward: T,
}

impl MagneticVector<f64> {
    /// Components as an `[easting, northing, upward]` array
    pub fn to_array(&self) -> [f64; 3] {
        [self.easting, self.northing, self.upward]
    }
}

/// Intensity, inclination and declination (angles in degrees), or one array
/// per quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagneticAngles<T = f64> {
    pub intensity: T,
    pub inclination: T,
    pub declination: T,
}

/// Convert intensity, inclination and declination into Cartesian components
///
/// ```rust
/// use gravmag::magnetic_angles_to_vec;
///
/// let v = magnetic_angles_to_vec(2.0, 0.0, 0.0);
/// assert!(v.easting.abs() < 1e-15);
/// assert!((v.northing - 2.0).abs() < 1e-15);
/// ```
pub fn magnetic_angles_to_vec(intensity: f64, inclination: f64, declination: f64) -> MagneticVector<f64> {
    let inc = inclination * DEG2RAD;
    let dec = declination * DEG2RAD;
    MagneticVector {
        easting: intensity * inc.cos() * dec.sin(),
        northing: intensity * inc.cos() * dec.cos(),
        upward: -intensity * inc.sin(),
    }
}

/// Convert Cartesian components into intensity, inclination and declination
///
/// Declination is measured with `atan2(easting, northing)`, so any azimuth in
/// (-180, 180] is recovered. A zero vector gives zero for every angle.
pub fn magnetic_vec_to_angles(easting: f64, northing: f64, upward: f64) -> MagneticAngles {
    let intensity = (easting * easting + northing * northing + upward * upward).sqrt();
    let horizontal = (easting * easting + northing * northing).sqrt();
    MagneticAngles {
        intensity,
        inclination: (-upward).atan2(horizontal) * RAD2DEG,
        declination: easting.atan2(northing) * RAD2DEG,
    }
}

/// Element-wise [`magnetic_angles_to_vec`] over broadcast arrays
pub fn magnetic_angles_to_vec_array(
    intensity: ArrayD<f64>,
    inclination: ArrayD<f64>,
    declination: ArrayD<f64>,
) -> Result<MagneticVector<ArrayD<f64>>> {
    let triple = Coordinates::new(intensity, inclination, declination)?;
    let vectors: Vec<[f64; 3]> = triple
        .iter_points()
        .map(|[i, inc, dec]| magnetic_angles_to_vec(i, inc, dec).to_array())
        .collect();
    let [easting, northing, upward] = split_components(triple.shape(), vectors)?;
    Ok(MagneticVector {
        easting,
        northing,
        upward,
    })
}

/// Element-wise [`magnetic_vec_to_angles`] over broadcast arrays
pub fn magnetic_vec_to_angles_array(
    easting: ArrayD<f64>,
    northing: ArrayD<f64>,
    upward: ArrayD<f64>,
) -> Result<MagneticAngles<ArrayD<f64>>> {
    let triple = Coordinates::new(easting, northing, upward)?;
    let angles: Vec<[f64; 3]> = triple
        .iter_points()
        .map(|[e, n, u]| {
            let a = magnetic_vec_to_angles(e, n, u);
            [a.intensity, a.inclination, a.declination]
        })
        .collect();
    let [intensity, inclination, declination] = split_components(triple.shape(), angles)?;
    Ok(MagneticAngles {
        intensity,
        inclination,
        declination,
    })
}

/// Lay out the three columns of `values` as arrays of `shape`
fn split_components(shape: &[usize], values: Vec<[f64; 3]>) -> Result<[ArrayD<f64>; 3]> {
    Ok([
        reshape(shape, values.iter().map(|v| v[0]).collect())?,
        reshape(shape, values.iter().map(|v| v[1]).collect())?,
        reshape(shape, values.iter().map(|v| v[2]).collect())?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr0, array};
    use rstest::rstest;

    #[test]
    fn test_horizontal_north() {
        let v = magnetic_angles_to_vec(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(v.easting, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v.northing, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v.upward, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_vertical_down() {
        let v = magnetic_angles_to_vec(3.0, 90.0, 45.0);
        assert_abs_diff_eq!(v.easting, 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(v.northing, 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(v.upward, -3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_east_declination() {
        let v = magnetic_angles_to_vec(1.0, 0.0, 90.0);
        assert_abs_diff_eq!(v.easting, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v.northing, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_known_vector() {
        // inc = 45, dec = 45
        let v = magnetic_angles_to_vec(2.0, 45.0, 45.0);
        assert_abs_diff_eq!(v.easting, 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(v.northing, 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(v.upward, -(2.0_f64.sqrt()), epsilon = 1e-14);
    }

    #[rstest]
    #[case(1.0, 0.0, 0.0)]
    #[case(50_000.0, -40.0, 15.0)]
    #[case(3.5, 65.0, -120.0)]
    #[case(1e14, 89.0, 170.0)]
    fn test_inverse_conversion(#[case] intensity: f64, #[case] inc: f64, #[case] dec: f64) {
        let v = magnetic_angles_to_vec(intensity, inc, dec);
        let angles = magnetic_vec_to_angles(v.easting, v.northing, v.upward);
        assert_abs_diff_eq!(angles.intensity, intensity, epsilon = 1e-12 * intensity);
        assert_abs_diff_eq!(angles.inclination, inc, epsilon = 1e-10);
        assert_abs_diff_eq!(angles.declination, dec, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_intensity() {
        let angles = magnetic_vec_to_angles(0.0, 0.0, 0.0);
        assert_eq!(angles.intensity, 0.0);
        assert_eq!(angles.inclination, 0.0);
        assert_eq!(angles.declination, 0.0);
    }

    #[test]
    fn test_array_conversion_broadcasts() {
        let intensity = arr0(1.0).into_dyn();
        let inclination = array![0.0, 90.0].into_dyn();
        let declination = arr0(0.0).into_dyn();
        let v = magnetic_angles_to_vec_array(intensity, inclination, declination).unwrap();

        assert_eq!(v.northing.shape(), &[2]);
        assert_abs_diff_eq!(v.northing[[0]], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v.upward[[1]], -1.0, epsilon = 1e-15);

        let back = magnetic_vec_to_angles_array(v.easting, v.northing, v.upward).unwrap();
        assert_eq!(back.inclination.shape(), &[2]);
        assert_abs_diff_eq!(back.intensity[[0]], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(back.intensity[[1]], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(back.inclination[[0]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(back.inclination[[1]], 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(back.declination[[0]], 0.0, epsilon = 1e-12);
    }
}
