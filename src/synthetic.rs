//! Synthetic magnetic survey over a single dipole
//!
//! Builds the total field anomaly of a dipole on a regular grid, adds a
//! constant base level, and computes the three derivatives needed by Euler
//! deconvolution. Used by the `euler_synthetic` tool and the tests.

use ndarray::{Array2, Ix2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::coordinates::grid::{grid_coordinates, Region, RegularGrid};
use crate::coordinates::{CoordinateSystem, Coordinates, PointSources};
use crate::derivatives::{derivative_easting, derivative_northing, derivative_upward, DerivativeMethod};
use crate::euler::{EulerDeconvolution, EulerFit};
use crate::forward::dipole::dipole_magnetic;
use crate::magnetic::{magnetic_angles_to_vec, MagneticAngles};
use crate::{GravMagError, Result};

/// Direction of the regional (inducing) field in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionalField {
    pub inclination: f64,
    pub declination: f64,
}

/// Configuration of a synthetic dipole survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticSurveyConfig {
    /// Survey area
    pub region: Region,
    /// Grid spacing in meters
    pub spacing: f64,
    /// Upward coordinate of the observations in meters
    pub height: f64,
    /// Dipole `(easting, northing, upward)` in meters
    pub dipole: [f64; 3],
    /// Dipole moment as intensity (A m²), inclination and declination
    pub moment: MagneticAngles,
    /// Direction of the regional field used to project the total field anomaly
    pub regional_field: RegionalField,
    /// Constant added to the anomaly
    pub base_level: f64,
    /// Use the parallel forward kernel
    pub parallel: bool,
}

impl Default for SyntheticSurveyConfig {
    fn default() -> Self {
        Self {
            region: Region {
                west: -100e3,
                east: 100e3,
                south: -80e3,
                north: 80e3,
            },
            spacing: 500.0,
            height: 500.0,
            dipole: [10e3, 15e3, -10e3],
            moment: MagneticAngles {
                intensity: 1.0e14,
                inclination: 0.0,
                declination: 0.0,
            },
            regional_field: RegionalField {
                inclination: -40.0,
                declination: 15.0,
            },
            base_level: 200.0,
            parallel: true,
        }
    }
}

impl SyntheticSurveyConfig {
    /// Load a configuration from a JSON file; missing keys take default values
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&text).map_err(|e| {
            GravMagError::ConfigError(format!("{}: {}", path.as_ref().display(), e))
        })
    }
}

/// Gridded total field anomaly and its derivatives
#[derive(Debug, Clone)]
pub struct SyntheticSurvey {
    /// Observation points, shape `(n_northing, n_easting)`
    pub coordinates: Coordinates,
    /// Total field anomaly plus base level, in nT
    pub tfa: RegularGrid,
    pub d_east: Array2<f64>,
    pub d_north: Array2<f64>,
    pub d_up: Array2<f64>,
}

impl SyntheticSurvey {
    /// Generate the survey described by `config`
    pub fn generate(config: &SyntheticSurveyConfig) -> Result<Self> {
        let coordinates = grid_coordinates(&config.region, config.spacing, config.height)?;
        let [e0, n0, u0] = config.dipole;
        let dipoles = PointSources::single(e0, n0, u0);
        let moment = magnetic_angles_to_vec(
            config.moment.intensity,
            config.moment.inclination,
            config.moment.declination,
        );

        let b = dipole_magnetic(
            &coordinates,
            &dipoles,
            &[moment.to_array()],
            CoordinateSystem::Cartesian,
            config.parallel,
        )?;

        let direction = magnetic_angles_to_vec(
            1.0,
            config.regional_field.inclination,
            config.regional_field.declination,
        );
        let mut anomaly = &b.easting * direction.easting;
        anomaly.scaled_add(direction.northing, &b.northing);
        anomaly.scaled_add(direction.upward, &b.upward);
        anomaly += config.base_level;

        let anomaly = anomaly
            .into_dimensionality::<Ix2>()
            .map_err(|e| GravMagError::CalculationError(e.to_string()))?;
        let tfa = RegularGrid::from_coordinates(&coordinates, anomaly)?;

        let d_east = derivative_easting(&tfa, 1, DerivativeMethod::FiniteDifference)?;
        let d_north = derivative_northing(&tfa, 1, DerivativeMethod::FiniteDifference)?;
        let d_up = derivative_upward(&tfa, 1)?;

        Ok(SyntheticSurvey {
            coordinates,
            tfa,
            d_east,
            d_north,
            d_up,
        })
    }

    /// Run Euler deconvolution over the whole survey
    pub fn fit_euler(&self, structural_index: f64) -> Result<EulerFit> {
        let mut euler = EulerDeconvolution::new(structural_index);
        euler.fit(
            &self.coordinates,
            self.tfa.values(),
            &self.d_east,
            &self.d_north,
            &self.d_up,
        )?;
        euler
            .report()
            .ok_or_else(|| GravMagError::CalculationError("Euler fit produced no estimate".to_string()))
    }
}
