//! Constants module for potential field calculations

use std::f64::consts::PI;

// Physics
/// Gravitational constant in SI units (m^3 kg^-1 s^-2)
///
/// CODATA 1998 value, 6.673e-11, the constant pinned by the Fatiando a Terra
/// potential-field tools so results compare bit-for-bit.
pub const GRAVITATIONAL_CONST: f64 = 0.000_000_000_066_73;
/// Vacuum magnetic permeability in SI units (T m / A)
pub const VACUUM_MAGNETIC_PERMEABILITY: f64 = 4.0 * PI * 1e-7;
/// Magnetic field prefactor mu_0 / (4 pi) in SI units
pub const MAGNETIC_PREFACTOR: f64 = 1e-7;

// Unit conversions
/// m/s^2 to mGal
pub const SI_TO_MGAL: f64 = 1e5;
/// s^-2 to Eötvös
pub const SI_TO_EOTVOS: f64 = 1e9;
/// Tesla to nanotesla
pub const TESLA_TO_NT: f64 = 1e9;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permeability_prefactor() {
        assert!((VACUUM_MAGNETIC_PERMEABILITY / (4.0 * PI) - MAGNETIC_PREFACTOR).abs() < 1e-22);
    }

    #[test]
    fn test_gravitational_constant_value() {
        assert_eq!(GRAVITATIONAL_CONST, 6.673e-11);
    }
}
