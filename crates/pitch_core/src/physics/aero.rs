//! Scalar atmosphere and aerodynamic formulas.
//!
//! All functions are total over physically sensible inputs; callers are
//! expected to pass sane temperatures, pressures and speeds.

use super::constants::{aero, atmosphere, gravity, integration};

/// Saturation vapour pressure (hPa), Buck equation.
///
/// The water branch is used for `temp_c >= 0`, the ice branch below zero.
pub fn saturation_vapor_pressure_hpa(temp_c: f64) -> f64 {
    use atmosphere::*;

    let t = temp_c;
    if t >= 0.0 {
        BUCK_WATER_A * ((BUCK_WATER_B - t / BUCK_WATER_C) * (t / (BUCK_WATER_D + t))).exp()
    } else {
        BUCK_ICE_A * ((BUCK_ICE_B - t / BUCK_ICE_C) * (t / (BUCK_ICE_D + t))).exp()
    }
}

/// Static pressure (hPa) at altitude `h` metres, ISA troposphere.
pub fn pressure_from_altitude_hpa(altitude_m: f64) -> f64 {
    use atmosphere::*;

    let exponent = (gravity::G_STANDARD * MOLAR_MASS_AIR) / (GAS_CONSTANT * LAPSE_RATE);
    P0_HPA * (1.0 - (LAPSE_RATE * altitude_m) / T0_K).powf(exponent)
}

/// Moist air density (kg/m³).
///
/// Dry-air and vapour partial pressures are derived from the relative
/// humidity and summed as ideal gases at the same temperature.
pub fn air_density(temp_c: f64, rel_humidity_pct: f64, pressure_hpa: f64) -> f64 {
    use atmosphere::*;

    let t_k = temp_c + KELVIN_OFFSET;
    let rh = rel_humidity_pct.clamp(0.0, 100.0) * 0.01;
    let vapor_hpa = rh * saturation_vapor_pressure_hpa(temp_c);

    let dry_pa = (pressure_hpa - vapor_hpa) * 100.0;
    let vapor_pa = vapor_hpa * 100.0;

    dry_pa / (R_DRY * t_k) + vapor_pa / (R_VAPOR * t_k)
}

/// Drag coefficient as a linear function of spin rate only.
pub fn drag_coefficient(spin_rpm: f64) -> f64 {
    aero::CD0 + aero::CD1 * (spin_rpm / 1000.0)
}

/// Lift coefficient from the spin parameter S.
pub fn lift_coefficient(spin_parameter: f64) -> f64 {
    let s = spin_parameter;
    (aero::CL2 * s) / (aero::CL0 + aero::CL1 * s + 1e-12)
}

/// S = r·ω⊥ / |v|
pub fn spin_parameter(radius_m: f64, omega_perp: f64, speed_mps: f64) -> f64 {
    (radius_m * omega_perp) / speed_mps.max(integration::MIN_SPEED_MPS)
}

/// RPM → rad/s
pub fn rpm_to_rad_per_sec(rpm: f64) -> f64 {
    rpm * 2.0 * std::f64::consts::PI / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturation_pressure_known_points() {
        // 6.1121 hPa at 0 °C, ~23.4 hPa at 20 °C
        assert!((saturation_vapor_pressure_hpa(0.0) - 6.1121).abs() < 1e-9);
        assert!((saturation_vapor_pressure_hpa(20.0) - 23.39).abs() < 0.05);
    }

    #[test]
    fn test_saturation_pressure_ice_branch_below_zero() {
        let ice = saturation_vapor_pressure_hpa(-10.0);
        assert!((ice - 2.60).abs() < 0.05, "got {}", ice);
        // branch switch is continuous to within the coefficient difference
        let just_below = saturation_vapor_pressure_hpa(-1e-9);
        assert!((just_below - 6.1115).abs() < 1e-6);
    }

    #[test]
    fn test_pressure_from_altitude() {
        assert!((pressure_from_altitude_hpa(0.0) - 1013.25).abs() < 1e-9);
        // Denver, ~1609 m
        let denver = pressure_from_altitude_hpa(1609.0);
        assert!((denver - 835.0).abs() < 5.0, "got {}", denver);
    }

    #[test]
    fn test_air_density_standard_day() {
        let dry = air_density(15.0, 0.0, 1013.25);
        assert!((dry - 1.225).abs() < 0.002, "got {}", dry);
    }

    #[test]
    fn test_humid_air_is_lighter() {
        let dry = air_density(30.0, 0.0, 1013.25);
        let humid = air_density(30.0, 100.0, 1013.25);
        assert!(humid < dry);
        // humidity above 100 % is clamped
        assert_eq!(air_density(30.0, 150.0, 1013.25), humid);
    }

    #[test]
    fn test_drag_coefficient_depends_on_rpm() {
        assert!((drag_coefficient(0.0) - 0.297).abs() < 1e-12);
        assert!((drag_coefficient(2000.0) - 0.3554).abs() < 1e-12);
    }

    #[test]
    fn test_lift_coefficient_shape() {
        assert_eq!(lift_coefficient(0.0), 0.0);
        let low = lift_coefficient(0.1);
        let high = lift_coefficient(0.3);
        assert!(high > low);
        // saturates toward CL2 / CL1
        assert!(lift_coefficient(100.0) < 1.120 / 2.333 + 1e-3);
    }

    #[test]
    fn test_spin_parameter_guards_zero_speed() {
        let s = spin_parameter(0.037, 200.0, 0.0);
        assert!(s.is_finite());
        assert!((spin_parameter(0.037, 200.0, 40.0) - 0.185).abs() < 1e-12);
    }
}
