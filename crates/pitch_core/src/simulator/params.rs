//! Simulation parameters for one shot.
//!
//! Units follow the config files: release height in cm, radius in mm,
//! pressure in hPa. Conversions to SI happen in the accessors below.

use serde::{Deserialize, Serialize};

use crate::physics::constants::{field, integration};
use crate::physics::{aero, DVec3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Above the rubber (cm)
    pub release_height_cm: f64,
    pub initial_speed_mps: f64,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,

    pub spin_rpm: f64,
    /// Normalized before use; magnitude is ignored
    pub spin_axis: DVec3,

    pub radius_mm: f64,
    pub mass_kg: f64,

    pub air_temp_c: f64,
    pub rel_humidity_pct: f64,
    pub pressure_hpa: f64,
    /// Derive pressure from `altitude_m` instead of `pressure_hpa`
    pub use_altitude_pressure: bool,
    pub altitude_m: f64,

    pub step_s: f64,
    pub stop_on_ground: bool,

    /// Downrange distance at which the pitch has arrived (m)
    pub plate_distance_m: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            release_height_cm: 180.0,
            initial_speed_mps: 0.0,
            elevation_deg: 0.0,
            azimuth_deg: 0.0,
            spin_rpm: 0.0,
            spin_axis: DVec3::new(1.0, 0.0, 0.0),
            radius_mm: 37.0,
            mass_kg: 0.145,
            air_temp_c: 25.0,
            rel_humidity_pct: 60.0,
            pressure_hpa: 1013.25,
            use_altitude_pressure: false,
            altitude_m: 0.0,
            step_s: 0.0001,
            stop_on_ground: true,
            plate_distance_m: field::PLATE_DISTANCE_M,
        }
    }
}

impl SimParams {
    /// Radius in metres, clamped positive
    pub fn radius_m(&self) -> f64 {
        self.radius_mm.max(integration::MIN_RADIUS_MM) * 1e-3
    }

    /// Mass in kg, clamped positive
    pub fn effective_mass_kg(&self) -> f64 {
        self.mass_kg.max(integration::MIN_MASS_KG)
    }

    pub fn effective_pressure_hpa(&self) -> f64 {
        if self.use_altitude_pressure {
            aero::pressure_from_altitude_hpa(self.altitude_m)
        } else {
            self.pressure_hpa
        }
    }

    pub fn air_density(&self) -> f64 {
        aero::air_density(
            self.air_temp_c,
            self.rel_humidity_pct,
            self.effective_pressure_hpa(),
        )
    }

    /// Release point above the ground plane, on the centerline.
    pub fn release_position(&self) -> DVec3 {
        let y = (self.release_height_cm + field::MOUND_OFFSET_CM) * 0.01;
        DVec3::new(0.0, y, 0.0)
    }

    /// Unit launch direction from elevation and azimuth.
    pub fn launch_direction(&self) -> DVec3 {
        let el = self.elevation_deg.to_radians();
        let az = self.azimuth_deg.to_radians();

        let dir = DVec3::FORWARD * (el.cos() * az.cos())
            + DVec3::RIGHT * (el.cos() * az.sin())
            + DVec3::UP * el.sin();
        dir.normalized()
    }

    pub fn initial_velocity(&self) -> DVec3 {
        self.launch_direction() * self.initial_speed_mps
    }

    /// Spin angular velocity (rad/s) along the normalized axis.
    pub fn angular_velocity(&self) -> DVec3 {
        self.spin_axis.normalized() * aero::rpm_to_rad_per_sec(self.spin_rpm)
    }

    /// Step is usable for integration
    pub fn has_valid_step(&self) -> bool {
        self.step_s.is_finite() && self.step_s > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_position_includes_mound_offset() {
        let p = SimParams::default();
        let pos = p.release_position();
        assert!((pos.y - 2.054).abs() < 1e-12);
        assert_eq!(pos.x, 0.0);
        assert_eq!(pos.z, 0.0);
    }

    #[test]
    fn test_launch_direction_axes() {
        let mut p = SimParams::default();
        let d = p.launch_direction();
        assert!((d.x - 1.0).abs() < 1e-12);

        p.elevation_deg = 90.0;
        assert!((p.launch_direction().y - 1.0).abs() < 1e-12);

        p.elevation_deg = 0.0;
        p.azimuth_deg = 90.0;
        assert!((p.launch_direction().z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_radius_and_mass_are_clamped() {
        let p = SimParams {
            radius_mm: -3.0,
            mass_kg: 0.0,
            ..SimParams::default()
        };
        assert!(p.radius_m() > 0.0);
        assert!(p.effective_mass_kg() > 0.0);
    }

    #[test]
    fn test_altitude_pressure_toggle() {
        let mut p = SimParams {
            altitude_m: 1600.0,
            ..SimParams::default()
        };
        let sea = p.air_density();
        p.use_altitude_pressure = true;
        assert!(p.effective_pressure_hpa() < 900.0);
        assert!(p.air_density() < sea);
    }

    #[test]
    fn test_angular_velocity_from_rpm() {
        let p = SimParams {
            spin_rpm: 60.0,
            spin_axis: DVec3::new(0.0, 0.0, 5.0),
            ..SimParams::default()
        };
        let w = p.angular_velocity();
        assert!((w.z - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    }
}
