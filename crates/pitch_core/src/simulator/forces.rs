//! Force model acting on a pitched ball.
//!
//! - **Gravity**: constant, straight down
//! - **Drag**: opposes velocity, ∝ ρ·A·Cd·|v|², with Cd a function of spin
//!   rate only
//! - **Magnus**: along ω̂ × v̂, ∝ ρ·A·Cl·|v|², with Cl a function of the spin
//!   parameter built from the spin component perpendicular to velocity
//!
//! ```text
//! Backspin (axis +Z, moving +X):  ω̂ × v̂ = +Y  → ball "rises"
//! Topspin  (axis -Z, moving +X):  ω̂ × v̂ = -Y  → ball dives
//! ```

use std::f64::consts::PI;

use crate::physics::constants::{gravity, integration};
use crate::physics::{aero, DVec3};

use super::params::SimParams;

/// Computes the acceleration on the ball for a given kinematic state.
pub trait ForceModel {
    fn acceleration(&self, position: DVec3, velocity: DVec3) -> DVec3;
}

/// Gravity + drag + Magnus, with everything that does not depend on the
/// instantaneous state computed once up front.
#[derive(Debug, Clone)]
pub struct PitchForces {
    pub gravity: DVec3,
    pub radius_m: f64,
    /// ½·ρ·A / m
    pub k: f64,
    pub drag_coefficient: f64,
    /// Spin angular velocity (rad/s)
    pub omega: DVec3,

    /// Individual term switches
    pub enable_drag: bool,
    pub enable_magnus: bool,
}

impl PitchForces {
    pub fn from_params(params: &SimParams) -> Self {
        let radius_m = params.radius_m();
        let area = PI * radius_m * radius_m;
        let rho = params.air_density();

        Self {
            gravity: DVec3::new(0.0, -gravity::G_STANDARD, 0.0),
            radius_m,
            k: 0.5 * rho * area / params.effective_mass_kg(),
            drag_coefficient: aero::drag_coefficient(params.spin_rpm),
            omega: params.angular_velocity(),
            enable_drag: true,
            enable_magnus: true,
        }
    }

    pub fn gravity_only(params: &SimParams) -> Self {
        Self {
            enable_drag: false,
            enable_magnus: false,
            ..Self::from_params(params)
        }
    }

    fn drag(&self, vhat: DVec3, speed: f64) -> DVec3 {
        -vhat * (self.k * self.drag_coefficient * speed * speed)
    }

    fn magnus(&self, vhat: DVec3, speed: f64) -> DVec3 {
        let omega_perp = self.omega.reject_from(&vhat).norm();
        let s = aero::spin_parameter(self.radius_m, omega_perp, speed);
        let cl = aero::lift_coefficient(s);

        let c = self.omega.normalized().cross(&vhat);
        let c_len = c.norm();
        if c_len <= integration::MIN_CROSS_NORM {
            return DVec3::ZERO;
        }

        (c / c_len) * (self.k * cl * speed * speed)
    }
}

impl ForceModel for PitchForces {
    fn acceleration(&self, _position: DVec3, velocity: DVec3) -> DVec3 {
        let mut acc = self.gravity;

        let speed = velocity.norm();
        if speed < integration::MIN_SPEED_MPS {
            return acc;
        }
        let vhat = velocity / speed;

        if self.enable_drag {
            acc += self.drag(vhat, speed);
        }
        if self.enable_magnus {
            acc += self.magnus(vhat, speed);
        }

        acc
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spinning(axis: DVec3, rpm: f64) -> SimParams {
        SimParams {
            spin_axis: axis,
            spin_rpm: rpm,
            ..SimParams::default()
        }
    }

    #[test]
    fn test_gravity_only_at_rest() {
        let forces = PitchForces::from_params(&SimParams::default());
        let acc = forces.acceleration(DVec3::ZERO, DVec3::ZERO);
        assert_eq!(acc, DVec3::new(0.0, -gravity::G_STANDARD, 0.0));
    }

    #[test]
    fn test_drag_opposes_motion() {
        let forces = PitchForces {
            enable_magnus: false,
            ..PitchForces::from_params(&SimParams::default())
        };
        let acc = forces.acceleration(DVec3::ZERO, DVec3::new(40.0, 0.0, 0.0));
        assert!(acc.x < 0.0, "drag should oppose motion, got ax={}", acc.x);
        assert!(acc.z.abs() < 1e-12);
    }

    #[test]
    fn test_drag_scales_with_speed_squared() {
        let forces = PitchForces {
            enable_magnus: false,
            ..PitchForces::from_params(&SimParams::default())
        };
        let slow = forces.acceleration(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0));
        let fast = forces.acceleration(DVec3::ZERO, DVec3::new(40.0, 0.0, 0.0));
        let ratio = fast.x / slow.x;
        assert!((ratio - 16.0).abs() < 1e-9, "ratio {}", ratio);
    }

    #[test]
    fn test_backspin_lifts() {
        let params = spinning(DVec3::new(0.0, 0.0, 1.0), 2200.0);
        let with = PitchForces::from_params(&params);
        let without = PitchForces::gravity_only(&params);
        let v = DVec3::new(40.0, 0.0, 0.0);
        let a = with.acceleration(DVec3::ZERO, v);
        let g = without.acceleration(DVec3::ZERO, v);
        assert!(a.y > g.y, "backspin should lift: {} vs {}", a.y, g.y);
    }

    #[test]
    fn test_topspin_dives() {
        let params = spinning(DVec3::new(0.0, 0.0, -1.0), 2200.0);
        let forces = PitchForces {
            enable_drag: false,
            ..PitchForces::from_params(&params)
        };
        let a = forces.acceleration(DVec3::ZERO, DVec3::new(40.0, 0.0, 0.0));
        assert!(a.y < -gravity::G_STANDARD);
    }

    #[test]
    fn test_spin_parallel_to_velocity_has_no_magnus() {
        // gyro spin: axis along travel
        let params = spinning(DVec3::new(1.0, 0.0, 0.0), 2500.0);
        let forces = PitchForces {
            enable_drag: false,
            ..PitchForces::from_params(&params)
        };
        let a = forces.acceleration(DVec3::ZERO, DVec3::new(40.0, 0.0, 0.0));
        assert!((a.y + gravity::G_STANDARD).abs() < 1e-12);
        assert!(a.z.abs() < 1e-12);
    }

    #[test]
    fn test_sidespin_moves_laterally() {
        let params = spinning(DVec3::new(0.0, 1.0, 0.0), 2000.0);
        let forces = PitchForces::from_params(&params);
        let a = forces.acceleration(DVec3::ZERO, DVec3::new(40.0, 0.0, 0.0));
        // up × forward = -right
        assert!(a.z < 0.0);
    }

    #[test]
    fn test_negligible_speed_is_gravity_only() {
        let params = spinning(DVec3::new(0.0, 0.0, 1.0), 3000.0);
        let forces = PitchForces::from_params(&params);
        let a = forces.acceleration(DVec3::ZERO, DVec3::new(1e-13, 0.0, 0.0));
        assert_eq!(a, forces.gravity);
    }
}
