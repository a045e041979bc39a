//! Fixed-step RK4 trajectory integrator.
//!
//! ## Algorithm
//!
//! State `(p, v)`, derivative `(v, a(p, v))`:
//!
//! ```text
//! k1 = f(p, v)
//! k2 = f(p + k1p·dt/2, v + k1v·dt/2)
//! k3 = f(p + k2p·dt/2, v + k2v·dt/2)
//! k4 = f(p + k3p·dt,   v + k3v·dt)
//! y' = y + (k1 + 2k2 + 2k3 + k4)·dt/6
//! ```
//!
//! ## Stopping
//!
//! Checked before every step, first match wins:
//! 1. downrange position reached the plate
//! 2. ground stop enabled and the ball is at or below the ground plane
//! 3. step cap reached

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::physics::constants::integration;
use crate::physics::{DVec3, Point3};

use super::forces::{ForceModel, PitchForces};
use super::params::SimParams;

/// Kinematic state advanced by the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rk4State {
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Why integration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    ReachedPlate,
    HitGround,
    StepLimit,
}

/// Advance `state` by one RK4 step of `dt` seconds.
pub fn rk4_step<F: ForceModel>(state: &Rk4State, forces: &F, dt: f64) -> Rk4State {
    let p = state.position;
    let v = state.velocity;
    let half = 0.5 * dt;

    let k1v = forces.acceleration(p, v);
    let k1p = v;

    let v2 = v + k1v * half;
    let k2v = forces.acceleration(p + k1p * half, v2);
    let k2p = v2;

    let v3 = v + k2v * half;
    let k3v = forces.acceleration(p + k2p * half, v3);
    let k3p = v3;

    let v4 = v + k3v * dt;
    let k4v = forces.acceleration(p + k3p * dt, v4);
    let k4p = v4;

    let sixth = dt / 6.0;
    Rk4State {
        position: p + (k1p + k2p * 2.0 + k3p * 2.0 + k4p) * sixth,
        velocity: v + (k1v + k2v * 2.0 + k3v * 2.0 + k4v) * sixth,
    }
}

/// Trajectory integrator with a configurable step cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simulator {
    pub max_steps: usize,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            max_steps: integration::MAX_STEPS,
        }
    }
}

impl Simulator {
    pub fn with_max_steps(max_steps: usize) -> Self {
        Self { max_steps }
    }

    /// Integrate from release until a stop condition.
    ///
    /// Never fails; the release point is always the first element.
    pub fn simulate(&self, params: &SimParams) -> Vec<Point3> {
        self.simulate_with_reason(params).0
    }

    pub fn simulate_with_reason(&self, params: &SimParams) -> (Vec<Point3>, StopReason) {
        let forces = PitchForces::from_params(params);
        self.integrate(params, &forces)
    }

    /// Integrate under an arbitrary force model.
    pub fn integrate<F: ForceModel>(
        &self,
        params: &SimParams,
        forces: &F,
    ) -> (Vec<Point3>, StopReason) {
        let dt = params.step_s;
        let mut state = Rk4State {
            position: params.release_position(),
            velocity: params.initial_velocity(),
        };

        let mut points = Vec::with_capacity(estimate_capacity(params, self.max_steps));
        points.push(Point3::from(state.position));

        let mut steps = 0usize;
        let reason = loop {
            if state.position.x >= params.plate_distance_m {
                break StopReason::ReachedPlate;
            }
            if params.stop_on_ground && state.position.y <= 0.0 {
                break StopReason::HitGround;
            }
            if steps >= self.max_steps {
                break StopReason::StepLimit;
            }

            state = rk4_step(&state, forces, dt);
            points.push(Point3::from(state.position));
            steps += 1;
        };

        debug!(
            ?reason,
            points = points.len(),
            end_x = state.position.x,
            end_y = state.position.y,
            "trajectory integrated"
        );

        (points, reason)
    }
}

/// Integrate with the default step cap.
pub fn simulate(params: &SimParams) -> Vec<Point3> {
    Simulator::default().simulate(params)
}

fn estimate_capacity(params: &SimParams, max_steps: usize) -> usize {
    let speed = params.initial_speed_mps.abs().max(1.0);
    let flight_s = params.plate_distance_m.abs() / speed;
    let steps = if params.has_valid_step() {
        (flight_s / params.step_s).ceil()
    } else {
        0.0
    };
    // `as usize` saturates; NaN becomes 0
    (steps as usize)
        .min(max_steps)
        .min(integration::RESERVE_POINTS)
        + 1
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::constants::{field, gravity};
    use proptest::prelude::*;

    struct NoForces;

    impl ForceModel for NoForces {
        fn acceleration(&self, _: DVec3, _: DVec3) -> DVec3 {
            DVec3::ZERO
        }
    }

    struct GravityOnly;

    impl ForceModel for GravityOnly {
        fn acceleration(&self, _: DVec3, _: DVec3) -> DVec3 {
            DVec3::new(0.0, -gravity::G_STANDARD, 0.0)
        }
    }

    fn plate_params() -> SimParams {
        SimParams {
            stop_on_ground: false,
            initial_speed_mps: 40.0,
            spin_rpm: 0.0,
            release_height_cm: 180.0,
            elevation_deg: 0.0,
            azimuth_deg: 0.0,
            ..SimParams::default()
        }
    }

    #[test]
    fn test_rk4_straight_line() {
        let s = Rk4State {
            position: DVec3::ZERO,
            velocity: DVec3::new(10.0, 0.0, 0.0),
        };
        let next = rk4_step(&s, &NoForces, 1.0);
        assert!((next.position.x - 10.0).abs() < 1e-12);
        assert!((next.velocity.x - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_rk4_exact_for_constant_acceleration() {
        let s = Rk4State {
            position: DVec3::new(0.0, 1.0, 0.0),
            velocity: DVec3::ZERO,
        };
        let next = rk4_step(&s, &GravityOnly, 0.2);
        let expected = 1.0 - 0.5 * gravity::G_STANDARD * 0.04;
        assert!((next.position.y - expected).abs() < 1e-12);
    }

    #[test]
    fn test_plate_stop_scenario() {
        let points = simulate(&plate_params());
        let n = points.len();
        assert!(n >= 2);
        let plate = field::PLATE_DISTANCE_M as f32;
        assert!(points[n - 1].x >= plate, "last x {}", points[n - 1].x);
        assert!(points[n - 2].x < plate, "second-to-last x {}", points[n - 2].x);
    }

    #[test]
    fn test_release_point_always_first() {
        let params = plate_params();
        let points = simulate(&params);
        assert_eq!(points[0], Point3::from(params.release_position()));
    }

    #[test]
    fn test_zero_speed_falls_straight_down() {
        let params = SimParams {
            initial_speed_mps: 0.0,
            spin_rpm: 0.0,
            stop_on_ground: true,
            ..SimParams::default()
        };
        let (points, reason) = Simulator::default().simulate_with_reason(&params);
        assert_eq!(reason, StopReason::HitGround);
        assert!(points.len() > 1);
        for p in &points {
            assert_eq!(p.x, 0.0);
            assert_eq!(p.z, 0.0);
        }
        assert!(points.last().map(|p| p.y <= 0.0).unwrap_or(false));
        for w in points.windows(2) {
            assert!(w[1].y <= w[0].y);
        }
    }

    #[test]
    fn test_step_limit_terminates() {
        // never reaches the plate and never stops on the ground
        let params = SimParams {
            initial_speed_mps: 0.0,
            stop_on_ground: false,
            ..SimParams::default()
        };
        let (points, reason) = Simulator::with_max_steps(500).simulate_with_reason(&params);
        assert_eq!(reason, StopReason::StepLimit);
        assert_eq!(points.len(), 501);
    }

    #[test]
    fn test_release_past_plate_yields_single_point() {
        let params = SimParams {
            plate_distance_m: 0.0,
            initial_speed_mps: 40.0,
            ..SimParams::default()
        };
        let points = simulate(&params);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_plate_distance_is_a_parameter() {
        let short = SimParams {
            plate_distance_m: 5.0,
            ..plate_params()
        };
        let points = simulate(&short);
        let last = points[points.len() - 1];
        assert!(last.x >= 5.0 && last.x < 5.1);
    }

    #[test]
    fn test_backspin_arrives_higher_than_no_spin() {
        let flat = simulate(&plate_params());
        let backspin = simulate(&SimParams {
            spin_rpm: 2300.0,
            spin_axis: DVec3::new(0.0, 0.0, 1.0),
            ..plate_params()
        });
        let flat_y = flat[flat.len() - 1].y;
        let back_y = backspin[backspin.len() - 1].y;
        assert!(back_y > flat_y, "{} vs {}", back_y, flat_y);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_deterministic_for_fixed_params(
            speed in 20.0f64..45.0,
            rpm in 0.0f64..3000.0,
            el in -3.0f64..3.0,
            az in -3.0f64..3.0,
        ) {
            let params = SimParams {
                initial_speed_mps: speed,
                spin_rpm: rpm,
                spin_axis: DVec3::new(0.2, 0.3, 1.0),
                elevation_deg: el,
                azimuth_deg: az,
                step_s: 0.001,
                ..SimParams::default()
            };
            let a = simulate(&params);
            let b = simulate(&params);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_length_bounded_and_non_empty(
            speed in -10.0f64..60.0,
            el in -89.0f64..89.0,
            cap in 1usize..2000,
            ground in any::<bool>(),
        ) {
            let params = SimParams {
                initial_speed_mps: speed,
                elevation_deg: el,
                stop_on_ground: ground,
                step_s: 0.001,
                ..SimParams::default()
            };
            let points = Simulator::with_max_steps(cap).simulate(&params);
            prop_assert!(!points.is_empty());
            prop_assert!(points.len() <= cap + 1);
        }
    }
}
