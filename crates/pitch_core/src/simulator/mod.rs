//! # Trajectory Integrator
//!
//! - `params`: `SimParams`, one shot's physical setup
//! - `forces`: `ForceModel` trait and the gravity/drag/Magnus model
//! - `integrator`: RK4 stepping and stop conditions

pub mod forces;
pub mod integrator;
pub mod params;

pub use forces::{ForceModel, PitchForces};
pub use integrator::{rk4_step, simulate, Rk4State, Simulator, StopReason};
pub use params::SimParams;
