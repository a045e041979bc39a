//! # Math kernel
//!
//! - `vec3`: `DVec3` for integration state, `Point3` for stored output
//! - `aero`: atmosphere and aerodynamic coefficient formulas
//! - `constants`: grouped physical constants

pub mod aero;
pub mod constants;
pub mod vec3;

pub use aero::{
    air_density, drag_coefficient, lift_coefficient, pressure_from_altitude_hpa,
    rpm_to_rad_per_sec, saturation_vapor_pressure_hpa, spin_parameter,
};
pub use vec3::{DVec3, Point3};
