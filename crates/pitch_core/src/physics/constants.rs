//! Physics constants for pitch simulation
//!
//! Grouped by concern so call sites read as `field::PLATE_DISTANCE_M`,
//! `aero::CD0` and so on.

// ============================================================
// Field geometry
// ============================================================
pub mod field {
    /// Release point to home plate (m)
    pub const PLATE_DISTANCE_M: f64 = 18.44;

    /// Release height is measured from the rubber, which sits this far
    /// above the ground plane (cm)
    pub const MOUND_OFFSET_CM: f64 = 25.4;

    /// Default strike zone height above ground (m)
    pub const STRIKE_ZONE_HEIGHT_M: f64 = 0.75;

    /// Default strike zone edge length (m)
    pub const STRIKE_ZONE_SIZE_M: f64 = 0.432;
}

// ============================================================
// Gravity
// ============================================================
pub mod gravity {
    /// Standard gravity (m/s²)
    pub const G_STANDARD: f64 = 9.80665;
}

// ============================================================
// Atmosphere (ISA troposphere + moist air)
// ============================================================
pub mod atmosphere {
    /// Sea-level standard pressure (hPa)
    pub const P0_HPA: f64 = 1013.25;
    /// Sea-level standard temperature (K)
    pub const T0_K: f64 = 288.15;
    /// Temperature lapse rate (K/m)
    pub const LAPSE_RATE: f64 = 0.0065;
    /// Molar mass of dry air (kg/mol)
    pub const MOLAR_MASS_AIR: f64 = 0.0289644;
    /// Universal gas constant (J/(mol·K))
    pub const GAS_CONSTANT: f64 = 8.3144598;
    /// Specific gas constant, dry air (J/(kg·K))
    pub const R_DRY: f64 = 287.058;
    /// Specific gas constant, water vapour (J/(kg·K))
    pub const R_VAPOR: f64 = 461.495;
    /// °C → K
    pub const KELVIN_OFFSET: f64 = 273.15;

    // Buck (1996) saturation vapour pressure coefficients
    pub const BUCK_WATER_A: f64 = 6.1121;
    pub const BUCK_WATER_B: f64 = 18.678;
    pub const BUCK_WATER_C: f64 = 234.5;
    pub const BUCK_WATER_D: f64 = 257.14;

    pub const BUCK_ICE_A: f64 = 6.1115;
    pub const BUCK_ICE_B: f64 = 23.036;
    pub const BUCK_ICE_C: f64 = 333.7;
    pub const BUCK_ICE_D: f64 = 279.82;
}

// ============================================================
// Aerodynamic coefficients (baseball)
// ============================================================
pub mod aero {
    /// Drag coefficient at zero spin
    pub const CD0: f64 = 0.297;
    /// Drag increase per 1000 RPM
    pub const CD1: f64 = 0.0292;

    /// Lift coefficient fit: CL = CL2·S / (CL0 + CL1·S)
    pub const CL0: f64 = 0.583;
    pub const CL1: f64 = 2.333;
    pub const CL2: f64 = 1.120;
}

// ============================================================
// Integration
// ============================================================
pub mod integration {
    /// Hard cap on RK4 steps per trajectory
    pub const MAX_STEPS: usize = 5_000_000;

    /// Below this speed drag and lift have no direction (m/s)
    pub const MIN_SPEED_MPS: f64 = 1e-12;

    /// |ω̂ × v̂| below this yields no Magnus direction
    pub const MIN_CROSS_NORM: f64 = 1e-12;

    /// Normalizing a vector shorter than this yields zero
    pub const NORMALIZE_EPSILON: f64 = 1e-15;

    /// Floor for mass (kg)
    pub const MIN_MASS_KG: f64 = 1e-9;

    /// Floor for radius (mm)
    pub const MIN_RADIUS_MM: f64 = 1e-6;

    /// Upper bound on the up-front point reservation
    pub const RESERVE_POINTS: usize = 200_000;
}

// ============================================================
// Playback
// ============================================================
pub mod playback {
    /// Simulated seconds per wall-clock second
    pub const DEFAULT_TIME_SCALE: f64 = 1.0 / 3.0;

    /// Once animating, at least this many points are shown
    pub const MIN_ANIMATING_POINTS: usize = 2;
}

// ============================================================
// Configuration
// ============================================================
pub mod config {
    /// Pitch entries retained from one source
    pub const MAX_PITCHES: usize = 8;

    /// km/h → m/s divisor
    pub const KMH_PER_MPS: f64 = 3.6;

    /// Segments in the plate marker fan
    pub const MARKER_SEGMENTS: usize = 16;
}
