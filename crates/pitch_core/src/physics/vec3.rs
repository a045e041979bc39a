//! Vector types.
//!
//! Coordinate system (right-handed):
//! - X: forward, from the release point toward home plate
//! - Y: up
//! - Z: right, from the pitcher's point of view

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use super::constants::integration::NORMALIZE_EPSILON;

// =============================================================================
// DVec3 - integration precision
// =============================================================================

/// Double-precision 3D vector used for all physics state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DVec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl DVec3 {
    pub const ZERO: DVec3 = DVec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const FORWARD: DVec3 = DVec3::new(1.0, 0.0, 0.0);
    pub const UP: DVec3 = DVec3::new(0.0, 1.0, 0.0);
    pub const RIGHT: DVec3 = DVec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Unit vector in the same direction, or zero for a near-zero vector
    pub fn normalized(&self) -> Self {
        let n = self.norm();
        if n > NORMALIZE_EPSILON {
            *self * (1.0 / n)
        } else {
            Self::ZERO
        }
    }

    /// Component of `self` perpendicular to the unit vector `axis`
    pub fn reject_from(&self, axis: &Self) -> Self {
        *self - *axis * self.dot(axis)
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        *self + (*other - *self) * t
    }
}

impl Add for DVec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for DVec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for DVec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for DVec3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for DVec3 {
    type Output = Self;
    fn mul(self, k: f64) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
            z: self.z * k,
        }
    }
}

impl Div<f64> for DVec3 {
    type Output = Self;
    fn div(self, k: f64) -> Self {
        Self {
            x: self.x / k,
            y: self.y / k,
            z: self.z / k,
        }
    }
}

impl Neg for DVec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for DVec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Point3 - storage precision
// =============================================================================

/// Single-precision point handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

impl From<DVec3> for Point3 {
    fn from(v: DVec3) -> Self {
        Self {
            x: v.x as f32,
            y: v.y as f32,
            z: v.z as f32,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dvec3_operations() {
        let a = DVec3::new(1.0, 2.0, 3.0);
        let b = DVec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, DVec3::new(5.0, 7.0, 9.0));
        assert_eq!(a - b, DVec3::new(-3.0, -3.0, -3.0));
        assert_eq!(a * 2.0, DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn test_cross_follows_right_hand_rule() {
        let z = DVec3::FORWARD.cross(&DVec3::UP);
        assert!((z.z - 1.0).abs() < 1e-12);
        // forward × up = right, so up × right = forward
        let x = DVec3::UP.cross(&DVec3::RIGHT);
        assert!((x.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_unit_length() {
        let n = DVec3::new(3.0, 4.0, 0.0).normalized();
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_near_zero_is_zero_not_nan() {
        let n = DVec3::new(1e-20, -1e-20, 0.0).normalized();
        assert_eq!(n, DVec3::ZERO);
        assert!(!n.x.is_nan());
    }

    #[test]
    fn test_reject_from_removes_parallel_part() {
        let v = DVec3::new(2.0, 3.0, 0.0);
        let perp = v.reject_from(&DVec3::FORWARD);
        assert_eq!(perp, DVec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_point3_from_dvec3() {
        let p: Point3 = DVec3::new(18.44, 1.5, -0.25).into();
        assert!((p.x - 18.44).abs() < 1e-5);
        assert!((p.z + 0.25).abs() < 1e-6);
        assert!((Point3::default().distance_to(&Point3::new(3.0, 4.0, 0.0)) - 5.0).abs() < 1e-6);
    }
}
