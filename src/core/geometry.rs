//! Minimal geometry for card poses.
//!
//! Poses are world-space. Rotation is stored as Euler angles in radians:
//! `y` flips a card face-down (PI), `z` taps it (-PI/2).

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use std::ops::{Add, Mul, Sub};

/// A 3-component vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Linear interpolation from `self` to `other`.
    #[must_use]
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }

    #[must_use]
    pub fn distance(self, other: Vec3) -> f32 {
        let d = other - self;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Position and orientation of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Pose {
    #[must_use]
    pub const fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    /// Face-up, untapped pose at `position`.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    /// Orientation for a card with the given face and tap state.
    #[must_use]
    pub fn oriented(position: Vec3, face_up: bool, tapped: bool) -> Self {
        let y = if face_up { 0.0 } else { PI };
        let z = if tapped { -FRAC_PI_2 } else { 0.0 };
        Self::new(position, Vec3::new(0.0, y, z))
    }

    /// Linear interpolation of both position and rotation.
    #[must_use]
    pub fn lerp(self, other: Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.lerp(other.rotation, t),
        }
    }
}

/// Evaluate a quadratic Bezier curve at `t`.
#[must_use]
pub fn quadratic_bezier(start: Vec3, control: Vec3, end: Vec3, t: f32) -> Vec3 {
    let a = start.lerp(control, t);
    let b = control.lerp(end, t);
    a.lerp(b, t)
}
