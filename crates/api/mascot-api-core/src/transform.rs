//! Transform snapshot types shared between the engine and runtime adapters.
//!
//! The fallback tween engine reads a target's transform once at start and
//! writes interpolated snapshots back each frame; the start/end snapshot is
//! always the target's original transform.

use serde::{Deserialize, Serialize};

/// 2D vector for position and per-axis scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn one() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// Position/scale/rotation snapshot of a rendered model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform2D {
    pub position: Vec2,
    pub scale: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            position: Vec2::zero(),
            scale: Vec2::one(),
            rotation: 0.0,
        }
    }

    /// Component-wise approximate equality (used to assert restore semantics).
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        (self.position.x - other.position.x).abs() <= eps
            && (self.position.y - other.position.y).abs() <= eps
            && (self.scale.x - other.scale.x).abs() <= eps
            && (self.scale.y - other.scale.y).abs() <= eps
            && (self.rotation - other.rotation).abs() <= eps
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
