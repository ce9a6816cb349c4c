//! Plain geometry value types shared by scenarios, genomes and the physics adapter.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector in arena units (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned goal region described by its center and half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalBox {
    /// Center of the box.
    pub center: Vec2,
    /// Half width and half height.
    pub half_extents: Vec2,
}

impl GoalBox {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Lower corner (left, bottom in arena coordinates).
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Upper corner.
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        let (lo, hi) = (self.min(), self.max());
        point.x >= lo.x && point.x <= hi.x && point.y >= lo.y && point.y <= hi.y
    }
}

/// A static line segment that kills any dot touching it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KillWall {
    pub a: Vec2,
    pub b: Vec2,
}

impl KillWall {
    pub fn new(ax: f32, ay: f32, bx: f32, by: f32) -> Self {
        Self {
            a: Vec2::new(ax, ay),
            b: Vec2::new(bx, by),
        }
    }
}
