//! Axis-aligned bounds used to rest dropped models on the ground plane

use glam::{Affine3A, Vec3};

/// Axis-aligned bounding box accumulated from transformed mesh vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::EMPTY;
        for point in points {
            bounds.include(point);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn include(&mut self, point: Vec3) {
        if !point.is_finite() {
            return;
        }
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Add every vertex of a mesh placed at `transform`
    pub fn include_mesh(&mut self, transform: &Affine3A, positions: &[[f32; 3]]) {
        for p in positions {
            self.include(transform.transform_point3(Vec3::from_array(*p)));
        }
    }

    /// Vertical translation that puts the lowest point at y = 0.
    ///
    /// Empty bounds need no adjustment.
    pub fn ground_offset(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            -self.min.y
        }
    }
}
