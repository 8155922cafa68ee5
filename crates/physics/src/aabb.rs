use glam::DVec3;

use crate::body::PhysicsBody;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn from_body(body: &PhysicsBody) -> Self {
        let half = body.size / 2.0;
        Self {
            min: body.position - half,
            max: body.position + half,
        }
    }

    /// Strict overlap: boxes that only touch do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmplt(other.max).all() && self.max.cmpgt(other.min).all()
    }

    /// Penetration depth along each axis.
    pub fn overlap_depths(&self, other: &Aabb) -> DVec3 {
        (self.max - other.min).min(other.max - self.min)
    }
}
