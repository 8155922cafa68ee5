use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Stable reference to a body inside a [`PhysicsWorld`](crate::PhysicsWorld).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// A box-shaped body. `position` is the box center; rotation is cosmetic
/// and does not affect collisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub position: DVec3,
    pub velocity: DVec3,
    pub rotation: DVec3,
    pub angular_velocity: DVec3,
    pub size: DVec3,
    /// Zero means static.
    pub mass: f64,
    pub is_colliding: bool,
    pub is_sleeping: bool,
    pub is_on_ground: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            rotation: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            size: DVec3::ONE,
            mass: 1.0,
            is_colliding: false,
            is_sleeping: false,
            is_on_ground: false,
        }
    }
}

impl PhysicsBody {
    pub fn new(position: DVec3, size: DVec3, mass: f64) -> Self {
        Self {
            position,
            size,
            mass,
            ..Self::default()
        }
    }

    /// An immovable box, e.g. a floor.
    pub fn fixed(position: DVec3, size: DVec3) -> Self {
        Self::new(position, size, 0.0)
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: DVec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }
}
