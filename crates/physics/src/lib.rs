//! Physics: a naive box world with Euler integration, AABB contacts,
//! restitution and sleeping. Y grows downward, like screen space.
//!
//! # Invariants
//! - Bodies with zero mass are static and never move.
//! - After a contact is resolved the two boxes no longer overlap along the
//!   contact axis.
//! - Given the same seed and inputs, stepping is reproducible.

mod aabb;
mod body;
mod config;
mod error;
mod world;

pub use aabb::Aabb;
pub use body::{BodyHandle, PhysicsBody};
pub use config::PhysicsConfig;
pub use error::PhysicsError;
pub use world::{Contact, PhysicsWorld, StepStats};

pub fn crate_info() -> &'static str {
    "displayblock-physics v0.1.0"
}
