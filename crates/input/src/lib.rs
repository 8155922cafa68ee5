//! Viewport interaction: pointer events mapped to camera actions.
//!
//! # Invariants
//! - The viewport consumes actions, never raw pointer events.
//! - Panning and orbiting are mutually exclusive; a pointer release ends both.

pub mod action;
pub mod interaction;

pub use action::{Action, Button, PointerEvent};
pub use interaction::{InteractionConfig, ViewportInteraction, apply_action};

pub fn crate_info() -> &'static str {
    "displayblock-input v0.1.0"
}
