//! displayblock kernel: the scene graph. Items live in scenes, scenes live in
//! a viewport, and every node carries a pose plus frame-driven animations.
//!
//! # Invariants
//! - An item's slot position is authoritative; `refresh` re-applies it.
//! - A connected line is re-laid between the centers of its two items
//!   whenever either of them moves.
//! - Iteration over scenes and items is in key order (BTreeMap).
//! - Animations only advance when the caller drives `frame(timestamp)`.

pub mod animation;
pub mod board;
pub mod error;
pub mod item;
pub mod renderable;
pub mod scene;
pub mod viewport;

pub use animation::{AnimationFinished, AnimationOwner, Animator, FrameReport, Tween, TweenId, TweenKind};
pub use board::{CellState, MatrixBoard};
pub use error::SceneError;
pub use item::{Cuboid, Item, ItemKind, Line, Surface};
pub use renderable::Renderable;
pub use scene::{ItemSlot, Scene};
pub use viewport::{DEFAULT_SCENE, Viewport};
