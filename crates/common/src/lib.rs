//! Shared types for displayblock: coordinates, item identifiers, pose storage
//! and the CSS formatting every renderable goes through.

pub mod css;
pub mod matrix;
pub mod position;
pub mod types;

pub use css::{css_number, deg, px, round_half_up, transform_css};
pub use matrix::{Decomposed, TransformParseError, decompose_matrix3d, format_matrix3d};
pub use position::PositionManager;
pub use types::{Axis, Coords, ItemId};
