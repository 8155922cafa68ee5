//! Labyrinth: mazes carved by overlapping random walks on a cell grid.
//!
//! # Invariants
//! - A walk never enters a cell that already touches two path cells, so
//!   corridors stay one cell wide.
//! - `Labyrinth::generate` returns `true` only when a route of path cells
//!   joins start and end.
//! - The same seed and configuration always carve the same maze.

mod cell;
mod config;
mod labyrinth;
mod path;
mod table;

pub use cell::{Cell, Grid, Point};
pub use config::{LabyrinthConfig, MAX_SIDE};
pub use labyrinth::{CLOSEST, CLOSING_PATH, Labyrinth, MAIN_PATH, NOISE_PATH, SECOND_PATH};
pub use path::{Path, WalkOutcome};
pub use table::{TableRenderer, TextRenderer};

pub fn crate_info() -> &'static str {
    "displayblock-labyrinth v0.1.0"
}
