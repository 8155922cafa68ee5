use serde::{Deserialize, Serialize};

/// Largest accepted width or height. Larger requests are clamped.
pub const MAX_SIDE: u32 = 1024;

/// Generation parameters. Every field has a default, so partial YAML works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabyrinthConfig {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    /// Chance per step that a walk heads straight for its end.
    pub bias: f64,
    /// Rounds of dead-end branches grown off the solution.
    pub noise_rounds: u32,
    /// Closing walks tried when the second main path misses the end.
    pub closing_attempts: u32,
    /// Full regenerations before giving up on an unsolvable grid.
    pub max_attempts: u32,
}

impl Default for LabyrinthConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            seed: 0,
            bias: 0.5,
            noise_rounds: 5,
            closing_attempts: 20,
            max_attempts: 10,
        }
    }
}
