use glam::DVec3;
use serde::{Deserialize, Serialize};

/// World-wide simulation constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Pixels per second squared. Positive y points down.
    pub gravity: DVec3,
    /// Fraction of the normal speed kept after a bounce.
    pub restitution: f64,
    /// Tangential (x/z) speed lost on each bounce.
    pub friction: f64,
    /// Per-step velocity multiplier.
    pub linear_damping: f64,
    /// Per-step angular velocity multiplier.
    pub angular_damping: f64,
    /// Linear speed below which a grounded body may sleep.
    pub sleep_threshold: f64,
    /// Angular speed below which a grounded body may sleep.
    pub angular_sleep_threshold: f64,
    /// Seed for the spin added on impact.
    pub seed: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DVec3::new(0.0, 400.0, 0.0),
            restitution: 0.7,
            friction: 0.3,
            linear_damping: 0.98,
            angular_damping: 0.95,
            sleep_threshold: 5.0,
            angular_sleep_threshold: 0.1,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: PhysicsConfig = serde_yaml::from_str("restitution: 0.5\nseed: 9\n").unwrap();
        assert_eq!(config.restitution, 0.5);
        assert_eq!(config.seed, 9);
        assert_eq!(config.gravity, DVec3::new(0.0, 400.0, 0.0));
        assert_eq!(config.friction, 0.3);
    }
}
