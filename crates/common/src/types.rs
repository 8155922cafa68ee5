use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an item in a scene.
///
/// Generated ids look like `item-<uuid>`; imported ids are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new() -> Self {
        Self(format!("item-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the three spatial axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A triple of x/y/z values: a position in px or a rotation in degrees.
///
/// Serialized as `{"x":..,"y":..,"z":..}` to match the state document shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coords {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Coords {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }
}

impl From<DVec3> for Coords {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Coords> for DVec3 {
    fn from(c: Coords) -> Self {
        DVec3::new(c.x, c.y, c.z)
    }
}

impl std::ops::Add for Coords {
    type Output = Coords;

    fn add(self, rhs: Coords) -> Coords {
        Coords::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Coords {
    type Output = Coords;

    fn sub(self, rhs: Coords) -> Coords {
        Coords::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_uniqueness() {
        let a = ItemId::new();
        let b = ItemId::new();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("item-"));
    }

    #[test]
    fn item_id_serializes_as_plain_string() {
        let id = ItemId::from("item-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"item-42\"");
    }

    #[test]
    fn coords_missing_fields_default_to_zero() {
        let c: Coords = serde_json::from_str(r#"{"x": 4}"#).unwrap();
        assert_eq!(c, Coords::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn coords_axis_access() {
        let mut c = Coords::new(1.0, 2.0, 3.0);
        assert_eq!(c.get(Axis::Y), 2.0);
        c.set(Axis::Z, 9.0);
        assert_eq!(c.z, 9.0);
    }

    #[test]
    fn coords_roundtrip_through_glam() {
        let c = Coords::new(1.5, -2.0, 0.25);
        let v: DVec3 = c.into();
        assert_eq!(Coords::from(v), c);
        assert_eq!(c - Coords::new(0.5, 0.0, 0.25), Coords::new(1.0, -2.0, 0.0));
    }
}
