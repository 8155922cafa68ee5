use glam::{DMat4, DVec3};

use crate::types::{Axis, Coords};

/// Position (px) and rotation (degrees) storage shared by every placed object.
///
/// Setters that take `Option` leave an axis untouched when given `None`.
/// This type only stores values. Whoever owns it is responsible for
/// re-laying connected lines after a position change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionManager {
    position: Coords,
    rotation: Coords,
    saved: Option<(Coords, Coords)>,
}

impl PositionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> Coords {
        self.position
    }

    pub fn rotations(&self) -> Coords {
        self.rotation
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }

    pub fn rotation(&self, axis: Axis) -> f64 {
        self.rotation.get(axis)
    }

    pub fn set_positions(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> &mut Self {
        if let Some(x) = x {
            self.position.x = x;
        }
        if let Some(y) = y {
            self.position.y = y;
        }
        if let Some(z) = z {
            self.position.z = z;
        }
        self
    }

    /// Set all three coordinates at once.
    pub fn set_position(&mut self, position: Coords) -> &mut Self {
        self.position = position;
        self
    }

    pub fn set_x(&mut self, value: f64) -> &mut Self {
        self.position.x = value;
        self
    }

    pub fn set_y(&mut self, value: f64) -> &mut Self {
        self.position.y = value;
        self
    }

    pub fn set_z(&mut self, value: f64) -> &mut Self {
        self.position.z = value;
        self
    }

    pub fn set_rotations(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) -> &mut Self {
        if let Some(x) = x {
            self.rotation.x = x;
        }
        if let Some(y) = y {
            self.rotation.y = y;
        }
        if let Some(z) = z {
            self.rotation.z = z;
        }
        self
    }

    pub fn set_rotation(&mut self, axis: Axis, value: f64) -> &mut Self {
        self.rotation.set(axis, value);
        self
    }

    /// Remember the current position and rotation for a later `restore_position`.
    pub fn save_position(&mut self) -> &mut Self {
        self.saved = Some((self.position, self.rotation));
        self
    }

    /// Return to the last saved pose. No-op if nothing was saved.
    pub fn restore_position(&mut self) -> &mut Self {
        if let Some((position, rotation)) = self.saved {
            self.position = position;
            self.rotation = rotation;
        }
        self
    }

    /// The equivalent CSS matrix of `translate3d(..) rotateX(..) rotateY(..) rotateZ(..)`.
    pub fn to_matrix(&self) -> DMat4 {
        let r = self.rotation;
        DMat4::from_translation(DVec3::from(self.position))
            * DMat4::from_rotation_x(r.x.to_radians())
            * DMat4::from_rotation_y(r.y.to_radians())
            * DMat4::from_rotation_z(r.z.to_radians())
    }
}
