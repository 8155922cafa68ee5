/// Mouse button that started a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A raw pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: Button, x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Wheel { delta_y: f64 },
}

/// A high-level camera action produced from pointer input.
///
/// The viewport consumes actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Place the viewport at this x/y position.
    Pan { x: f64, y: f64 },
    /// Set the viewport's x/y rotation in degrees. Z is kept.
    Orbit { x: f64, y: f64 },
    /// Move the viewport along z by this amount.
    Zoom(f64),
    /// Nothing to do (throttled move, idle pointer, disabled wheel).
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::Noop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_pan_is_constructible() {
        let a = Action::Pan { x: 1.0, y: 2.0 };
        assert!(matches!(a, Action::Pan { .. }));
        assert!(!a.is_noop());
    }

    #[test]
    fn noop() {
        assert!(Action::Noop.is_noop());
        assert!(matches!(Action::Zoom(-70.0), Action::Zoom(z) if z < 0.0));
    }
}
