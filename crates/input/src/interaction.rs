use displayblock_common::round_half_up;
use displayblock_kernel::Viewport;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::action::{Action, Button, PointerEvent};

/// Tunables for pointer handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Only every n-th move event is acted on.
    pub move_throttle: u32,
    /// Pixels of pointer travel per degree of orbit.
    pub rotation_divisor: f64,
    /// Z distance per wheel notch. `None` disables zoom.
    pub zoom_step: Option<f64>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            move_throttle: 5,
            rotation_divisor: 10.0,
            zoom_step: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PanState {
    left: f64,
    top: f64,
}

#[derive(Debug, Clone, Copy)]
struct OrbitState {
    left: f64,
    top: f64,
    rotation_x: f64,
    rotation_y: f64,
}

/// Drag to pan, secondary-drag to orbit, and optionally wheel to zoom.
#[derive(Debug, Clone, Default)]
pub struct ViewportInteraction {
    config: InteractionConfig,
    pan: Option<PanState>,
    orbit: Option<OrbitState>,
    moves: u32,
}

impl ViewportInteraction {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn is_orbiting(&self) -> bool {
        self.orbit.is_some()
    }

    /// Translate a pointer event into an action, updating gesture state.
    pub fn handle(&mut self, event: PointerEvent, viewport: &Viewport) -> Action {
        let pose = viewport.renderable().pose();
        match event {
            PointerEvent::Down { button, x, y } => {
                match button {
                    Button::Primary => {
                        self.pan = Some(PanState {
                            left: x - pose.x(),
                            top: y - pose.y(),
                        });
                    }
                    Button::Secondary => {
                        let rotations = pose.rotations();
                        self.orbit = Some(OrbitState {
                            left: x,
                            top: y,
                            rotation_x: rotations.x,
                            rotation_y: rotations.y,
                        });
                    }
                    Button::Middle => {}
                }
                Action::Noop
            }
            PointerEvent::Move { x, y } => {
                self.moves = (self.moves + 1) % self.config.move_throttle.max(1);
                if self.moves != 0 {
                    return Action::Noop;
                }
                if let Some(pan) = self.pan {
                    Action::Pan {
                        x: x - pan.left,
                        y: y - pan.top,
                    }
                } else if let Some(orbit) = self.orbit {
                    let divisor = self.config.rotation_divisor;
                    Action::Orbit {
                        x: round_half_up(orbit.rotation_x + (y - orbit.top) / divisor),
                        y: round_half_up(orbit.rotation_y + (x - orbit.left) / divisor),
                    }
                } else {
                    Action::Noop
                }
            }
            PointerEvent::Up { .. } => {
                self.pan = None;
                self.orbit = None;
                Action::Noop
            }
            PointerEvent::Wheel { delta_y } => match self.config.zoom_step {
                Some(step) if delta_y > 0.0 => Action::Zoom(-step),
                Some(step) => Action::Zoom(step),
                None => Action::Noop,
            },
        }
    }

    /// Handle an event and apply the resulting action to the viewport.
    pub fn process(&mut self, event: PointerEvent, viewport: &mut Viewport) -> Action {
        let action = self.handle(event, viewport);
        apply_action(action, viewport);
        action
    }
}

/// Apply an action to the viewport pose.
pub fn apply_action(action: Action, viewport: &mut Viewport) {
    let renderable = viewport.renderable_mut();
    match action {
        Action::Pan { x, y } => {
            renderable.pose_mut().set_positions(Some(x), Some(y), None);
        }
        Action::Orbit { x, y } => {
            renderable.pose_mut().set_rotations(Some(x), Some(y), None);
        }
        Action::Zoom(dz) => {
            let z = renderable.pose().z();
            renderable.pose_mut().set_z(z + dz);
        }
        Action::Noop => return,
    }
    renderable.draw();
    trace!(?action, "viewport action applied");
}
