use displayblock_common::{Coords, ItemId, PositionManager, px, transform_css};

use crate::animation::{Animator, FrameReport, TweenId};

const DEFAULT_TRANSFORM_ORIGIN: &str = "50% 50%";

/// Pose, presentation state and animations of anything that ends up as a
/// transformed wrapper element: items, scenes and the viewport itself.
#[derive(Debug, Clone)]
pub struct Renderable {
    pose: PositionManager,
    origins: Coords,
    transform_origin: String,
    classes: Vec<String>,
    connections: Vec<ItemId>,
    rendered: bool,
    animator: Animator,
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            pose: PositionManager::new(),
            origins: Coords::ZERO,
            transform_origin: DEFAULT_TRANSFORM_ORIGIN.to_owned(),
            classes: Vec::new(),
            connections: Vec::new(),
            rendered: false,
            animator: Animator::new(),
        }
    }
}

impl Renderable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> &PositionManager {
        &self.pose
    }

    pub fn pose_mut(&mut self) -> &mut PositionManager {
        &mut self.pose
    }

    pub fn origins(&self) -> Coords {
        self.origins
    }

    pub fn transform_origin(&self) -> &str {
        &self.transform_origin
    }

    pub fn set_transform_origin(&mut self, value: impl Into<String>) -> &mut Self {
        self.transform_origin = value.into();
        self
    }

    /// Offset the element so that its center, not its corner, sits on the position.
    pub fn center_origin(&mut self, width: f64, height: f64, depth: f64) {
        self.origins = Coords::new(
            (width / -2.0).floor(),
            (height / -2.0).floor(),
            (depth / -2.0).floor(),
        );
        self.transform_origin = format!(
            "{} {} {}",
            px((width / -2.0).floor()),
            px((height / -2.0).floor()),
            px(depth / -2.0)
        );
    }

    /// The CSS `transform` for the current pose.
    pub fn transform(&self) -> String {
        transform_css(self.pose.positions() + self.origins, self.pose.rotations())
    }

    pub fn draw(&mut self) {
        self.rendered = true;
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Lines attached to this renderable.
    pub fn connections(&self) -> &[ItemId] {
        &self.connections
    }

    pub fn add_connection(&mut self, line: ItemId) {
        if !self.connections.contains(&line) {
            self.connections.push(line);
        }
    }

    pub fn remove_connection(&mut self, line: &ItemId) {
        self.connections.retain(|c| c != line);
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn translate_by(&mut self, x: f64, y: f64, z: f64, duration: f64) -> TweenId {
        self.animator
            .translate_by(&self.pose, Coords::new(x, y, z), duration)
    }

    pub fn translate_to(&mut self, x: f64, y: f64, z: f64, duration: f64) -> TweenId {
        self.animator
            .translate_to(&self.pose, Coords::new(x, y, z), duration)
    }

    pub fn rotate_by(&mut self, x: f64, y: f64, z: f64, duration: f64) -> TweenId {
        self.animator
            .rotate_by(&self.pose, Coords::new(x, y, z), duration)
    }

    pub fn rotate_to(&mut self, x: f64, y: f64, z: f64, duration: f64) -> TweenId {
        self.animator
            .rotate_to(&self.pose, Coords::new(x, y, z), duration)
    }

    pub fn flatten(&mut self, duration: f64) -> TweenId {
        self.animator.flatten(&self.pose, duration)
    }

    pub fn enable_rotations(&mut self, x: f64, y: f64, z: f64, duration: f64) -> TweenId {
        self.animator
            .enable_rotations(&self.pose, Coords::new(x, y, z), duration)
    }

    pub fn disable_rotations(&mut self) {
        self.animator.disable_rotations();
    }

    pub fn rotation_enabled(&self) -> bool {
        self.animator.rotation_enabled()
    }

    pub fn stop_animations(&mut self) {
        self.animator.cancel_all();
    }

    /// Advance this renderable's animations to `timestamp` (milliseconds).
    pub fn frame(&mut self, timestamp: f64) -> FrameReport {
        self.animator.frame(timestamp, &mut self.pose)
    }
}
