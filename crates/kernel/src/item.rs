use std::f64::consts::FRAC_PI_2;

use displayblock_common::{Coords, ItemId, px, round_half_up};
use serde_json::{Map, Value};

use crate::error::SceneError;
use crate::renderable::Renderable;

pub const DEFAULT_SIZE: f64 = 100.0;
pub const DEFAULT_LINE_WEIGHT: f64 = 1.0;
pub const DEFAULT_LINE_COLOR: &str = "#fff";

/// A box with six faces. Cubes reuse this with equal width and height.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub top_content: String,
    pub front_content: String,
}

impl Cuboid {
    fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
            top_content: String::new(),
            front_content: String::new(),
        }
    }

    pub fn set_top_content(&mut self, content: impl Into<String>) {
        self.top_content = content.into();
    }

    pub fn set_front_content(&mut self, content: impl Into<String>) {
        self.front_content = content.into();
    }

    /// Center of the box when its corner sits at `position`.
    pub fn center(&self, position: Coords) -> Coords {
        Coords::new(
            round_half_up(position.x + self.width / 2.0),
            round_half_up(position.y + self.height / 2.0),
            round_half_up(position.z + self.depth / 2.0),
        )
    }

    fn transform_origin(&self) -> String {
        format!(
            "{} {} {}",
            px(round_half_up(self.width * 0.5)),
            px(round_half_up(self.height * 0.5)),
            px(round_half_up(self.depth * 0.5))
        )
    }
}

/// A bar oriented from `start` to `end`, optionally tied to two items.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub length: f64,
    pub weight: f64,
    pub color: String,
    pub start: Coords,
    pub end: Coords,
    connected: Option<(ItemId, ItemId)>,
    reversed: bool,
}

impl Line {
    fn new(weight: f64, color: impl Into<String>) -> Self {
        Self {
            length: DEFAULT_SIZE,
            weight,
            color: color.into(),
            start: Coords::ZERO,
            end: Coords::ZERO,
            connected: None,
            reversed: false,
        }
    }

    /// The `(start, end)` items this line is attached to, if any.
    pub fn connected_items(&self) -> Option<(&ItemId, &ItemId)> {
        self.connected.as_ref().map(|(a, b)| (a, b))
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    fn set_start(&mut self, renderable: &mut Renderable, start: Coords) {
        self.start = start;
        renderable.pose_mut().set_position(start);
    }

    fn set_end(&mut self, renderable: &mut Renderable, end: Coords) {
        self.end = end;
        let (length, rotation) = orient(end - self.start);
        self.length = length;
        renderable
            .pose_mut()
            .set_rotations(Some(rotation.x), Some(rotation.y), Some(rotation.z));
        renderable.draw();
    }

    /// Lay the line between two item centers, swapping ends when the pair
    /// would otherwise be drawn backwards.
    fn lay_between(&mut self, renderable: &mut Renderable, start: Coords, end: Coords) {
        self.reversed = should_reverse(start, end);
        if self.reversed {
            self.set_start(renderable, end);
            self.set_end(renderable, start);
        } else {
            self.set_start(renderable, start);
            self.set_end(renderable, end);
        }
    }
}

/// Whether a line between two centers should run from `end` to `start`.
pub fn should_reverse(start: Coords, end: Coords) -> bool {
    let (s, e) = (start, end);
    (s.x > e.x && s.y >= e.y)
        || (s.x < e.x && s.y > e.y)
        || (s.x == e.x && s.y > e.y && s.z == e.z)
        || (s.x == e.x && s.y > e.y && s.z < e.z)
        || (s.x == e.x && s.y == e.y && s.z > e.z)
}

/// Length and CSS rotation (degrees) that turn a bar lying along +X into `delta`.
fn orient(delta: Coords) -> (f64, Coords) {
    let Coords { x: dx, y: dy, z: dz } = delta;
    let length = (dx * dx + dy * dy + dz * dz).sqrt();

    let (mut ax, mut ay, mut az) = (0.0_f64, 0.0_f64, 0.0_f64);
    match (dx != 0.0, dy != 0.0, dz != 0.0) {
        (false, false, false) => {}
        (true, false, false) => az = 0.0_f64.atan2(dx),
        (false, true, false) => az = FRAC_PI_2,
        (false, false, true) => ay = FRAC_PI_2,
        (true, true, false) => az = dy.atan2(dx),
        (true, false, true) => ay = (dz / dx).atan(),
        (false, true, true) => {
            ax = (dz / dy).atan();
            az = FRAC_PI_2;
        }
        (true, true, true) => {
            ay = (dx / length).acos();
            let z1 = ay.sin() * length;
            ax = (dz / z1).clamp(-1.0, 1.0).asin() - FRAC_PI_2;
        }
    }

    // rotateY turns +X toward -Z in CSS, hence the sign flip.
    let rotation = Coords::new(ax.to_degrees(), -ay.to_degrees(), az.to_degrees());
    (round_half_up(length), rotation)
}

/// A flat rectangular panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub content: Option<String>,
}

impl Surface {
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }
}

/// The concrete shape of an item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Cuboid(Cuboid),
    Cube(Cuboid),
    Line(Line),
    Surface(Surface),
}

impl ItemKind {
    /// Type name used in exported state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cuboid(_) => "Cuboid",
            Self::Cube(_) => "Cube",
            Self::Line(_) => "Line",
            Self::Surface(_) => "Surface",
        }
    }
}

/// A renderable entity placed in a scene.
#[derive(Debug, Clone)]
pub struct Item {
    id: ItemId,
    renderable: Renderable,
    data: Map<String, Value>,
    kind: ItemKind,
}

impl Item {
    fn with_kind(kind: ItemKind) -> Self {
        let mut renderable = Renderable::new();
        match &kind {
            ItemKind::Cuboid(c) => {
                renderable.add_class("cuboid");
                renderable.set_transform_origin(c.transform_origin());
            }
            ItemKind::Cube(c) => {
                renderable.add_class("cuboid");
                renderable.add_class("cube");
                renderable.set_transform_origin(c.transform_origin());
            }
            ItemKind::Line(_) => {
                renderable.add_class("line");
                renderable.set_transform_origin("0 0");
            }
            ItemKind::Surface(_) => renderable.add_class("surface"),
        }
        Self {
            id: ItemId::new(),
            renderable,
            data: Map::new(),
            kind,
        }
    }

    pub fn cuboid(width: f64, height: f64, depth: f64) -> Self {
        Self::with_kind(ItemKind::Cuboid(Cuboid::new(width, height, depth)))
    }

    /// A cube of `size × size × height`; `height` defaults to `size`.
    pub fn cube(size: f64, height: Option<f64>) -> Self {
        let depth = height.unwrap_or(size);
        Self::with_kind(ItemKind::Cube(Cuboid::new(size, size, depth)))
    }

    pub fn line(weight: f64, color: impl Into<String>) -> Self {
        Self::with_kind(ItemKind::Line(Line::new(weight, color)))
    }

    pub fn surface(width: f64, height: f64) -> Self {
        Self::with_kind(ItemKind::Surface(Surface {
            width,
            height,
            content: None,
        }))
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<ItemId>) -> &mut Self {
        self.id = id.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ItemKind {
        &mut self.kind
    }

    pub fn renderable(&self) -> &Renderable {
        &self.renderable
    }

    pub fn renderable_mut(&mut self) -> &mut Renderable {
        &mut self.renderable
    }

    pub fn position(&self) -> Coords {
        self.renderable.pose().positions()
    }

    pub fn rotation(&self) -> Coords {
        self.renderable.pose().rotations()
    }

    pub fn set_rotations(&mut self, rotation: Coords) -> &mut Self {
        self.renderable
            .pose_mut()
            .set_rotations(Some(rotation.x), Some(rotation.y), Some(rotation.z));
        self
    }

    pub fn add_class(&mut self, class: impl Into<String>) -> &mut Self {
        self.renderable.add_class(class);
        self
    }

    pub fn remove_class(&mut self, class: &str) -> &mut Self {
        self.renderable.remove_class(class);
        self
    }

    pub fn set_data(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub fn data(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn all_data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn clear_data(&mut self) -> &mut Self {
        self.data.clear();
        self
    }

    pub fn as_cuboid(&self) -> Option<&Cuboid> {
        match &self.kind {
            ItemKind::Cuboid(c) | ItemKind::Cube(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cuboid_mut(&mut self) -> Option<&mut Cuboid> {
        match &mut self.kind {
            ItemKind::Cuboid(c) | ItemKind::Cube(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match &self.kind {
            ItemKind::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_surface(&self) -> Option<&Surface> {
        match &self.kind {
            ItemKind::Surface(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_surface_mut(&mut self) -> Option<&mut Surface> {
        match &mut self.kind {
            ItemKind::Surface(s) => Some(s),
            _ => None,
        }
    }

    /// Change dimensions, keeping any that are `None`. Lines are left untouched.
    pub fn resize(&mut self, width: Option<f64>, height: Option<f64>, depth: Option<f64>) -> &mut Self {
        match &mut self.kind {
            ItemKind::Cuboid(c) | ItemKind::Cube(c) => {
                c.width = width.unwrap_or(c.width);
                c.height = height.unwrap_or(c.height);
                c.depth = depth.unwrap_or(c.depth);
                let origin = c.transform_origin();
                self.renderable.set_transform_origin(origin);
            }
            ItemKind::Surface(s) => {
                s.width = width.unwrap_or(s.width);
                s.height = height.unwrap_or(s.height);
            }
            ItemKind::Line(_) => {}
        }
        self.renderable.draw();
        self
    }

    /// Center point used to anchor connected lines. Only boxes have one.
    pub fn center(&self) -> Option<Coords> {
        self.as_cuboid().map(|c| c.center(self.position()))
    }

    pub fn set_line_start(&mut self, start: Coords) -> Result<&mut Self, SceneError> {
        match &mut self.kind {
            ItemKind::Line(line) => line.set_start(&mut self.renderable, start),
            _ => return Err(SceneError::NotALine(self.id.clone())),
        }
        Ok(self)
    }

    /// Set the end point; recomputes the line length and orientation.
    pub fn set_line_end(&mut self, end: Coords) -> Result<&mut Self, SceneError> {
        match &mut self.kind {
            ItemKind::Line(line) => line.set_end(&mut self.renderable, end),
            _ => return Err(SceneError::NotALine(self.id.clone())),
        }
        Ok(self)
    }

    pub(crate) fn attach_line(&mut self, start: ItemId, end: ItemId) -> Result<(), SceneError> {
        match &mut self.kind {
            ItemKind::Line(line) => {
                line.connected = Some((start, end));
                Ok(())
            }
            _ => Err(SceneError::NotALine(self.id.clone())),
        }
    }

    pub(crate) fn detach_line(&mut self) {
        if let ItemKind::Line(line) = &mut self.kind {
            line.connected = None;
        }
    }

    pub(crate) fn lay_line_between(&mut self, start: Coords, end: Coords) -> Result<(), SceneError> {
        match &mut self.kind {
            ItemKind::Line(line) => {
                line.lay_between(&mut self.renderable, start, end);
                Ok(())
            }
            _ => Err(SceneError::NotALine(self.id.clone())),
        }
    }

    pub fn draw(&mut self) {
        self.renderable.draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cuboid_defaults_and_origin() {
        let item = Item::cuboid(100.0, 50.0, 25.0);
        assert_eq!(item.kind().name(), "Cuboid");
        assert_eq!(item.renderable().transform_origin(), "50px 25px 13px");
        assert!(item.renderable().has_class("cuboid"));
        assert!(item.id().as_str().starts_with("item-"));
    }

    #[test]
    fn cube_uses_size_for_width_and_height() {
        let item = Item::cube(40.0, Some(100.0));
        let c = item.as_cuboid().unwrap();
        assert_eq!((c.width, c.height, c.depth), (40.0, 40.0, 100.0));
        assert_eq!(item.kind().name(), "Cube");
        assert!(item.renderable().has_class("cube"));

        let plain = Item::cube(30.0, None);
        assert_eq!(plain.as_cuboid().unwrap().depth, 30.0);
    }

    #[test]
    fn resize_keeps_missing_dimensions() {
        let mut item = Item::cuboid(100.0, 100.0, 100.0);
        item.resize(Some(20.0), None, Some(60.0));
        let c = item.as_cuboid().unwrap();
        assert_eq!((c.width, c.height, c.depth), (20.0, 100.0, 60.0));
        assert_eq!(item.renderable().transform_origin(), "10px 50px 30px");
    }

    #[test]
    fn cuboid_center_rounds() {
        let mut item = Item::cuboid(15.0, 10.0, 5.0);
        item.renderable_mut()
            .pose_mut()
            .set_positions(Some(100.0), Some(0.0), Some(0.0));
        assert_eq!(item.center(), Some(Coords::new(108.0, 5.0, 3.0)));
        assert_eq!(Item::surface(10.0, 10.0).center(), None);
    }

    #[test]
    fn data_helpers() {
        let mut item = Item::surface(10.0, 10.0);
        item.set_data("owner", "alice").set_data("hp", 3);
        assert_eq!(item.data("owner"), Some(&Value::from("alice")));
        assert_eq!(item.data("missing"), None);
        assert_eq!(item.all_data().len(), 2);
        item.clear_data();
        assert!(item.all_data().is_empty());
    }

    #[test]
    fn horizontal_line() {
        let mut line = Item::line(2.0, "#f00");
        line.set_line_start(Coords::new(10.0, 10.0, 0.0)).unwrap();
        line.set_line_end(Coords::new(110.0, 10.0, 0.0)).unwrap();
        let l = line.as_line().unwrap();
        assert_eq!(l.length, 100.0);
        assert_eq!(line.position(), Coords::new(10.0, 10.0, 0.0));
        assert_eq!(line.rotation(), Coords::ZERO);
        assert_eq!(line.renderable().transform_origin(), "0 0");
    }

    #[test]
    fn vertical_and_depth_lines() {
        let mut line = Item::line(1.0, "#fff");
        line.set_line_start(Coords::ZERO).unwrap();
        line.set_line_end(Coords::new(0.0, 50.0, 0.0)).unwrap();
        assert_eq!(line.as_line().unwrap().length, 50.0);
        assert!(close(line.rotation().z, 90.0));

        line.set_line_end(Coords::new(0.0, 0.0, 80.0)).unwrap();
        assert_eq!(line.as_line().unwrap().length, 80.0);
        assert!(close(line.rotation().y, -90.0));
        assert!(close(line.rotation().z, 0.0));
    }

    #[test]
    fn diagonal_lines() {
        let mut line = Item::line(1.0, "#fff");
        line.set_line_start(Coords::ZERO).unwrap();

        line.set_line_end(Coords::new(30.0, 40.0, 0.0)).unwrap();
        assert_eq!(line.as_line().unwrap().length, 50.0);
        assert!(close(line.rotation().z, 40.0_f64.atan2(30.0).to_degrees()));

        line.set_line_end(Coords::new(100.0, 0.0, 100.0)).unwrap();
        assert_eq!(line.as_line().unwrap().length, 141.0);
        assert!(close(line.rotation().y, -45.0));

        line.set_line_end(Coords::new(-20.0, 0.0, 0.0)).unwrap();
        assert!(close(line.rotation().z, 180.0));
    }

    #[test]
    fn full_3d_line_has_all_rotations() {
        let mut line = Item::line(1.0, "#fff");
        line.set_line_start(Coords::ZERO).unwrap();
        line.set_line_end(Coords::new(10.0, 10.0, 10.0)).unwrap();
        let r = line.rotation();
        assert_eq!(line.as_line().unwrap().length, 17.0);
        assert!(r.x != 0.0 && r.y != 0.0);
        assert_eq!(r.z, 0.0);
    }

    #[test]
    fn line_ops_reject_other_kinds() {
        let mut cube = Item::cube(10.0, None);
        let err = cube.set_line_start(Coords::ZERO).unwrap_err();
        assert!(matches!(err, SceneError::NotALine(_)));
    }

    #[test]
    fn reverse_predicate() {
        let a = Coords::new(0.0, 0.0, 0.0);
        let b = Coords::new(10.0, 10.0, 0.0);
        assert!(!should_reverse(a, b));
        assert!(should_reverse(b, a));
        assert!(should_reverse(Coords::new(0.0, 0.0, 5.0), Coords::ZERO));
        assert!(!should_reverse(Coords::ZERO, Coords::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn surface_content() {
        let mut item = Item::surface(200.0, 80.0);
        item.as_surface_mut().unwrap().set_content("<b>hi</b>");
        assert_eq!(item.as_surface().unwrap().content.as_deref(), Some("<b>hi</b>"));
        item.resize(Some(10.0), None, Some(99.0));
        assert_eq!(item.as_surface().unwrap().width, 10.0);
        assert_eq!(item.as_surface().unwrap().height, 80.0);
    }
}
