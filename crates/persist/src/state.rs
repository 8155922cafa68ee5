use std::collections::BTreeMap;

use displayblock_common::{Coords, ItemId};
use displayblock_kernel::item::{DEFAULT_LINE_COLOR, DEFAULT_LINE_WEIGHT, DEFAULT_SIZE};
use displayblock_kernel::{DEFAULT_SCENE, Item, ItemKind, Scene, Viewport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info_span, warn};

use crate::error::StateError;

/// The complete exported state of a viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    pub viewport: ViewportState,
    #[serde(default)]
    pub scenes: BTreeMap<String, SceneState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Coords>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Coords>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Coords>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Coords>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

/// Width/height for every sized item, plus depth for boxes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

/// The two items a line is tied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub start: ItemId,
    pub end: ItemId,
}

/// One item. Fields that do not apply to the item's type are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: Coords,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Coords>,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Coords>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Coords>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionRecord>,
}

impl ItemRecord {
    fn new(kind: &str, position: Coords) -> Self {
        Self {
            id: None,
            kind: kind.to_owned(),
            position,
            rotation: None,
            data: Map::new(),
            dimensions: None,
            top_content: None,
            front_content: None,
            content: None,
            weight: None,
            color: None,
            start: None,
            end: None,
            connection: None,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

/// Converts between a live viewport and its [`StateDocument`].
pub struct State;

impl State {
    /// Capture the viewport, its scenes and every item.
    pub fn export(viewport: &Viewport) -> StateDocument {
        let pose = viewport.renderable().pose();
        StateDocument {
            viewport: ViewportState {
                width: viewport.width(),
                height: viewport.height(),
                position: Some(pose.positions()),
                rotation: Some(pose.rotations()),
            },
            scenes: viewport
                .scenes()
                .map(|scene| (scene.name().to_owned(), export_scene(scene)))
                .collect(),
        }
    }

    /// Pretty-printed JSON of [`State::export`].
    pub fn to_json(viewport: &Viewport) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(&Self::export(viewport))?)
    }

    /// Build a fresh viewport from a document.
    pub fn import(doc: &StateDocument) -> Viewport {
        let mut viewport = Viewport::new(doc.viewport.width, doc.viewport.height);
        Self::import_into(&mut viewport, doc);
        viewport
    }

    /// Replace the contents of `viewport` with the document. Unknown item
    /// types are skipped with a warning.
    pub fn import_into(viewport: &mut Viewport, doc: &StateDocument) {
        let _span = info_span!("state_import", scenes = doc.scenes.len()).entered();
        viewport.clear();

        let pose = viewport.renderable_mut().pose_mut();
        if let Some(p) = doc.viewport.position {
            pose.set_position(p);
        }
        if let Some(r) = doc.viewport.rotation {
            pose.set_rotations(Some(r.x), Some(r.y), Some(r.z));
        }

        for (name, scene_state) in &doc.scenes {
            if name != DEFAULT_SCENE {
                viewport.create_scene(name);
            }
            import_scene(viewport, name, scene_state);
        }

        viewport.draw();
        debug!(items = viewport.items().len(), "state imported");
    }

    /// Parse and import. Malformed JSON is logged and yields `None`.
    pub fn from_json(json: &str) -> Option<Viewport> {
        match Self::try_from_json(json) {
            Ok(viewport) => Some(viewport),
            Err(err) => {
                error!(error = %err, "failed to parse state JSON");
                None
            }
        }
    }

    pub fn try_from_json(json: &str) -> Result<Viewport, StateError> {
        let doc: StateDocument = serde_json::from_str(json)?;
        Ok(Self::import(&doc))
    }
}

fn export_scene(scene: &Scene) -> SceneState {
    let pose = scene.renderable().pose();
    SceneState {
        name: scene.name().to_owned(),
        position: Some(pose.positions()),
        rotation: Some(pose.rotations()),
        items: scene
            .slots()
            .map(|slot| export_item(&slot.item, slot.position()))
            .collect(),
    }
}

fn export_item(item: &Item, position: Coords) -> ItemRecord {
    let mut record = ItemRecord::new(item.kind().name(), position);
    record.id = Some(item.id().clone());
    record.rotation = Some(item.rotation());
    record.data = item.all_data().clone();

    match item.kind() {
        ItemKind::Cuboid(c) | ItemKind::Cube(c) => {
            record.dimensions = Some(Dimensions {
                width: Some(c.width),
                height: Some(c.height),
                depth: Some(c.depth),
            });
            record.top_content = non_empty(&c.top_content);
            record.front_content = non_empty(&c.front_content);
        }
        ItemKind::Line(l) => {
            record.weight = Some(l.weight);
            record.color = Some(l.color.clone());
            record.start = Some(l.start);
            record.end = Some(l.end);
            record.connection = l.connected_items().map(|(start, end)| ConnectionRecord {
                start: start.clone(),
                end: end.clone(),
            });
        }
        ItemKind::Surface(s) => {
            record.dimensions = Some(Dimensions {
                width: Some(s.width),
                height: Some(s.height),
                depth: None,
            });
            record.content = s.content.clone();
        }
    }
    record
}

fn import_scene(viewport: &mut Viewport, name: &str, state: &SceneState) {
    if let Some(scene) = viewport.scene_mut(name) {
        let pose = scene.renderable_mut().pose_mut();
        if let Some(p) = state.position {
            pose.set_position(p);
        }
        if let Some(r) = state.rotation {
            pose.set_rotations(Some(r.x), Some(r.y), Some(r.z));
        }
    }

    let mut connections = Vec::new();
    for record in &state.items {
        let Some(item) = build_item(record) else {
            warn!(kind = %record.kind, scene = name, "unknown item type, skipped");
            continue;
        };
        if let Some(conn) = &record.connection {
            connections.push((item.id().clone(), conn.clone()));
        }
        let p = record.position;
        viewport.add_item(item, p.x, p.y, p.z, false, name);
    }

    if let Some(scene) = viewport.scene_mut(name) {
        for (line, conn) in connections {
            if let Err(err) = scene.connect(&line, &conn.start, &conn.end) {
                warn!(line = %line, error = %err, "could not restore line connection");
            }
        }
    }
}

fn build_item(record: &ItemRecord) -> Option<Item> {
    let dims = record.dimensions.unwrap_or_default();
    let mut item = match record.kind.as_str() {
        "Cube" => {
            let mut cube = Item::cube(
                dims.width.unwrap_or(DEFAULT_SIZE),
                Some(dims.depth.or(dims.width).unwrap_or(DEFAULT_SIZE)),
            );
            // A resized cube may no longer be square on its face.
            if dims.height.is_some() {
                cube.resize(None, dims.height, None);
            }
            cube
        }
        "Cuboid" => Item::cuboid(
            dims.width.unwrap_or(DEFAULT_SIZE),
            dims.height.unwrap_or(DEFAULT_SIZE),
            dims.depth.unwrap_or(DEFAULT_SIZE),
        ),
        "Line" => {
            let mut line = Item::line(
                record.weight.unwrap_or(DEFAULT_LINE_WEIGHT),
                record.color.as_deref().unwrap_or(DEFAULT_LINE_COLOR),
            );
            if let Some(start) = record.start {
                line.set_line_start(start).ok()?;
            }
            if let Some(end) = record.end {
                line.set_line_end(end).ok()?;
            }
            line
        }
        "Surface" => {
            let mut surface = Item::surface(
                dims.width.unwrap_or(DEFAULT_SIZE),
                dims.height.unwrap_or(DEFAULT_SIZE),
            );
            if let (Some(content), Some(s)) = (&record.content, surface.as_surface_mut()) {
                s.set_content(content.as_str());
            }
            surface
        }
        _ => return None,
    };

    if let Some(id) = &record.id {
        item.set_id(id.clone());
    }
    if let Some(rotation) = record.rotation {
        item.set_rotations(rotation);
    }
    for (key, value) in &record.data {
        item.set_data(key.as_str(), value.clone());
    }
    if let Some(c) = item.as_cuboid_mut() {
        if let Some(top) = &record.top_content {
            c.set_top_content(top.as_str());
        }
        if let Some(front) = &record.front_content {
            c.set_front_content(front.as_str());
        }
    }
    Some(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> Viewport {
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport
            .renderable_mut()
            .pose_mut()
            .set_positions(Some(12.0), Some(-4.0), Some(0.0))
            .set_rotations(Some(-20.0), Some(35.0), None);

        let mut cube = Item::cube(40.0, Some(60.0)).with_id("cube-1");
        cube.set_data("kind", "crate").set_data("hp", 3);
        if let Some(c) = cube.as_cuboid_mut() {
            c.set_top_content("<b>top</b>");
        }
        viewport.add_item(cube, 10.0, 20.0, 0.0, false, DEFAULT_SCENE);

        let mut cuboid = Item::cuboid(100.0, 10.0, 30.0).with_id("cuboid-1");
        cuboid.set_rotations(Coords::new(0.0, 0.0, 45.0));
        if let Some(c) = cuboid.as_cuboid_mut() {
            c.set_front_content("front");
        }
        viewport.add_item(cuboid, 200.0, 20.0, 0.0, false, DEFAULT_SCENE);

        let line = Item::line(2.0, "#f0f").with_id("line-1");
        viewport.add_item(line, 0.0, 0.0, 0.0, false, DEFAULT_SCENE);
        if let Some(scene) = viewport.scene_mut(DEFAULT_SCENE) {
            scene
                .connect(&ItemId::from("line-1"), &ItemId::from("cube-1"), &ItemId::from("cuboid-1"))
                .unwrap();
        }

        let mut surface = Item::surface(320.0, 200.0).with_id("surface-1");
        if let Some(s) = surface.as_surface_mut() {
            s.set_content("hello");
        }
        viewport.add_item(surface, 5.0, 5.0, -50.0, false, "hud");
        viewport
            .scene_mut("hud")
            .unwrap()
            .renderable_mut()
            .pose_mut()
            .set_z(25.0);
        viewport
    }

    #[test]
    fn export_shape() {
        let doc = State::export(&populated());
        assert_eq!(doc.viewport.width, 800.0);
        assert_eq!(doc.viewport.position, Some(Coords::new(12.0, -4.0, 0.0)));
        assert_eq!(doc.scenes.len(), 2);

        let default = &doc.scenes["default"];
        let cube = default.items.iter().find(|r| r.kind == "Cube").unwrap();
        assert_eq!(cube.position, Coords::new(10.0, 20.0, 0.0));
        assert_eq!(
            cube.dimensions,
            Some(Dimensions {
                width: Some(40.0),
                height: Some(40.0),
                depth: Some(60.0)
            })
        );
        assert_eq!(cube.top_content.as_deref(), Some("<b>top</b>"));
        assert_eq!(cube.front_content, None);
        assert_eq!(cube.data["hp"], Value::from(3));

        let hud = &doc.scenes["hud"];
        assert_eq!(hud.position, Some(Coords::new(0.0, 0.0, 25.0)));
        assert_eq!(hud.items[0].dimensions.unwrap().depth, None);
    }

    #[test]
    fn json_uses_wire_names() {
        let json = State::to_json(&populated()).unwrap();
        assert!(json.contains("\"type\": \"Cuboid\""));
        assert!(json.contains("\"topContent\": \"<b>top</b>\""));
        assert!(json.contains("\"frontContent\": \"front\""));
        assert!(!json.contains("top_content"));
        assert!(json.contains("\n  \"viewport\""));
    }

    #[test]
    fn round_trip_preserves_every_item_type() {
        let original = State::export(&populated());
        let json = serde_json::to_string(&original).unwrap();
        let restored = State::try_from_json(&json).unwrap();
        assert_eq!(State::export(&restored), original);

        let line = restored
            .find_item(&ItemId::from("line-1"))
            .unwrap()
            .1
            .as_line()
            .unwrap();
        let (start, end) = line.connected_items().unwrap();
        assert_eq!((start.as_str(), end.as_str()), ("cube-1", "cuboid-1"));
    }

    #[test]
    fn resized_cube_keeps_its_height() {
        let mut viewport = Viewport::new(100.0, 100.0);
        let mut cube = Item::cube(40.0, Some(60.0)).with_id("tall");
        cube.resize(None, Some(70.0), None);
        viewport.add_item(cube, 0.0, 0.0, 0.0, false, DEFAULT_SCENE);

        let before = State::export(&viewport);
        let restored = State::import(&before);
        assert_eq!(State::export(&restored), before);

        let c = restored.find_item(&ItemId::from("tall")).unwrap().1.as_cuboid().unwrap();
        assert_eq!((c.width, c.height, c.depth), (40.0, 70.0, 60.0));
    }

    #[test]
    fn import_clears_existing_content() {
        let doc = State::export(&populated());
        let mut target = Viewport::new(800.0, 600.0);
        target.add_item(Item::cube(5.0, None).with_id("stale"), 0.0, 0.0, 0.0, false, DEFAULT_SCENE);
        State::import_into(&mut target, &doc);
        assert!(target.find_item(&ItemId::from("stale")).is_none());
        assert_eq!(target.items().len(), 4);
        assert!(target.renderable().is_rendered());
    }

    #[test]
    fn unknown_types_are_skipped() {
        let json = r#"{
            "viewport": {"width": 100, "height": 100},
            "scenes": {"default": {"name": "default", "items": [
                {"type": "Teapot", "position": {"x": 1, "y": 2, "z": 3}},
                {"id": "c", "type": "Cuboid", "position": {"x": 1, "y": 2, "z": 3}}
            ]}}
        }"#;
        let viewport = State::from_json(json).unwrap();
        assert_eq!(viewport.items().len(), 1);
        let cuboid = viewport.find_item(&ItemId::from("c")).unwrap().1;
        let c = cuboid.as_cuboid().unwrap();
        assert_eq!((c.width, c.height, c.depth), (100.0, 100.0, 100.0));
        assert_eq!(cuboid.position(), Coords::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn malformed_json_yields_none() {
        assert!(State::from_json("{not json").is_none());
        assert!(matches!(State::try_from_json("[]"), Err(StateError::Json(_))));
    }

    #[test]
    fn free_line_round_trip() {
        let mut viewport = Viewport::new(100.0, 100.0);
        let id = viewport.add_item(Item::line(1.0, "#fff").with_id("l"), 0.0, 0.0, 0.0, false, DEFAULT_SCENE);
        viewport
            .scene_mut(DEFAULT_SCENE)
            .unwrap()
            .set_line(&id, Coords::new(10.0, 10.0, 0.0), Coords::new(10.0, 70.0, 0.0))
            .unwrap();

        let restored = State::import(&State::export(&viewport));
        let item = restored.find_item(&id).unwrap().1;
        assert_eq!(item.position(), Coords::new(10.0, 10.0, 0.0));
        assert_eq!(item.as_line().unwrap().length, 60.0);
        assert_eq!(item.as_line().unwrap().end, Coords::new(10.0, 70.0, 0.0));
    }
}
