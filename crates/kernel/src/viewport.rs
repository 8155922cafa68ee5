use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use displayblock_common::ItemId;
use tracing::{debug, warn};

use crate::animation::{AnimationFinished, AnimationOwner};
use crate::item::Item;
use crate::renderable::Renderable;
use crate::scene::Scene;

pub const DEFAULT_SCENE: &str = "default";

const AXIS_LENGTH: f64 = 2000.0;
const AXIS_THICKNESS: f64 = 3.0;

/// The root of the scene graph: a perspective container holding named scenes.
#[derive(Debug, Clone)]
pub struct Viewport {
    width: f64,
    height: f64,
    renderable: Renderable,
    scenes: BTreeMap<String, Scene>,
    items: Vec<ItemId>,
    center_origin: bool,
}

impl Viewport {
    /// A viewport with an empty `default` scene.
    pub fn new(width: f64, height: f64) -> Self {
        let mut viewport = Self {
            width,
            height,
            renderable: Renderable::new(),
            scenes: BTreeMap::new(),
            items: Vec::new(),
            center_origin: false,
        };
        viewport.create_scene(DEFAULT_SCENE);
        viewport
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn renderable(&self) -> &Renderable {
        &self.renderable
    }

    pub fn renderable_mut(&mut self) -> &mut Renderable {
        &mut self.renderable
    }

    /// When set, every added item is offset to the middle of the viewport.
    pub fn set_center_origin(&mut self, enabled: bool) {
        self.center_origin = enabled;
    }

    pub fn center_origin(&self) -> bool {
        self.center_origin
    }

    /// Create (or replace) a scene and generate it.
    pub fn create_scene(&mut self, name: &str) -> &mut Scene {
        let mut scene = Scene::new(name, self.width, self.height);
        scene.generate();
        debug!(scene = name, "scene created");
        self.add_scene(scene)
    }

    /// Insert a scene, replacing one with the same name.
    pub fn add_scene(&mut self, scene: Scene) -> &mut Scene {
        match self.scenes.entry(scene.name().to_owned()) {
            Entry::Vacant(slot) => slot.insert(scene),
            Entry::Occupied(mut slot) => {
                let old = slot.insert(scene);
                self.items.retain(|id| !old.contains(id));
                slot.into_mut()
            }
        }
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name)
    }

    pub fn default_scene(&self) -> Option<&Scene> {
        self.scene(DEFAULT_SCENE)
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Ids of every item added through the viewport, in insertion order.
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Add an item to `scene` (created when missing), optionally offset to
    /// the viewport middle, and refresh that scene.
    pub fn add_item(&mut self, item: Item, x: f64, y: f64, z: f64, centered: bool, scene: &str) -> ItemId {
        let (mut x, mut y) = (x, y);
        if centered || self.center_origin {
            x += self.width / 2.0;
            y += self.height / 2.0;
        }
        if !self.scenes.contains_key(scene) {
            self.create_scene(scene);
        }
        let id = item.id().clone();
        if let Some((owner, _)) = self.find_item(&id) {
            warn!(item = %id, scene = owner, "item id already in use, skipped");
            return id;
        }
        if let Some(target) = self.scenes.get_mut(scene) {
            target.add_item(item, x, y, z);
            target.refresh();
        }
        self.items.push(id.clone());
        id
    }

    /// Remove an item from whichever scene holds it.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<Item> {
        let removed = self.scenes.values_mut().find_map(|scene| scene.remove_item(id));
        if removed.is_some() {
            self.items.retain(|other| other != id);
        }
        removed
    }

    /// Find an item and the name of the scene holding it.
    pub fn find_item(&self, id: &ItemId) -> Option<(&str, &Item)> {
        self.scenes
            .values()
            .find_map(|scene| scene.item(id).map(|item| (scene.name(), item)))
    }

    /// Add three long thin cuboids marking the X, Y and Z axes through the
    /// viewport middle.
    pub fn add_axes(&mut self) -> [ItemId; 3] {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let half = AXIS_LENGTH / 2.0;
        let t = AXIS_THICKNESS;

        let mut axis = |item: Item, x: f64, y: f64, z: f64| {
            let mut item = item;
            item.add_class("axis");
            self.add_item(item, x, y, z, false, DEFAULT_SCENE)
        };
        [
            axis(Item::cuboid(AXIS_LENGTH, t, t), cx - half, cy, 0.0),
            axis(Item::cuboid(t, AXIS_LENGTH, t), cx, cy - half, 0.0),
            axis(Item::cuboid(t, t, AXIS_LENGTH), cx, cy, -half),
        ]
    }

    /// Generate every scene and mark the viewport rendered.
    pub fn draw(&mut self) {
        for scene in self.scenes.values_mut() {
            scene.generate();
        }
        self.renderable.draw();
    }

    /// Drop every item and every scene except an empty `default`.
    pub fn clear(&mut self) {
        self.scenes.clear();
        self.items.clear();
        self.create_scene(DEFAULT_SCENE);
    }

    /// Advance every animation in the tree to `timestamp` (milliseconds).
    pub fn frame(&mut self, timestamp: f64) -> Vec<AnimationFinished> {
        let mut finished: Vec<AnimationFinished> = self
            .renderable
            .frame(timestamp)
            .finished
            .into_iter()
            .map(|tween| AnimationFinished {
                owner: AnimationOwner::Viewport,
                tween,
            })
            .collect();
        for scene in self.scenes.values_mut() {
            finished.extend(scene.frame(timestamp));
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use displayblock_common::Coords;

    #[test]
    fn duplicate_ids_are_added_once() {
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport.add_item(Item::cube(10.0, None).with_id("dup"), 0.0, 0.0, 0.0, false, DEFAULT_SCENE);
        viewport.add_item(Item::cube(20.0, None).with_id("dup"), 0.0, 0.0, 0.0, false, "other");
        viewport.add_item(Item::cube(30.0, None).with_id("dup"), 0.0, 0.0, 0.0, false, DEFAULT_SCENE);
        assert_eq!(viewport.items().len(), 1);
        let (scene, item) = viewport.find_item(&ItemId::from("dup")).unwrap();
        assert_eq!(scene, DEFAULT_SCENE);
        assert_eq!(item.as_cuboid().unwrap().width, 10.0);
        assert!(viewport.scene("other").is_some_and(Scene::is_empty));
    }

    #[test]
    fn starts_with_default_scene() {
        let viewport = Viewport::new(800.0, 600.0);
        let scene = viewport.default_scene().unwrap();
        assert_eq!(scene.name(), "default");
        assert!(scene.renderable().is_rendered());
        assert!(viewport.items().is_empty());
    }

    #[test]
    fn add_item_centered() {
        let mut viewport = Viewport::new(800.0, 600.0);
        let id = viewport.add_item(Item::cube(10.0, None), 10.0, 20.0, 0.0, true, DEFAULT_SCENE);
        let (scene, item) = viewport.find_item(&id).unwrap();
        assert_eq!(scene, "default");
        assert_eq!(item.position(), Coords::new(410.0, 320.0, 0.0));
        assert_eq!(viewport.items().to_vec(), vec![id]);
    }

    #[test]
    fn center_origin_flag_applies_to_every_item() {
        let mut viewport = Viewport::new(100.0, 50.0);
        viewport.set_center_origin(true);
        let id = viewport.add_item(Item::cube(10.0, None), 0.0, 0.0, 0.0, false, DEFAULT_SCENE);
        assert_eq!(viewport.find_item(&id).unwrap().1.position(), Coords::new(50.0, 25.0, 0.0));
    }

    #[test]
    fn missing_scene_is_created() {
        let mut viewport = Viewport::new(100.0, 100.0);
        let id = viewport.add_item(Item::surface(5.0, 5.0), 1.0, 1.0, 1.0, false, "overlay");
        assert_eq!(viewport.scene("overlay").unwrap().len(), 1);
        assert_eq!(viewport.find_item(&id).unwrap().0, "overlay");
    }

    #[test]
    fn create_scene_replaces() {
        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.add_item(Item::cube(10.0, None), 0.0, 0.0, 0.0, false, "extra");
        viewport.create_scene("extra");
        assert!(viewport.scene("extra").unwrap().is_empty());
        assert!(viewport.items().is_empty());
    }

    #[test]
    fn axes_cross_the_middle() {
        let mut viewport = Viewport::new(800.0, 600.0);
        let [x, y, z] = viewport.add_axes();
        let scene = viewport.default_scene().unwrap();
        assert_eq!(scene.item(&x).unwrap().position(), Coords::new(-600.0, 300.0, 0.0));
        assert_eq!(scene.item(&y).unwrap().position(), Coords::new(400.0, -700.0, 0.0));
        assert_eq!(scene.item(&z).unwrap().position(), Coords::new(400.0, 300.0, -1000.0));
        assert!(scene.items().all(|i| i.renderable().has_class("axis")));
    }

    #[test]
    fn clear_keeps_empty_default() {
        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.add_axes();
        viewport.create_scene("other");
        viewport.clear();
        assert_eq!(viewport.scenes().count(), 1);
        assert!(viewport.default_scene().unwrap().is_empty());
        assert!(viewport.items().is_empty());
    }

    #[test]
    fn remove_item_updates_index() {
        let mut viewport = Viewport::new(100.0, 100.0);
        let id = viewport.add_item(Item::cube(10.0, None), 0.0, 0.0, 0.0, false, DEFAULT_SCENE);
        assert!(viewport.remove_item(&id).is_some());
        assert!(viewport.items().is_empty());
        assert!(viewport.remove_item(&id).is_none());
    }

    #[test]
    fn frame_reports_owners() {
        let mut viewport = Viewport::new(100.0, 100.0);
        let spin = viewport.renderable_mut().rotate_by(0.0, 90.0, 0.0, 10.0);
        let slide = viewport
            .scene_mut(DEFAULT_SCENE)
            .unwrap()
            .renderable_mut()
            .translate_by(5.0, 0.0, 0.0, 10.0);

        viewport.frame(0.0);
        let done = viewport.frame(20.0);
        assert_eq!(
            done,
            vec![
                AnimationFinished {
                    owner: AnimationOwner::Viewport,
                    tween: spin
                },
                AnimationFinished {
                    owner: AnimationOwner::Scene("default".into()),
                    tween: slide
                },
            ]
        );
        assert_eq!(viewport.renderable().pose().rotations().y, 90.0);
    }
}
