use std::collections::BTreeMap;

use displayblock_common::{Coords, ItemId, px};
use tracing::{debug, warn};

use crate::animation::{AnimationFinished, AnimationOwner};
use crate::error::SceneError;
use crate::item::Item;
use crate::renderable::Renderable;

/// An item together with the position it was placed at.
///
/// The slot is the authoritative placement: `refresh` re-applies it and
/// state export reads it.
#[derive(Debug, Clone)]
pub struct ItemSlot {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub item: Item,
}

impl ItemSlot {
    pub fn position(&self) -> Coords {
        Coords::new(self.x, self.y, self.z)
    }

    fn set_position(&mut self, position: Coords) {
        self.x = position.x;
        self.y = position.y;
        self.z = position.z;
    }
}

/// A named group of items sharing one transform (a "board").
#[derive(Debug, Clone)]
pub struct Scene {
    name: String,
    renderable: Renderable,
    items: BTreeMap<ItemId, ItemSlot>,
}

impl Scene {
    /// Create an empty scene whose transform origin is the middle of a
    /// `width × height` viewport.
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        let mut renderable = Renderable::new();
        renderable.add_class("board");
        renderable.set_transform_origin(format!("{} {}", px(width / 2.0), px(height / 2.0)));
        Self {
            name: name.into(),
            renderable,
            items: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn renderable(&self) -> &Renderable {
        &self.renderable
    }

    pub fn renderable_mut(&mut self) -> &mut Renderable {
        &mut self.renderable
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Place an item at `(x, y, z)` and draw it. Returns its id.
    ///
    /// An id already in the scene keeps its existing item; the new one is
    /// dropped with a warning.
    pub fn add_item(&mut self, mut item: Item, x: f64, y: f64, z: f64) -> ItemId {
        let id = item.id().clone();
        if self.items.contains_key(&id) {
            warn!(scene = %self.name, item = %id, "duplicate item id, skipped");
            return id;
        }
        item.renderable_mut()
            .pose_mut()
            .set_positions(Some(x), Some(y), Some(z));
        item.draw();
        debug!(scene = %self.name, item = %id, kind = item.kind().name(), "item added");
        self.items.insert(id.clone(), ItemSlot { x, y, z, item });
        id
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id).map(|slot| &slot.item)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.get_mut(id).map(|slot| &mut slot.item)
    }

    pub fn slot(&self, id: &ItemId) -> Option<&ItemSlot> {
        self.items.get(id)
    }

    pub fn slots(&self) -> impl Iterator<Item = &ItemSlot> {
        self.items.values()
    }

    /// Items in id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values().map(|slot| &slot.item)
    }

    /// Remove an item and forget every connection that referenced it.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<Item> {
        let slot = self.items.remove(id)?;

        for line_id in slot.item.renderable().connections() {
            if let Some(line) = self.item_mut(line_id) {
                line.detach_line();
            }
            for other in self.items.values_mut() {
                other.item.renderable_mut().remove_connection(line_id);
            }
        }
        if let Some((start, end)) = slot.item.as_line().and_then(|l| l.connected_items()) {
            for end_id in [start, end] {
                if let Some(other) = self.item_mut(end_id) {
                    other.renderable_mut().remove_connection(id);
                }
            }
        }

        debug!(scene = %self.name, item = %id, "item removed");
        Some(slot.item)
    }

    /// Move an item to a new slot position and re-lay any lines attached to it.
    pub fn move_item(&mut self, id: &ItemId, position: Coords) -> Result<(), SceneError> {
        let slot = self
            .items
            .get_mut(id)
            .ok_or_else(|| SceneError::ItemNotFound(id.clone()))?;
        slot.set_position(position);
        slot.item.renderable_mut().pose_mut().set_position(position);
        slot.item.draw();
        self.update_connections(id)
    }

    /// Point a free line from `start` to `end`, keeping its slot in step.
    pub fn set_line(&mut self, id: &ItemId, start: Coords, end: Coords) -> Result<(), SceneError> {
        let slot = self
            .items
            .get_mut(id)
            .ok_or_else(|| SceneError::ItemNotFound(id.clone()))?;
        slot.item.set_line_start(start)?.set_line_end(end)?;
        slot.set_position(start);
        Ok(())
    }

    /// Tie a line to two items. The line is laid between their centers now
    /// and again whenever either of them moves.
    pub fn connect(&mut self, line_id: &ItemId, start_id: &ItemId, end_id: &ItemId) -> Result<(), SceneError> {
        for id in [start_id, end_id] {
            let item = self
                .item(id)
                .ok_or_else(|| SceneError::ItemNotFound(id.clone()))?;
            if item.center().is_none() {
                return Err(SceneError::NoCenter(id.clone()));
            }
        }
        let line = self
            .item_mut(line_id)
            .ok_or_else(|| SceneError::ItemNotFound(line_id.clone()))?;
        line.attach_line(start_id.clone(), end_id.clone())?;

        for id in [start_id, end_id] {
            if let Some(item) = self.item_mut(id) {
                item.renderable_mut().add_connection(line_id.clone());
            }
        }
        debug!(scene = %self.name, line = %line_id, start = %start_id, end = %end_id, "line connected");
        self.relayout_line(line_id)
    }

    /// Re-lay every line attached to `id`.
    pub fn update_connections(&mut self, id: &ItemId) -> Result<(), SceneError> {
        let lines = self
            .item(id)
            .ok_or_else(|| SceneError::ItemNotFound(id.clone()))?
            .renderable()
            .connections()
            .to_vec();
        for line in &lines {
            self.relayout_line(line)?;
        }
        Ok(())
    }

    /// Lay a connected line between the current centers of its two items.
    /// Unconnected lines are left alone.
    pub fn relayout_line(&mut self, line_id: &ItemId) -> Result<(), SceneError> {
        let line = self
            .item(line_id)
            .ok_or_else(|| SceneError::ItemNotFound(line_id.clone()))?;
        let Some((start_id, end_id)) = line
            .as_line()
            .ok_or_else(|| SceneError::NotALine(line_id.clone()))?
            .connected_items()
        else {
            return Ok(());
        };
        let (start_id, end_id) = (start_id.clone(), end_id.clone());
        let start = self.center_of(&start_id)?;
        let end = self.center_of(&end_id)?;

        let Some(slot) = self.items.get_mut(line_id) else {
            return Err(SceneError::ItemNotFound(line_id.clone()));
        };
        slot.item.lay_line_between(start, end)?;
        let position = slot.item.position();
        slot.set_position(position);
        Ok(())
    }

    fn center_of(&self, id: &ItemId) -> Result<Coords, SceneError> {
        self.item(id)
            .ok_or_else(|| SceneError::ItemNotFound(id.clone()))?
            .center()
            .ok_or_else(|| SceneError::NoCenter(id.clone()))
    }

    fn connected_lines(&self) -> Vec<ItemId> {
        self.items()
            .filter(|item| item.as_line().and_then(|l| l.connected_items()).is_some())
            .map(|item| item.id().clone())
            .collect()
    }

    fn relayout_lines(&mut self, lines: &[ItemId]) {
        for line in lines {
            if let Err(err) = self.relayout_line(line) {
                warn!(scene = %self.name, line = %line, error = %err, "could not lay line");
            }
        }
    }

    /// Re-apply every slot position to its item, draw it, then re-lay lines.
    pub fn refresh(&mut self) {
        for slot in self.items.values_mut() {
            let position = slot.position();
            slot.item.renderable_mut().pose_mut().set_position(position);
            slot.item.draw();
        }
        let lines = self.connected_lines();
        self.relayout_lines(&lines);
    }

    /// Refresh all items and mark the scene itself rendered.
    pub fn generate(&mut self) {
        self.refresh();
        self.renderable.draw();
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Advance the scene's own animations and those of its items.
    pub fn frame(&mut self, timestamp: f64) -> Vec<AnimationFinished> {
        let mut finished: Vec<AnimationFinished> = self
            .renderable
            .frame(timestamp)
            .finished
            .into_iter()
            .map(|tween| AnimationFinished {
                owner: AnimationOwner::Scene(self.name.clone()),
                tween,
            })
            .collect();

        let mut moved = Vec::new();
        for (id, slot) in &mut self.items {
            let report = slot.item.renderable_mut().frame(timestamp);
            if report.moved {
                let position = slot.item.position();
                slot.set_position(position);
                moved.push(id.clone());
            }
            finished.extend(report.finished.into_iter().map(|tween| AnimationFinished {
                owner: AnimationOwner::Item {
                    scene: self.name.clone(),
                    id: id.clone(),
                },
                tween,
            }));
        }

        let mut lines = Vec::new();
        for id in &moved {
            if let Some(item) = self.item(id) {
                lines.extend(item.renderable().connections().iter().cloned());
            }
        }
        self.relayout_lines(&lines);
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_two_boxes() -> (Scene, ItemId, ItemId, ItemId) {
        let mut scene = Scene::new("default", 800.0, 600.0);
        let a = scene.add_item(Item::cuboid(10.0, 10.0, 10.0), 0.0, 0.0, 0.0);
        let b = scene.add_item(Item::cuboid(10.0, 10.0, 10.0), 100.0, 0.0, 0.0);
        let line = scene.add_item(Item::line(1.0, "#fff"), 0.0, 0.0, 0.0);
        (scene, a, b, line)
    }

    #[test]
    fn duplicate_ids_keep_the_first_item() {
        let mut scene = Scene::new("default", 100.0, 100.0);
        scene.add_item(Item::cube(10.0, None).with_id("dup"), 1.0, 0.0, 0.0);
        scene.add_item(Item::surface(5.0, 5.0).with_id("dup"), 9.0, 0.0, 0.0);
        assert_eq!(scene.len(), 1);
        let slot = scene.slot(&ItemId::from("dup")).unwrap();
        assert_eq!(slot.x, 1.0);
        assert!(slot.item.as_cuboid().is_some());
    }

    #[test]
    fn scene_origin_is_viewport_middle() {
        let scene = Scene::new("main", 800.0, 601.0);
        assert_eq!(scene.renderable().transform_origin(), "400px 300.5px");
        assert!(scene.renderable().has_class("board"));
        assert!(scene.is_empty());
    }

    #[test]
    fn add_item_places_and_draws() {
        let mut scene = Scene::new("default", 100.0, 100.0);
        let id = scene.add_item(Item::cube(10.0, None), 5.0, 6.0, 7.0);
        let item = scene.item(&id).unwrap();
        assert_eq!(item.position(), Coords::new(5.0, 6.0, 7.0));
        assert!(item.renderable().is_rendered());
        assert_eq!(scene.slot(&id).unwrap().position(), Coords::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn connect_lays_line_between_centers() {
        let (mut scene, a, b, line) = scene_with_two_boxes();
        scene.connect(&line, &a, &b).unwrap();

        let l = scene.item(&line).unwrap();
        assert_eq!(l.position(), Coords::new(5.0, 5.0, 5.0));
        assert_eq!(l.as_line().unwrap().length, 100.0);
        assert_eq!(scene.slot(&line).unwrap().position(), Coords::new(5.0, 5.0, 5.0));
        assert_eq!(scene.item(&a).unwrap().renderable().connections().to_vec(), vec![line.clone()]);
    }

    #[test]
    fn moving_an_end_relays_the_line() {
        let (mut scene, a, b, line) = scene_with_two_boxes();
        scene.connect(&line, &a, &b).unwrap();
        scene.move_item(&b, Coords::new(0.0, 200.0, 0.0)).unwrap();

        let l = scene.item(&line).unwrap();
        assert_eq!(l.as_line().unwrap().length, 200.0);
        assert!((l.rotation().z - 90.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_pair_swaps_ends() {
        let (mut scene, a, b, line) = scene_with_two_boxes();
        scene.connect(&line, &b, &a).unwrap();
        let l = scene.item(&line).unwrap();
        assert!(l.as_line().unwrap().is_reversed());
        assert_eq!(l.position(), Coords::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn connect_errors() {
        let (mut scene, a, b, line) = scene_with_two_boxes();
        let missing = ItemId::from("nope");
        assert_eq!(
            scene.connect(&line, &a, &missing),
            Err(SceneError::ItemNotFound(missing.clone()))
        );
        assert_eq!(scene.connect(&a, &b, &a), Err(SceneError::NotALine(a.clone())));

        let surface = scene.add_item(Item::surface(10.0, 10.0), 0.0, 0.0, 0.0);
        assert_eq!(
            scene.connect(&line, &a, &surface),
            Err(SceneError::NoCenter(surface.clone()))
        );
    }

    #[test]
    fn removing_an_end_detaches_the_line() {
        let (mut scene, a, b, line) = scene_with_two_boxes();
        scene.connect(&line, &a, &b).unwrap();
        scene.remove_item(&a).unwrap();
        assert!(scene.item(&line).unwrap().as_line().unwrap().connected_items().is_none());
        assert!(scene.item(&b).unwrap().renderable().connections().is_empty());
        assert!(scene.move_item(&b, Coords::ZERO).is_ok());
    }

    #[test]
    fn removing_the_line_clears_connections() {
        let (mut scene, a, b, line) = scene_with_two_boxes();
        scene.connect(&line, &a, &b).unwrap();
        scene.remove_item(&line).unwrap();
        assert!(scene.item(&a).unwrap().renderable().connections().is_empty());
        assert!(scene.item(&b).unwrap().renderable().connections().is_empty());
    }

    #[test]
    fn refresh_reapplies_slots() {
        let mut scene = Scene::new("default", 100.0, 100.0);
        let id = scene.add_item(Item::cube(10.0, None), 1.0, 2.0, 3.0);
        scene.item_mut(&id)
            .unwrap()
            .renderable_mut()
            .pose_mut()
            .set_x(99.0);
        scene.generate();
        assert_eq!(scene.item(&id).unwrap().position().x, 1.0);
        assert!(scene.renderable().is_rendered());
    }

    #[test]
    fn free_line_keeps_slot_in_step() {
        let mut scene = Scene::new("default", 100.0, 100.0);
        let id = scene.add_item(Item::line(1.0, "#fff"), 0.0, 0.0, 0.0);
        scene
            .set_line(&id, Coords::new(10.0, 0.0, 0.0), Coords::new(10.0, 30.0, 0.0))
            .unwrap();
        scene.refresh();
        let item = scene.item(&id).unwrap();
        assert_eq!(item.position(), Coords::new(10.0, 0.0, 0.0));
        assert_eq!(item.as_line().unwrap().length, 30.0);
    }

    #[test]
    fn frame_syncs_slots_and_lines() {
        let (mut scene, a, b, line) = scene_with_two_boxes();
        scene.connect(&line, &a, &b).unwrap();
        let tween = scene
            .item_mut(&b)
            .unwrap()
            .renderable_mut()
            .translate_by(100.0, 0.0, 0.0, 100.0);

        assert!(scene.frame(0.0).is_empty());
        scene.frame(50.0);
        assert_eq!(scene.slot(&b).unwrap().x, 150.0);
        assert_eq!(scene.item(&line).unwrap().as_line().unwrap().length, 150.0);

        let done = scene.frame(150.0);
        assert_eq!(
            done,
            vec![AnimationFinished {
                owner: AnimationOwner::Item {
                    scene: "default".into(),
                    id: b.clone()
                },
                tween
            }]
        );
        assert_eq!(scene.slot(&b).unwrap().x, 200.0);
        assert_eq!(scene.item(&line).unwrap().as_line().unwrap().length, 200.0);
    }
}
