//! Scene arena holding every drawable group
//!
//! Groups are addressed by [`ItemId`], a slot index plus generation, so a
//! stale id never aliases a newer group. Presentations register the groups
//! they produce under `(owner, area id)`, which is how a parent finds a
//! child's drawable for a placement record without borrowing the child.
//!
//! Removal is deferred: [`Scene::schedule_removal`] detaches a group and
//! forgets its registration, but the group stays readable until
//! [`Scene::flush_removals`] runs at the end of the event-processing turn.
//! Children attached with [`Scene::adopt`] belong to their parent and are
//! removed with it; other children are only detached.

use crate::{GraphicsGroup, Point, Rect, RenderError, Result};
use doc_model::NodeId;
use std::collections::HashMap;

/// Handle of a group in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId {
    index: u32,
    generation: u32,
}

impl ItemId {
    fn idx(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug)]
struct SceneNode {
    generation: u32,
    group: GraphicsGroup,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    /// Removed together with the parent
    owned: bool,
    scheduled: bool,
}

/// Arena of drawable groups
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<SceneNode>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    areas: HashMap<(NodeId, usize), ItemId>,
    registrations: HashMap<ItemId, Vec<(NodeId, usize)>>,
    pending_removal: Vec<ItemId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached group
    pub fn insert(&mut self, group: GraphicsGroup) -> ItemId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };

        self.nodes[idx] = Some(SceneNode {
            generation,
            group,
            parent: None,
            children: Vec::new(),
            owned: false,
            scheduled: false,
        });

        ItemId {
            index: idx as u32,
            generation,
        }
    }

    fn node(&self, id: ItemId) -> Option<&SceneNode> {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|node| node.generation == id.generation)
    }

    fn node_mut(&mut self, id: ItemId) -> Option<&mut SceneNode> {
        self.nodes
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|node| node.generation == id.generation)
    }

    /// Whether `id` refers to a live group, including one scheduled for removal
    pub fn contains(&self, id: ItemId) -> bool {
        self.node(id).is_some()
    }

    pub fn get(&self, id: ItemId) -> Option<&GraphicsGroup> {
        self.node(id).map(|node| &node.group)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut GraphicsGroup> {
        self.node_mut(id).map(|node| &mut node.group)
    }

    /// Like [`Scene::get_mut`] but reports a stale id as an error
    pub fn require_mut(&mut self, id: ItemId) -> Result<&mut GraphicsGroup> {
        self.get_mut(id).ok_or(RenderError::StaleItem)
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.node(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Make `child` a child of `parent`, detaching it from any previous parent
    pub fn attach(&mut self, child: ItemId, parent: ItemId) {
        if child == parent || !self.contains(parent) || !self.contains(child) {
            return;
        }
        if self.parent(child) == Some(parent) {
            return;
        }

        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Attach `child` to `parent` so that it is removed along with it
    pub fn adopt(&mut self, child: ItemId, parent: ItemId) {
        self.attach(child, parent);
        if self.parent(child) != Some(parent) {
            return;
        }
        if let Some(node) = self.node_mut(child) {
            node.owned = true;
        }
    }

    /// Remove `child` from its parent
    pub fn detach(&mut self, child: ItemId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
            node.owned = false;
        }
    }

    /// Position a group within its parent
    pub fn set_position(&mut self, id: ItemId, position: Point) {
        if let Some(group) = self.get_mut(id) {
            group.set_position(position);
        }
    }

    /// Bounds of a group in scene coordinates
    pub fn scene_rect(&self, id: ItemId) -> Option<Rect> {
        let group = self.get(id)?;
        let mut rect = group.bounding_rect();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            let origin = self.get(parent)?.position();
            rect.x += origin.x;
            rect.y += origin.y;
            current = self.parent(parent);
        }
        Some(rect)
    }

    // -------------------------------------------------------------------------
    // Area registry
    // -------------------------------------------------------------------------

    /// Register `item` as area `area_id` of presentation `owner`
    pub fn register_area(&mut self, owner: NodeId, area_id: usize, item: ItemId) {
        let key = (owner, area_id);
        if let Some(previous) = self.areas.insert(key, item) {
            if previous == item {
                return;
            }
            if let Some(keys) = self.registrations.get_mut(&previous) {
                keys.retain(|k| *k != key);
            }
        }
        self.registrations.entry(item).or_default().push(key);
    }

    fn unregister(&mut self, item: ItemId) {
        for key in self.registrations.remove(&item).unwrap_or_default() {
            if self.areas.get(&key) == Some(&item) {
                self.areas.remove(&key);
            }
        }
    }

    /// The group registered as area `area_id` of `owner`
    pub fn area_item(&self, owner: NodeId, area_id: usize) -> Option<ItemId> {
        self.areas
            .get(&(owner, area_id))
            .copied()
            .filter(|id| self.contains(*id))
    }

    // -------------------------------------------------------------------------
    // Deferred removal
    // -------------------------------------------------------------------------

    /// Detach a group and queue it for deletion, along with the children it
    /// adopted. The group stays readable until [`Scene::flush_removals`].
    pub fn schedule_removal(&mut self, id: ItemId) {
        let mut queue = vec![id];
        while let Some(current) = queue.pop() {
            let Some(node) = self.node_mut(current) else {
                continue;
            };
            if node.scheduled {
                continue;
            }
            node.scheduled = true;

            let owned: Vec<ItemId> = self
                .children(current)
                .iter()
                .copied()
                .filter(|child| self.node(*child).is_some_and(|n| n.owned))
                .collect();
            self.detach(current);
            self.unregister(current);
            self.pending_removal.push(current);
            queue.extend(owned);
        }
    }

    pub fn pending_removals(&self) -> usize {
        self.pending_removal.len()
    }

    /// Delete every scheduled group. Children a deleted group did not adopt
    /// belong to other presentations and are only detached.
    pub fn flush_removals(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_removal);
        let mut removed = 0;

        for id in pending {
            let children = self.children(id).to_vec();
            for child in children {
                self.detach(child);
            }
            if self.node(id).is_some() {
                self.nodes[id.idx()] = None;
                self.free_list.push(id.idx());
                removed += 1;
            }
        }

        removed
    }

    /// Number of live groups
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
