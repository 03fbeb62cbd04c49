pub mod cycle;
pub mod ids;
pub mod line;
pub mod polygon;
pub mod vertex;

pub use cycle::{order_cycle, Cycle, CycleError};
pub use ids::IdAllocator;
pub use line::{Line, LineKey};
pub use polygon::{Polygon, PolygonKey};
pub use vertex::{Vertex, VertexKey};

use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::math::Point2;
use crate::scene::{EntityKey, RenderHandle, SceneChange};

/// Central arena that owns every vertex, line and polygon.
///
/// Entities reference each other through generational keys, so a key that
/// outlives its entity resolves to "not found" instead of dangling. Each
/// class also has a user-visible integer id, indexed in ascending order for
/// deterministic listing and export.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: SlotMap<VertexKey, Vertex>,
    lines: SlotMap<LineKey, Line>,
    polygons: SlotMap<PolygonKey, Polygon>,
    vertex_ids: BTreeMap<u32, VertexKey>,
    line_ids: BTreeMap<u32, LineKey>,
    polygon_ids: BTreeMap<u32, PolygonKey>,
    vertex_alloc: IdAllocator,
    line_alloc: IdAllocator,
    polygon_alloc: IdAllocator,
    changes: Vec<SceneChange>,
}

impl Graph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the graph holds no entities at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.lines.is_empty() && self.polygons.is_empty()
    }

    /// Number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of live polygons.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Removes every entity and resets all id allocators.
    pub fn clear(&mut self) {
        self.record_removal_of_all();
        let changes = std::mem::take(&mut self.changes);
        *self = Self {
            changes,
            ..Self::default()
        };
        tracing::debug!("graph cleared");
    }

    /// Takes the scene changes recorded since the last call.
    pub fn drain_scene_changes(&mut self) -> Vec<SceneChange> {
        std::mem::take(&mut self.changes)
    }

    /// Associates a visual item with an entity. Returns `false` if the entity is gone.
    pub fn bind_render_handle(&mut self, entity: EntityKey, handle: RenderHandle) -> bool {
        let slot = match entity {
            EntityKey::Vertex(key) => self.vertices.get_mut(key).map(|v| &mut v.handle),
            EntityKey::Line(key) => self.lines.get_mut(key).map(|l| &mut l.handle),
            EntityKey::Polygon(key) => self.polygons.get_mut(key).map(|p| &mut p.handle),
        };
        match slot {
            Some(slot) => {
                *slot = Some(handle);
                true
            }
            None => false,
        }
    }

    /// Returns the visual bound to an entity, if any.
    #[must_use]
    pub fn render_handle(&self, entity: EntityKey) -> Option<RenderHandle> {
        match entity {
            EntityKey::Vertex(key) => self.vertices.get(key)?.handle,
            EntityKey::Line(key) => self.lines.get(key)?.handle,
            EntityKey::Polygon(key) => self.polygons.get(key)?.handle,
        }
    }

    /// Deletes a mixed selection of entities.
    ///
    /// Polygons go first, then lines, then vertices. Entries already removed
    /// by an earlier cascade are skipped. Returns the number of entities
    /// deleted directly (cascaded dependents are not counted).
    pub fn delete_items(&mut self, items: &[EntityKey]) -> usize {
        let mut polygons = Vec::new();
        let mut lines = Vec::new();
        let mut vertices = Vec::new();
        for item in items {
            match *item {
                EntityKey::Vertex(key) => vertices.push(key),
                EntityKey::Line(key) => lines.push(key),
                EntityKey::Polygon(key) => polygons.push(key),
            }
        }
        self.delete_polygons(&polygons)
            + self.delete_lines(&lines)
            + self.delete_vertices(&vertices)
    }

    /// Moves a vertex and flags every dependent line and polygon for reshaping.
    ///
    /// Returns `false` if the vertex does not exist.
    pub fn move_vertex(&mut self, key: VertexKey, position: Point2) -> bool {
        let Some(vertex) = self.vertices.get_mut(key) else {
            return false;
        };
        vertex.position = position;
        let lines = vertex.lines.clone();
        let polygons = vertex.polygons.clone();

        self.changes.push(SceneChange::Reshaped(key.into()));
        let dependents = lines
            .into_iter()
            .map(EntityKey::from)
            .chain(polygons.into_iter().map(EntityKey::from));
        self.changes.extend(dependents.map(SceneChange::Reshaped));
        true
    }

    /// Entry point for the rendering surface when the user drags a vertex visual.
    pub fn on_render_handle_moved(&mut self, handle: RenderHandle, position: Point2) -> bool {
        match self.find_vertex_by_render_handle(handle) {
            Some(key) => self.move_vertex(key, position),
            None => false,
        }
    }

    /// Replaces the whole graph with `other`, keeping the scene queue consistent.
    pub(crate) fn replace_with(&mut self, mut other: Graph) {
        self.record_removal_of_all();
        let mut changes = std::mem::take(&mut self.changes);
        changes.append(&mut other.changes);
        *self = other;
        self.changes = changes;
    }

    pub(crate) fn line_allocator_mut(&mut self) -> &mut IdAllocator {
        &mut self.line_alloc
    }

    pub(crate) fn polygon_allocator_mut(&mut self) -> &mut IdAllocator {
        &mut self.polygon_alloc
    }

    /// Returns the floors of the line and polygon allocators.
    #[must_use]
    pub fn id_floors(&self) -> (u32, u32) {
        (self.line_alloc.floor(), self.polygon_alloc.floor())
    }

    fn record(&mut self, change: SceneChange) {
        self.changes.push(change);
    }

    fn record_removal_of_all(&mut self) {
        let polygons = self.polygon_ids.values().map(|&key| SceneChange::Removed {
            entity: key.into(),
            handle: self.polygons[key].handle,
        });
        let lines = self.line_ids.values().map(|&key| SceneChange::Removed {
            entity: key.into(),
            handle: self.lines[key].handle,
        });
        let vertices = self.vertex_ids.values().map(|&key| SceneChange::Removed {
            entity: key.into(),
            handle: self.vertices[key].handle,
        });
        let removed: Vec<SceneChange> = polygons.chain(lines).chain(vertices).collect();
        self.changes.extend(removed);
    }
}

/// Appends `item` unless already present.
fn attach<K: PartialEq>(list: &mut Vec<K>, item: K) {
    if !list.contains(&item) {
        list.push(item);
    }
}

/// Removes every occurrence of `item`, returning whether anything was removed.
fn detach<K: PartialEq>(list: &mut Vec<K>, item: &K) -> bool {
    let before = list.len();
    list.retain(|k| k != item);
    list.len() != before
}
