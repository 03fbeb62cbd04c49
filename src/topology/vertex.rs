use crate::error::TopologyError;
use crate::math::Point2;
use crate::scene::{RenderHandle, SceneChange};

use super::line::LineKey;
use super::polygon::PolygonKey;
use super::{attach, detach, Graph};

slotmap::new_key_type! {
    /// Handle to a vertex in the graph.
    pub struct VertexKey;
}

/// A user-placed point.
///
/// `lines` and `polygons` are back-references maintained by the graph for
/// cascading deletes; they never decide whether an entity exists.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub(crate) id: u32,
    pub(crate) position: Point2,
    pub(crate) lines: Vec<LineKey>,
    pub(crate) polygons: Vec<PolygonKey>,
    pub(crate) handle: Option<RenderHandle>,
}

impl Vertex {
    fn new(id: u32, position: Point2) -> Self {
        Self {
            id,
            position,
            lines: Vec::new(),
            polygons: Vec::new(),
            handle: None,
        }
    }

    /// User-visible vertex id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Current position in the drawing plane.
    #[must_use]
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Lines that currently end at this vertex.
    #[must_use]
    pub fn lines(&self) -> &[LineKey] {
        &self.lines
    }

    /// Polygons that currently pass through this vertex.
    #[must_use]
    pub fn polygons(&self) -> &[PolygonKey] {
        &self.polygons
    }

    /// Visual bound to this vertex, if any.
    #[must_use]
    pub fn render_handle(&self) -> Option<RenderHandle> {
        self.handle
    }

    pub(crate) fn attach_line(&mut self, line: LineKey) {
        attach(&mut self.lines, line);
    }

    pub(crate) fn detach_line(&mut self, line: LineKey) {
        detach(&mut self.lines, &line);
    }

    pub(crate) fn attach_polygon(&mut self, polygon: PolygonKey) {
        attach(&mut self.polygons, polygon);
    }

    pub(crate) fn detach_polygon(&mut self, polygon: PolygonKey) {
        detach(&mut self.polygons, &polygon);
    }
}

impl Graph {
    /// Creates a vertex with the lowest free vertex id.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IdsExhausted`] if every `u32` id is taken.
    pub fn create_vertex(&mut self, position: Point2) -> Result<VertexKey, TopologyError> {
        let id = self
            .vertex_alloc
            .next_available(&self.vertex_ids)
            .ok_or(TopologyError::IdsExhausted("vertex"))?;
        Ok(self.insert_vertex(id, position))
    }

    /// Creates a vertex with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IdInUse`] if a live vertex already has `id`.
    pub fn create_vertex_with_id(
        &mut self,
        id: u32,
        position: Point2,
    ) -> Result<VertexKey, TopologyError> {
        if self.vertex_ids.contains_key(&id) {
            return Err(TopologyError::IdInUse { kind: "vertex", id });
        }
        Ok(self.insert_vertex(id, position))
    }

    fn insert_vertex(&mut self, id: u32, position: Point2) -> VertexKey {
        let key = self.vertices.insert(Vertex::new(id, position));
        self.vertex_ids.insert(id, key);
        self.record(SceneChange::Added(key.into()));
        tracing::debug!(id, x = position.x, y = position.y, "vertex created");
        key
    }

    /// Deletes a vertex together with every polygon and line that uses it.
    ///
    /// Returns `false` (and does nothing) if the vertex does not exist.
    pub fn delete_vertex(&mut self, key: VertexKey) -> bool {
        let Some(vertex) = self.vertices.get(key) else {
            return false;
        };
        // Polygons first so that none is ever left pointing at a removed line.
        let polygons = vertex.polygons.clone();
        let lines = vertex.lines.clone();
        for polygon in polygons {
            self.delete_polygon(polygon);
        }
        for line in lines {
            self.delete_line(line);
        }

        let Some(vertex) = self.vertices.remove(key) else {
            return false;
        };
        self.vertex_ids.remove(&vertex.id);
        self.record(SceneChange::Removed {
            entity: key.into(),
            handle: vertex.handle,
        });
        tracing::debug!(id = vertex.id, "vertex deleted");
        true
    }

    /// Deletes each listed vertex, skipping ones that are already gone.
    pub fn delete_vertices(&mut self, keys: &[VertexKey]) -> usize {
        keys.iter().filter(|&&key| self.delete_vertex(key)).count()
    }

    /// Deletes every vertex, and with them every line and polygon.
    ///
    /// Unlike [`Graph::clear`], the line and polygon id floors raised by an
    /// earlier import are kept.
    pub fn delete_all_vertices(&mut self) {
        let (line_alloc, polygon_alloc) = (self.line_alloc, self.polygon_alloc);
        self.clear();
        self.line_alloc = line_alloc;
        self.polygon_alloc = polygon_alloc;
    }

    /// Looks up a vertex by key.
    #[must_use]
    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(key)
    }

    /// Finds the vertex with the given id.
    #[must_use]
    pub fn find_vertex_by_id(&self, id: u32) -> Option<VertexKey> {
        self.vertex_ids.get(&id).copied()
    }

    /// Finds the vertex bound to `handle`.
    #[must_use]
    pub fn find_vertex_by_render_handle(&self, handle: RenderHandle) -> Option<VertexKey> {
        self.vertices
            .iter()
            .find(|(_, v)| v.handle == Some(handle))
            .map(|(key, _)| key)
    }

    /// Iterates over all vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> + '_ {
        self.vertex_ids
            .values()
            .filter_map(|&key| self.vertices.get(key).map(|v| (key, v)))
    }
}
