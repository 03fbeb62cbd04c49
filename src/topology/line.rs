use crate::error::TopologyError;
use crate::math::Point2;
use crate::scene::{RenderHandle, SceneChange};

use super::polygon::PolygonKey;
use super::vertex::VertexKey;
use super::{attach, detach, Graph};

slotmap::new_key_type! {
    /// Handle to a line in the graph.
    pub struct LineKey;
}

/// An edge between two distinct vertices.
///
/// The endpoints are stored in creation order, but a line is undirected:
/// `(a, b)` and `(b, a)` describe the same connection.
#[derive(Debug, Clone)]
pub struct Line {
    pub(crate) id: u32,
    pub(crate) start: VertexKey,
    pub(crate) end: VertexKey,
    pub(crate) polygons: Vec<PolygonKey>,
    pub(crate) handle: Option<RenderHandle>,
}

impl Line {
    /// User-visible line id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Vertex the line was drawn from.
    #[must_use]
    pub fn start(&self) -> VertexKey {
        self.start
    }

    /// Vertex the line was drawn to.
    #[must_use]
    pub fn end(&self) -> VertexKey {
        self.end
    }

    /// Polygons that currently use this line.
    #[must_use]
    pub fn polygons(&self) -> &[PolygonKey] {
        &self.polygons
    }

    /// Visual bound to this line, if any.
    #[must_use]
    pub fn render_handle(&self) -> Option<RenderHandle> {
        self.handle
    }

    /// Returns `true` if `vertex` is one of the endpoints.
    #[must_use]
    pub fn involves_vertex(&self, vertex: VertexKey) -> bool {
        self.start == vertex || self.end == vertex
    }

    /// Returns `true` if this line joins `a` and `b`, in either direction.
    #[must_use]
    pub fn connects(&self, a: VertexKey, b: VertexKey) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }

    /// The endpoint opposite to `vertex`, or `None` if `vertex` is not an endpoint.
    #[must_use]
    pub fn opposite(&self, vertex: VertexKey) -> Option<VertexKey> {
        if vertex == self.start {
            Some(self.end)
        } else if vertex == self.end {
            Some(self.start)
        } else {
            None
        }
    }

    pub(crate) fn attach_polygon(&mut self, polygon: PolygonKey) {
        attach(&mut self.polygons, polygon);
    }

    pub(crate) fn detach_polygon(&mut self, polygon: PolygonKey) {
        detach(&mut self.polygons, &polygon);
    }
}

impl Graph {
    /// Creates a line with the lowest free line id.
    ///
    /// Only self-loops and missing endpoints are rejected; a second line
    /// between the same pair is allowed here. Use [`Graph::connect`] for the
    /// duplicate-checked variant.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::SelfLoop`] if `a == b`,
    /// [`TopologyError::EntityNotFound`] if either vertex does not exist, or
    /// [`TopologyError::IdsExhausted`] if no line id is free.
    pub fn create_line(&mut self, a: VertexKey, b: VertexKey) -> Result<LineKey, TopologyError> {
        self.check_endpoints(a, b)?;
        let id = self
            .line_alloc
            .next_available(&self.line_ids)
            .ok_or(TopologyError::IdsExhausted("line"))?;
        Ok(self.insert_line(id, a, b))
    }

    /// Creates a line with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Same endpoint checks as [`Graph::create_line`], plus
    /// [`TopologyError::IdInUse`] if a live line already has `id`.
    pub fn create_line_with_id(
        &mut self,
        id: u32,
        a: VertexKey,
        b: VertexKey,
    ) -> Result<LineKey, TopologyError> {
        self.check_endpoints(a, b)?;
        if self.line_ids.contains_key(&id) {
            return Err(TopologyError::IdInUse { kind: "line", id });
        }
        Ok(self.insert_line(id, a, b))
    }

    /// Creates a line unless `a` and `b` are already connected.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateLine`] if a line between the pair
    /// exists, otherwise the errors of [`Graph::create_line`].
    pub fn connect(&mut self, a: VertexKey, b: VertexKey) -> Result<LineKey, TopologyError> {
        self.check_endpoints(a, b)?;
        if let Some(existing) = self.find_line_by_vertices(a, b) {
            return Err(TopologyError::DuplicateLine {
                start: self.vertices[a].id,
                end: self.vertices[b].id,
                line: self.lines[existing].id,
            });
        }
        self.create_line(a, b)
    }

    fn check_endpoints(&self, a: VertexKey, b: VertexKey) -> Result<(), TopologyError> {
        if a == b {
            return Err(TopologyError::SelfLoop);
        }
        if !self.vertices.contains_key(a) || !self.vertices.contains_key(b) {
            return Err(TopologyError::EntityNotFound("vertex"));
        }
        Ok(())
    }

    fn insert_line(&mut self, id: u32, a: VertexKey, b: VertexKey) -> LineKey {
        let key = self.lines.insert(Line {
            id,
            start: a,
            end: b,
            polygons: Vec::new(),
            handle: None,
        });
        self.line_ids.insert(id, key);
        self.vertices[a].attach_line(key);
        self.vertices[b].attach_line(key);
        self.record(SceneChange::Added(key.into()));
        tracing::debug!(
            id,
            start = self.vertices[a].id,
            end = self.vertices[b].id,
            "line created"
        );
        key
    }

    /// Deletes a line and every polygon that uses it.
    ///
    /// Returns `false` (and does nothing) if the line does not exist.
    pub fn delete_line(&mut self, key: LineKey) -> bool {
        let Some(line) = self.lines.get(key) else {
            return false;
        };
        let polygons = line.polygons.clone();
        for polygon in polygons {
            if let Some(p) = self.polygons.get_mut(polygon) {
                p.remove_line(key);
            }
            self.delete_polygon(polygon);
        }

        let Some(line) = self.lines.remove(key) else {
            return false;
        };
        self.line_ids.remove(&line.id);
        for endpoint in [line.start, line.end] {
            if let Some(vertex) = self.vertices.get_mut(endpoint) {
                vertex.detach_line(key);
            }
        }
        self.record(SceneChange::Removed {
            entity: key.into(),
            handle: line.handle,
        });
        tracing::debug!(id = line.id, "line deleted");
        true
    }

    /// Deletes each listed line, skipping ones that are already gone.
    pub fn delete_lines(&mut self, keys: &[LineKey]) -> usize {
        keys.iter().filter(|&&key| self.delete_line(key)).count()
    }

    /// Deletes every line, and with them every polygon. Vertices are kept.
    pub fn delete_all_lines(&mut self) -> usize {
        let keys: Vec<LineKey> = self.line_ids.values().copied().collect();
        self.delete_lines(&keys)
    }

    /// Looks up a line by key.
    #[must_use]
    pub fn line(&self, key: LineKey) -> Option<&Line> {
        self.lines.get(key)
    }

    /// Finds the line with the given id.
    #[must_use]
    pub fn find_line_by_id(&self, id: u32) -> Option<LineKey> {
        self.line_ids.get(&id).copied()
    }

    /// Finds the line joining `a` and `b`, regardless of direction.
    #[must_use]
    pub fn find_line_by_vertices(&self, a: VertexKey, b: VertexKey) -> Option<LineKey> {
        let vertex = self.vertices.get(a)?;
        vertex
            .lines
            .iter()
            .copied()
            .find(|&key| self.lines.get(key).is_some_and(|l| l.connects(a, b)))
    }

    /// Finds the line bound to `handle`.
    #[must_use]
    pub fn find_line_by_render_handle(&self, handle: RenderHandle) -> Option<LineKey> {
        self.lines
            .iter()
            .find(|(_, l)| l.handle == Some(handle))
            .map(|(key, _)| key)
    }

    /// Iterates over all lines in ascending id order.
    pub fn lines(&self) -> impl Iterator<Item = (LineKey, &Line)> + '_ {
        self.line_ids
            .values()
            .filter_map(|&key| self.lines.get(key).map(|l| (key, l)))
    }

    /// Current start and end positions of a line.
    #[must_use]
    pub fn line_segment(&self, key: LineKey) -> Option<(Point2, Point2)> {
        let line = self.lines.get(key)?;
        let start = self.vertices.get(line.start)?.position;
        let end = self.vertices.get(line.end)?.position;
        Some((start, end))
    }
}
