use std::collections::HashSet;

use crate::error::{Error, PolygonError, Result};
use crate::math::polygon_2d::sort_by_polar_angle;
use crate::math::Point2;
use crate::topology::{Graph, LineKey, PolygonKey, VertexKey};

/// Creates a polygon from a selection of vertices or of lines.
///
/// From vertices, the selection is sorted by polar angle around its centroid
/// and each consecutive pair is joined by an existing line or a new one.
/// Lines created this way are removed again if the polygon cannot be built.
/// From lines, the selection is walked directly. Either way the stored ring
/// is counter-clockwise.
pub struct MakePolygon {
    source: Source,
}

enum Source {
    Vertices(Vec<VertexKey>),
    Lines(Vec<LineKey>),
}

impl MakePolygon {
    /// Creates a polygon operation over a vertex selection, in any order.
    #[must_use]
    pub fn from_vertices(vertices: Vec<VertexKey>) -> Self {
        Self {
            source: Source::Vertices(vertices),
        }
    }

    /// Creates a polygon operation over a line selection, in any order.
    #[must_use]
    pub fn from_lines(lines: Vec<LineKey>) -> Self {
        Self {
            source: Source::Lines(lines),
        }
    }

    /// Executes the operation, creating the polygon in the graph.
    ///
    /// # Errors
    ///
    /// Returns a polygon error if the selection is too small, repeats or
    /// misses an entity, or does not form one simple cycle; returns a
    /// topology error if a missing line cannot be created.
    pub fn execute(&self, graph: &mut Graph) -> Result<PolygonKey> {
        match &self.source {
            Source::Vertices(vertices) => from_vertices(graph, vertices),
            Source::Lines(lines) => Ok(graph.create_polygon_from_lines(lines)?),
        }
    }
}

fn from_vertices(graph: &mut Graph, vertices: &[VertexKey]) -> Result<PolygonKey> {
    let n = vertices.len();
    if n < 3 {
        return Err(PolygonError::TooFewElements {
            vertices: n,
            lines: 0,
        }
        .into());
    }
    let mut seen = HashSet::with_capacity(n);
    if !vertices.iter().all(|v| seen.insert(*v)) {
        return Err(PolygonError::Duplicate("vertex").into());
    }
    let positions = vertices
        .iter()
        .map(|&v| graph.vertex(v).map(|v| v.position()))
        .collect::<Option<Vec<Point2>>>()
        .ok_or(PolygonError::EntityNotFound("vertex"))?;

    let ring: Vec<VertexKey> = sort_by_polar_angle(&positions)
        .into_iter()
        .map(|i| vertices[i])
        .collect();

    let mut created = Vec::new();
    let mut lines = Vec::with_capacity(n);
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        if let Some(existing) = graph.find_line_by_vertices(a, b) {
            lines.push(existing);
            continue;
        }
        match graph.create_line(a, b) {
            Ok(line) => {
                created.push(line);
                lines.push(line);
            }
            Err(err) => {
                roll_back(graph, &created);
                return Err(err.into());
            }
        }
    }

    graph.create_polygon(&ring, &lines).map_err(|err| {
        roll_back(graph, &created);
        Error::from(err)
    })
}

fn roll_back(graph: &mut Graph, created: &[LineKey]) {
    if created.is_empty() {
        return;
    }
    tracing::debug!(
        lines = created.len(),
        "rolling back lines created for polygon"
    );
    graph.delete_lines(created);
}
