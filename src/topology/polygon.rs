use std::collections::HashSet;

use crate::error::PolygonError;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;
use crate::scene::{RenderHandle, SceneChange};

use super::cycle::{order_cycle, Cycle, CycleError};
use super::line::LineKey;
use super::vertex::VertexKey;
use super::{detach, Graph};

slotmap::new_key_type! {
    /// Handle to a polygon in the graph.
    pub struct PolygonKey;
}

/// A simple closed region bounded by existing lines.
///
/// `lines[i]` joins `vertices[i]` to `vertices[(i + 1) % n]`, and the ring is
/// stored counter-clockwise (non-negative signed area).
#[derive(Debug, Clone)]
pub struct Polygon {
    pub(crate) id: u32,
    pub(crate) vertices: Vec<VertexKey>,
    pub(crate) lines: Vec<LineKey>,
    pub(crate) handle: Option<RenderHandle>,
}

impl Polygon {
    /// User-visible polygon id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Ring vertices in counter-clockwise order.
    #[must_use]
    pub fn vertices(&self) -> &[VertexKey] {
        &self.vertices
    }

    /// Ring lines; `lines[i]` follows `vertices[i]`.
    #[must_use]
    pub fn lines(&self) -> &[LineKey] {
        &self.lines
    }

    /// Visual bound to this polygon, if any.
    #[must_use]
    pub fn render_handle(&self) -> Option<RenderHandle> {
        self.handle
    }

    /// Returns `true` if `vertex` is on the ring.
    #[must_use]
    pub fn involves_vertex(&self, vertex: VertexKey) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Returns `true` if `line` is part of the ring.
    #[must_use]
    pub fn involves_line(&self, line: LineKey) -> bool {
        self.lines.contains(&line)
    }

    /// Drops `line` from the ring, leaving the polygon degenerate.
    ///
    /// Only used while the line is being deleted; the caller must delete
    /// the polygon right after.
    pub(crate) fn remove_line(&mut self, line: LineKey) -> bool {
        detach(&mut self.lines, &line)
    }
}

impl Graph {
    /// Creates a polygon with the lowest free polygon id.
    ///
    /// The ring is always derived by walking `lines`. `vertices` only has to
    /// have the right length; the polygon stores the vertices the walk visits,
    /// and a list naming a different set is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`PolygonError`] if the counts are wrong, a line is missing,
    /// the lines are not exactly one simple cycle, or no polygon id is free.
    pub fn create_polygon(
        &mut self,
        vertices: &[VertexKey],
        lines: &[LineKey],
    ) -> Result<PolygonKey, PolygonError> {
        check_counts(vertices.len(), lines.len())?;
        let cycle = self.ordered_ring(lines)?;
        self.warn_on_vertex_mismatch(vertices, &cycle);
        let id = self.next_polygon_id()?;
        Ok(self.insert_polygon(id, cycle))
    }

    /// Creates a polygon with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Same as [`Graph::create_polygon`], plus [`PolygonError::IdInUse`].
    pub fn create_polygon_with_id(
        &mut self,
        id: u32,
        vertices: &[VertexKey],
        lines: &[LineKey],
    ) -> Result<PolygonKey, PolygonError> {
        check_counts(vertices.len(), lines.len())?;
        if self.polygon_ids.contains_key(&id) {
            return Err(PolygonError::IdInUse(id));
        }
        let cycle = self.ordered_ring(lines)?;
        self.warn_on_vertex_mismatch(vertices, &cycle);
        Ok(self.insert_polygon(id, cycle))
    }

    /// Creates a polygon from lines alone, taking its vertices from the walk.
    ///
    /// # Errors
    ///
    /// Returns a [`PolygonError`] if the lines are not one simple cycle.
    pub fn create_polygon_from_lines(
        &mut self,
        lines: &[LineKey],
    ) -> Result<PolygonKey, PolygonError> {
        let cycle = self.ordered_ring(lines)?;
        let id = self.next_polygon_id()?;
        Ok(self.insert_polygon(id, cycle))
    }

    fn next_polygon_id(&self) -> Result<u32, PolygonError> {
        self.polygon_alloc
            .next_available(&self.polygon_ids)
            .ok_or(PolygonError::IdsExhausted)
    }

    /// Walks `lines` into a ring and normalizes it to counter-clockwise.
    fn ordered_ring(&self, lines: &[LineKey]) -> Result<Cycle<VertexKey, LineKey>, PolygonError> {
        let edges = lines
            .iter()
            .map(|&key| {
                self.lines
                    .get(key)
                    .map(|l| (key, l.start, l.end))
                    .ok_or(PolygonError::EntityNotFound("line"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut cycle = order_cycle(&edges)
            .map_err(|err| self.describe_cycle_error(err))?;

        let ring: Vec<Point2> = cycle
            .vertices
            .iter()
            .map(|&v| self.vertices[v].position)
            .collect();
        if signed_area_2d(&ring) < 0.0 {
            cycle.reverse();
        }
        Ok(cycle)
    }

    fn warn_on_vertex_mismatch(
        &self,
        vertices: &[VertexKey],
        cycle: &Cycle<VertexKey, LineKey>,
    ) {
        let given: HashSet<VertexKey> = vertices.iter().copied().collect();
        let walked: HashSet<VertexKey> = cycle.vertices.iter().copied().collect();
        if given != walked {
            let ids: Vec<u32> = cycle
                .vertices
                .iter()
                .map(|&v| self.vertices[v].id)
                .collect();
            tracing::warn!(?ids, "vertex list differs from the line cycle, using the cycle");
        }
    }

    fn describe_cycle_error(&self, err: CycleError<VertexKey, LineKey>) -> PolygonError {
        let line_id = |key: LineKey| self.lines.get(key).map_or(u32::MAX, |l| l.id);
        match err {
            CycleError::TooFewLines(lines) => PolygonError::TooFewElements {
                vertices: lines,
                lines,
            },
            CycleError::DuplicateLine(_) => PolygonError::Duplicate("line"),
            CycleError::SelfLoop(line) => PolygonError::SelfLoop {
                line: line_id(line),
            },
            CycleError::InvalidDegree { vertex, degree } => PolygonError::InvalidDegree {
                vertex: self.vertices.get(vertex).map_or(u32::MAX, |v| v.id),
                degree,
            },
            CycleError::RevisitedLine(line) => PolygonError::RevisitedLine {
                line: line_id(line),
            },
            CycleError::NotClosed { steps } => PolygonError::NotClosed { steps },
            CycleError::Disconnected { visited, expected } => {
                PolygonError::Disconnected { visited, expected }
            }
        }
    }

    fn insert_polygon(&mut self, id: u32, cycle: Cycle<VertexKey, LineKey>) -> PolygonKey {
        let Cycle { vertices, lines } = cycle;
        let key = self.polygons.insert(Polygon {
            id,
            vertices,
            lines,
            handle: None,
        });
        self.polygon_ids.insert(id, key);

        let polygon = &self.polygons[key];
        for &vertex in &polygon.vertices {
            self.vertices[vertex].attach_polygon(key);
        }
        for &line in &polygon.lines {
            self.lines[line].attach_polygon(key);
        }
        tracing::debug!(id, sides = polygon.lines.len(), "polygon created");
        self.record(SceneChange::Added(key.into()));
        key
    }

    /// Deletes a polygon. Its lines and vertices are kept.
    ///
    /// Returns `false` (and does nothing) if the polygon does not exist.
    pub fn delete_polygon(&mut self, key: PolygonKey) -> bool {
        let Some(polygon) = self.polygons.remove(key) else {
            return false;
        };
        self.polygon_ids.remove(&polygon.id);
        for line in &polygon.lines {
            if let Some(line) = self.lines.get_mut(*line) {
                line.detach_polygon(key);
            }
        }
        for vertex in &polygon.vertices {
            if let Some(vertex) = self.vertices.get_mut(*vertex) {
                vertex.detach_polygon(key);
            }
        }
        self.record(SceneChange::Removed {
            entity: key.into(),
            handle: polygon.handle,
        });
        tracing::debug!(id = polygon.id, "polygon deleted");
        true
    }

    /// Deletes each listed polygon, skipping ones that are already gone.
    pub fn delete_polygons(&mut self, keys: &[PolygonKey]) -> usize {
        keys.iter().filter(|&&key| self.delete_polygon(key)).count()
    }

    /// Looks up a polygon by key.
    #[must_use]
    pub fn polygon(&self, key: PolygonKey) -> Option<&Polygon> {
        self.polygons.get(key)
    }

    /// Finds the polygon with the given id.
    #[must_use]
    pub fn find_polygon_by_id(&self, id: u32) -> Option<PolygonKey> {
        self.polygon_ids.get(&id).copied()
    }

    /// Finds the polygon bound to `handle`.
    #[must_use]
    pub fn find_polygon_by_render_handle(&self, handle: RenderHandle) -> Option<PolygonKey> {
        self.polygons
            .iter()
            .find(|(_, p)| p.handle == Some(handle))
            .map(|(key, _)| key)
    }

    /// Iterates over all polygons in ascending id order.
    pub fn polygons(&self) -> impl Iterator<Item = (PolygonKey, &Polygon)> + '_ {
        self.polygon_ids
            .values()
            .filter_map(|&key| self.polygons.get(key).map(|p| (key, p)))
    }

    /// Current vertex positions of a polygon, in ring order.
    #[must_use]
    pub fn polygon_ring(&self, key: PolygonKey) -> Option<Vec<Point2>> {
        let polygon = self.polygons.get(key)?;
        polygon
            .vertices
            .iter()
            .map(|&v| self.vertices.get(v).map(|v| v.position))
            .collect()
    }

    /// Signed area of a polygon's current ring.
    ///
    /// Dragging vertices can flip a polygon; the stored order is only
    /// normalized when the polygon is built.
    #[must_use]
    pub fn polygon_signed_area(&self, key: PolygonKey) -> Option<f64> {
        self.polygon_ring(key).map(|ring| signed_area_2d(&ring))
    }
}

fn check_counts(vertices: usize, lines: usize) -> Result<(), PolygonError> {
    if vertices < 3 || lines < 3 {
        return Err(PolygonError::TooFewElements { vertices, lines });
    }
    if vertices != lines {
        return Err(PolygonError::CountMismatch { vertices, lines });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::query::IsValid;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    struct Square {
        v: [VertexKey; 4],
        l: [LineKey; 4],
    }

    /// Square with lines created clockwise: 0-3-2-1.
    fn clockwise_square(graph: &mut Graph) -> Square {
        let v = [
            graph.create_vertex(p(0.0, 0.0)).unwrap(),
            graph.create_vertex(p(10.0, 0.0)).unwrap(),
            graph.create_vertex(p(10.0, 10.0)).unwrap(),
            graph.create_vertex(p(0.0, 10.0)).unwrap(),
        ];
        let l = [
            graph.create_line(v[0], v[3]).unwrap(),
            graph.create_line(v[3], v[2]).unwrap(),
            graph.create_line(v[2], v[1]).unwrap(),
            graph.create_line(v[1], v[0]).unwrap(),
        ];
        Square { v, l }
    }

    #[test]
    fn shuffled_lines_form_ccw_ring() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        let lines = [sq.l[2], sq.l[0], sq.l[3], sq.l[1]];
        let key = graph.create_polygon(&sq.v, &lines).unwrap();

        let polygon = graph.polygon(key).unwrap();
        assert_eq!(polygon.vertices().len(), 4);
        assert_eq!(polygon.lines().len(), 4);
        let unique: HashSet<_> = polygon.lines().iter().collect();
        assert_eq!(unique.len(), 4);
        assert_relative_eq!(graph.polygon_signed_area(key).unwrap(), 100.0);
        assert!(IsValid::new().execute(&graph));
    }

    #[test]
    fn back_references_are_attached() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        let key = graph.create_polygon(&sq.v, &sq.l).unwrap();
        for v in sq.v {
            assert_eq!(graph.vertex(v).unwrap().polygons(), &[key]);
        }
        for l in sq.l {
            assert_eq!(graph.line(l).unwrap().polygons(), &[key]);
        }
    }

    #[test]
    fn stray_line_is_rejected() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        let diagonal = graph.create_line(sq.v[0], sq.v[2]).unwrap();
        let lines = [sq.l[0], sq.l[1], sq.l[2], diagonal];
        let err = graph.create_polygon(&sq.v, &lines).unwrap_err();
        assert!(matches!(err, PolygonError::InvalidDegree { .. }));
        assert_eq!(graph.polygon_count(), 0);
    }

    #[test]
    fn count_checks() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        assert_eq!(
            graph.create_polygon(&sq.v[..2], &sq.l[..2]),
            Err(PolygonError::TooFewElements {
                vertices: 2,
                lines: 2
            })
        );
        assert_eq!(
            graph.create_polygon(&sq.v[..3], &sq.l),
            Err(PolygonError::CountMismatch {
                vertices: 3,
                lines: 4
            })
        );
    }

    #[test]
    fn vertex_list_is_advisory() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        let stranger = graph.create_vertex(p(50.0, 50.0)).unwrap();
        let vertices = [sq.v[0], sq.v[1], sq.v[2], stranger];
        let key = graph.create_polygon(&vertices, &sq.l).unwrap();

        let polygon = graph.polygon(key).unwrap();
        let stored: HashSet<VertexKey> = polygon.vertices().iter().copied().collect();
        let expected: HashSet<VertexKey> = sq.v.into_iter().collect();
        assert_eq!(stored, expected);
        assert!(graph.vertex(stranger).unwrap().polygons().is_empty());
        assert!(IsValid::new().execute(&graph));
    }

    #[test]
    fn polygon_ids_wrap_below_a_maxed_floor() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        graph
            .create_polygon_with_id(u32::MAX, &sq.v, &sq.l)
            .unwrap();
        graph.polygon_allocator_mut().advance_past(Some(u32::MAX));

        let key = graph.create_polygon_from_lines(&sq.l).unwrap();
        assert_eq!(graph.polygon(key).unwrap().id(), 0);
        assert_eq!(graph.polygon_count(), 2);
    }

    #[test]
    fn explicit_id_collision_is_rejected() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        graph.create_polygon_with_id(4, &sq.v, &sq.l).unwrap();
        assert_eq!(
            graph.create_polygon_with_id(4, &sq.v, &sq.l),
            Err(PolygonError::IdInUse(4))
        );
        let key = graph.find_polygon_by_id(4).unwrap();
        assert_eq!(graph.polygon(key).unwrap().id(), 4);
    }

    #[test]
    fn from_lines_derives_vertices() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        let key = graph.create_polygon_from_lines(&sq.l).unwrap();
        let polygon = graph.polygon(key).unwrap();
        let vertices: HashSet<VertexKey> = polygon.vertices().iter().copied().collect();
        let expected: HashSet<VertexKey> = sq.v.into_iter().collect();
        assert_eq!(vertices, expected);
    }

    #[test]
    fn delete_keeps_lines_and_vertices() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        let key = graph.create_polygon(&sq.v, &sq.l).unwrap();
        graph.bind_render_handle(key.into(), RenderHandle(3));
        assert_eq!(
            graph.find_polygon_by_render_handle(RenderHandle(3)),
            Some(key)
        );

        assert!(graph.delete_polygon(key));
        assert!(!graph.delete_polygon(key));
        assert_eq!(graph.line_count(), 4);
        assert_eq!(graph.vertex_count(), 4);
        assert!(graph.line(sq.l[0]).unwrap().polygons().is_empty());
        assert!(graph.vertex(sq.v[0]).unwrap().polygons().is_empty());
        assert_eq!(graph.find_polygon_by_render_handle(RenderHandle(3)), None);
    }

    #[test]
    fn shared_edge_between_two_polygons() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        let e = graph.create_vertex(p(20.0, 5.0)).unwrap();
        let be = graph.create_line(sq.v[1], e).unwrap();
        let ec = graph.create_line(e, sq.v[2]).unwrap();
        let left = graph.create_polygon(&sq.v, &sq.l).unwrap();
        let right = graph
            .create_polygon(&[sq.v[1], e, sq.v[2]], &[be, ec, sq.l[2]])
            .unwrap();
        assert_eq!(graph.line(sq.l[2]).unwrap().polygons(), &[left, right]);

        graph.delete_line(sq.l[2]);
        assert_eq!(graph.polygon_count(), 0);
        assert!(IsValid::new().execute(&graph));
    }

    #[test]
    fn deleted_polygon_id_is_reused() {
        let mut graph = Graph::new();
        let sq = clockwise_square(&mut graph);
        let first = graph.create_polygon(&sq.v, &sq.l).unwrap();
        graph.delete_polygon(first);
        let again = graph.create_polygon(&sq.v, &sq.l).unwrap();
        assert_eq!(graph.polygon(again).unwrap().id(), 0);
    }
}
