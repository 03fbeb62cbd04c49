use crate::topology::{Graph, Polygon, PolygonKey};

/// Checks that the graph holds no dangling references and that every
/// polygon is a well-formed closed ring.
///
/// Every mutating operation on [`Graph`] is expected to leave this query
/// returning `true`.
#[derive(Debug, Default)]
pub struct IsValid;

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the validation, returning `true` if the graph is consistent.
    #[must_use]
    pub fn execute(&self, graph: &Graph) -> bool {
        self.violations(graph).is_empty()
    }

    /// Lists every inconsistency found, as human-readable messages.
    #[must_use]
    pub fn violations(&self, graph: &Graph) -> Vec<String> {
        let mut out = Vec::new();

        for (key, vertex) in graph.vertices() {
            let id = vertex.id();
            if graph.find_vertex_by_id(id) != Some(key) {
                out.push(format!("vertex {id} is not indexed by its id"));
            }
            for &line in vertex.lines() {
                if !graph.line(line).is_some_and(|l| l.involves_vertex(key)) {
                    out.push(format!("vertex {id} lists a line that does not end at it"));
                }
            }
            for &p in vertex.polygons() {
                if !graph.polygon(p).is_some_and(|q| q.involves_vertex(key)) {
                    out.push(format!("vertex {id} lists a polygon that does not use it"));
                }
            }
        }

        for (key, line) in graph.lines() {
            let id = line.id();
            if graph.find_line_by_id(id) != Some(key) {
                out.push(format!("line {id} is not indexed by its id"));
            }
            if line.start() == line.end() {
                out.push(format!("line {id} is a self-loop"));
            }
            for v in [line.start(), line.end()] {
                if !graph.vertex(v).is_some_and(|x| x.lines().contains(&key)) {
                    out.push(format!("line {id} has a missing or unlinked endpoint"));
                }
            }
            for &p in line.polygons() {
                if !graph.polygon(p).is_some_and(|q| q.involves_line(key)) {
                    out.push(format!("line {id} lists a polygon that does not use it"));
                }
            }
        }

        for (key, polygon) in graph.polygons() {
            check_ring(graph, key, polygon, &mut out);
        }

        out
    }
}

fn check_ring(graph: &Graph, key: PolygonKey, polygon: &Polygon, out: &mut Vec<String>) {
    let id = polygon.id();
    if graph.find_polygon_by_id(id) != Some(key) {
        out.push(format!("polygon {id} is not indexed by its id"));
    }
    let (vertices, lines) = (polygon.vertices(), polygon.lines());
    let n = vertices.len();
    if n < 3 || n != lines.len() {
        out.push(format!("polygon {id} has an invalid ring size"));
        return;
    }
    for (i, &line_key) in lines.iter().enumerate() {
        let (from, to) = (vertices[i], vertices[(i + 1) % n]);
        match graph.line(line_key) {
            Some(line) if line.connects(from, to) => {
                if !line.polygons().contains(&key) {
                    out.push(format!("polygon {id} is missing from line {}", line.id()));
                }
            }
            Some(line) => out.push(format!("polygon {id}: line {} breaks the ring", line.id())),
            None => out.push(format!("polygon {id} references a missing line")),
        }
        if line_key_repeats(lines, i) {
            out.push(format!("polygon {id} uses a line twice"));
        }
    }
    for &v in vertices {
        if !graph.vertex(v).is_some_and(|x| x.polygons().contains(&key)) {
            out.push(format!("polygon {id} has a missing or unlinked vertex"));
        }
    }
}

fn line_key_repeats<K: PartialEq>(keys: &[K], index: usize) -> bool {
    keys[index + 1..].contains(&keys[index])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    #[test]
    fn empty_graph_is_valid() {
        assert!(IsValid::new().execute(&Graph::new()));
    }

    #[test]
    fn graph_stays_valid_through_edits() {
        let mut graph = Graph::new();
        let v: Vec<_> = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (8.0, 2.0)]
            .iter()
            .map(|&(x, y)| graph.create_vertex(Point2::new(x, y)).unwrap())
            .collect();
        let l = [
            graph.create_line(v[0], v[1]).unwrap(),
            graph.create_line(v[1], v[2]).unwrap(),
            graph.create_line(v[2], v[3]).unwrap(),
            graph.create_line(v[3], v[0]).unwrap(),
            graph.create_line(v[1], v[4]).unwrap(),
            graph.create_line(v[4], v[2]).unwrap(),
        ];
        graph.create_polygon(&v[..4], &l[..4]).unwrap();
        graph
            .create_polygon(&[v[1], v[4], v[2]], &[l[4], l[5], l[1]])
            .unwrap();
        let check = IsValid::new();
        assert!(check.violations(&graph).is_empty());

        graph.delete_vertex(v[4]);
        assert!(check.execute(&graph));
        assert_eq!(graph.polygon_count(), 1);

        graph.delete_line(l[0]);
        assert!(check.execute(&graph));
        assert_eq!(graph.polygon_count(), 0);
    }
}
