use std::path::Path;

use crate::error::PersistenceError;
use crate::topology::Graph;

use super::document::{GraphDocument, LineRecord, PolygonRecord, VertexDocument, VertexRecord};
use super::format::JsonFormat;

impl Graph {
    /// Snapshots the graph as a full document, each array in ascending id order.
    #[must_use]
    pub fn to_document(&self) -> GraphDocument {
        let vertex_id = |key| self.vertex(key).map_or(u32::MAX, |v| v.id());
        let line_id = |key| self.line(key).map_or(u32::MAX, |l| l.id());

        let lines = self
            .lines()
            .map(|(_, line)| LineRecord {
                id: line.id(),
                start_vertex_id: vertex_id(line.start()),
                end_vertex_id: vertex_id(line.end()),
            })
            .collect();
        let polygons = self
            .polygons()
            .map(|(_, polygon)| PolygonRecord {
                id: polygon.id(),
                vertex_ids: polygon.vertices().iter().map(|&v| vertex_id(v)).collect(),
                line_ids: polygon.lines().iter().map(|&l| line_id(l)).collect(),
            })
            .collect();

        GraphDocument {
            vertices: self.vertex_records(),
            lines,
            polygons,
        }
    }

    /// Snapshots only the vertices.
    #[must_use]
    pub fn to_vertex_document(&self) -> VertexDocument {
        VertexDocument {
            vertices: self.vertex_records(),
        }
    }

    fn vertex_records(&self) -> Vec<VertexRecord> {
        self.vertices()
            .map(|(_, vertex)| VertexRecord {
                id: vertex.id(),
                x: vertex.position().x,
                y: vertex.position().y,
            })
            .collect()
    }

    /// Encodes the full graph as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if encoding fails.
    pub fn export_json(&self, format: &JsonFormat) -> Result<Vec<u8>, PersistenceError> {
        let document = self.to_document();
        let bytes = format.encode(&document)?;
        tracing::info!(
            vertices = document.vertices.len(),
            lines = document.lines.len(),
            polygons = document.polygons.len(),
            "graph exported"
        );
        Ok(bytes)
    }

    /// Encodes only the vertices as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if encoding fails.
    pub fn export_vertices_json(&self, format: &JsonFormat) -> Result<Vec<u8>, PersistenceError> {
        let document = self.to_vertex_document();
        let bytes = format.encode(&document)?;
        tracing::info!(vertices = document.vertices.len(), "vertices exported");
        Ok(bytes)
    }

    /// Writes the full graph to a file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be written.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        format: &JsonFormat,
    ) -> Result<(), PersistenceError> {
        let bytes = self.export_json(format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Writes only the vertices to a file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be written.
    pub fn save_vertices(
        &self,
        path: impl AsRef<Path>,
        format: &JsonFormat,
    ) -> Result<(), PersistenceError> {
        let bytes = self.export_vertices_json(format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use serde_json::{json, Value};

    #[test]
    fn empty_graph_exports_three_empty_arrays() {
        let bytes = Graph::new().export_json(&JsonFormat::new()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"vertices": [], "lines": [], "polygons": []}));
    }

    #[test]
    fn export_uses_ids_not_keys() {
        let mut graph = Graph::new();
        let a = graph.create_vertex(Point2::new(0.0, 0.0)).unwrap();
        let b = graph.create_vertex(Point2::new(10.0, 0.0)).unwrap();
        let c = graph.create_vertex(Point2::new(0.0, 10.0)).unwrap();
        let ab = graph.create_line(a, b).unwrap();
        let bc = graph.create_line(b, c).unwrap();
        let ca = graph.create_line(c, a).unwrap();
        graph.create_polygon(&[a, b, c], &[ab, bc, ca]).unwrap();

        let doc = graph.to_document();
        assert_eq!(
            doc.lines[1],
            LineRecord {
                id: 1,
                start_vertex_id: 1,
                end_vertex_id: 2
            }
        );
        assert_eq!(doc.polygons[0].vertex_ids, vec![0, 1, 2]);
        assert_eq!(doc.polygons[0].line_ids, vec![0, 1, 2]);
    }

    #[test]
    fn vertex_only_export_skips_lines() {
        let mut graph = Graph::new();
        let a = graph.create_vertex(Point2::new(1.0, 2.0)).unwrap();
        let b = graph.create_vertex(Point2::new(3.0, 4.0)).unwrap();
        graph.create_line(a, b).unwrap();

        let bytes = graph.export_vertices_json(&JsonFormat::new()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            json!({"vertices": [{"id": 0, "x": 1.0, "y": 2.0}, {"id": 1, "x": 3.0, "y": 4.0}]})
        );
    }
}
