use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{PersistenceError, PolygonError};
use crate::math::Point2;
use crate::topology::{Graph, LineKey, VertexKey};

use super::document::{GraphDocument, LineRecord, PolygonRecord, VertexDocument, VertexRecord};
use super::format::JsonFormat;

/// Summary of a completed import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub vertices: usize,
    pub lines: usize,
    pub polygons: usize,
    /// Polygons whose lines did not form a simple cycle; the rest of the
    /// document was still imported.
    pub skipped_polygons: Vec<SkippedPolygon>,
}

/// A polygon left out of an import.
#[derive(Debug)]
pub struct SkippedPolygon {
    pub id: u32,
    pub reason: PolygonError,
}

impl Graph {
    /// Replaces the graph with the contents of a full document.
    ///
    /// The document is validated completely and built into a fresh graph
    /// first; on error the current graph is left untouched. Afterwards new
    /// line and polygon ids start above the largest imported id.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure: a duplicate id, a self-loop
    /// line, a reference to a missing vertex or line, or a polygon whose id
    /// lists are shorter than 3 or differ in length.
    pub fn import_document(
        &mut self,
        document: &GraphDocument,
    ) -> Result<ImportReport, PersistenceError> {
        let vertex_ids = validate_vertices(&document.vertices)?;
        let line_ids = validate_lines(&document.lines, &vertex_ids)?;
        validate_polygons(&document.polygons, &vertex_ids, &line_ids)?;

        let (graph, report) = build(document)?;
        self.replace_with(graph);
        tracing::info!(
            vertices = report.vertices,
            lines = report.lines,
            polygons = report.polygons,
            skipped = report.skipped_polygons.len(),
            "graph imported"
        );
        Ok(report)
    }

    /// Decodes and imports a full JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] for malformed JSON or a missing
    /// array or field, otherwise the errors of [`Graph::import_document`].
    pub fn import_json(&mut self, bytes: &[u8]) -> Result<ImportReport, PersistenceError> {
        let document: GraphDocument = JsonFormat::decode(bytes)?;
        self.import_document(&document)
    }

    /// Reads and imports a full JSON document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be read, otherwise
    /// the errors of [`Graph::import_json`].
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<ImportReport, PersistenceError> {
        let bytes = std::fs::read(path)?;
        self.import_json(&bytes)
    }

    /// Replaces the graph with the vertices of a vertex-only document.
    ///
    /// All lines and polygons are dropped and every id allocator restarts at 0.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DuplicateId`] if a vertex id repeats.
    pub fn import_vertex_document(
        &mut self,
        document: &VertexDocument,
    ) -> Result<usize, PersistenceError> {
        validate_vertices(&document.vertices)?;
        let mut graph = Graph::new();
        insert_vertices(&mut graph, &document.vertices)?;
        let count = graph.vertex_count();
        self.replace_with(graph);
        tracing::info!(vertices = count, "vertices imported");
        Ok(count)
    }

    /// Decodes and imports a vertex-only JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] for malformed JSON, otherwise the
    /// errors of [`Graph::import_vertex_document`].
    pub fn import_vertices_json(&mut self, bytes: &[u8]) -> Result<usize, PersistenceError> {
        let document: VertexDocument = JsonFormat::decode(bytes)?;
        self.import_vertex_document(&document)
    }

    /// Reads and imports a vertex-only JSON document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be read, otherwise
    /// the errors of [`Graph::import_vertices_json`].
    pub fn load_vertices(&mut self, path: impl AsRef<Path>) -> Result<usize, PersistenceError> {
        let bytes = std::fs::read(path)?;
        self.import_vertices_json(&bytes)
    }
}

fn validate_vertices(records: &[VertexRecord]) -> Result<HashSet<u32>, PersistenceError> {
    let mut ids = HashSet::with_capacity(records.len());
    for record in records {
        if !ids.insert(record.id) {
            return Err(PersistenceError::DuplicateId {
                kind: "vertex",
                id: record.id,
            });
        }
    }
    Ok(ids)
}

fn validate_lines(
    records: &[LineRecord],
    vertex_ids: &HashSet<u32>,
) -> Result<HashSet<u32>, PersistenceError> {
    let mut ids = HashSet::with_capacity(records.len());
    for record in records {
        if record.start_vertex_id == record.end_vertex_id {
            return Err(PersistenceError::SelfLoop {
                line: record.id,
                vertex: record.start_vertex_id,
            });
        }
        if !ids.insert(record.id) {
            return Err(PersistenceError::DuplicateId {
                kind: "line",
                id: record.id,
            });
        }
        for endpoint in [record.start_vertex_id, record.end_vertex_id] {
            if !vertex_ids.contains(&endpoint) {
                return Err(PersistenceError::DanglingReference {
                    kind: "line",
                    id: record.id,
                    target: "vertex",
                    target_id: endpoint,
                });
            }
        }
    }
    Ok(ids)
}

fn validate_polygons(
    records: &[PolygonRecord],
    vertex_ids: &HashSet<u32>,
    line_ids: &HashSet<u32>,
) -> Result<(), PersistenceError> {
    let mut ids = HashSet::with_capacity(records.len());
    for record in records {
        let (vertices, lines) = (record.vertex_ids.len(), record.line_ids.len());
        if vertices < 3 || vertices != lines {
            return Err(PersistenceError::PolygonArity {
                polygon: record.id,
                vertices,
                lines,
            });
        }
        let dangling = |target, target_id| PersistenceError::DanglingReference {
            kind: "polygon",
            id: record.id,
            target,
            target_id,
        };
        if let Some(missing) = record
            .vertex_ids
            .iter()
            .copied()
            .find(|id| !vertex_ids.contains(id))
        {
            return Err(dangling("vertex", missing));
        }
        if let Some(missing) = record
            .line_ids
            .iter()
            .copied()
            .find(|id| !line_ids.contains(id))
        {
            return Err(dangling("line", missing));
        }
        if !ids.insert(record.id) {
            return Err(PersistenceError::DuplicateId {
                kind: "polygon",
                id: record.id,
            });
        }
    }
    Ok(())
}

fn insert_vertices(
    graph: &mut Graph,
    records: &[VertexRecord],
) -> Result<HashMap<u32, VertexKey>, PersistenceError> {
    let mut keys = HashMap::with_capacity(records.len());
    for record in records {
        let key = graph
            .create_vertex_with_id(record.id, Point2::new(record.x, record.y))
            .map_err(|_| PersistenceError::DuplicateId {
                kind: "vertex",
                id: record.id,
            })?;
        keys.insert(record.id, key);
    }
    Ok(keys)
}

/// Materializes a validated document into a new graph.
fn build(document: &GraphDocument) -> Result<(Graph, ImportReport), PersistenceError> {
    let mut graph = Graph::new();
    let vertex_keys = insert_vertices(&mut graph, &document.vertices)?;

    let mut line_keys: HashMap<u32, LineKey> = HashMap::with_capacity(document.lines.len());
    for record in &document.lines {
        let endpoint = |id: u32| {
            vertex_keys
                .get(&id)
                .copied()
                .ok_or(PersistenceError::DanglingReference {
                    kind: "line",
                    id: record.id,
                    target: "vertex",
                    target_id: id,
                })
        };
        let (start, end) = (
            endpoint(record.start_vertex_id)?,
            endpoint(record.end_vertex_id)?,
        );
        let key = graph
            .create_line_with_id(record.id, start, end)
            .map_err(|source| PersistenceError::LineCreation {
                line: record.id,
                source,
            })?;
        line_keys.insert(record.id, key);
    }

    let mut report = ImportReport {
        vertices: graph.vertex_count(),
        lines: graph.line_count(),
        ..ImportReport::default()
    };
    for record in &document.polygons {
        let vertices: Vec<VertexKey> = record
            .vertex_ids
            .iter()
            .filter_map(|id| vertex_keys.get(id).copied())
            .collect();
        let lines: Vec<LineKey> = record
            .line_ids
            .iter()
            .filter_map(|id| line_keys.get(id).copied())
            .collect();
        if let Err(reason) = graph.create_polygon_with_id(record.id, &vertices, &lines) {
            tracing::warn!(id = record.id, %reason, "skipping polygon");
            report.skipped_polygons.push(SkippedPolygon {
                id: record.id,
                reason,
            });
        }
    }
    report.polygons = graph.polygon_count();

    graph
        .line_allocator_mut()
        .advance_past(document.lines.iter().map(|l| l.id).max());
    graph
        .polygon_allocator_mut()
        .advance_past(document.polygons.iter().map(|p| p.id).max());
    Ok((graph, report))
}
