use serde::{Deserialize, Serialize};

/// A vertex as stored in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

/// A line as stored in a document, referring to its endpoints by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRecord {
    pub id: u32,
    pub start_vertex_id: u32,
    pub end_vertex_id: u32,
}

/// A polygon as stored in a document, as parallel id lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonRecord {
    pub id: u32,
    pub vertex_ids: Vec<u32>,
    pub line_ids: Vec<u32>,
}

/// The full-graph document. All three arrays are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub vertices: Vec<VertexRecord>,
    pub lines: Vec<LineRecord>,
    pub polygons: Vec<PolygonRecord>,
}

/// The vertex-only document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexDocument {
    pub vertices: Vec<VertexRecord>,
}
