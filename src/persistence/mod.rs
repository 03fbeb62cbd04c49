//! JSON import and export of the whole graph.
//!
//! Two document shapes exist: the full graph (`vertices`, `lines` and
//! `polygons`, all three required) and the vertex-only form. Entities refer
//! to each other by id in the file. Import validates the complete document
//! before building a fresh graph, and only replaces the live graph once
//! that succeeds.

mod document;
mod export;
mod format;
mod import;

pub use document::{GraphDocument, LineRecord, PolygonRecord, VertexDocument, VertexRecord};
pub use format::JsonFormat;
pub use import::{ImportReport, SkippedPolygon};
