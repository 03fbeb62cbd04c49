//! Planar graph model for interactively drawing vertices, lines and polygons.
//!
//! A [`Graph`] owns every entity and keeps back-references consistent across
//! cascading deletes. Polygons are built from unordered vertex or line
//! selections by [`MakePolygon`](operations::creation::MakePolygon), and the
//! whole graph round-trips through JSON via the [`persistence`] module.

pub mod error;
pub mod math;
pub mod operations;
pub mod persistence;
pub mod scene;
pub mod topology;

pub use error::{Error, Result};
pub use topology::Graph;
