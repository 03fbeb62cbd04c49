//! Notifications exchanged with the rendering surface.
//!
//! The model never draws. Every mutation appends [`SceneChange`] values to a
//! queue that the host drains after each user action, creating, removing or
//! reshaping its visuals accordingly. The host then binds the visual it made
//! to the entity with [`Graph::bind_render_handle`](crate::topology::Graph::bind_render_handle)
//! so that picks and drags on the surface can be resolved back to the model.

use crate::topology::{LineKey, PolygonKey, VertexKey};

/// Opaque identifier of a visual item owned by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(pub u64);

/// A handle to any entity in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Vertex(VertexKey),
    Line(LineKey),
    Polygon(PolygonKey),
}

impl From<VertexKey> for EntityKey {
    fn from(key: VertexKey) -> Self {
        Self::Vertex(key)
    }
}

impl From<LineKey> for EntityKey {
    fn from(key: LineKey) -> Self {
        Self::Line(key)
    }
}

impl From<PolygonKey> for EntityKey {
    fn from(key: PolygonKey) -> Self {
        Self::Polygon(key)
    }
}

/// A change the rendering surface has to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChange {
    /// The entity was created and needs a visual.
    Added(EntityKey),
    /// The entity is gone; `handle` is the visual bound to it, if any.
    Removed {
        entity: EntityKey,
        handle: Option<RenderHandle>,
    },
    /// The entity's geometry changed (a vertex it depends on moved).
    Reshaped(EntityKey),
}
