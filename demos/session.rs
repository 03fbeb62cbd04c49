//! Scripted editing session against the plangraph model.
//!
//! Usage:
//! ```text
//! cargo run --example session
//! RUST_LOG=plangraph=debug cargo run --example session
//! ```
//!
//! Plays the part of the rendering surface: it drains scene changes, binds a
//! fake render handle to every new entity, drags a vertex through its handle
//! and prints the exported document.

use plangraph::math::Point2;
use plangraph::operations::creation::MakePolygon;
use plangraph::operations::query::IsValid;
use plangraph::persistence::JsonFormat;
use plangraph::scene::{EntityKey, RenderHandle, SceneChange};
use plangraph::Graph;

/// Stand-in for a scene: hands out sequential handles.
#[derive(Default)]
struct FakeSurface {
    next: u64,
}

impl FakeSurface {
    fn sync(&mut self, graph: &mut Graph) -> Vec<(EntityKey, RenderHandle)> {
        let mut bound = Vec::new();
        for change in graph.drain_scene_changes() {
            match change {
                SceneChange::Added(entity) => {
                    let handle = RenderHandle(self.next);
                    self.next += 1;
                    graph.bind_render_handle(entity, handle);
                    bound.push((entity, handle));
                }
                SceneChange::Removed { entity, handle } => {
                    println!("remove visual {handle:?} for {entity:?}");
                }
                SceneChange::Reshaped(entity) => println!("reshape {entity:?}"),
            }
        }
        bound
    }
}

fn main() -> plangraph::Result<()> {
    // Default: WARN for everything, INFO for plangraph.
    // Override with RUST_LOG env var (e.g. RUST_LOG=plangraph=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("session=info".parse().unwrap_or_default())
        .add_directive("plangraph=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut graph = Graph::new();
    let mut surface = FakeSurface::default();

    let corners = [(0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0)];
    let vertices = corners
        .iter()
        .map(|&(x, y)| graph.create_vertex(Point2::new(x, y)))
        .collect::<Result<Vec<_>, _>>()?;
    let square = MakePolygon::from_vertices(vertices.clone());
    let square = square.execute(&mut graph)?;
    let bound = surface.sync(&mut graph);
    println!("bound {} visuals", bound.len());

    // Drag the first corner through its visual.
    if let Some(handle) = graph.render_handle(vertices[0].into()) {
        let dragged = Point2::new(-20.0, -20.0);
        graph.on_render_handle_moved(handle, dragged);
    }
    surface.sync(&mut graph);
    println!("square area: {:?}", graph.polygon_signed_area(square));

    let document = graph.export_json(&JsonFormat::pretty())?;
    println!("{}", String::from_utf8_lossy(&document));

    graph.delete_vertex(vertices[2]);
    surface.sync(&mut graph);
    println!(
        "after delete: {} vertices, {} lines, {} polygons, consistent: {}",
        graph.vertex_count(),
        graph.line_count(),
        graph.polygon_count(),
        IsValid::new().execute(&graph)
    );

    let report = graph.import_json(&document)?;
    surface.sync(&mut graph);
    println!(
        "restored {} vertices, {} lines, {} polygons",
        report.vertices, report.lines, report.polygons
    );
    Ok(())
}
