//! Example walking through transform and color propagation

use scenegraph::prelude::*;

/// A component that remembers where it is hosted
#[derive(Debug)]
struct Spotlight {
    intensity: f32,
    host: Option<NodeId>,
}

impl Component for Spotlight {
    fn node_changed(&mut self, _old: Option<NodeId>, new: Option<NodeId>) {
        self.host = new;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SceneGraphConfig::from_ron(&std::fs::read_to_string(path)?)?,
        None => SceneGraphConfig::default(),
    };
    let mut graph = SceneGraph::with_config(config);

    // R -> A -> B
    let r = graph.create_named("R");
    let a = graph.create_named("A");
    let b = graph.create_named("B");
    graph.add_child(r, a);
    graph.add_child(a, b);
    graph.release(a);
    graph.set_local_position(a, Vec3::new(1.0, 0.0, 0.0));
    graph.set_local_position(b, Vec3::new(0.0, 2.0, 0.0));

    log::info!("B world position under A: {:?}", graph.world_position(b));

    // Plain reparent keeps the local transform
    graph.remove_child(a, b);
    graph.add_child(r, b);
    log::info!("B world position under R: {:?}", graph.world_position(b));

    // Moving back while keeping the world position is up to the caller
    let world = graph.world_position(b).unwrap_or_default();
    graph.remove_child(r, b);
    graph.add_child(a, b);
    graph.release(b);
    graph.set_world_position(b, world);
    log::info!("B local position after world-preserving move: {:?}", graph.local_position(b));

    // Tint cascade
    graph.set_alpha(a, 0.5);
    log::info!("B cascade color: {:?}", graph.cascade_color(b));

    if graph.add_component(b, Spotlight { intensity: 3.0, host: None }).is_ok() {
        if let Some(light) = graph.component::<Spotlight>(b, true, ALL_LAYERS) {
            log::info!("{} lit at {:.1} by {:?}", b, light.intensity, light.host);
        }
    }

    let mut names = Vec::new();
    graph.for_each_child(r, |graph, child| {
        if let Some(node) = graph.node(child) {
            names.push(node.name().to_string());
        }
        true
    });
    log::info!("children of R: {names:?}");

    let snapshot = SceneSnapshot::capture(&graph, r);
    println!("{}", snapshot.to_ron_string()?);

    graph.release(r);
    log::info!("nodes left after releasing R: {}", graph.len());

    Ok(())
}
