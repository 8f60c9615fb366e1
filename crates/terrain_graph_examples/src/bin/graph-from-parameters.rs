use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_graph::prelude::*;
use terrain_graph_examples::{init_tracing, log_terrain_summary};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Nodes configured purely from parameter mappings, as a loader would build them.
    let mut graph = Graph::new("from-parameters");
    let create = graph.add_node(CreateTerrain::from_parameters(
        [
            ("width", ParamValue::Int(128)),
            ("height", ParamValue::Int(64)),
            ("initialHeight", ParamValue::Float(0.0)),
        ]
        .into_iter()
        .collect(),
    )?);
    let noise = graph.add_node(TerrainNoise::from_parameters(
        Parameters::new().with("seed", 99),
    )?);
    let shape = graph.add_node(LayerFilter::from_parameters(
        Parameters::new().with("op", "pow").with("exp", 2.0),
    )?);
    let clamp = graph.add_node(LayerFilter::from_parameters(
        Parameters::new()
            .with("op", "clamp")
            .with("min", 0.1)
            .with("max", 0.9),
    )?);
    graph.link(create, "terrain", noise, "terrain")?;
    graph.link(noise, "terrain", shape, "terrain")?;
    graph.link(shape, "terrain", clamp, "terrain")?;

    for (id, node) in graph.nodes() {
        let params: Vec<String> = node
            .parameters()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        tracing::info!("{id} {}: {}", node.name(), params.join(", "));
    }

    let mut rng = StdRng::seed_from_u64(1);
    let mut execution = graph.execute(&mut rng)?;
    let terrain = execution
        .take_output(clamp)
        .and_then(Value::into_terrain)
        .ok_or_else(|| anyhow::anyhow!("final terrain missing"))?;
    log_terrain_summary("clamped", &terrain);

    // Structural mistakes surface before anything runs.
    let mut broken = Graph::new("broken");
    broken.add_node(TerrainNoise::new());
    if let Err(e) = broken.execute(&mut rng) {
        tracing::warn!("expected failure: {e}");
    }

    Ok(())
}
