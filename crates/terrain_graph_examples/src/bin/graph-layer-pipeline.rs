use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_graph::prelude::*;
use terrain_graph_examples::{init_tracing, log_event, log_terrain_summary};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // create -> noise -> smoothstep -> copy to "base" -> offset "base"
    //                 \-> extract height -> insert as "raw" into the final terrain
    let mut graph = Graph::new("layer-pipeline");
    let create = graph.add_node(CreateTerrain::new(256, 256, 0.0));
    let noise = graph.add_node(TerrainNoise::new().with_seed(7));
    let smooth = graph.add_node(LayerFilter::smoothstep(0.2, 0.8).with_name("Smooth"));
    let copy = graph.add_node(CopyLayer::new(HEIGHT_LAYER, "base"));
    let lift = graph.add_node(
        LayerFilter::offset(0.5)
            .on_layer("base")
            .with_name("Lift Base"),
    );
    let extract = graph.add_node(ExtractLayer::new(HEIGHT_LAYER));
    let insert = graph.add_node(InsertLayer::new("raw"));

    graph.link(create, "terrain", noise, "terrain")?;
    graph.link(noise, "terrain", smooth, "terrain")?;
    graph.link(noise, "terrain", extract, "terrain")?;
    graph.link(smooth, "terrain", copy, "terrain")?;
    graph.link_by_name("Copy Layer", "terrain", "Lift Base", "terrain")?;
    graph.link(lift, "terrain", insert, "terrain")?;
    graph.link(extract, "grid", insert, "grid")?;

    let options = RunOptions::move_only().with_retained(noise);
    let runner = GraphRunner::new(&graph, options)?;
    tracing::info!("run order: {:?}", runner.plan().order());

    let mut rng = StdRng::seed_from_u64(2025);
    let mut sink = FnSink::new(|event: GraphEvent| log_event(&event));
    let execution = runner.run_with_events(&mut rng, &mut sink)?;

    if let Some(terrain) = execution.terrain(noise) {
        log_terrain_summary("noise snapshot", terrain);
    }
    let terrain = execution
        .terrain(insert)
        .ok_or_else(|| anyhow::anyhow!("final terrain missing"))?;
    log_terrain_summary("final", terrain);

    Ok(())
}
