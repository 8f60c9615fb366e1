use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_graph::prelude::*;
use terrain_graph_examples::{init_tracing, log_terrain_summary};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Nodes can run without a graph: build the inputs by hand.
    let create = CreateTerrain::from_parameters(
        Parameters::new()
            .with("width", 512)
            .with("height", 512)
            .with("initialHeight", 0.0),
    )?;
    let noise = TerrainNoise::new();

    let mut rng = StdRng::seed_from_u64(2025);
    let mut sink = VecSink::new();
    let mut ctx = RunContext::new(&mut rng, &mut sink);

    let flat = create.run(Inputs::new(), &mut ctx)?;
    if let Some(terrain) = flat.as_terrain() {
        log_terrain_summary("created", terrain);
    }

    let noised = noise.run(Inputs::new().with("terrain", flat), &mut ctx)?;
    let terrain = noised
        .into_terrain()
        .ok_or_else(|| anyhow::anyhow!("noise did not return a terrain"))?;
    log_terrain_summary("after noise", &terrain);

    // A second pass over the same terrain draws fresh values.
    let before = terrain.height_layer()?.clone();
    let again = noise
        .run(Inputs::new().with("terrain", terrain), &mut ctx)?
        .into_terrain()
        .ok_or_else(|| anyhow::anyhow!("noise did not return a terrain"))?;
    let changed = before
        .data()
        .iter()
        .zip(again.height_layer()?.data())
        .filter(|(a, b)| a != b)
        .count();
    tracing::info!("second pass changed {changed} of {} cells", before.data().len());

    Ok(())
}
