//! Node that overwrites the height layer with uniform white noise.
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::Result;
use crate::graph::node::{Inputs, Node, RunContext};
use crate::graph::params::Parameters;
use crate::graph::value::{Port, Value};
use crate::terrain::Terrain;

const INPUTS: &[Port] = &[Port::terrain("terrain")];
const SEED: &str = "seed";

/// Replaces every height cell with an independent uniform sample in `[0, 1)`.
///
/// Without a `seed` parameter the samples come from the pass RNG, so repeated runs differ.
/// With a seed every run produces the same grid for a given terrain size.
#[derive(Clone, Debug)]
pub struct TerrainNoise {
    name: String,
    parameters: Parameters,
}

impl TerrainNoise {
    pub const NAME: &'static str = "Terrain Noise";

    pub fn new() -> Self {
        Self {
            name: Self::NAME.to_string(),
            parameters: Parameters::new(),
        }
    }

    pub fn from_parameters(parameters: Parameters) -> Result<Self> {
        // Reject a mistyped seed now rather than mid-pass.
        parameters.opt_int(Self::NAME, SEED)?;
        Ok(Self {
            name: Self::NAME.to_string(),
            parameters,
        })
    }

    /// Draw from a generator seeded with `seed` on every run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.parameters.set(SEED, seed as i64);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for TerrainNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for TerrainNoise {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_inputs(&self) -> &[Port] {
        INPUTS
    }

    fn output(&self) -> Port {
        Port::terrain("terrain")
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn run(&self, mut inputs: Inputs, ctx: &mut RunContext<'_>) -> Result<Value> {
        let mut terrain = inputs.take_terrain(&self.name, "terrain")?;
        match self.parameters.opt_int(&self.name, SEED)? {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed as u64);
                fill_height_uniform(&mut terrain, &mut rng)?;
            }
            None => fill_height_uniform(&mut terrain, ctx.rng())?,
        }
        Ok(terrain.into())
    }
}

fn fill_height_uniform(terrain: &mut Terrain, rng: &mut dyn RngCore) -> Result<()> {
    let layer = terrain.height_layer_mut()?;
    layer.data_mut().iter_mut().for_each(|v| *v = unit_f32(rng));
    Ok(())
}

/// Uniform float in `[0, 1)`. Uses the top 24 bits so every result is exactly representable
/// and strictly below one.
#[inline]
pub fn unit_f32(rng: &mut dyn RngCore) -> f32 {
    const SCALE: f32 = 1.0 / (1u32 << 24) as f32;
    (rng.next_u32() >> 8) as f32 * SCALE
}
