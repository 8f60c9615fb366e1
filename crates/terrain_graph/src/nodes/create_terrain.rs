//! Generator node that allocates a fresh terrain.
use crate::error::{Error, Result};
use crate::graph::node::{Inputs, Node, RunContext};
use crate::graph::params::Parameters;
use crate::graph::value::{Port, Value};
use crate::terrain::Terrain;

const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const INITIAL_HEIGHT: &str = "initialHeight";

/// Creates a terrain of `width` x `height` whose height layer is set to `initialHeight`.
///
/// Takes no inputs; every run returns a new terrain.
#[derive(Clone, Debug)]
pub struct CreateTerrain {
    name: String,
    parameters: Parameters,
}

impl CreateTerrain {
    pub const NAME: &'static str = "Create Terrain";

    pub fn new(width: usize, height: usize, initial_height: f32) -> Self {
        let parameters = Parameters::new()
            .with(WIDTH, i64::try_from(width).unwrap_or(i64::MAX))
            .with(HEIGHT, i64::try_from(height).unwrap_or(i64::MAX))
            .with(INITIAL_HEIGHT, initial_height);
        Self {
            name: Self::NAME.to_string(),
            parameters,
        }
    }

    /// Build from a parameter mapping. All three parameters must be present; their types are
    /// checked when the node runs.
    pub fn from_parameters(parameters: Parameters) -> Result<Self> {
        parameters.require(Self::NAME, &[WIDTH, HEIGHT, INITIAL_HEIGHT])?;
        Ok(Self {
            name: Self::NAME.to_string(),
            parameters,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Node for CreateTerrain {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_inputs(&self) -> &[Port] {
        &[]
    }

    fn output(&self) -> Port {
        Port::terrain("terrain")
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn run(&self, _inputs: Inputs, _ctx: &mut RunContext<'_>) -> Result<Value> {
        let width = self.parameters.int(&self.name, WIDTH)?;
        let height = self.parameters.int(&self.name, HEIGHT)?;
        let initial_height = self.parameters.float(&self.name, INITIAL_HEIGHT)?;

        let (Ok(w), Ok(h)) = (usize::try_from(width), usize::try_from(height)) else {
            return Err(Error::InvalidDimension { width, height });
        };
        Ok(Terrain::new(w, h, initial_height)?.into())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::graph::events::VecSink;
    use crate::terrain::HEIGHT_LAYER;

    fn run(node: &CreateTerrain) -> Result<Value> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut sink = VecSink::new();
        let mut ctx = RunContext::new(&mut rng, &mut sink);
        node.run(Inputs::new(), &mut ctx)
    }

    #[test]
    fn creates_flat_terrain_from_parameters() {
        let params = Parameters::new()
            .with("width", 512)
            .with("height", 512)
            .with("initialHeight", 0);
        let node = CreateTerrain::from_parameters(params).expect("all parameters present");
        assert_eq!(node.name(), "Create Terrain");
        assert!(node.required_inputs().is_empty());

        let terrain = run(&node).unwrap().into_terrain().expect("terrain output");
        assert_eq!(terrain.size(), (512, 512));
        let height = terrain.layer(HEIGHT_LAYER).unwrap();
        assert_eq!(height.data().len(), 512 * 512);
        assert!(height.data().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn every_run_returns_a_new_terrain() {
        let node = CreateTerrain::new(3, 2, 4.0);
        let a = run(&node).unwrap();
        let b = run(&node).unwrap();
        assert_eq!(a, b);
        assert!(a
            .as_terrain()
            .unwrap()
            .height_layer()
            .unwrap()
            .data()
            .iter()
            .all(|v| *v == 4.0));
    }

    #[test]
    fn non_positive_dimensions_are_invalid() {
        for (w, h) in [(0, 10), (10, 0), (-3, 10), (10, -1)] {
            let params = Parameters::new()
                .with("width", w)
                .with("height", h)
                .with("initialHeight", 0.0f32);
            let node = CreateTerrain::from_parameters(params).unwrap();
            assert!(matches!(run(&node), Err(Error::InvalidDimension { .. })));
        }
    }

    #[test]
    fn missing_parameter_is_rejected_up_front() {
        let params = Parameters::new().with("width", 4).with("height", 4);
        assert!(matches!(
            CreateTerrain::from_parameters(params),
            Err(Error::MissingParameter { ref name, .. }) if name == "initialHeight"
        ));
    }

    #[test]
    fn mistyped_parameter_fails_at_run() {
        let params = Parameters::new()
            .with("width", "wide")
            .with("height", 4)
            .with("initialHeight", 0.0f32);
        let node = CreateTerrain::from_parameters(params).unwrap();
        assert!(matches!(run(&node), Err(Error::InvalidParameter { .. })));
    }
}
