//! Nodes that move whole layers between terrains and grids.
use crate::error::{Error, Result};
use crate::graph::node::{Inputs, Node, RunContext};
use crate::graph::params::Parameters;
use crate::graph::value::{Port, Value};
use crate::terrain::{Layer, HEIGHT_LAYER};

const TERRAIN_IN: &[Port] = &[Port::terrain("terrain")];
const TERRAIN_AND_GRID_IN: &[Port] = &[Port::terrain("terrain"), Port::grid("grid")];
const TERRAIN_AND_SCALAR_IN: &[Port] = &[Port::terrain("terrain"), Port::scalar("value")];

/// Duplicates layer `from` under the name `to`. An existing `to` layer is replaced.
#[derive(Clone, Debug)]
pub struct CopyLayer {
    name: String,
    from: String,
    to: String,
    parameters: Parameters,
}

impl CopyLayer {
    pub const NAME: &'static str = "Copy Layer";

    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self {
            name: Self::NAME.to_string(),
            parameters: Parameters::new()
                .with("from", from.clone())
                .with("to", to.clone()),
            from,
            to,
        }
    }

    pub fn from_parameters(parameters: Parameters) -> Result<Self> {
        let from = parameters.text(Self::NAME, "from")?.to_string();
        let to = parameters.text(Self::NAME, "to")?.to_string();
        Ok(Self {
            name: Self::NAME.to_string(),
            from,
            to,
            parameters,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Node for CopyLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_inputs(&self) -> &[Port] {
        TERRAIN_IN
    }

    fn output(&self) -> Port {
        Port::terrain("terrain")
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn run(&self, mut inputs: Inputs, ctx: &mut RunContext<'_>) -> Result<Value> {
        let mut terrain = inputs.take_terrain(&self.name, "terrain")?;
        if self.from != self.to {
            let copy = terrain.layer(&self.from)?.clone();
            terrain.add_layer_with_events(self.to.clone(), copy, ctx.sink())?;
        } else {
            // Still fail on an unknown layer.
            terrain.layer(&self.from)?;
            ctx.warn(
                &self.name,
                format!("layer '{}' copied onto itself; terrain unchanged", self.from),
            );
        }
        Ok(terrain.into())
    }
}

/// Publishes a copy of one terrain layer as a grid.
#[derive(Clone, Debug)]
pub struct ExtractLayer {
    name: String,
    layer: String,
    parameters: Parameters,
}

impl ExtractLayer {
    pub const NAME: &'static str = "Extract Layer";

    pub fn new(layer: impl Into<String>) -> Self {
        let layer = layer.into();
        Self {
            name: Self::NAME.to_string(),
            parameters: Parameters::new().with("layer", layer.clone()),
            layer,
        }
    }

    pub fn from_parameters(parameters: Parameters) -> Result<Self> {
        let layer = parameters.text(Self::NAME, "layer")?.to_string();
        Ok(Self {
            name: Self::NAME.to_string(),
            layer,
            parameters,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Node for ExtractLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_inputs(&self) -> &[Port] {
        TERRAIN_IN
    }

    fn output(&self) -> Port {
        Port::grid("grid")
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn run(&self, mut inputs: Inputs, _ctx: &mut RunContext<'_>) -> Result<Value> {
        let mut terrain = inputs.take_terrain(&self.name, "terrain")?;
        // The terrain is dropped afterwards, so any layer but height can be moved out.
        let grid = if self.layer == HEIGHT_LAYER {
            terrain.layer(&self.layer)?.clone()
        } else {
            terrain.remove_layer(&self.layer)?
        };
        Ok(grid.into())
    }
}

/// Inserts the `grid` input into the `terrain` input under `name`.
#[derive(Clone, Debug)]
pub struct InsertLayer {
    name: String,
    layer: String,
    parameters: Parameters,
}

impl InsertLayer {
    pub const NAME: &'static str = "Insert Layer";

    pub fn new(layer: impl Into<String>) -> Self {
        let layer = layer.into();
        Self {
            name: Self::NAME.to_string(),
            parameters: Parameters::new().with("name", layer.clone()),
            layer,
        }
    }

    pub fn from_parameters(parameters: Parameters) -> Result<Self> {
        let layer = parameters.text(Self::NAME, "name")?.to_string();
        Ok(Self {
            name: Self::NAME.to_string(),
            layer,
            parameters,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Node for InsertLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_inputs(&self) -> &[Port] {
        TERRAIN_AND_GRID_IN
    }

    fn output(&self) -> Port {
        Port::terrain("terrain")
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn run(&self, mut inputs: Inputs, ctx: &mut RunContext<'_>) -> Result<Value> {
        inputs.ensure_present(&self.name, TERRAIN_AND_GRID_IN)?;
        let mut terrain = inputs.take_terrain(&self.name, "terrain")?;
        let grid = inputs.take_grid(&self.name, "grid")?;
        terrain.add_layer_with_events(self.layer.clone(), grid, ctx.sink())?;
        Ok(terrain.into())
    }
}

/// Sets every cell of layer `layer` to the `value` input. A missing layer is created.
#[derive(Clone, Debug)]
pub struct FillLayer {
    name: String,
    layer: String,
    parameters: Parameters,
}

impl FillLayer {
    pub const NAME: &'static str = "Fill Layer";

    pub fn new(layer: impl Into<String>) -> Self {
        let layer = layer.into();
        Self {
            name: Self::NAME.to_string(),
            parameters: Parameters::new().with("layer", layer.clone()),
            layer,
        }
    }

    /// `layer` defaults to `"height"`.
    pub fn from_parameters(mut parameters: Parameters) -> Result<Self> {
        let layer = parameters
            .opt_text(Self::NAME, "layer")?
            .unwrap_or(HEIGHT_LAYER)
            .to_string();
        parameters.set("layer", layer.clone());
        Ok(Self {
            name: Self::NAME.to_string(),
            layer,
            parameters,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }
}

impl Node for FillLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_inputs(&self) -> &[Port] {
        TERRAIN_AND_SCALAR_IN
    }

    fn output(&self) -> Port {
        Port::terrain("terrain")
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn run(&self, mut inputs: Inputs, ctx: &mut RunContext<'_>) -> Result<Value> {
        inputs.ensure_present(&self.name, TERRAIN_AND_SCALAR_IN)?;
        let value = inputs.scalar(&self.name, "value")?;
        let mut terrain = inputs.take_terrain(&self.name, "terrain")?;
        if terrain.contains_layer(&self.layer) {
            terrain.layer_mut(&self.layer)?.fill(value);
        } else {
            let (w, h) = terrain.size();
            let layer = Layer::create(w, h, value)?;
            terrain.add_layer_with_events(self.layer.clone(), layer, ctx.sink())?;
        }
        Ok(terrain.into())
    }
}

fn ensure_finite(value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            node: Constant::NAME.to_string(),
            name: "value".to_string(),
            reason: format!("{value} is not finite"),
        })
    }
}

/// Outputs a fixed, finite scalar.
#[derive(Clone, Debug)]
pub struct Constant {
    name: String,
    value: f32,
    parameters: Parameters,
}

impl Constant {
    pub const NAME: &'static str = "Constant";

    pub fn new(value: f32) -> Result<Self> {
        let value = ensure_finite(value)?;
        Ok(Self {
            name: Self::NAME.to_string(),
            value,
            parameters: Parameters::new().with("value", value),
        })
    }

    pub fn from_parameters(parameters: Parameters) -> Result<Self> {
        let value = ensure_finite(parameters.float(Self::NAME, "value")?)?;
        Ok(Self {
            name: Self::NAME.to_string(),
            value,
            parameters,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

impl Node for Constant {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_inputs(&self) -> &[Port] {
        &[]
    }

    fn output(&self) -> Port {
        Port::scalar("value")
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn run(&self, _inputs: Inputs, _ctx: &mut RunContext<'_>) -> Result<Value> {
        Ok(Value::Scalar(self.value))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::graph::events::{GraphEvent, VecSink};
    use crate::terrain::Terrain;

    fn run_node(node: &dyn Node, inputs: Inputs) -> (Result<Value>, Vec<GraphEvent>) {
        let mut rng = StdRng::seed_from_u64(0);
        let mut sink = VecSink::new();
        let mut ctx = RunContext::new(&mut rng, &mut sink);
        let out = node.run(inputs, &mut ctx);
        (out, sink.into_inner())
    }

    #[test]
    fn copy_layer_duplicates() {
        let terrain = Terrain::new(3, 3, 0.75).unwrap();
        let (out, events) = run_node(
            &CopyLayer::new(HEIGHT_LAYER, "base"),
            Inputs::new().with("terrain", terrain),
        );
        let terrain = out.unwrap().into_terrain().unwrap();
        assert_eq!(terrain.layer_count(), 2);
        assert_eq!(terrain.layer("base").unwrap(), terrain.height_layer().unwrap());
        assert!(events.is_empty());
    }

    #[test]
    fn copy_layer_over_existing_reports_replacement() {
        let mut terrain = Terrain::new(2, 2, 1.0).unwrap();
        terrain
            .add_layer("base", Layer::create(2, 2, 0.0).unwrap())
            .unwrap();
        let (out, events) = run_node(
            &CopyLayer::new(HEIGHT_LAYER, "base"),
            Inputs::new().with("terrain", terrain),
        );
        let terrain = out.unwrap().into_terrain().unwrap();
        assert_eq!(terrain.layer_count(), 2);
        assert_eq!(terrain.layer("base").unwrap().get(1, 1), Some(1.0));
        assert_eq!(
            events,
            vec![GraphEvent::LayerReplaced {
                name: "base".into(),
                size: (2, 2),
            }]
        );
    }

    #[test]
    fn copy_layer_onto_itself_warns() {
        let terrain = Terrain::new(2, 2, 0.5).unwrap();
        let (out, events) = run_node(
            &CopyLayer::new(HEIGHT_LAYER, HEIGHT_LAYER),
            Inputs::new().with("terrain", terrain.clone()),
        );
        assert_eq!(out.unwrap().into_terrain().unwrap(), terrain);
        assert!(matches!(
            events.as_slice(),
            [GraphEvent::Warning { context, message }]
                if context == "Copy Layer" && message.contains("'height'")
        ));
    }

    #[test]
    fn copy_layer_from_unknown_fails() {
        let terrain = Terrain::new(2, 2, 0.0).unwrap();
        let (out, _) = run_node(
            &CopyLayer::new("snow", "snow"),
            Inputs::new().with("terrain", terrain),
        );
        assert!(matches!(out, Err(Error::LayerNotFound { .. })));
    }

    #[test]
    fn extract_then_insert_moves_grid() {
        let mut terrain = Terrain::new(2, 2, 0.0).unwrap();
        terrain
            .add_layer("water", Layer::create(2, 2, 0.5).unwrap())
            .unwrap();
        let (grid, _) = run_node(
            &ExtractLayer::new("water"),
            Inputs::new().with("terrain", terrain),
        );
        let grid = grid.unwrap();
        assert_eq!(grid.as_grid().map(Layer::size), Some((2, 2)));

        let target = Terrain::new(2, 2, 1.0).unwrap();
        let (out, _) = run_node(
            &InsertLayer::new("moisture"),
            Inputs::new().with("terrain", target).with("grid", grid),
        );
        let target = out.unwrap().into_terrain().unwrap();
        assert_eq!(target.layer("moisture").unwrap().get(0, 1), Some(0.5));
    }

    #[test]
    fn extract_height_copies() {
        let terrain = Terrain::new(2, 1, 0.3).unwrap();
        let (grid, _) = run_node(
            &ExtractLayer::new(HEIGHT_LAYER),
            Inputs::new().with("terrain", terrain),
        );
        assert_eq!(grid.unwrap().as_grid().unwrap().data(), &[0.3, 0.3]);
    }

    #[test]
    fn insert_rejects_wrong_size() {
        let terrain = Terrain::new(20, 20, 0.0).unwrap();
        let grid = Layer::create(10, 10, 0.0).unwrap();
        let (out, _) = run_node(
            &InsertLayer::new("small"),
            Inputs::new().with("terrain", terrain).with("grid", grid),
        );
        assert!(matches!(
            out,
            Err(Error::DimensionMismatch {
                expected: (20, 20),
                found: (10, 10)
            })
        ));
    }

    #[test]
    fn insert_requires_both_inputs() {
        let terrain = Terrain::new(2, 2, 0.0).unwrap();
        let (out, _) = run_node(
            &InsertLayer::new("x"),
            Inputs::new().with("terrain", terrain),
        );
        assert!(matches!(out, Err(Error::MissingInput { ref input, .. }) if input == "grid"));
    }

    #[test]
    fn constant_outputs_scalar() {
        let node = Constant::from_parameters(Parameters::new().with("value", 3)).unwrap();
        let (out, _) = run_node(&node, Inputs::new());
        assert_eq!(out.unwrap(), Value::Scalar(3.0));
        assert!(Constant::from_parameters(Parameters::new().with("value", f32::NAN)).is_err());
    }

    #[test]
    fn constant_constructors_agree_on_non_finite_values() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(matches!(
                Constant::new(bad),
                Err(Error::InvalidParameter { ref name, .. }) if name == "value"
            ));
            assert!(Constant::from_parameters(Parameters::new().with("value", bad)).is_err());
        }
        assert_eq!(Constant::new(-2.5).unwrap().value(), -2.5);
    }

    #[test]
    fn fill_layer_overwrites_existing_layer() {
        let terrain = Terrain::new(3, 2, 0.0).unwrap();
        let (out, events) = run_node(
            &FillLayer::new(HEIGHT_LAYER),
            Inputs::new().with("terrain", terrain).with("value", 0.75f32),
        );
        let terrain = out.unwrap().into_terrain().unwrap();
        assert!(terrain.height_layer().unwrap().data().iter().all(|v| *v == 0.75));
        assert!(events.is_empty());
    }

    #[test]
    fn fill_layer_creates_missing_layer() {
        let terrain = Terrain::new(2, 2, 1.0).unwrap();
        let (out, _) = run_node(
            &FillLayer::new("water"),
            Inputs::new().with("terrain", terrain).with("value", 0.25f32),
        );
        let terrain = out.unwrap().into_terrain().unwrap();
        assert_eq!(terrain.layer_count(), 2);
        assert_eq!(terrain.layer("water").unwrap().size(), (2, 2));
        assert!(terrain.layer("water").unwrap().data().iter().all(|v| *v == 0.25));
    }

    #[test]
    fn fill_layer_checks_input_kinds() {
        let terrain = Terrain::new(2, 2, 0.0).unwrap();
        let grid = Layer::create(2, 2, 0.0).unwrap();
        let (out, _) = run_node(
            &FillLayer::new(HEIGHT_LAYER),
            Inputs::new().with("terrain", terrain.clone()).with("value", grid),
        );
        assert!(matches!(out, Err(Error::UnexpectedValue { .. })));

        let (out, _) = run_node(
            &FillLayer::new(HEIGHT_LAYER),
            Inputs::new().with("terrain", terrain),
        );
        assert!(matches!(out, Err(Error::MissingInput { ref input, .. }) if input == "value"));
    }

    #[test]
    fn layer_nodes_build_from_parameters() {
        let copy = CopyLayer::from_parameters(
            Parameters::new().with("from", "height").with("to", "base"),
        )
        .unwrap();
        assert_eq!(copy.name(), "Copy Layer");
        assert!(ExtractLayer::from_parameters(Parameters::new()).is_err());
        let insert = InsertLayer::from_parameters(Parameters::new().with("name", "m")).unwrap();
        assert_eq!(insert.required_inputs().len(), 2);
        let fill = FillLayer::from_parameters(Parameters::new()).unwrap();
        assert_eq!(fill.layer(), HEIGHT_LAYER);
        assert_eq!(fill.parameters().opt_text("Fill Layer", "layer").unwrap(), Some("height"));
    }
}
