//! Cell-wise filters over one terrain layer.
use crate::error::{Error, Result};
use crate::graph::node::{Inputs, Node, RunContext};
use crate::graph::params::Parameters;
use crate::graph::value::{Port, Value};
use crate::terrain::HEIGHT_LAYER;

const INPUTS: &[Port] = &[Port::terrain("terrain")];

/// Operation applied to every cell of the target layer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterOp {
    Scale { factor: f32 },
    Offset { amount: f32 },
    Clamp { min: f32, max: f32 },
    /// `1 - v`
    Invert,
    /// `v.powf(exp)`; negative cells follow `f32::powf`.
    Pow { exp: f32 },
    SmoothStep { edge0: f32, edge1: f32 },
}

impl FilterOp {
    /// Parameter name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            FilterOp::Scale { .. } => "scale",
            FilterOp::Offset { .. } => "offset",
            FilterOp::Clamp { .. } => "clamp",
            FilterOp::Invert => "invert",
            FilterOp::Pow { .. } => "pow",
            FilterOp::SmoothStep { .. } => "smoothstep",
        }
    }

    #[inline]
    pub fn apply(&self, v: f32) -> f32 {
        match *self {
            FilterOp::Scale { factor } => v * factor,
            FilterOp::Offset { amount } => v + amount,
            FilterOp::Clamp { min, max } => v.max(min).min(max),
            FilterOp::Invert => 1.0 - v,
            FilterOp::Pow { exp } => v.powf(exp),
            FilterOp::SmoothStep { edge0, edge1 } => smoothstep(edge0, edge1, v),
        }
    }

    fn parse(node: &str, params: &Parameters) -> Result<Self> {
        let op = params.text(node, "op")?;
        let parsed = match op {
            "scale" => FilterOp::Scale {
                factor: params.float(node, "factor")?,
            },
            "offset" => FilterOp::Offset {
                amount: params.float(node, "amount")?,
            },
            "clamp" => {
                let min = params.float(node, "min")?;
                let max = params.float(node, "max")?;
                if min > max {
                    return Err(Error::InvalidParameter {
                        node: node.to_string(),
                        name: "min".to_string(),
                        reason: format!("min {min} exceeds max {max}"),
                    });
                }
                FilterOp::Clamp { min, max }
            }
            "invert" => FilterOp::Invert,
            "pow" => FilterOp::Pow {
                exp: params.float(node, "exp")?,
            },
            "smoothstep" => FilterOp::SmoothStep {
                edge0: params.float(node, "edge0")?,
                edge1: params.float(node, "edge1")?,
            },
            other => {
                return Err(Error::InvalidParameter {
                    node: node.to_string(),
                    name: "op".to_string(),
                    reason: format!("unknown filter '{other}'"),
                })
            }
        };
        Ok(parsed)
    }

    fn write_parameters(&self, params: &mut Parameters) {
        params.set("op", self.name());
        match *self {
            FilterOp::Scale { factor } => {
                params.set("factor", factor);
            }
            FilterOp::Offset { amount } => {
                params.set("amount", amount);
            }
            FilterOp::Clamp { min, max } => {
                params.set("min", min).set("max", max);
            }
            FilterOp::Invert => {}
            FilterOp::Pow { exp } => {
                params.set("exp", exp);
            }
            FilterOp::SmoothStep { edge0, edge1 } => {
                params.set("edge0", edge0).set("edge1", edge1);
            }
        }
    }
}

/// Hermite smoothstep mapped to `[0, 1]`. Equal edges act as a step at `edge1`.
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let denom = e1 - e0;
    if denom.abs() <= f32::EPSILON {
        return if x >= e1 { 1.0 } else { 0.0 };
    }
    let t = ((x - e0) / denom).max(0.0).min(1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Rewrites one layer of the incoming terrain with a [`FilterOp`].
#[derive(Clone, Debug)]
pub struct LayerFilter {
    name: String,
    op: FilterOp,
    layer: String,
    parameters: Parameters,
}

impl LayerFilter {
    pub const NAME: &'static str = "Layer Filter";

    pub fn new(op: FilterOp) -> Self {
        let mut parameters = Parameters::new().with("layer", HEIGHT_LAYER);
        op.write_parameters(&mut parameters);
        Self {
            name: Self::NAME.to_string(),
            op,
            layer: HEIGHT_LAYER.to_string(),
            parameters,
        }
    }

    pub fn scale(factor: f32) -> Self {
        Self::new(FilterOp::Scale { factor })
    }

    pub fn offset(amount: f32) -> Self {
        Self::new(FilterOp::Offset { amount })
    }

    /// Clamp to `[min, max]`. Swapped bounds are reordered.
    pub fn clamp(min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self::new(FilterOp::Clamp { min, max })
    }

    pub fn invert() -> Self {
        Self::new(FilterOp::Invert)
    }

    pub fn pow(exp: f32) -> Self {
        Self::new(FilterOp::Pow { exp })
    }

    pub fn smoothstep(edge0: f32, edge1: f32) -> Self {
        Self::new(FilterOp::SmoothStep { edge0, edge1 })
    }

    /// Target `layer` instead of the height layer.
    pub fn on_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self.parameters.set("layer", self.layer.clone());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build from `op` plus the operation's own parameters; `layer` defaults to `"height"`.
    pub fn from_parameters(mut parameters: Parameters) -> Result<Self> {
        let op = FilterOp::parse(Self::NAME, &parameters)?;
        let layer = parameters
            .opt_text(Self::NAME, "layer")?
            .unwrap_or(HEIGHT_LAYER)
            .to_string();
        parameters.set("layer", layer.clone());
        Ok(Self {
            name: Self::NAME.to_string(),
            op,
            layer,
            parameters,
        })
    }

    pub fn op(&self) -> FilterOp {
        self.op
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }
}

impl Node for LayerFilter {
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

    fn run(&self, mut inputs: Inputs, _ctx: &mut RunContext<'_>) -> Result<Value> {
        let mut terrain = inputs.take_terrain(&self.name, "terrain")?;
        let op = self.op;
        terrain
            .layer_mut(&self.layer)?
            .map_in_place(|v| op.apply(v));
        Ok(terrain.into())
    }
}
