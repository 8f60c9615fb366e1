#![forbid(unsafe_code)]
//! terrain_graph: layered terrain grids edited by a graph of processing nodes.
//!
//! Modules:
//! - terrain: named, equally sized `f32` layers with a mandatory height layer
//! - graph: node contract, typed links, compilation to a run order, execution, events
//! - nodes: built-in generators and filters (create, noise, layer filters and plumbing)
//!
//! For examples, see the `terrain_graph_examples` crate.
pub mod error;
pub mod graph;
pub mod nodes;
pub mod terrain;

/// Convenient re-exports for common types. Import with `use terrain_graph::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::graph::compiler::GraphCompiler;
    pub use crate::graph::events::{
        EventSink, FnSink, GraphEvent, GraphEventKind, MultiSink, VecSink,
    };
    pub use crate::graph::node::{Inputs, Node, RunContext};
    pub use crate::graph::params::{ParamValue, Parameters};
    pub use crate::graph::plan::ExecutionPlan;
    pub use crate::graph::runner::{Execution, GraphRunner, RunOptions};
    pub use crate::graph::spec::{Graph, Link, NodeId};
    pub use crate::graph::value::{Port, Value, ValueKind};
    pub use crate::nodes::{
        Constant, CopyLayer, CreateTerrain, ExtractLayer, FillLayer, FilterOp, InsertLayer,
        LayerFilter, TerrainNoise,
    };
    pub use crate::terrain::{Layer, Terrain, HEIGHT_LAYER};
}
