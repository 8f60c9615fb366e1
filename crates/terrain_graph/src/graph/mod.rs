//! Node graphs over terrains.
//!
//! A [`Graph`] owns boxed [`Node`]s and the typed links between their ports. Compiling it
//! yields an [`ExecutionPlan`]; [`GraphRunner`] walks the plan, handing each node its inputs
//! by value and reporting progress through an [`EventSink`].
pub mod compiler;
pub mod events;
pub mod node;
pub mod params;
pub mod plan;
pub mod runner;
pub mod spec;
pub mod value;

pub use compiler::GraphCompiler;
pub use events::{EventSink, FnSink, GraphEvent, GraphEventKind, MultiSink, VecSink};
pub use node::{Inputs, Node, RunContext};
pub use params::{ParamValue, Parameters};
pub use plan::ExecutionPlan;
pub use runner::{Execution, GraphRunner, RunOptions};
pub use spec::{Graph, Link, NodeId};
pub use value::{Port, Value, ValueKind};
