//! Executes compiled graphs one node at a time.
//!
//! Values move along links: every consumer receives its own copy of a producer's output, so
//! each branch of a fan-out owns its own [`Terrain`] and at most one node writes a given
//! terrain at a time. By default the producer's output also stays on the returned
//! [`Execution`]. [`RunOptions::move_only`] hands the value to its last consumer instead of
//! copying it; only terminal nodes and nodes listed in [`RunOptions::retain`] then keep an
//! output.
use std::collections::HashSet;

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::events::{EventSink, GraphEvent, GraphEventKind};
use crate::graph::node::{Inputs, RunContext};
use crate::graph::plan::ExecutionPlan;
use crate::graph::spec::{Graph, NodeId};
use crate::graph::value::Value;
use crate::terrain::Terrain;

/// Options for an execution pass.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Nodes whose outputs are kept on the [`Execution`] even when consumed downstream.
    pub retain: HashSet<NodeId>,
    /// Move each output into its last consumer instead of keeping a copy.
    pub move_outputs: bool,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that skip the per-node copy: consumed outputs are dropped from the
    /// [`Execution`] unless retained.
    pub fn move_only() -> Self {
        Self {
            move_outputs: true,
            ..Self::default()
        }
    }

    /// Keep the output of `id` after the pass.
    pub fn with_retained(mut self, id: NodeId) -> Self {
        self.retain.insert(id);
        self
    }

    /// Validates the options against `graph`.
    pub fn validate(&self, graph: &Graph) -> Result<()> {
        if let Some(id) = self.retain.iter().find(|id| id.index() >= graph.len()) {
            return Err(Error::InvalidConfig(format!(
                "retained node {id} is not part of graph '{}'",
                graph.name()
            )));
        }
        Ok(())
    }

    fn keeps(&self, id: NodeId) -> bool {
        !self.move_outputs || self.retain.contains(&id)
    }
}

/// Outcome of one execution pass.
#[derive(Debug, Clone)]
pub struct Execution {
    names: Vec<String>,
    outputs: Vec<Option<Value>>,
    ran: Vec<bool>,
    order: Vec<NodeId>,
}

impl Execution {
    /// The output of `id` if it ran in this pass.
    ///
    /// With [`RunOptions::move_only`] a consumed, non-retained output is gone; see
    /// [`Execution::is_consumed`].
    pub fn get_output(&self, id: NodeId) -> Option<&Value> {
        self.outputs.get(id.index()).and_then(Option::as_ref)
    }

    /// [`Execution::get_output`] for the first node named `name`.
    pub fn get_output_by_name(&self, name: &str) -> Option<&Value> {
        let idx = self.names.iter().position(|n| n == name)?;
        self.get_output(NodeId(idx))
    }

    /// Move the output of `id` out of the execution.
    pub fn take_output(&mut self, id: NodeId) -> Option<Value> {
        self.outputs.get_mut(id.index()).and_then(Option::take)
    }

    /// The output of `id` if it is a terrain.
    pub fn terrain(&self, id: NodeId) -> Option<&Terrain> {
        self.get_output(id).and_then(Value::as_terrain)
    }

    /// Whether `id` ran but its output was moved into a consumer.
    pub fn is_consumed(&self, id: NodeId) -> bool {
        self.has_run(id) && self.get_output(id).is_none()
    }

    pub fn has_run(&self, id: NodeId) -> bool {
        self.ran.get(id.index()).copied().unwrap_or(false)
    }

    pub fn nodes_run(&self) -> usize {
        self.ran.iter().filter(|r| **r).count()
    }

    /// Order the nodes ran in.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }
}

/// Runs a graph. The graph is compiled once on construction and can be executed repeatedly.
pub struct GraphRunner<'g> {
    graph: &'g Graph,
    plan: ExecutionPlan,
    options: RunOptions,
}

impl<'g> GraphRunner<'g> {
    /// Compile `graph` and validate `options`. Cycles and unlinked inputs fail here.
    pub fn new(graph: &'g Graph, options: RunOptions) -> Result<Self> {
        options.validate(graph)?;
        let plan = graph.compile()?;
        Ok(Self {
            graph,
            plan,
            options,
        })
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Runs one pass.
    pub fn run<R: RngCore>(&self, rng: &mut R) -> Result<Execution> {
        execute(self.graph, &self.plan, &self.options, rng, &mut ())
    }

    /// Runs one pass, reporting to `sink`.
    pub fn run_with_events<R: RngCore>(
        &self,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<Execution> {
        execute(self.graph, &self.plan, &self.options, rng, sink)
    }
}

/// Executes `plan` over `graph`. The first failing node aborts the pass; changes already made
/// by earlier nodes are not undone.
pub(crate) fn execute(
    graph: &Graph,
    plan: &ExecutionPlan,
    options: &RunOptions,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<Execution> {
    let n = graph.len();
    if plan.inputs.len() != n || plan.consumers.len() != n {
        return Err(Error::InvalidConfig(format!(
            "execution plan does not match graph '{}'",
            graph.name()
        )));
    }

    info!("Graph '{}': running {} nodes.", graph.name(), plan.len());
    if sink.wants(GraphEventKind::RunStarted) {
        sink.send(GraphEvent::RunStarted {
            graph: graph.name().to_string(),
            node_count: plan.len(),
        });
    }

    let mut outputs: Vec<Option<Value>> = vec![None; n];
    let mut ran = vec![false; n];
    let mut remaining = plan.consumers.clone();

    for &id in &plan.order {
        let node = graph.node(id)?;
        let name = node.name();

        let mut inputs = Inputs::new();
        for (slot, source) in &plan.inputs[id.index()] {
            let value = claim_output(&mut outputs, &mut remaining, options, *source).ok_or_else(
                || Error::MissingInput {
                    node: name.to_string(),
                    input: slot.clone(),
                },
            )?;
            inputs.insert(slot.clone(), value);
        }

        debug!("Running node '{}' ({}).", name, id);
        if sink.wants(GraphEventKind::NodeStarted) {
            sink.send(GraphEvent::NodeStarted {
                id,
                name: name.to_string(),
            });
        }

        let result = {
            let mut ctx = RunContext::new(&mut *rng, &mut *sink);
            node.run(inputs, &mut ctx)
        }
        .and_then(|value| {
            let expected = node.output().kind;
            if value.kind() == expected {
                Ok(value)
            } else {
                Err(Error::UnexpectedValue {
                    node: name.to_string(),
                    expected,
                    found: value.kind(),
                })
            }
        });

        match result {
            Ok(value) => {
                if sink.wants(GraphEventKind::NodeFinished) {
                    sink.send(GraphEvent::NodeFinished {
                        id,
                        name: name.to_string(),
                        output: value.kind(),
                    });
                }
                outputs[id.index()] = Some(value);
                ran[id.index()] = true;
            }
            Err(e) => {
                warn!("Node '{}' ({}) failed: {}.", name, id, e);
                if sink.wants(GraphEventKind::NodeFailed) {
                    sink.send(GraphEvent::NodeFailed {
                        id,
                        name: name.to_string(),
                        message: e.to_string(),
                    });
                }
                return Err(e);
            }
        }
    }

    let nodes_run = ran.iter().filter(|r| **r).count();
    info!("Graph '{}': finished, {} nodes ran.", graph.name(), nodes_run);
    if sink.wants(GraphEventKind::RunFinished) {
        sink.send(GraphEvent::RunFinished {
            graph: graph.name().to_string(),
            nodes_run,
        });
    }

    Ok(Execution {
        names: graph.nodes().map(|(_, n)| n.name().to_string()).collect(),
        outputs,
        ran,
        order: plan.order.clone(),
    })
}

/// Hand the output of `source` to one consumer: cloned while the execution keeps it, moved to
/// the last consumer otherwise.
fn claim_output(
    outputs: &mut [Option<Value>],
    remaining: &mut [usize],
    options: &RunOptions,
    source: NodeId,
) -> Option<Value> {
    let i = source.index();
    remaining[i] = remaining[i].saturating_sub(1);
    if remaining[i] == 0 && !options.keeps(source) {
        outputs[i].take()
    } else {
        outputs[i].clone()
    }
}

impl Graph {
    /// Compile and run one pass with default options.
    pub fn execute<R: RngCore>(&self, rng: &mut R) -> Result<Execution> {
        GraphRunner::new(self, RunOptions::default())?.run(rng)
    }

    /// Compile and run one pass with default options, reporting to `sink`.
    pub fn execute_with_events<R: RngCore>(
        &self,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<Execution> {
        GraphRunner::new(self, RunOptions::default())?.run_with_events(rng, sink)
    }
}
