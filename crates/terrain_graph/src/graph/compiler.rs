//! Compiler from graph topology to an executable plan.
//!
//! This module turns a [`Graph`] into an [`ExecutionPlan`]. It checks that every required
//! input is linked and computes a topological order, so structural failures surface before
//! any node runs.
//!
//! Typical usage:
//! - [`GraphCompiler::compile`], or the shorthand [`Graph::compile`]
use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::plan::ExecutionPlan;
use crate::graph::spec::{Graph, NodeId};

/// Compiler for graphs into execution plans.
pub struct GraphCompiler;

impl GraphCompiler {
    /// Compiles `graph` into an [`ExecutionPlan`].
    pub fn compile(graph: &Graph) -> Result<ExecutionPlan> {
        let n = graph.len();
        let mut inputs: Vec<Vec<(String, NodeId)>> = vec![Vec::new(); n];
        let mut consumers = vec![0usize; n];

        for link in graph.links() {
            inputs[link.target.index()].push((link.target_input.clone(), link.source));
            consumers[link.source.index()] += 1;
        }

        for (id, node) in graph.nodes() {
            let wired = &inputs[id.index()];
            for port in node.required_inputs() {
                if !wired.iter().any(|(slot, _)| slot == port.name) {
                    return Err(Error::MissingInput {
                        node: node.name().to_string(),
                        input: port.name.to_string(),
                    });
                }
            }
        }

        let order = topo_sort(graph, &inputs)?;
        debug!(
            "Compiled graph '{}': {} nodes, {} links.",
            graph.name(),
            n,
            graph.links().len()
        );
        Ok(ExecutionPlan {
            order,
            inputs,
            consumers,
        })
    }
}

/// Kahn's algorithm. Among ready nodes the lowest insertion index goes first, which keeps the
/// order stable for a given graph.
fn topo_sort(graph: &Graph, inputs: &[Vec<(String, NodeId)>]) -> Result<Vec<NodeId>> {
    let n = inputs.len();
    let mut indeg: Vec<usize> = inputs.iter().map(Vec::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (target, wired) in inputs.iter().enumerate() {
        for (_, source) in wired {
            dependents[source.index()].push(target);
        }
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| indeg[i] == 0).collect();
    let mut out: Vec<NodeId> = Vec::with_capacity(n);

    while let Some(i) = ready.pop_first() {
        out.push(NodeId(i));
        for &child in &dependents[i] {
            indeg[child] = indeg[child].saturating_sub(1);
            if indeg[child] == 0 {
                ready.insert(child);
            }
        }
    }

    if out.len() != n {
        let nodes = graph
            .nodes()
            .filter(|(id, _)| indeg[id.index()] > 0)
            .map(|(_, node)| node.name().to_string())
            .collect();
        return Err(Error::GraphCycle { nodes });
    }

    Ok(out)
}
