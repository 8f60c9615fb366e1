//! Execution plan produced by compiling a [`crate::graph::spec::Graph`].
use crate::graph::spec::NodeId;

/// A resolved graph: every node's input wiring plus a topological order.
///
/// Plans only come out of [`crate::graph::GraphCompiler`], so the wiring always refers to
/// nodes of the graph that was compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub(crate) order: Vec<NodeId>,
    /// Per node (indexed by [`NodeId::index`]): `(input slot, producing node)` pairs.
    pub(crate) inputs: Vec<Vec<(String, NodeId)>>,
    /// Per node: number of links reading its output.
    pub(crate) consumers: Vec<usize>,
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Order in which nodes run; every producer precedes its consumers.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// `(input slot, producing node)` pairs wired into `id`. Empty for unknown ids.
    pub fn inputs_of(&self, id: NodeId) -> &[(String, NodeId)] {
        self.inputs.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of links reading the output of `id`.
    pub fn consumers(&self, id: NodeId) -> usize {
        self.consumers.get(id.index()).copied().unwrap_or(0)
    }

    /// Position of `id` in the execution order.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|n| *n == id)
    }

    /// Whether no link reads the output of `id`.
    #[inline]
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.consumers(id) == 0
    }
}
