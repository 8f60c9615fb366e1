//! Graph topology: nodes plus the links between their slots.
//!
//! A [`Graph`] holds no terrain data. Links are type-checked when they are added; ordering and
//! cycle detection happen in [`crate::graph::compiler::GraphCompiler`].
use std::fmt;

use crate::error::{Error, Result};
use crate::graph::compiler::GraphCompiler;
use crate::graph::node::Node;
use crate::graph::plan::ExecutionPlan;

/// Identifier of a node: its insertion index in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A directed connection from a node's output slot to another node's input slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: NodeId,
    pub source_output: String,
    pub target: NodeId,
    pub target_input: String,
}

/// A named collection of nodes and the links between them.
#[derive(Default)]
pub struct Graph {
    name: String,
    nodes: Vec<Box<dyn Node>>,
    links: Vec<Link>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a node and return its id.
    pub fn add_node<N: Node + 'static>(&mut self, node: N) -> NodeId {
        self.add_boxed_node(Box::new(node))
    }

    pub fn add_boxed_node(&mut self, node: Box<dyn Node>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Result<&dyn Node> {
        self.nodes
            .get(id.0)
            .map(|n| n.as_ref())
            .ok_or_else(|| Error::NodeNotFound {
                name: id.to_string(),
            })
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &dyn Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i), n.as_ref()))
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the first node whose name equals `name`.
    pub fn get_node_by_name(&self, name: &str) -> Result<&dyn Node> {
        let id = self.node_id_by_name(name)?;
        self.node(id)
    }

    /// Id of the first node whose name equals `name`.
    pub fn node_id_by_name(&self, name: &str) -> Result<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name() == name)
            .map(NodeId)
            .ok_or_else(|| Error::NodeNotFound {
                name: name.to_string(),
            })
    }

    /// Connect `source.source_output` to `target.target_input`.
    ///
    /// Fails if either node or slot does not exist, if the slot kinds differ, or if the input
    /// slot already has a link. The graph is unchanged on failure.
    pub fn link(
        &mut self,
        source: NodeId,
        source_output: &str,
        target: NodeId,
        target_input: &str,
    ) -> Result<&mut Self> {
        let src = self.node(source)?;
        let dst = self.node(target)?;

        let out_port = src.output();
        if out_port.name != source_output {
            return Err(Error::UnknownSlot {
                node: src.name().to_string(),
                slot: source_output.to_string(),
            });
        }
        let in_port = dst.input(target_input).ok_or_else(|| Error::UnknownSlot {
            node: dst.name().to_string(),
            slot: target_input.to_string(),
        })?;

        if !out_port.accepts_into(&in_port) {
            return Err(Error::IncompatibleLink {
                source_node: src.name().to_string(),
                source_slot: source_output.to_string(),
                source_kind: out_port.kind,
                target_node: dst.name().to_string(),
                target_slot: target_input.to_string(),
                target_kind: in_port.kind,
            });
        }

        if self.input_source(target, target_input).is_some() {
            return Err(Error::InputAlreadyLinked {
                node: dst.name().to_string(),
                input: target_input.to_string(),
            });
        }

        self.links.push(Link {
            source,
            source_output: source_output.to_string(),
            target,
            target_input: target_input.to_string(),
        });
        Ok(self)
    }

    /// Same as [`Graph::link`], resolving both nodes by name first.
    pub fn link_by_name(
        &mut self,
        source: &str,
        source_output: &str,
        target: &str,
        target_input: &str,
    ) -> Result<&mut Self> {
        let source = self.node_id_by_name(source)?;
        let target = self.node_id_by_name(target)?;
        self.link(source, source_output, target, target_input)
    }

    /// The node feeding `target.input`, if linked.
    pub fn input_source(&self, target: NodeId, input: &str) -> Option<NodeId> {
        self.links
            .iter()
            .find(|l| l.target == target && l.target_input == input)
            .map(|l| l.source)
    }

    /// Links ending at `target`.
    pub fn incoming(&self, target: NodeId) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter().filter(move |l| l.target == target)
    }

    /// Links starting at `source`.
    pub fn outgoing(&self, source: NodeId) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter().filter(move |l| l.source == source)
    }

    /// Resolve the links into an execution order.
    pub fn compile(&self) -> Result<ExecutionPlan> {
        GraphCompiler::compile(self)
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field(
                "nodes",
                &self.nodes.iter().map(|n| n.name()).collect::<Vec<_>>(),
            )
            .field("links", &self.links)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Constant, CreateTerrain, ExtractLayer, InsertLayer, TerrainNoise};

    fn chain() -> (Graph, NodeId, NodeId) {
        let mut graph = Graph::new("chain");
        let create = graph.add_node(CreateTerrain::new(16, 16, 0.0));
        let noise = graph.add_node(TerrainNoise::new());
        (graph, create, noise)
    }

    #[test]
    fn get_node_by_name_finds_exact_match() {
        let (graph, _, _) = chain();
        assert_eq!(
            graph.get_node_by_name("Terrain Noise").unwrap().name(),
            "Terrain Noise"
        );
        assert_eq!(graph.node_id_by_name("Create Terrain").unwrap(), NodeId(0));

        for other in ["terrain noise", "Terrain", "", "Terrain Noise "] {
            assert!(matches!(
                graph.get_node_by_name(other),
                Err(Error::NodeNotFound { ref name }) if name == other
            ));
        }
    }

    #[test]
    fn duplicate_names_resolve_to_first() {
        let mut graph = Graph::new("dups");
        graph.add_node(CreateTerrain::new(4, 4, 0.0).with_name("t"));
        graph.add_node(CreateTerrain::new(8, 8, 0.0).with_name("t"));
        assert_eq!(graph.node_id_by_name("t").unwrap(), NodeId(0));
    }

    #[test]
    fn link_accepts_matching_slots() {
        let (mut graph, create, noise) = chain();
        graph
            .link(create, "terrain", noise, "terrain")
            .expect("terrain to terrain");
        assert_eq!(graph.links().len(), 1);
        assert_eq!(graph.input_source(noise, "terrain"), Some(create));
        assert_eq!(graph.outgoing(create).count(), 1);
        assert_eq!(graph.incoming(noise).count(), 1);
    }

    #[test]
    fn link_rejects_unknown_slots_and_nodes() {
        let (mut graph, create, noise) = chain();
        assert!(matches!(
            graph.link(create, "height", noise, "terrain"),
            Err(Error::UnknownSlot { ref slot, .. }) if slot == "height"
        ));
        assert!(matches!(
            graph.link(create, "terrain", noise, "input"),
            Err(Error::UnknownSlot { ref slot, .. }) if slot == "input"
        ));
        assert!(matches!(
            graph.link(create, "terrain", NodeId(9), "terrain"),
            Err(Error::NodeNotFound { .. })
        ));
        assert!(graph.links().is_empty());
    }

    #[test]
    fn link_rejects_incompatible_kinds() {
        let mut graph = Graph::new("kinds");
        let constant = graph.add_node(Constant::new(1.0).unwrap());
        let create = graph.add_node(CreateTerrain::new(4, 4, 0.0));
        let extract = graph.add_node(ExtractLayer::new("height"));
        let insert = graph.add_node(InsertLayer::new("copy"));

        assert!(matches!(
            graph.link(constant, "value", insert, "terrain"),
            Err(Error::IncompatibleLink { .. })
        ));
        graph.link(create, "terrain", extract, "terrain").unwrap();
        assert!(matches!(
            graph.link(extract, "grid", insert, "terrain"),
            Err(Error::IncompatibleLink { .. })
        ));
        graph.link(extract, "grid", insert, "grid").expect("grid to grid");
        assert_eq!(graph.links().len(), 2);
    }

    #[test]
    fn input_slot_accepts_a_single_link() {
        let mut graph = Graph::new("fan-in");
        let a = graph.add_node(CreateTerrain::new(4, 4, 0.0).with_name("a"));
        let b = graph.add_node(CreateTerrain::new(4, 4, 1.0).with_name("b"));
        let noise = graph.add_node(TerrainNoise::new());

        graph.link(a, "terrain", noise, "terrain").unwrap();
        assert!(matches!(
            graph.link(b, "terrain", noise, "terrain"),
            Err(Error::InputAlreadyLinked { .. })
        ));
    }

    #[test]
    fn link_by_name_resolves_nodes() {
        let (mut graph, _, _) = chain();
        graph
            .link_by_name("Create Terrain", "terrain", "Terrain Noise", "terrain")
            .unwrap();
        assert!(matches!(
            graph.link_by_name("Missing", "terrain", "Terrain Noise", "terrain"),
            Err(Error::NodeNotFound { .. })
        ));
    }
}
