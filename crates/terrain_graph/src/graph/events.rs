//! Event types and sinks for observing graph execution.
//!
//! This module defines [`GraphEvent`] and a set of sinks to emit, collect, or forward events
//! while a [`crate::graph::runner::GraphRunner`] executes a pass, or while nodes edit a
//! [`crate::terrain::Terrain`]. A sink is injected per call, so two passes never share one
//! unless the caller wants them to.
use crate::graph::spec::NodeId;
use crate::graph::value::ValueKind;

/// Describes events emitted during graph execution.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// Emitted when an execution pass starts.
    RunStarted {
        /// Name of the graph being executed.
        graph: String,
        /// Number of nodes scheduled for this pass.
        node_count: usize,
    },

    /// Emitted right before a node runs.
    NodeStarted {
        /// Id of the node.
        id: NodeId,
        /// Display name of the node.
        name: String,
    },

    /// Emitted after a node produced its output.
    NodeFinished {
        /// Id of the node.
        id: NodeId,
        /// Display name of the node.
        name: String,
        /// Kind of the value it produced.
        output: ValueKind,
    },

    /// Emitted when a node fails. The pass stops after this event.
    NodeFailed {
        /// Id of the node.
        id: NodeId,
        /// Display name of the node.
        name: String,
        /// Rendered error.
        message: String,
    },

    /// A layer was inserted under a name that already existed, replacing it.
    LayerReplaced {
        /// Name of the replaced layer.
        name: String,
        /// Size of the terrain that holds it.
        size: (usize, usize),
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. node name).
        context: String,
        /// Human-readable message.
        message: String,
    },

    /// Emitted when a pass completes without error.
    RunFinished {
        /// Name of the graph that was executed.
        graph: String,
        /// Number of nodes that ran.
        nodes_run: usize,
    },
}

/// Discriminant of [`GraphEvent`], used by sinks to filter what they receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphEventKind {
    RunStarted,
    NodeStarted,
    NodeFinished,
    NodeFailed,
    LayerReplaced,
    Warning,
    RunFinished,
}

impl GraphEvent {
    pub fn kind(&self) -> GraphEventKind {
        match self {
            GraphEvent::RunStarted { .. } => GraphEventKind::RunStarted,
            GraphEvent::NodeStarted { .. } => GraphEventKind::NodeStarted,
            GraphEvent::NodeFinished { .. } => GraphEventKind::NodeFinished,
            GraphEvent::NodeFailed { .. } => GraphEventKind::NodeFailed,
            GraphEvent::LayerReplaced { .. } => GraphEventKind::LayerReplaced,
            GraphEvent::Warning { .. } => GraphEventKind::Warning,
            GraphEvent::RunFinished { .. } => GraphEventKind::RunFinished,
        }
    }
}

/// A generic event sink that accepts [`GraphEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GraphEvent);

    /// Whether the sink is interested in events of `kind`. Emitters skip building events the
    /// sink does not want.
    #[inline]
    fn wants(&self, _kind: GraphEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GraphEvent) {}

    #[inline]
    fn wants(&self, _kind: GraphEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GraphEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GraphEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GraphEvent),
{
    #[inline]
    fn send(&mut self, event: GraphEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally keeping only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GraphEvent>,
    only: Option<Vec<GraphEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collect only events of the given kinds.
    pub fn only(kinds: impl IntoIterator<Item = GraphEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<GraphEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GraphEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GraphEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: GraphEventKind) -> bool {
        match &self.only {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: GraphEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: GraphEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
