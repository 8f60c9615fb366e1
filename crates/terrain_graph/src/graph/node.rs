//! The node contract.
//!
//! A [`Node`] declares a name, typed input slots, one typed output slot, and a parameter
//! mapping. [`Node::run`] receives its inputs by value, so a [`Terrain`] moves through a chain
//! of nodes and is edited in place without copies or shared aliases.
use std::collections::HashMap;

use rand::RngCore;
use tracing::warn;

use crate::error::{Error, Result};
use crate::graph::events::{EventSink, GraphEvent, GraphEventKind};
use crate::graph::params::Parameters;
use crate::graph::value::{Port, Value, ValueKind};
use crate::terrain::{Layer, Terrain};

/// A configured unit of computation.
///
/// Implementations keep only their configuration between runs; `run` may be called any number
/// of times and must not hold on to anything it received.
pub trait Node: Send + Sync {
    /// Human-readable name, used for lookup in a [`crate::graph::spec::Graph`].
    fn name(&self) -> &str;

    /// Input slots that must all be supplied to [`Node::run`].
    fn required_inputs(&self) -> &[Port];

    /// The slot the produced value is published on.
    fn output(&self) -> Port;

    fn parameters(&self) -> &Parameters;

    fn run(&self, inputs: Inputs, ctx: &mut RunContext<'_>) -> Result<Value>;

    /// Look up an input slot by name.
    fn input(&self, slot: &str) -> Option<Port> {
        self.required_inputs()
            .iter()
            .find(|p| p.name == slot)
            .copied()
    }
}

/// Values supplied to a node, keyed by input slot name.
#[derive(Clone, Debug, Default)]
pub struct Inputs {
    values: HashMap<String, Value>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail with [`Error::MissingInput`] for the first port that has no value.
    pub fn ensure_present(&self, node: &str, ports: &[Port]) -> Result<()> {
        match ports.iter().find(|p| !self.contains(p.name)) {
            Some(port) => Err(missing_input(node, port.name)),
            None => Ok(()),
        }
    }

    /// Remove and return the value for `name`.
    pub fn take(&mut self, node: &str, name: &str) -> Result<Value> {
        self.values
            .remove(name)
            .ok_or_else(|| missing_input(node, name))
    }

    pub fn take_terrain(&mut self, node: &str, name: &str) -> Result<Terrain> {
        match self.take(node, name)? {
            Value::Terrain(t) => Ok(t),
            other => Err(unexpected(node, ValueKind::Terrain, &other)),
        }
    }

    pub fn take_grid(&mut self, node: &str, name: &str) -> Result<Layer> {
        match self.take(node, name)? {
            Value::Grid(g) => Ok(g),
            other => Err(unexpected(node, ValueKind::Grid, &other)),
        }
    }

    pub fn scalar(&self, node: &str, name: &str) -> Result<f32> {
        match self.get(name) {
            None => Err(missing_input(node, name)),
            Some(Value::Scalar(v)) => Ok(*v),
            Some(other) => Err(unexpected(node, ValueKind::Scalar, other)),
        }
    }
}

fn missing_input(node: &str, input: &str) -> Error {
    Error::MissingInput {
        node: node.to_string(),
        input: input.to_string(),
    }
}

fn unexpected(node: &str, expected: ValueKind, found: &Value) -> Error {
    Error::UnexpectedValue {
        node: node.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Capabilities handed to [`Node::run`]: the random source and the event sink of the current
/// pass.
pub struct RunContext<'a> {
    rng: &'a mut dyn RngCore,
    sink: &'a mut dyn EventSink,
}

impl<'a> RunContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore, sink: &'a mut dyn EventSink) -> Self {
        Self { rng, sink }
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    pub fn sink(&mut self) -> &mut dyn EventSink {
        &mut *self.sink
    }

    /// Log a non-fatal warning and forward it to the sink.
    pub fn warn(&mut self, context: &str, message: impl Into<String>) {
        let message = message.into();
        warn!("{}: {}", context, message);
        if self.sink.wants(GraphEventKind::Warning) {
            self.sink.send(GraphEvent::Warning {
                context: context.to_string(),
                message,
            });
        }
    }
}
