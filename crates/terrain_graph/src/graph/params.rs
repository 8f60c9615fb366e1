//! Parameter values configured on nodes.
//!
//! Parameters are a loose name-to-value mapping; each node checks the types it needs when it is
//! built from [`Parameters`] or when it runs.
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single parameter value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f32),
    Bool(bool),
    Text(String),
}

impl ParamValue {
    fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Bool(_) => "bool",
            ParamValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value as f32)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Name-to-value mapping of node parameters, iterated in name order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    values: BTreeMap<String, ParamValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or overwrite a parameter.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail with [`Error::MissingParameter`] for the first name in `names` that is absent.
    pub fn require(&self, node: &str, names: &[&str]) -> Result<()> {
        match names.iter().find(|n| !self.contains(n)) {
            Some(name) => Err(missing(node, name)),
            None => Ok(()),
        }
    }

    pub fn int(&self, node: &str, name: &str) -> Result<i64> {
        self.opt_int(node, name)?.ok_or_else(|| missing(node, name))
    }

    pub fn opt_int(&self, node: &str, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None => Ok(None),
            Some(ParamValue::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(wrong_type(node, name, "int", other)),
        }
    }

    /// Read a float. Integers are accepted and converted.
    pub fn float(&self, node: &str, name: &str) -> Result<f32> {
        self.opt_float(node, name)?.ok_or_else(|| missing(node, name))
    }

    pub fn opt_float(&self, node: &str, name: &str) -> Result<Option<f32>> {
        match self.get(name) {
            None => Ok(None),
            Some(ParamValue::Float(v)) => Ok(Some(*v)),
            Some(ParamValue::Int(v)) => Ok(Some(*v as f32)),
            Some(other) => Err(wrong_type(node, name, "float", other)),
        }
    }

    pub fn text(&self, node: &str, name: &str) -> Result<&str> {
        self.opt_text(node, name)?.ok_or_else(|| missing(node, name))
    }

    pub fn opt_text(&self, node: &str, name: &str) -> Result<Option<&str>> {
        match self.get(name) {
            None => Ok(None),
            Some(ParamValue::Text(v)) => Ok(Some(v.as_str())),
            Some(other) => Err(wrong_type(node, name, "text", other)),
        }
    }

    pub fn bool(&self, node: &str, name: &str) -> Result<bool> {
        match self.get(name) {
            None => Err(missing(node, name)),
            Some(ParamValue::Bool(v)) => Ok(*v),
            Some(other) => Err(wrong_type(node, name, "bool", other)),
        }
    }
}

fn missing(node: &str, name: &str) -> Error {
    Error::MissingParameter {
        node: node.to_string(),
        name: name.to_string(),
    }
}

fn wrong_type(node: &str, name: &str, expected: &str, found: &ParamValue) -> Error {
    Error::InvalidParameter {
        node: node.to_string(),
        name: name.to_string(),
        reason: format!("expected {expected}, found {} {found}", found.type_name()),
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_read_matching_values() {
        let params = Parameters::new()
            .with("width", 512)
            .with("scale", 0.5f32)
            .with("layer", "height")
            .with("enabled", true);

        assert_eq!(params.int("n", "width").unwrap(), 512);
        assert_eq!(params.float("n", "scale").unwrap(), 0.5);
        assert_eq!(params.float("n", "width").unwrap(), 512.0);
        assert_eq!(params.text("n", "layer").unwrap(), "height");
        assert!(params.bool("n", "enabled").unwrap());
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn missing_and_mistyped_parameters_fail() {
        let params = Parameters::new().with("width", "wide");

        assert!(matches!(
            params.int("Create Terrain", "width"),
            Err(Error::InvalidParameter { ref node, ref name, .. })
                if node == "Create Terrain" && name == "width"
        ));
        assert!(matches!(
            params.float("Create Terrain", "height"),
            Err(Error::MissingParameter { ref name, .. }) if name == "height"
        ));
        assert_eq!(params.opt_int("n", "seed").unwrap(), None);
    }

    #[test]
    fn require_reports_first_absent_name() {
        let params: Parameters = [("width", 1), ("height", 2)].into_iter().collect();
        params.require("n", &["width", "height"]).expect("present");
        assert!(matches!(
            params.require("n", &["width", "initialHeight", "seed"]),
            Err(Error::MissingParameter { ref name, .. }) if name == "initialHeight"
        ));
    }

    #[test]
    fn names_iterate_in_sorted_order() {
        let params = Parameters::new().with("b", 1).with("a", 2).with("c", 3);
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
