//! Terrain: a set of same-sized named layers.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::graph::events::{EventSink, GraphEvent, GraphEventKind};
use crate::terrain::Layer;

/// Name of the layer every terrain is created with.
pub const HEIGHT_LAYER: &str = "height";

/// The data object threaded between nodes: named layers sharing one width and height.
///
/// A terrain always holds a [`HEIGHT_LAYER`]. Every other layer is inserted through
/// [`Terrain::add_layer`], which rejects layers of a different size.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "TerrainRepr")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Terrain {
    width: usize,
    height: usize,
    layers: BTreeMap<String, Layer>,
}

impl Terrain {
    /// Create a terrain whose height layer is filled with `initial_height`.
    pub fn new(width: usize, height: usize, initial_height: f32) -> Result<Self> {
        let height_layer = Layer::create(width, height, initial_height)?;
        let mut layers = BTreeMap::new();
        layers.insert(HEIGHT_LAYER.to_string(), height_layer);
        Ok(Self {
            width,
            height,
            layers,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the size of the terrain as `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Insert `layer` under `name`, returning the layer it replaced, if any.
    ///
    /// Replacement is allowed and logged as a warning. A layer whose size differs from the
    /// terrain's is rejected and the terrain is left unchanged.
    pub fn add_layer(&mut self, name: impl Into<String>, layer: Layer) -> Result<Option<Layer>> {
        self.add_layer_with_events(name, layer, &mut ())
    }

    /// Same as [`Terrain::add_layer`], also reporting a replacement to `sink`.
    pub fn add_layer_with_events(
        &mut self,
        name: impl Into<String>,
        layer: Layer,
        sink: &mut dyn EventSink,
    ) -> Result<Option<Layer>> {
        if layer.size() != self.size() {
            return Err(Error::DimensionMismatch {
                expected: self.size(),
                found: layer.size(),
            });
        }

        let name = name.into();
        let replaced = self.layers.insert(name.clone(), layer);
        if replaced.is_some() {
            warn!("Layer '{}' already exists; replacing it.", name);
            if sink.wants(GraphEventKind::LayerReplaced) {
                sink.send(GraphEvent::LayerReplaced {
                    name,
                    size: self.size(),
                });
            }
        }
        Ok(replaced)
    }

    /// Remove and return a layer. The height layer cannot be removed.
    pub fn remove_layer(&mut self, name: &str) -> Result<Layer> {
        if name == HEIGHT_LAYER {
            return Err(Error::InvalidConfig(format!(
                "the '{HEIGHT_LAYER}' layer cannot be removed"
            )));
        }
        self.layers.remove(name).ok_or_else(|| Error::LayerNotFound {
            name: name.to_string(),
        })
    }

    pub fn layer(&self, name: &str) -> Result<&Layer> {
        self.layers.get(name).ok_or_else(|| Error::LayerNotFound {
            name: name.to_string(),
        })
    }

    pub fn layer_mut(&mut self, name: &str) -> Result<&mut Layer> {
        self.layers
            .get_mut(name)
            .ok_or_else(|| Error::LayerNotFound {
                name: name.to_string(),
            })
    }

    pub fn height_layer(&self) -> Result<&Layer> {
        self.layer(HEIGHT_LAYER)
    }

    pub fn height_layer_mut(&mut self) -> Result<&mut Layer> {
        self.layer_mut(HEIGHT_LAYER)
    }

    pub fn contains_layer(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Layer names in sorted order.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.keys().map(String::as_str)
    }

    /// Read-only view of all layers keyed by name.
    pub fn layers(&self) -> &BTreeMap<String, Layer> {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Serialized shape of a [`Terrain`]. Deserialization requires the height layer and checks
/// every layer against the terrain size.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct TerrainRepr {
    width: usize,
    height: usize,
    layers: BTreeMap<String, Layer>,
}

#[cfg(feature = "serde")]
impl TryFrom<TerrainRepr> for Terrain {
    type Error = Error;

    fn try_from(repr: TerrainRepr) -> Result<Self> {
        let size = (repr.width, repr.height);
        if !repr.layers.contains_key(HEIGHT_LAYER) {
            return Err(Error::LayerNotFound {
                name: HEIGHT_LAYER.to_string(),
            });
        }
        if let Some(layer) = repr.layers.values().find(|l| l.size() != size) {
            return Err(Error::DimensionMismatch {
                expected: size,
                found: layer.size(),
            });
        }
        Ok(Self {
            width: repr.width,
            height: repr.height,
            layers: repr.layers,
        })
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut terrain = Terrain::new(3, 2, 0.5).unwrap();
        terrain
            .add_layer("water", Layer::create(3, 2, 1.0).unwrap())
            .unwrap();
        let json = serde_json::to_string(&terrain).unwrap();
        let back: Terrain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, terrain);
    }

    #[test]
    fn rejects_terrain_without_height_layer() {
        let res = serde_json::from_str::<Terrain>(r#"{"width":2,"height":2,"layers":{}}"#);
        assert!(res.is_err());
    }

    #[test]
    fn rejects_layer_of_another_size() {
        let json = r#"{"width":2,"height":2,"layers":{
            "height":{"width":2,"height":2,"data":[0.0,0.0,0.0,0.0]},
            "water":{"width":1,"height":1,"data":[0.0]}
        }}"#;
        assert!(serde_json::from_str::<Terrain>(json).is_err());
    }
}
