//! Built-in nodes.
//!
//! - [`CreateTerrain`]: allocate a flat terrain
//! - [`TerrainNoise`]: uniform white noise on the height layer
//! - [`LayerFilter`]: cell-wise [`FilterOp`] on one layer
//! - [`CopyLayer`], [`ExtractLayer`], [`InsertLayer`]: move layers around
//! - [`FillLayer`]: set a layer to a scalar input
//! - [`Constant`]: a fixed scalar
pub mod create_terrain;
pub mod layer_filter;
pub mod layers;
pub mod terrain_noise;

pub use create_terrain::CreateTerrain;
pub use layer_filter::{FilterOp, LayerFilter};
pub use layers::{Constant, CopyLayer, ExtractLayer, FillLayer, InsertLayer};
pub use terrain_noise::{unit_f32, TerrainNoise};
