//! Layered grid data model passed between nodes.
//!
//! A [`Terrain`] owns a set of [`Layer`]s that all share the terrain's width and height.
pub mod layer;
#[allow(clippy::module_inception)]
pub mod terrain;

pub use layer::Layer;
pub use terrain::{Terrain, HEIGHT_LAYER};
