//! Scalar grid storage for a single terrain layer.
//!
//! Cells are stored row-major: the value at `(x, y)` lives at `y * width + x`.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2D grid of `f32` values with fixed dimensions.
///
/// The length of the backing storage always equals `width * height`. Cell access goes through
/// slices and bounds-checked setters, and bulk replacement is size-checked, so the invariant
/// cannot be broken from outside.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "LayerRepr")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Layer {
    /// Create a layer with every cell set to `default_value`.
    pub fn create(width: usize, height: usize, default_value: f32) -> Result<Self> {
        let cells = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![default_value; cells],
        })
    }

    /// Create a layer from existing row-major data.
    pub fn from_data(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != cell_count(width, height)? {
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                found: shape_of(width, data.len()),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the size of the layer as `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get the value at `(x, y)`, or `None` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Set the value at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, value: f32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.data[y * self.width + x] = value;
        Ok(())
    }

    /// Row-major view of all cells.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major view of all cells. The slice cannot change the layer's size.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Iterate over rows from `y = 0` to `y = height - 1`.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.data.chunks_exact(self.width)
    }

    /// Replace the whole grid. Fails and leaves the layer untouched unless the new grid has
    /// exactly this layer's dimensions.
    pub fn replace_data(&mut self, width: usize, height: usize, data: Vec<f32>) -> Result<()> {
        if (width, height) != self.size() {
            return Err(Error::DimensionMismatch {
                expected: self.size(),
                found: (width, height),
            });
        }
        if data.len() != self.data.len() {
            return Err(Error::DimensionMismatch {
                expected: self.size(),
                found: shape_of(width, data.len()),
            });
        }
        self.data = data;
        Ok(())
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Apply `f` to every cell.
    pub fn map_in_place(&mut self, mut f: impl FnMut(f32) -> f32) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Smallest and largest cell values. NaN cells are ignored.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .filter(|v| !v.is_nan())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Number of cells of a `width` x `height` grid. Zero sizes and sizes whose cell count
/// overflows `usize` are invalid.
pub(crate) fn cell_count(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimension(width, height));
    }
    width
        .checked_mul(height)
        .ok_or_else(|| Error::invalid_dimension(width, height))
}

/// Serialized shape of a [`Layer`]; deserialization goes through [`Layer::from_data`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct LayerRepr {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

#[cfg(feature = "serde")]
impl TryFrom<LayerRepr> for Layer {
    type Error = Error;

    fn try_from(repr: LayerRepr) -> Result<Self> {
        Layer::from_data(repr.width, repr.height, repr.data)
    }
}

/// Best-effort `(width, height)` description of a flat buffer for error reporting.
fn shape_of(width: usize, len: usize) -> (usize, usize) {
    if width == 0 {
        (0, 0)
    } else {
        (width, len / width)
    }
}
