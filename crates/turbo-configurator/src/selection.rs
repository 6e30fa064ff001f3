//! Per-product attribute selection state.

use turbo_commerce::catalog::{AttributeDimension, Selection};
use turbo_commerce::{DimensionId, ValueId};

/// Holds the dimension → value choices for one product.
///
/// Pure in-memory state. Dimensions are orthogonal: choosing a value on one
/// never clears another.
#[derive(Debug, Clone, Default)]
pub struct AttributeSelectionStore {
    selection: Selection,
}

impl AttributeSelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a value. Choosing the value already selected for the dimension
    /// deselects it; choosing a different value replaces it.
    pub fn select(&mut self, dimension: DimensionId, value: ValueId) -> &Selection {
        if self.selection.get(&dimension) == Some(&value) {
            self.selection.remove(&dimension);
        } else {
            self.selection.insert(dimension, value);
        }
        &self.selection
    }

    /// Drop every choice.
    pub fn clear(&mut self) -> &Selection {
        self.selection.clear();
        &self.selection
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

/// Check that every dimension has a chosen value.
pub fn is_complete(dimensions: &[AttributeDimension], selection: &Selection) -> bool {
    selection.is_complete(dimensions)
}
