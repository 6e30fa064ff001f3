//! Product catalog module.
//!
//! Contains types for attribute dimensions, selections, variants and the
//! configurable product definition.

mod attribute;
mod product;
mod selection;
mod variant;

pub use attribute::{AttributeDimension, AttributeKind, AttributeValue};
pub use product::{KnownVariant, ProductConfig};
pub use selection::{Selection, VariantKey};
pub use variant::{StockState, Variant};
