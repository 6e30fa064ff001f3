//! E-commerce domain types for TurboCommerce.
//!
//! This crate provides the types the variant configurator works with:
//!
//! - **Catalog**: attribute dimensions, selections, variant keys, variants,
//!   configurable product definitions
//! - **Cart**: the server-authoritative cart snapshot
//!
//! # Example
//!
//! ```rust
//! use turbo_commerce::prelude::*;
//!
//! let product = ProductConfig::new("12", "Shirt", Money::new(5000, Currency::USD))
//!     .with_dimension(
//!         AttributeDimension::new("1", "Size", AttributeKind::TextToken)
//!             .with_value(AttributeValue::new("3", "M")),
//!     )
//!     .with_dimension(
//!         AttributeDimension::new("2", "Color", AttributeKind::Swatch)
//!             .with_value(AttributeValue::new("7", "Red")),
//!     );
//!
//! let mut selection = Selection::new();
//! selection.insert(DimensionId::new("2"), ValueId::new("7"));
//! selection.insert(DimensionId::new("1"), ValueId::new("3"));
//!
//! assert!(selection.is_complete(&product.dimensions));
//! assert_eq!(selection.key().as_str(), "1:3|2:7");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        AttributeDimension, AttributeKind, AttributeValue, KnownVariant, ProductConfig,
        Selection, StockState, Variant, VariantKey,
    };

    // Cart
    pub use crate::cart::{AttributeTotal, CartLine, CartSnapshot, MAX_QUANTITY_PER_ITEM};
}
