//! Shopping cart module.
//!
//! The cart itself lives on the server; these are the snapshot types the
//! storefront caches and the quantity rules it checks before submitting.

mod snapshot;

pub use snapshot::{validate_quantity, AttributeTotal, CartLine, CartSnapshot, MAX_QUANTITY_PER_ITEM};
