//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in catalog and cart domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Dimension is not defined on the product.
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// Value is not defined on the dimension.
    #[error("Unknown value {value} for dimension {dimension}")]
    UnknownValue { dimension: String, value: String },

    /// Product definition cannot drive attribute selection.
    #[error("Malformed product {product_id}: {reason}")]
    MalformedProduct { product_id: String, reason: String },

    /// Price text could not be parsed.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity is not a whole number.
    #[error("Malformed quantity: {0}")]
    MalformedQuantity(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}
