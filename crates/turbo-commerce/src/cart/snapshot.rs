//! Server-authoritative cart snapshot.

use crate::error::CommerceError;
use crate::ids::VariantId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Check a requested quantity before it is sent to the cart service.
pub fn validate_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity <= 0 || quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    Ok(())
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// Variant (or default item) being purchased.
    pub item_id: VariantId,
    /// Quantity.
    pub quantity: i64,
    /// Customer note.
    pub note: String,
}

/// Total for lines sharing an attribute, as reported by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeTotal {
    /// Attribute label (e.g., "Size: M").
    pub label: String,
    /// Total amount.
    pub total: Money,
}

/// A cart snapshot. Totals come from the server and are never recomputed
/// locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Lines in the cart.
    pub lines: Vec<CartLine>,
    /// Subtotal before fees.
    pub subtotal: Money,
    /// Per-attribute totals.
    pub totals_by_attribute: Vec<AttributeTotal>,
    /// Final total.
    pub grand_total: Money,
}

impl CartSnapshot {
    /// An empty cart in the given currency.
    pub fn empty(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            subtotal: Money::zero(currency),
            totals_by_attribute: Vec::new(),
            grand_total: Money::zero(currency),
        }
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Get a line by item ID.
    pub fn line(&self, item_id: &VariantId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.item_id == item_id)
    }
}

impl Default for CartSnapshot {
    fn default() -> Self {
        Self::empty(Currency::default())
    }
}
