//! Sellable variants.

use crate::ids::VariantId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Availability of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StockState {
    /// Available, optionally with a known quantity on hand.
    InStock { quantity: Option<u32> },
    /// Not available for purchase.
    OutOfStock,
    /// The backend did not report stock.
    #[default]
    Unknown,
}

impl StockState {
    /// Derive stock from the optional `stock` count and `out_of_stock` flag
    /// the catalog API reports.
    pub fn from_report(quantity: Option<i64>, out_of_stock: Option<bool>) -> Self {
        match (out_of_stock, quantity) {
            (Some(true), _) => StockState::OutOfStock,
            (_, Some(q)) if q <= 0 => StockState::OutOfStock,
            (_, Some(q)) => StockState::InStock {
                quantity: u32::try_from(q).ok(),
            },
            (Some(false), None) => StockState::InStock { quantity: None },
            (None, None) => StockState::Unknown,
        }
    }

    /// Check if the variant can be ordered.
    pub fn is_available(&self) -> bool {
        !matches!(self, StockState::OutOfStock)
    }

    /// Get stock status message.
    pub fn status_message(&self) -> &'static str {
        match self {
            StockState::InStock { quantity: Some(q) } if *q <= 5 => "Low Stock",
            StockState::InStock { .. } => "In Stock",
            StockState::OutOfStock => "Out of Stock",
            StockState::Unknown => "Availability unknown",
        }
    }
}

/// A concrete sellable combination of one value per dimension.
///
/// Immutable per variant key until refreshed from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variant {
    /// Identifier submitted to the cart.
    pub id: VariantId,
    /// Original price, shown struck through when higher than the sale price.
    pub price_before_discount: Option<Money>,
    /// Price the customer pays.
    pub price_after_discount: Money,
    /// Availability.
    pub stock: StockState,
    /// Variant name (e.g., "Large / Blue").
    pub display_name: Option<String>,
}

impl Variant {
    /// Create a variant with just an id and price.
    pub fn new(id: impl Into<VariantId>, price_after_discount: Money) -> Self {
        Self {
            id: id.into(),
            price_before_discount: None,
            price_after_discount,
            stock: StockState::Unknown,
            display_name: None,
        }
    }

    /// Check if this variant is on sale.
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price().is_some()
    }

    /// The price before discount, only when it exceeds the sale price.
    pub fn compare_at_price(&self) -> Option<Money> {
        self.price_before_discount
            .filter(|before| before.amount_cents > self.price_after_discount.amount_cents)
    }
}
