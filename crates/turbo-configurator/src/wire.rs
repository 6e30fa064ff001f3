//! Backend request/response shapes.
//!
//! The storefront backend is loose about scalar types: ids, prices and
//! flags arrive as numbers, strings or booleans depending on the endpoint.
//! Everything is decoded through [`Scalar`] and converted once, here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use turbo_commerce::catalog::{Selection, StockState, Variant};
use turbo_commerce::cart::{AttributeTotal, CartLine, CartSnapshot};
use turbo_commerce::{CommerceError, Currency, Money, ProductId, VariantId};

/// Variant lookup endpoint.
pub const VARIANT_LOOKUP_PATH: &str = "/catalog/products/get-variation-by-attribute";
/// Cart mutation endpoint.
pub const ADD_TO_CART_PATH: &str = "/marketplace/cart/add-to-cart";
/// Cart snapshot endpoint.
pub const CART_PATH: &str = "/marketplace/cart";

/// Favorites toggle endpoint for a product.
pub fn favorite_toggle_path(product_id: &ProductId) -> String {
    format!("/catalog/favorites/products/{}/toggle", product_id)
}

/// A JSON scalar of uncertain type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub(crate) fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Int(n) => *n != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Text(s) => matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "success" | "ok"),
        }
    }

    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub(crate) fn to_money(&self, currency: Currency) -> Result<Money, CommerceError> {
        match self {
            Scalar::Int(n) => Money::parse_decimal(&n.to_string(), currency),
            Scalar::Float(f) => Money::parse_decimal(&f.to_string(), currency),
            Scalar::Text(s) => Money::parse_decimal(s, currency),
            Scalar::Bool(b) => Err(CommerceError::InvalidPrice(b.to_string())),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// `{status, message?, data?}` wrapper used by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub status: Option<Scalar>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    pub(crate) fn succeeded(&self) -> bool {
        self.status.as_ref().is_some_and(Scalar::is_truthy)
    }

    /// The payload, unless it is absent, `null`, `{}` or `[]`.
    pub(crate) fn payload(&self) -> Option<&serde_json::Value> {
        match &self.data {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Object(map)) if map.is_empty() => None,
            Some(serde_json::Value::Array(items)) if items.is_empty() => None,
            Some(value) => Some(value),
        }
    }
}

/// Body of the variant lookup.
#[derive(Debug, Serialize)]
pub(crate) struct VariantLookupRequest {
    pub product_id: serde_json::Value,
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl VariantLookupRequest {
    pub(crate) fn new(product_id: &ProductId, selection: &Selection) -> Self {
        Self {
            product_id: product_id.to_wire_value(),
            attributes: selection
                .iter()
                .map(|(d, v)| (d.to_string(), v.to_wire_value()))
                .collect(),
        }
    }
}

/// `data` of a variant lookup response.
#[derive(Debug, Deserialize)]
pub(crate) struct VariantDto {
    #[serde(default)]
    pub id: Option<VariantId>,
    #[serde(default)]
    pub price_after_discount: Option<Scalar>,
    #[serde(default)]
    pub price_before_discount: Option<Scalar>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stock: Option<Scalar>,
    #[serde(default)]
    pub out_of_stock: Option<Scalar>,
}

impl VariantDto {
    /// Convert into a domain variant. `id` must already be checked.
    pub(crate) fn into_variant(self, id: VariantId, currency: Currency) -> Result<Variant, CommerceError> {
        let price_after_discount = self
            .price_after_discount
            .as_ref()
            .ok_or_else(|| CommerceError::InvalidPrice("missing price_after_discount".to_string()))?
            .to_money(currency)?;
        let price_before_discount = self
            .price_before_discount
            .as_ref()
            .map(|p| p.to_money(currency))
            .transpose()?;
        let stock = StockState::from_report(
            self.stock.as_ref().and_then(Scalar::as_i64),
            self.out_of_stock.as_ref().map(Scalar::is_truthy),
        );

        Ok(Variant {
            id,
            price_before_discount,
            price_after_discount,
            stock,
            display_name: self.name.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Body of the add-to-cart call.
#[derive(Debug, Serialize)]
pub(crate) struct AddToCartRequest<'a> {
    pub item_id: serde_json::Value,
    pub qty: i64,
    pub customer_note: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl<'a> AddToCartRequest<'a> {
    pub(crate) fn new(item_id: &VariantId, qty: i64, note: &'a str) -> Self {
        Self {
            item_id: item_id.to_wire_value(),
            qty,
            customer_note: note,
            kind: "product",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartLineDto {
    pub item_id: VariantId,
    pub qty: Scalar,
    #[serde(default)]
    pub customer_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttributeTotalDto {
    pub label: String,
    pub total: Scalar,
}

/// `data` of a cart response.
#[derive(Debug, Deserialize)]
pub(crate) struct CartSnapshotDto {
    #[serde(default)]
    pub lines: Vec<CartLineDto>,
    pub subtotal: Scalar,
    #[serde(default)]
    pub totals_by_attribute: Vec<AttributeTotalDto>,
    pub grand_total: Scalar,
}

impl CartSnapshotDto {
    pub(crate) fn into_snapshot(self, currency: Currency) -> Result<CartSnapshot, CommerceError> {
        let lines = self
            .lines
            .into_iter()
            .map(|line| {
                let quantity = line
                    .qty
                    .as_i64()
                    .ok_or_else(|| CommerceError::MalformedQuantity(line.qty.to_string()))?;
                Ok(CartLine {
                    item_id: line.item_id,
                    quantity,
                    note: line.customer_note.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let totals_by_attribute = self
            .totals_by_attribute
            .into_iter()
            .map(|t| {
                Ok(AttributeTotal {
                    label: t.label,
                    total: t.total.to_money(currency)?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        Ok(CartSnapshot {
            lines,
            subtotal: self.subtotal.to_money(currency)?,
            totals_by_attribute,
            grand_total: self.grand_total.to_money(currency)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use turbo_commerce::{DimensionId, ValueId};

    #[test]
    fn test_lookup_request_shape() {
        let selection: Selection = [
            (DimensionId::new("2"), ValueId::new("7")),
            (DimensionId::new("1"), ValueId::new("3")),
        ]
        .into_iter()
        .collect();

        let body = serde_json::to_value(VariantLookupRequest::new(&ProductId::new("12"), &selection))
            .unwrap();
        assert_eq!(body, json!({"product_id": 12, "attributes": {"1": 3, "2": 7}}));
    }

    #[test]
    fn test_add_to_cart_request_shape() {
        let body = serde_json::to_value(AddToCartRequest::new(&VariantId::new("42"), 1, "gift"))
            .unwrap();
        assert_eq!(
            body,
            json!({"item_id": 42, "qty": 1, "customer_note": "gift", "type": "product"})
        );
    }

    #[test]
    fn test_variant_dto_string_price() {
        let dto: VariantDto =
            serde_json::from_value(json!({"id": 99, "price_after_discount": "75.00"})).unwrap();
        let id = dto.id.clone().unwrap();
        let variant = dto.into_variant(id, Currency::USD).unwrap();

        assert_eq!(variant.id.as_str(), "99");
        assert_eq!(variant.price_after_discount.amount_cents, 7500);
        assert_eq!(variant.stock, StockState::Unknown);
        assert!(variant.price_before_discount.is_none());
    }

    #[test]
    fn test_variant_dto_numeric_fields() {
        let dto: VariantDto = serde_json::from_value(json!({
            "id": "99",
            "price_after_discount": 60,
            "price_before_discount": 80.5,
            "name": "M / Red",
            "stock": "3",
            "out_of_stock": 0
        }))
        .unwrap();
        let id = dto.id.clone().unwrap();
        let variant = dto.into_variant(id, Currency::USD).unwrap();

        assert_eq!(variant.price_after_discount.amount_cents, 6000);
        assert_eq!(variant.price_before_discount.unwrap().amount_cents, 8050);
        assert_eq!(variant.stock, StockState::InStock { quantity: Some(3) });
        assert_eq!(variant.display_name.as_deref(), Some("M / Red"));
    }

    #[test]
    fn test_variant_dto_missing_price_is_error() {
        let dto: VariantDto = serde_json::from_value(json!({"id": 99})).unwrap();
        assert!(dto.into_variant(VariantId::new("99"), Currency::USD).is_err());
    }

    #[test]
    fn test_envelope_payload_detection() {
        let empty: Envelope = serde_json::from_value(json!({"status": true, "data": {}})).unwrap();
        assert!(empty.succeeded());
        assert!(empty.payload().is_none());

        let null: Envelope = serde_json::from_value(json!({"status": 1, "data": null})).unwrap();
        assert!(null.succeeded());
        assert!(null.payload().is_none());

        let missing: Envelope = serde_json::from_value(json!({"status": "success"})).unwrap();
        assert!(missing.payload().is_none());

        let failed: Envelope =
            serde_json::from_value(json!({"status": false, "message": "nope"})).unwrap();
        assert!(!failed.succeeded());
    }

    #[test]
    fn test_cart_snapshot_dto() {
        let dto: CartSnapshotDto = serde_json::from_value(json!({
            "lines": [{"item_id": 42, "qty": "2", "customer_note": "gift"}],
            "subtotal": "150.00",
            "totals_by_attribute": [{"label": "Size: M", "total": 150}],
            "grand_total": "160.00"
        }))
        .unwrap();
        let snapshot = dto.into_snapshot(Currency::USD).unwrap();

        assert_eq!(snapshot.lines[0].item_id.as_str(), "42");
        assert_eq!(snapshot.lines[0].quantity, 2);
        assert_eq!(snapshot.totals_by_attribute[0].total.amount_cents, 15000);
        assert_eq!(snapshot.grand_total.amount_cents, 16000);
    }

    #[test]
    fn test_cart_snapshot_dto_rejects_non_numeric_qty() {
        let dto: CartSnapshotDto = serde_json::from_value(json!({
            "lines": [{"item_id": 42, "qty": "two"}],
            "subtotal": "0",
            "grand_total": "0"
        }))
        .unwrap();

        let err = dto.into_snapshot(Currency::USD).unwrap_err();
        assert_eq!(err, CommerceError::MalformedQuantity("\"two\"".into()));
        assert_eq!(err.to_string(), "Malformed quantity: \"two\"");
    }
}
