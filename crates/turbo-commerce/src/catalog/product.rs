//! Configurable product definition.

use crate::catalog::{AttributeDimension, Selection, Variant, VariantKey};
use crate::error::CommerceError;
use crate::ids::{DimensionId, ProductId, ValueId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A variant shipped with the product payload, keyed by its attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnownVariant {
    /// Attribute combination this variant sells.
    pub attributes: BTreeMap<DimensionId, ValueId>,
    /// The variant itself.
    pub variant: Variant,
}

impl KnownVariant {
    /// Canonical key of the attribute combination.
    pub fn key(&self) -> VariantKey {
        let selection: Selection = self
            .attributes
            .iter()
            .map(|(d, v)| (d.clone(), v.clone()))
            .collect();
        selection.key()
    }
}

/// A product as seen by the configurator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductConfig {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Price shown until a variant is resolved.
    pub base_price: Money,
    /// Original base price, if the product is discounted.
    #[serde(default)]
    pub base_price_before_discount: Option<Money>,
    /// Independent attribute dimensions, in display order.
    #[serde(default)]
    pub dimensions: Vec<AttributeDimension>,
    /// Pre-assigned variant that bypasses attribute selection.
    #[serde(default)]
    pub default_variant_id: Option<VariantId>,
    /// Variants embedded in the product payload.
    #[serde(default)]
    pub known_variants: Vec<KnownVariant>,
}

impl ProductConfig {
    /// Create a product with no dimensions.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, base_price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            base_price_before_discount: None,
            dimensions: Vec::new(),
            default_variant_id: None,
            known_variants: Vec::new(),
        }
    }

    /// Append a dimension, builder-style.
    pub fn with_dimension(mut self, dimension: AttributeDimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Set the default variant, builder-style.
    pub fn with_default_variant(mut self, id: impl Into<VariantId>) -> Self {
        self.default_variant_id = Some(id.into());
        self
    }

    /// Check if the product bypasses attribute selection.
    pub fn has_default_variant(&self) -> bool {
        self.default_variant_id.is_some()
    }

    /// Look up a dimension by ID.
    pub fn dimension(&self, id: &DimensionId) -> Option<&AttributeDimension> {
        self.dimensions.iter().find(|d| &d.id == id)
    }

    /// Check that a dimension/value pair exists on this product.
    pub fn check_value(&self, dimension: &DimensionId, value: &ValueId) -> Result<(), CommerceError> {
        let dim = self
            .dimension(dimension)
            .ok_or_else(|| CommerceError::UnknownDimension(dimension.to_string()))?;
        if dim.has_value(value) {
            Ok(())
        } else {
            Err(CommerceError::UnknownValue {
                dimension: dimension.to_string(),
                value: value.to_string(),
            })
        }
    }

    /// Human label for a selection, e.g. "M / Red".
    pub fn selection_label(&self, selection: &Selection) -> String {
        self.dimensions
            .iter()
            .filter_map(|d| {
                selection
                    .get(&d.id)
                    .and_then(|v| d.value(v))
                    .map(|v| v.label.as_str())
            })
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Validate that the definition can drive attribute selection.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let malformed = |reason: String| CommerceError::MalformedProduct {
            product_id: self.id.to_string(),
            reason,
        };

        if self.dimensions.is_empty() && self.default_variant_id.is_none() {
            return Err(malformed(
                "no attribute dimensions and no default variant".to_string(),
            ));
        }

        let mut seen_dims = HashSet::new();
        for dim in &self.dimensions {
            if !seen_dims.insert(&dim.id) {
                return Err(malformed(format!("duplicate dimension {}", dim.id)));
            }
            if dim.values.is_empty() {
                return Err(malformed(format!("dimension {} has no values", dim.id)));
            }
            let mut seen_values = HashSet::new();
            for value in &dim.values {
                if !seen_values.insert(&value.id) {
                    return Err(malformed(format!(
                        "duplicate value {} in dimension {}",
                        value.id, dim.id
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeKind, AttributeValue};
    use crate::money::Currency;

    fn shirt() -> ProductConfig {
        ProductConfig::new("12", "Shirt", Money::new(5000, Currency::USD))
            .with_dimension(
                AttributeDimension::new("1", "Size", AttributeKind::TextToken)
                    .with_value(AttributeValue::new("3", "M"))
                    .with_value(AttributeValue::new("4", "L")),
            )
            .with_dimension(
                AttributeDimension::new("2", "Color", AttributeKind::Swatch)
                    .with_value(AttributeValue::new("7", "Red")),
            )
    }

    #[test]
    fn test_valid_product() {
        assert!(shirt().validate().is_ok());
    }

    #[test]
    fn test_product_without_dimensions_needs_default() {
        let bare = ProductConfig::new("12", "Mug", Money::new(900, Currency::USD));
        assert!(matches!(
            bare.validate(),
            Err(CommerceError::MalformedProduct { .. })
        ));

        let with_default = bare.with_default_variant("120");
        assert!(with_default.validate().is_ok());
    }

    #[test]
    fn test_empty_dimension_is_malformed() {
        let product = shirt().with_dimension(AttributeDimension::new(
            "5",
            "Material",
            AttributeKind::TextToken,
        ));
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_duplicate_values_are_malformed() {
        let product = ProductConfig::new("12", "Shirt", Money::new(5000, Currency::USD))
            .with_dimension(
                AttributeDimension::new("1", "Size", AttributeKind::TextToken)
                    .with_value(AttributeValue::new("3", "M"))
                    .with_value(AttributeValue::new("3", "M again")),
            );
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_check_value() {
        let product = shirt();
        assert!(product
            .check_value(&DimensionId::new("1"), &ValueId::new("3"))
            .is_ok());
        assert_eq!(
            product.check_value(&DimensionId::new("9"), &ValueId::new("3")),
            Err(CommerceError::UnknownDimension("9".to_string()))
        );
        assert!(matches!(
            product.check_value(&DimensionId::new("1"), &ValueId::new("99")),
            Err(CommerceError::UnknownValue { .. })
        ));
    }

    #[test]
    fn test_selection_label_follows_dimension_order() {
        let product = shirt();
        let selection: Selection = [
            (DimensionId::new("2"), ValueId::new("7")),
            (DimensionId::new("1"), ValueId::new("4")),
        ]
        .into_iter()
        .collect();
        assert_eq!(product.selection_label(&selection), "L / Red");
    }

    #[test]
    fn test_known_variant_key() {
        let known = KnownVariant {
            attributes: [
                (DimensionId::new("2"), ValueId::new("7")),
                (DimensionId::new("1"), ValueId::new("3")),
            ]
            .into_iter()
            .collect(),
            variant: Variant::new("99", Money::new(7500, Currency::USD)),
        };
        assert_eq!(known.key().as_str(), "1:3|2:7");
    }
}
