//! Attribute dimensions and their values.

use crate::ids::{DimensionId, ValueId};
use serde::{Deserialize, Serialize};

/// How a dimension's values are rendered by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeKind {
    /// Colored swatch (uses `AttributeValue::color_token`).
    Swatch,
    /// Plain text token (e.g., "S", "M", "L").
    #[default]
    TextToken,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Swatch => "swatch",
            AttributeKind::TextToken => "text-token",
        }
    }
}

/// A selectable value on a dimension (e.g., Size: M).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeValue {
    /// Value identifier, unique within its dimension.
    pub id: ValueId,
    /// Display label.
    pub label: String,
    /// Color token for swatch dimensions (e.g., "#ff0000").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_token: Option<String>,
}

impl AttributeValue {
    pub fn new(id: impl Into<ValueId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color_token: None,
        }
    }

    /// Attach a swatch color.
    pub fn with_color(mut self, token: impl Into<String>) -> Self {
        self.color_token = Some(token.into());
        self
    }
}

/// An independent attribute axis of a product (size, color, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeDimension {
    /// Dimension identifier.
    pub id: DimensionId,
    /// Display name (e.g., "Size").
    pub name: String,
    /// Rendering kind.
    #[serde(default)]
    pub kind: AttributeKind,
    /// Values in display order.
    pub values: Vec<AttributeValue>,
}

impl AttributeDimension {
    pub fn new(id: impl Into<DimensionId>, name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            values: Vec::new(),
        }
    }

    /// Append a value, builder-style.
    pub fn with_value(mut self, value: AttributeValue) -> Self {
        self.values.push(value);
        self
    }

    /// Look up a value by ID.
    pub fn value(&self, id: &ValueId) -> Option<&AttributeValue> {
        self.values.iter().find(|v| &v.id == id)
    }

    /// Check if the dimension defines the given value.
    pub fn has_value(&self, id: &ValueId) -> bool {
        self.value(id).is_some()
    }
}
