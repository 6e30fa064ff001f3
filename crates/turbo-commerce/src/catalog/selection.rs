//! Attribute selections and their canonical variant keys.

use crate::catalog::AttributeDimension;
use crate::ids::{DimensionId, ValueId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Mapping of dimension to chosen value, at most one value per dimension.
///
/// Entries are kept ordered by dimension ID so the variant key and the
/// attribute map sent to the catalog API are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    entries: BTreeMap<DimensionId, ValueId>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value chosen for a dimension.
    pub fn get(&self, dimension: &DimensionId) -> Option<&ValueId> {
        self.entries.get(dimension)
    }

    /// Choose a value for a dimension, replacing any previous choice.
    pub fn insert(&mut self, dimension: DimensionId, value: ValueId) -> Option<ValueId> {
        self.entries.insert(dimension, value)
    }

    /// Clear the choice for a dimension.
    pub fn remove(&mut self, dimension: &DimensionId) -> Option<ValueId> {
        self.entries.remove(dimension)
    }

    /// Clear every choice.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of dimensions with a chosen value.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(dimension, value)` pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&DimensionId, &ValueId)> {
        self.entries.iter()
    }

    /// A selection is complete iff every dimension has an entry.
    pub fn is_complete(&self, dimensions: &[AttributeDimension]) -> bool {
        dimensions.iter().all(|d| self.entries.contains_key(&d.id))
    }

    /// Canonical key of this selection.
    pub fn key(&self) -> VariantKey {
        VariantKey::from_selection(self)
    }
}

impl FromIterator<(DimensionId, ValueId)> for Selection {
    fn from_iter<I: IntoIterator<Item = (DimensionId, ValueId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Canonical signature of a selection: `"dimId:valueId|..."` sorted by dimension ID.
///
/// Numeric ids sort numerically (`"2"` before `"10"`) and ahead of
/// non-numeric ids, which sort as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantKey(String);

impl VariantKey {
    /// Build the key for a selection.
    pub fn from_selection(selection: &Selection) -> Self {
        let mut entries: Vec<_> = selection.iter().collect();
        entries.sort_by(|(a, _), (b, _)| compare_ids(a.as_str(), b.as_str()));
        let key = entries
            .into_iter()
            .map(|(d, v)| format!("{}:{}", d, v))
            .collect::<Vec<_>>()
            .join("|");
        Self(key)
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
