//! Selection → variant resolution with a session fallback table.

use crate::catalog::VariantLookup;
use crate::error::ResolutionError;
use std::sync::Arc;
use turbo_cache::{cache_key, Cache};
use turbo_commerce::catalog::{ProductConfig, Selection, Variant, VariantKey};
use turbo_commerce::ProductId;

/// Resolves complete selections to variants.
///
/// Lookup order is fixed: the session fallback table first, then one remote
/// lookup, then the fallback table once more if the lookup failed on the
/// network. Every successful lookup is written back to the table.
///
/// Cheap to clone; clones share the lookup and the table.
#[derive(Clone)]
pub struct VariantResolver {
    lookup: Arc<dyn VariantLookup>,
    table: Arc<Cache>,
}

impl VariantResolver {
    pub fn new(lookup: Arc<dyn VariantLookup>) -> Self {
        Self {
            lookup,
            table: Arc::new(Cache::new("variant-fallback")),
        }
    }

    /// Variant recorded for `key` on `product_id`, if any.
    ///
    /// A corrupt or unreadable entry is treated as a miss.
    pub fn cached(&self, product_id: &ProductId, key: &VariantKey) -> Option<Variant> {
        match self.table.get(&cache_key!("variant", product_id, key)) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(product_id = %product_id, variant_key = %key, error = %e, "fallback table read failed");
                None
            }
        }
    }

    /// Record `variant` as the resolution of `key` on `product_id`.
    pub fn remember(&self, product_id: &ProductId, key: &VariantKey, variant: &Variant) {
        if let Err(e) = self.table.set(&cache_key!("variant", product_id, key), variant) {
            tracing::warn!(product_id = %product_id, variant_key = %key, error = %e, "fallback table write failed");
        }
    }

    /// Write the variants shipped with a product definition into the table.
    pub fn seed(&self, product: &ProductConfig) {
        for known in &product.known_variants {
            self.remember(&product.id, &known.key(), &known.variant);
        }
        if !product.known_variants.is_empty() {
            tracing::debug!(
                product_id = %product.id,
                count = product.known_variants.len(),
                "seeded fallback table"
            );
        }
    }

    /// Resolve a complete selection.
    pub async fn resolve(
        &self,
        product_id: &ProductId,
        selection: &Selection,
    ) -> Result<Variant, ResolutionError> {
        let key = selection.key();
        if let Some(variant) = self.cached(product_id, &key) {
            tracing::debug!(product_id = %product_id, variant_key = %key, "resolved from fallback table");
            return Ok(variant);
        }

        match self.lookup.lookup(product_id, selection).await {
            Ok(variant) => {
                tracing::debug!(product_id = %product_id, variant_key = %key, variant_id = %variant.id, "resolved remotely");
                self.remember(product_id, &key, &variant);
                Ok(variant)
            }
            Err(ResolutionError::Network(reason)) => match self.cached(product_id, &key) {
                Some(variant) => {
                    tracing::info!(product_id = %product_id, variant_key = %key, reason = %reason, "lookup failed, served fallback");
                    Ok(variant)
                }
                None => {
                    tracing::warn!(product_id = %product_id, variant_key = %key, reason = %reason, "variant lookup failed");
                    Err(ResolutionError::Network(reason))
                }
            },
            Err(ResolutionError::NotFound) => {
                tracing::debug!(product_id = %product_id, variant_key = %key, "no variant for selection");
                Err(ResolutionError::NotFound)
            }
        }
    }
}
