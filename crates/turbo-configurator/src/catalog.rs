//! Remote variant lookup.

use crate::error::ResolutionError;
use crate::wire::{Envelope, VariantDto, VariantLookupRequest, VARIANT_LOOKUP_PATH};
use async_trait::async_trait;
use turbo_commerce::catalog::{Selection, Variant};
use turbo_commerce::{Currency, ProductId};
use turbo_data::{FetchClient, FetchError};

/// Turns a complete selection into a variant by asking the catalog.
#[async_trait]
pub trait VariantLookup: Send + Sync {
    async fn lookup(
        &self,
        product_id: &ProductId,
        selection: &Selection,
    ) -> Result<Variant, ResolutionError>;
}

/// [`VariantLookup`] backed by the storefront catalog API.
#[derive(Clone)]
pub struct CatalogApi {
    client: FetchClient,
    currency: Currency,
}

impl CatalogApi {
    pub fn new(client: FetchClient, currency: Currency) -> Self {
        Self { client, currency }
    }
}

fn network(e: FetchError) -> ResolutionError {
    ResolutionError::Network(e.to_string())
}

#[async_trait]
impl VariantLookup for CatalogApi {
    async fn lookup(
        &self,
        product_id: &ProductId,
        selection: &Selection,
    ) -> Result<Variant, ResolutionError> {
        let body = VariantLookupRequest::new(product_id, selection);
        let response = self
            .client
            .post(VARIANT_LOOKUP_PATH)
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;

        if response.status == 404 {
            return Err(ResolutionError::NotFound);
        }
        let response = response.error_for_status().map_err(network)?;
        let envelope: Envelope = response.json().map_err(network)?;

        if !envelope.succeeded() {
            tracing::debug!(
                product_id = %product_id,
                variant_key = %selection.key(),
                message = envelope.message.as_deref().unwrap_or(""),
                "catalog reported no variant"
            );
            return Err(ResolutionError::NotFound);
        }

        let dto: VariantDto = match envelope.payload() {
            Some(data) => serde_json::from_value(data.clone())
                .map_err(|e| ResolutionError::Network(format!("malformed variant: {}", e)))?,
            None => return Err(ResolutionError::NotFound),
        };
        let id = dto.id.clone().ok_or(ResolutionError::NotFound)?;

        dto.into_variant(id, self.currency)
            .map_err(|e| ResolutionError::Network(format!("malformed variant: {}", e)))
    }
}
