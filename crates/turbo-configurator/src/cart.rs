//! Cart gateway and the shared cart snapshot.
//!
//! [`CartGateway`] is the only writer of the snapshot. Every other surface
//! (header badge, mini-cart, cart page) holds a [`CartState`] and reacts to
//! changes instead of polling.

use crate::auth::TokenStore;
use crate::error::CartError;
use crate::wire::{AddToCartRequest, CartSnapshotDto, Envelope, ADD_TO_CART_PATH, CART_PATH};
use std::sync::Arc;
use tokio::sync::watch;
use turbo_commerce::cart::{validate_quantity, CartSnapshot};
use turbo_commerce::{Currency, VariantId};
use turbo_data::{FetchClient, FetchError, Response};

/// Submits items to the cart service and owns the cart snapshot.
///
/// Cheap to clone; clones publish to the same snapshot.
#[derive(Clone)]
pub struct CartGateway {
    client: FetchClient,
    tokens: TokenStore,
    currency: Currency,
    snapshot: Arc<watch::Sender<CartSnapshot>>,
}

impl CartGateway {
    pub fn new(client: FetchClient, tokens: TokenStore, currency: Currency) -> Self {
        let (snapshot, _) = watch::channel(CartSnapshot::empty(currency));
        Self {
            client,
            tokens,
            currency,
            snapshot: Arc::new(snapshot),
        }
    }

    /// Read-only view of the cart snapshot.
    pub fn state(&self) -> CartState {
        CartState {
            receiver: self.snapshot.subscribe(),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Add an already-resolved item to the cart.
    ///
    /// On success the server's snapshot replaces the cached one. When the
    /// response carries no snapshot the cart is re-fetched. On any error the
    /// cached snapshot is left untouched.
    pub async fn add_to_cart(
        &self,
        item_id: &VariantId,
        quantity: i64,
        note: &str,
    ) -> Result<CartSnapshot, CartError> {
        validate_quantity(quantity)?;
        let token = self.tokens.get().ok_or(CartError::Unauthenticated)?;

        let response = self
            .client
            .post(ADD_TO_CART_PATH)
            .bearer_auth(token)
            .json(&AddToCartRequest::new(item_id, quantity, note))
            .map_err(server)?
            .send()
            .await
            .map_err(server)?;

        let envelope = check(response)?;
        match envelope.payload() {
            Some(data) => {
                let snapshot = self.decode(data)?;
                tracing::info!(item_id = %item_id, quantity, items = snapshot.item_count(), "added to cart");
                Ok(self.publish(snapshot))
            }
            None => {
                tracing::debug!(item_id = %item_id, "add-to-cart returned no snapshot, refreshing");
                self.refresh().await
            }
        }
    }

    /// Fetch the cart from the server and replace the cached snapshot.
    pub async fn refresh(&self) -> Result<CartSnapshot, CartError> {
        let token = self.tokens.get().ok_or(CartError::Unauthenticated)?;

        let response = self
            .client
            .get(CART_PATH)
            .bearer_auth(token)
            .send()
            .await
            .map_err(server)?;

        let envelope = check(response)?;
        let snapshot = match envelope.payload() {
            Some(data) => self.decode(data)?,
            None => CartSnapshot::empty(self.currency),
        };
        tracing::debug!(items = snapshot.item_count(), "cart refreshed");
        Ok(self.publish(snapshot))
    }

    fn decode(&self, data: &serde_json::Value) -> Result<CartSnapshot, CartError> {
        let dto: CartSnapshotDto = serde_json::from_value(data.clone())
            .map_err(|e| CartError::Server(format!("malformed cart: {}", e)))?;
        dto.into_snapshot(self.currency)
            .map_err(|e| CartError::Server(format!("malformed cart: {}", e)))
    }

    fn publish(&self, snapshot: CartSnapshot) -> CartSnapshot {
        self.snapshot.send_replace(snapshot.clone());
        snapshot
    }
}

fn server(e: FetchError) -> CartError {
    CartError::Server(e.to_string())
}

/// Map status codes and the envelope flag onto the cart error taxonomy.
fn check(response: Response) -> Result<Envelope, CartError> {
    match response.status {
        401 => {
            tracing::info!("cart request rejected: not authenticated");
            return Err(CartError::Unauthenticated);
        }
        400 | 422 => {
            let message = response
                .json::<Envelope>()
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("request rejected (HTTP {})", response.status));
            return Err(CartError::Validation(message));
        }
        status if !response.is_success() => {
            tracing::warn!(status, "cart service error");
            return Err(CartError::Server(format!("HTTP {}", status)));
        }
        _ => {}
    }

    let envelope: Envelope = response.json().map_err(server)?;
    if !envelope.succeeded() {
        let message = envelope
            .message
            .clone()
            .unwrap_or_else(|| "request rejected".to_string());
        return Err(CartError::Validation(message));
    }
    Ok(envelope)
}

/// Read-only subscription to the cart snapshot.
#[derive(Debug, Clone)]
pub struct CartState {
    receiver: watch::Receiver<CartSnapshot>,
}

impl CartState {
    /// Latest snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait until the gateway publishes a new snapshot.
    ///
    /// Returns `false` once every gateway clone has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}
