//! Favorites toggle.

use crate::auth::TokenStore;
use crate::error::FavoritesError;
use crate::wire::{favorite_toggle_path, Envelope, Scalar};
use turbo_commerce::ProductId;
use turbo_data::{FetchClient, FetchError};

/// Client for the favorites endpoint. Holds no configurator state.
#[derive(Clone)]
pub struct FavoritesClient {
    client: FetchClient,
    tokens: TokenStore,
}

impl FavoritesClient {
    pub fn new(client: FetchClient, tokens: TokenStore) -> Self {
        Self { client, tokens }
    }

    /// Toggle the favorite flag on a product. Returns whether the product is
    /// now a favorite.
    pub async fn toggle(&self, product_id: &ProductId) -> Result<bool, FavoritesError> {
        let token = self.tokens.get().ok_or(FavoritesError::Unauthenticated)?;

        let response = self
            .client
            .post(favorite_toggle_path(product_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(server)?;

        if response.status == 401 {
            return Err(FavoritesError::Unauthenticated);
        }
        let envelope: Envelope = response.error_for_status().map_err(server)?.json().map_err(server)?;
        if !envelope.succeeded() {
            return Err(FavoritesError::Server(
                envelope.message.unwrap_or_else(|| "toggle rejected".to_string()),
            ));
        }

        let favorited = is_favorited(envelope.payload());
        tracing::debug!(product_id = %product_id, favorited, "favorite toggled");
        Ok(favorited)
    }
}

fn server(e: FetchError) -> FavoritesError {
    FavoritesError::Server(e.to_string())
}

/// Read the new flag from `data`, which is either a bare scalar or an object
/// carrying `is_favorite`.
fn is_favorited(data: Option<&serde_json::Value>) -> bool {
    let flag = match data {
        Some(serde_json::Value::Object(map)) => map.get("is_favorite").or_else(|| map.get("favorited")),
        other => other,
    };
    flag.and_then(|v| serde_json::from_value::<Scalar>(v.clone()).ok())
        .is_some_and(|s| s.is_truthy())
}
