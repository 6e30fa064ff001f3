//! Product variant configurator for TurboCommerce storefronts.
//!
//! - [`ConfigurationController`]: attribute selection, debounced and
//!   race-safe variant resolution, and the read model UI surfaces bind to
//! - [`VariantResolver`]: session fallback table in front of the catalog
//! - [`CartGateway`] / [`CartState`]: the single writer of the cart
//!   snapshot and its read-only subscribers
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_configurator::prelude::*;
//!
//! let config = ConfiguratorConfig::load("configurator.toml")?;
//! let client = config.fetch_client()?;
//! let resolver = VariantResolver::new(Arc::new(CatalogApi::new(client.clone(), config.currency)));
//!
//! let controller = ConfigurationController::new(product, resolver, (&config).into())?;
//! controller.select("1".into(), "3".into())?;
//! controller.select("2".into(), "7".into())?;
//!
//! let mut views = controller.subscribe();
//! let view = views.wait_for(|v| !v.is_loading).await?.clone();
//! if view.can_add_to_cart {
//!     let gateway = CartGateway::new(client, TokenStore::with_token(token), config.currency);
//!     controller.add_to_cart(&gateway, 1, "").await?;
//! }
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod resolver;
pub mod selection;

mod wire;

#[cfg(test)]
mod testing;

pub use auth::TokenStore;
pub use cart::{CartGateway, CartState};
pub use catalog::{CatalogApi, VariantLookup};
pub use config::{ApiConfig, ConfiguratorConfig, Environment, ResolutionConfig};
pub use controller::{
    ConfigurationController, ConfiguratorView, ControllerOptions, ResolutionState,
    ResolutionToken,
};
pub use error::{CartError, ConfiguratorError, FavoritesError, ResolutionError};
pub use favorites::FavoritesClient;
pub use resolver::VariantResolver;
pub use selection::{is_complete, AttributeSelectionStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AttributeSelectionStore, CartError, CartGateway, CartState, CatalogApi,
        ConfigurationController, ConfiguratorConfig, ConfiguratorView, ControllerOptions,
        Environment, FavoritesClient, ResolutionError, ResolutionState, TokenStore,
        VariantLookup, VariantResolver,
    };
    pub use turbo_commerce::prelude::*;
}
