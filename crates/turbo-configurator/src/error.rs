//! Configurator error types.

use thiserror::Error;
use turbo_commerce::CommerceError;
use turbo_data::FetchError;

/// Why a complete selection could not be turned into a variant.
///
/// Recovered into the controller's read model, never thrown past it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The catalog could not be reached, or answered with a server failure.
    #[error("network error: {0}")]
    Network(String),

    /// The catalog has no variant for the selected attributes.
    #[error("no variant matches the selected options")]
    NotFound,
}

impl ResolutionError {
    /// Message shown next to the disabled purchase action.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolutionError::Network(_) => "We couldn't check this combination. Please try again.",
            ResolutionError::NotFound => "This combination is not available.",
        }
    }
}

/// Cart mutation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Missing or expired bearer token. The caller decides where to navigate.
    #[error("authentication required")]
    Unauthenticated,

    /// The request was rejected (bad quantity, unresolved item, server validation).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Transport failure, unexpected status, or unreadable response.
    #[error("cart service error: {0}")]
    Server(String),
}

impl CartError {
    /// Check if the caller should send the user to log in.
    pub fn requires_login(&self) -> bool {
        matches!(self, CartError::Unauthenticated)
    }

    /// Text for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            CartError::Unauthenticated => "Please log in to add items to your cart.".to_string(),
            CartError::Validation(message) => message.clone(),
            CartError::Server(_) => "Something went wrong updating your cart.".to_string(),
        }
    }
}

impl From<CommerceError> for CartError {
    fn from(e: CommerceError) -> Self {
        CartError::Validation(e.to_string())
    }
}

/// Favorites toggle failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FavoritesError {
    /// Missing or expired bearer token.
    #[error("authentication required")]
    Unauthenticated,

    /// The service rejected or failed the toggle.
    #[error("favorites service error: {0}")]
    Server(String),
}

/// Errors raised while setting up the configurator.
#[derive(Error, Debug)]
pub enum ConfiguratorError {
    /// Domain validation failed (malformed product, unknown attribute).
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The controller was created outside a Tokio runtime.
    #[error("no async runtime: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_login_flag() {
        assert!(CartError::Unauthenticated.requires_login());
        assert!(!CartError::Server("boom".into()).requires_login());
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = CartError::Validation("Only 2 left in stock".into());
        assert_eq!(err.user_message(), "Only 2 left in stock");
    }

    #[test]
    fn test_commerce_error_becomes_validation() {
        let err: CartError = CommerceError::InvalidQuantity(0).into();
        assert_eq!(err, CartError::Validation("Invalid quantity: 0".into()));
    }
}
