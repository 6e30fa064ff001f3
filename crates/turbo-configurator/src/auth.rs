//! Bearer token holder shared by the authenticated clients.

use std::sync::{Arc, RwLock};

/// Shared, injectable bearer-token store.
///
/// Clones share the same slot, so logging in once is seen by the cart
/// gateway and the favorites client alike.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    /// Replace the current token. Blank tokens clear the store.
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = if token.trim().is_empty() { None } else { Some(token) };
    }

    /// Forget the current token.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Current token, if any.
    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_token() {
        let store = TokenStore::new();
        let other = store.clone();
        store.set("abc");
        assert_eq!(other.get().as_deref(), Some("abc"));

        other.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_blank_token_clears() {
        let store = TokenStore::with_token("abc");
        store.set("  ");
        assert!(store.get().is_none());
    }
}
