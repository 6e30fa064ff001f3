//! Type-safe Key-Value caching layer for TurboCommerce.
//!
//! Provides a session-scoped, in-memory store with automatic JSON
//! serialization. Values live as long as the `Cache` does; share it with
//! an `Arc` to give several consumers the same table.
//!
//! # Example
//!
//! ```rust
//! use turbo_cache::{cache_key, Cache};
//!
//! let cache = Cache::new("variants");
//! let key = cache_key!("variant", "12", "1:3|2:7");
//!
//! cache.set(&key, &99u64).unwrap();
//! assert_eq!(cache.get::<u64>(&key).unwrap(), Some(99));
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, Cache, CacheError};
}
