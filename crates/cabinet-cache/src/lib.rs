//! Type-safe key-value storage for the Cabinet storefront.
//!
//! Provides a small, ergonomic API for keeping client-local state in a
//! key-value store with automatic JSON serialization. The store itself is
//! pluggable: [`MemoryBackend`] keeps values for the lifetime of the process,
//! [`FileBackend`] keeps one file per key so values survive a restart.
//!
//! # Example
//!
//! ```rust,ignore
//! use cabinet_cache::{Cache, FileBackend};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Wishlist {
//!     product_ids: Vec<String>,
//! }
//!
//! let cache = Cache::new(FileBackend::open("/tmp/cabinet")?);
//!
//! // Store a value
//! cache.set("wishlist", &wishlist)?;
//!
//! // Retrieve a value
//! let wishlist: Option<Wishlist> = cache.get("wishlist")?;
//!
//! // Delete a value
//! cache.delete("wishlist")?;
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{Backend, FileBackend, MemoryBackend};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Backend, Cache, CacheError, FileBackend, MemoryBackend};
}
