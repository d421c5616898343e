//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in catalog and cart operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Invalid unit price.
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in quantity calculation")]
    Overflow,

    /// Checkout requested on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Persisted cart written by an unknown format version.
    #[error("Unsupported cart format version: {0}")]
    UnsupportedVersion(u32),

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<cabinet_cache::CacheError> for CommerceError {
    fn from(e: cabinet_cache::CacheError) -> Self {
        match e {
            cabinet_cache::CacheError::SerializeError(e) => e.into(),
            other => CommerceError::CacheError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
