//! Product catalog module.
//!
//! Contains products, categories and the read-only catalog they are
//! queried from.

mod category;
mod product;
mod provider;

pub use category::{Category, ALL_CATEGORIES};
pub use product::{Product, TOP_RATED_THRESHOLD};
pub use provider::{Catalog, CatalogSeed};
