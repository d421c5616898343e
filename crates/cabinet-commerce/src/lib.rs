//! Catalog and persistent shopping cart for the Cabinet storefront.
//!
//! - **Catalog**: products, categories, and read-only queries by id,
//!   category, free text, and featured flag
//! - **Cart**: an observable cart store with quantity-merge semantics,
//!   persisted whole to a key-value slot on every change
//! - **Checkout**: a no-op acknowledgment of the cart contents
//!
//! # Example
//!
//! ```rust,ignore
//! use cabinet_commerce::prelude::*;
//! use std::rc::Rc;
//!
//! let catalog = Catalog::builtin()?;
//! let store = Rc::new(CartStore::open(KvCartStorage::new(Cache::open_dir(dir)?)));
//!
//! // Re-render a badge whenever the cart changes
//! let badge = CartBinding::mount(&store, |cart| println!("{} items", cart.item_count));
//!
//! let vase = catalog.require(&ProductId::new("moon-vase"))?;
//! store.add_item(vase.to_snapshot(), 2)?;
//! println!("Subtotal: {:.2}", store.subtotal());
//! ```

pub mod error;
pub mod ids;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;

    // Catalog
    pub use crate::catalog::{Catalog, Category, Product, ALL_CATEGORIES};

    // Cart
    pub use crate::cart::{
        CartBinding, CartSnapshot, CartStorage, CartStore, KvCartStorage, LineItem, Listener,
        ProductSnapshot, Subscription, CART_STORAGE_KEY,
    };

    // Checkout
    pub use crate::checkout::CheckoutAcknowledgment;

    pub use cabinet_cache::Cache;
}
