//! Shopping cart module.
//!
//! Contains line items, the observable [`CartStore`], its persistence and
//! the view binding.

mod binding;
mod item;
mod storage;
mod store;
mod subscribers;

pub use binding::CartBinding;
pub use item::{LineItem, ProductSnapshot};
pub use storage::{
    decode_cart, encode_cart, CartStorage, KvCartStorage, CART_FORMAT_VERSION, CART_STORAGE_KEY,
};
pub use store::{CartSnapshot, CartStore};
pub use subscribers::{Listener, Subscription};
