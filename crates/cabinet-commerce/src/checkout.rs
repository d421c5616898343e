//! Checkout acknowledgment.
//!
//! The storefront does not process orders. Checking out only confirms what
//! the customer would be buying.

use serde::Serialize;

/// Summary returned by [`CartStore::checkout`](crate::cart::CartStore::checkout).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutAcknowledgment {
    /// Sum of quantities.
    pub item_count: i64,
    /// Number of distinct line items.
    pub unique_item_count: usize,
    /// Cart subtotal at the time of checkout.
    pub subtotal: f64,
}
