//! Line item types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// The product fields a cart keeps, captured when the product is added.
///
/// Later catalog changes do not reach line items built from an older
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// Product identifier; keys the line item.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price at add time.
    pub price: f64,
    /// Image URL.
    pub image: String,
    /// Maker of the piece.
    pub artist: String,
}

impl ProductSnapshot {
    /// Create a snapshot.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: f64,
        image: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
            artist: artist.into(),
        }
    }

    /// Reject prices that are negative or not finite.
    pub(crate) fn validate(&self) -> Result<(), CommerceError> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CommerceError::InvalidPrice(self.price));
        }
        Ok(())
    }

    pub(crate) fn into_line_item(self, quantity: i64) -> LineItem {
        LineItem {
            id: self.id,
            name: self.name,
            price: self.price,
            image: self.image,
            artist: self.artist,
            quantity,
        }
    }
}

/// A line item in the cart.
///
/// This is also the persisted record layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product identifier, unique within the cart.
    pub id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Image URL.
    pub image: String,
    /// Maker of the piece.
    pub artist: String,
    /// Quantity, always at least 1 while in a cart.
    pub quantity: i64,
}

impl LineItem {
    /// Line total (unit price * quantity), unrounded.
    pub fn total(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Check the record against the cart invariants.
    pub(crate) fn is_valid(&self) -> bool {
        self.quantity >= 1 && self.price.is_finite() && self.price >= 0.0
    }
}
