//! The cart store.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cart::subscribers::Subscribers;
use crate::cart::{CartStorage, KvCartStorage, LineItem, Listener, ProductSnapshot, Subscription};
use crate::checkout::CheckoutAcknowledgment;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Point-in-time copy of the cart for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSnapshot {
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
    /// Sum of quantities.
    pub item_count: i64,
    /// Sum of line totals.
    pub subtotal: f64,
}

/// Observable, persisted shopping cart.
///
/// The store is the only owner of its line items. Every mutation updates
/// the in-memory items, writes them to storage, then calls every registered
/// listener before returning. Storage failures are logged and otherwise
/// ignored: the in-memory cart stays authoritative for the session.
///
/// The store is single-threaded and meant to be shared between views as an
/// `Rc<CartStore>`. Listeners may read or mutate the store while being
/// notified.
///
/// # Example
///
/// ```rust,ignore
/// let store = CartStore::open(KvCartStorage::new(Cache::open_dir(dir)?));
/// let badge = store.subscribe_fn(|| println!("cart changed"));
///
/// store.add_item(product.to_snapshot(), 2)?;
/// assert_eq!(store.item_count(), 2);
///
/// badge.unsubscribe();
/// ```
pub struct CartStore {
    items: RefCell<Vec<LineItem>>,
    storage: Box<dyn CartStorage>,
    subscribers: Rc<RefCell<Subscribers>>,
}

impl CartStore {
    /// Open a store, rehydrating items from `storage`.
    ///
    /// Never fails: missing, unreadable or malformed data starts an empty
    /// cart. Records that break the cart invariants (non-positive quantity,
    /// bad price, repeated id) are dropped.
    pub fn open(storage: impl CartStorage + 'static) -> Self {
        let items = match storage.load() {
            Ok(Some(items)) => normalize(items),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to load cart from storage, starting empty");
                Vec::new()
            }
        };
        debug!(items = items.len(), "cart rehydrated");

        Self {
            items: RefCell::new(items),
            storage: Box::new(storage),
            subscribers: Rc::new(RefCell::new(Subscribers::default())),
        }
    }

    /// Open a store whose contents only last for this process.
    pub fn in_memory() -> Self {
        Self::open(KvCartStorage::memory())
    }

    /// Add `quantity` of a product.
    ///
    /// If the product is already in the cart its quantity is increased and
    /// the existing name, price and image are kept. Otherwise a new line item
    /// is appended.
    ///
    /// Returns an error, without touching the cart, if:
    /// - `quantity` is not positive
    /// - the snapshot price is negative or not finite
    /// - the cart's total quantity would exceed `i64::MAX`
    pub fn add_item(&self, item: ProductSnapshot, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        {
            let mut items = self.items.borrow_mut();
            total_quantity(&items)
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
                existing.quantity += quantity;
            } else {
                item.validate()?;
                items.push(item.into_line_item(quantity));
            }
        }

        self.commit();
        Ok(())
    }

    /// Add a single unit of a product.
    pub fn add_one(&self, item: ProductSnapshot) -> Result<(), CommerceError> {
        self.add_item(item, 1)
    }

    /// Set the quantity of a line item.
    ///
    /// A quantity of zero or less removes the item. Unknown ids are ignored
    /// and nothing is persisted or notified.
    ///
    /// Returns whether the id was in the cart, or [`CommerceError::Overflow`]
    /// (cart untouched) if the cart's total quantity would exceed `i64::MAX`.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> Result<bool, CommerceError> {
        {
            let mut items = self.items.borrow_mut();
            let Some(index) = items.iter().position(|i| &i.id == id) else {
                return Ok(false);
            };
            if quantity <= 0 {
                items.remove(index);
            } else {
                (total_quantity(&items) - items[index].quantity)
                    .checked_add(quantity)
                    .ok_or(CommerceError::Overflow)?;
                items[index].quantity = quantity;
            }
        }

        self.commit();
        Ok(true)
    }

    /// Remove a line item.
    ///
    /// Persists and notifies even when the id is absent.
    /// Returns whether an item was removed.
    pub fn remove_item(&self, id: &ProductId) -> bool {
        let removed = {
            let mut items = self.items.borrow_mut();
            let len_before = items.len();
            items.retain(|i| &i.id != id);
            items.len() < len_before
        };

        self.commit();
        removed
    }

    /// Remove every line item.
    pub fn clear(&self) {
        self.items.borrow_mut().clear();
        self.commit();
    }

    /// Copy of the line items in insertion order.
    pub fn items(&self) -> Vec<LineItem> {
        self.items.borrow().clone()
    }

    /// Copy of one line item.
    pub fn item(&self, id: &ProductId) -> Option<LineItem> {
        self.items.borrow().iter().find(|i| &i.id == id).cloned()
    }

    /// Total item count (sum of quantities). Never exceeds `i64::MAX`.
    pub fn item_count(&self) -> i64 {
        total_quantity(&self.items.borrow())
    }

    /// Number of distinct line items.
    pub fn unique_item_count(&self) -> usize {
        self.items.borrow().len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Sum of `price * quantity` over all items. No rounding is applied.
    pub fn subtotal(&self) -> f64 {
        self.items
            .borrow()
            .iter()
            .fold(0.0, |total, item| total + item.total())
    }

    /// Items, count and subtotal read together.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items(),
            item_count: self.item_count(),
            subtotal: self.subtotal(),
        }
    }

    /// Register a change listener.
    ///
    /// Registering a listener that is already registered has no further
    /// effect; either returned handle removes it.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        self.subscribers.borrow_mut().insert(listener.clone());
        Subscription::new(&self.subscribers, listener)
    }

    /// Register a closure as a change listener.
    pub fn subscribe_fn(&self, f: impl Fn() + 'static) -> Subscription {
        self.subscribe(Rc::new(f))
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Acknowledge a checkout request.
    ///
    /// Checkout is not a transaction: the cart is left as it is and nothing
    /// is persisted or notified.
    pub fn checkout(&self) -> Result<CheckoutAcknowledgment, CommerceError> {
        if self.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        Ok(CheckoutAcknowledgment {
            item_count: self.item_count(),
            unique_item_count: self.unique_item_count(),
            subtotal: self.subtotal(),
        })
    }

    /// Persist, then notify. No borrow is held while listeners run.
    fn commit(&self) {
        self.persist();
        self.notify();
    }

    fn persist(&self) {
        let items = self.items.borrow();
        match self.storage.save(&items) {
            Ok(()) => debug!(items = items.len(), "cart persisted"),
            Err(e) => warn!(error = %e, "failed to save cart to storage"),
        }
    }

    fn notify(&self) {
        let listeners = self.subscribers.borrow().snapshot();
        for listener in listeners {
            listener();
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items.borrow())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

/// Sum of quantities. Every path into the cart keeps this within `i64`.
fn total_quantity(items: &[LineItem]) -> i64 {
    items.iter().map(|i| i.quantity).sum()
}

/// Drop records that would break the cart invariants.
fn normalize(items: Vec<LineItem>) -> Vec<LineItem> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    let mut total: i64 = 0;

    for item in items {
        if !item.is_valid() {
            warn!(
                id = %item.id,
                quantity = item.quantity,
                price = item.price,
                "dropping invalid stored line item"
            );
            continue;
        }
        if seen.contains(&item.id) {
            warn!(id = %item.id, "dropping duplicate stored line item");
            continue;
        }
        let Some(new_total) = total.checked_add(item.quantity) else {
            warn!(id = %item.id, quantity = item.quantity, "dropping stored line item past the cart limit");
            continue;
        };
        total = new_total;
        seen.insert(item.id.clone());
        kept.push(item);
    }

    kept
}
