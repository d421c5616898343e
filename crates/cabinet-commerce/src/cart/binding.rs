//! View binding for the cart store.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::cart::{CartSnapshot, CartStore, Subscription};

/// Keeps a view in sync with a [`CartStore`] while it is mounted.
///
/// Mounting subscribes to the store; every change re-renders the view with a
/// fresh [`CartSnapshot`]. Dropping the binding (unmounting the view)
/// unsubscribes.
///
/// # Example
///
/// ```rust,ignore
/// let badge = CartBinding::mount(&store, |cart| {
///     println!("{} items", cart.item_count);
/// });
/// let first_paint = badge.snapshot();
/// // ...
/// drop(badge); // unmount
/// ```
pub struct CartBinding {
    store: Rc<CartStore>,
    subscription: Option<Subscription>,
    renders: Rc<Cell<u64>>,
}

impl CartBinding {
    /// Mount a view. `render` runs after every cart change.
    pub fn mount(store: &Rc<CartStore>, render: impl Fn(&CartSnapshot) + 'static) -> Self {
        let weak = Rc::downgrade(store);
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();

        let subscription = store.subscribe_fn(move || {
            let Some(store) = weak.upgrade() else {
                return;
            };
            counter.set(counter.get() + 1);
            render(&store.snapshot());
        });

        Self {
            store: Rc::clone(store),
            subscription: Some(subscription),
            renders,
        }
    }

    /// Current cart state, for the first paint or on demand.
    pub fn snapshot(&self) -> CartSnapshot {
        self.store.snapshot()
    }

    /// The bound store, for dispatching mutations from the view.
    pub fn store(&self) -> &Rc<CartStore> {
        &self.store
    }

    /// Number of change-triggered renders so far.
    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    /// Check if the view still receives changes.
    pub fn is_mounted(&self) -> bool {
        self.subscription
            .as_ref()
            .map(Subscription::is_active)
            .unwrap_or(false)
    }

    /// Unmount the view. Same as dropping the binding.
    pub fn unmount(self) {}
}

impl Drop for CartBinding {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl fmt::Debug for CartBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartBinding")
            .field("mounted", &self.is_mounted())
            .field("renders", &self.render_count())
            .finish()
    }
}
