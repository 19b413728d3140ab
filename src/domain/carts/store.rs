//! Local cart cache.
//!
//! Holds the client's view of the cart and publishes it through a
//! [`watch`] channel. Items and their derived summary travel together in a
//! single [`CartSnapshot`], so an observer can never read a summary computed
//! from a different item list than the one it sees.
//!
//! Mutators are `pub(crate)`: only the carts service writes here. Everything
//! else reads, either directly or through [`CartStore::subscribe`].

use std::sync::Mutex;

use tokio::sync::watch;

use crate::domain::carts::records::{CartItem, CartSnapshot, CartSummary};

/// Observable store for the local cart state.
#[derive(Debug)]
pub struct CartStore {
    // Source of truth; guards read-modify-write sequences.
    items: Mutex<Vec<CartItem>>,
    snapshot: watch::Sender<CartSnapshot>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(CartSnapshot::default());

        Self {
            items: Mutex::new(Vec::new()),
            snapshot,
        }
    }

    /// Latest published snapshot: items plus their derived summary.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Current cart items.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.snapshot.borrow().items.clone()
    }

    /// Current derived summary.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.snapshot.borrow().summary
    }

    /// Subscribe to snapshot publications. Each received value carries the
    /// full item list and the matching summary.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshot.subscribe()
    }

    /// Replace the whole cart with server state.
    pub(crate) fn replace(&self, items: Vec<CartItem>) {
        let mut guard = self.lock();
        *guard = items;
        self.publish(&guard);
    }

    /// Insert an item, or bump the quantity of an existing line for the same
    /// photo. The existing line keeps its id and pricing.
    pub(crate) fn upsert(&self, item: CartItem) {
        let mut guard = self.lock();
        match guard
            .iter_mut()
            .find(|existing| existing.photo_id == item.photo_id)
        {
            Some(existing) => existing.quantity += item.quantity,
            None => guard.push(item),
        }
        self.publish(&guard);
    }

    /// Set the quantity of a line. Returns `false` when the line is unknown.
    pub(crate) fn set_quantity(&self, item_id: &str, quantity: u32) -> bool {
        let mut guard = self.lock();
        let Some(item) = guard.iter_mut().find(|item| item.id == item_id) else {
            return false;
        };
        item.quantity = quantity;
        self.publish(&guard);

        true
    }

    /// Remove a line. Returns `false` when the line is unknown.
    pub(crate) fn remove(&self, item_id: &str) -> bool {
        let mut guard = self.lock();
        let before = guard.len();
        guard.retain(|item| item.id != item_id);
        if guard.len() == before {
            return false;
        }
        self.publish(&guard);

        true
    }

    /// Drop every line.
    pub(crate) fn clear(&self) {
        let mut guard = self.lock();
        guard.clear();
        self.publish(&guard);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CartItem>> {
        // A poisoned lock means a mutator panicked mid-update; the item list
        // itself is still a valid Vec, so carry on with it.
        match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn publish(&self, items: &[CartItem]) {
        let summary = CartSummary::from_items(items);
        self.snapshot.send_replace(CartSnapshot {
            items: items.to_vec(),
            summary,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::helpers::cart_item;

    #[test]
    fn replace_publishes_items_with_a_matching_summary() {
        let store = CartStore::new();

        store.replace(vec![
            cart_item("photo-1", "event-1", 25_00, 2),
            cart_item("photo-2", "event-1", 5_99, 1),
        ]);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.summary.item_count, 3);
        assert_eq!(snapshot.summary.total, 55_99);
        assert_eq!(
            snapshot.summary,
            CartSummary::from_items(&snapshot.items),
            "published summary must be derived from the published items"
        );
    }

    #[test]
    fn upsert_deduplicates_on_photo_id() {
        let store = CartStore::new();

        store.upsert(cart_item("photo-1", "event-1", 10_00, 1));
        store.upsert(cart_item("photo-1", "event-1", 10_00, 1));

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(store.summary().item_count, 2);
    }

    #[test]
    fn set_quantity_reports_unknown_lines() {
        let store = CartStore::new();
        store.replace(vec![cart_item("photo-1", "event-1", 10_00, 1)]);
        let id = store.items()[0].id.clone();

        assert!(store.set_quantity(&id, 4));
        assert_eq!(store.summary().item_count, 4);
        assert!(!store.set_quantity("nope", 1));
    }

    #[test]
    fn remove_and_clear_empty_the_cart() {
        let store = CartStore::new();
        store.replace(vec![
            cart_item("photo-1", "event-1", 10_00, 1),
            cart_item("photo-2", "event-1", 10_00, 1),
        ]);
        let id = store.items()[0].id.clone();

        assert!(store.remove(&id));
        assert_eq!(store.items().len(), 1);
        assert!(!store.remove(&id));

        store.clear();
        assert!(store.items().is_empty());
        assert_eq!(store.summary(), CartSummary::default());
    }

    #[tokio::test]
    async fn subscribers_see_every_publication_as_one_value() {
        let store = CartStore::new();
        let mut receiver = store.subscribe();

        store.replace(vec![cart_item("photo-1", "event-1", 25_00, 2)]);

        receiver.changed().await.unwrap();
        let snapshot = receiver.borrow_and_update().clone();
        assert_eq!(snapshot.summary.total, 50_00);
        assert_eq!(snapshot.items.len(), 1);
    }
}
