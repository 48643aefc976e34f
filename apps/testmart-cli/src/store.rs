//! # Cart Store
//!
//! Keeps every open cart by identifier.
//!
//! ## Thread Safety
//! The map itself sits behind one mutex, held only long enough to look up or
//! insert an entry. Each cart has its own `Arc<Mutex<ShoppingCart>>`, so a
//! mutate-then-price sequence on one cart never interleaves with another
//! caller working on the same cart, and carts with different identifiers
//! don't block each other.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartStore                                                              │
//! │  Mutex<HashMap<String, Arc<Mutex<ShoppingCart>>>>                       │
//! │                                                                         │
//! │    "cart-a" ──► Mutex<ShoppingCart>   ◄── with_cart_mut("cart-a", ..)   │
//! │    "cart-b" ──► Mutex<ShoppingCart>   ◄── with_cart("cart-b", ..)       │
//! │                                                                         │
//! │  remove("cart-a") drops the entry; the next access starts a new cart.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use testmart_core::{FlatRateQuoter, ShippingQuoter, ShoppingCart};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;

type SharedCart = Arc<Mutex<ShoppingCart>>;

/// Registry of shopping carts keyed by identifier.
#[derive(Debug)]
pub struct CartStore {
    carts: Mutex<HashMap<String, SharedCart>>,
    quoter: Arc<dyn ShippingQuoter>,
}

impl CartStore {
    /// Creates an empty store; new carts price shipping with `quoter`.
    pub fn new(quoter: Arc<dyn ShippingQuoter>) -> Self {
        CartStore {
            carts: Mutex::new(HashMap::new()),
            quoter,
        }
    }

    /// Generates a fresh cart identifier.
    pub fn new_cart_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Returns the cart for `id`, creating an empty one if needed.
    pub fn get_or_create(&self, id: &str) -> SharedCart {
        let mut carts = lock(&self.carts);
        carts
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(cart_id = %id, "cart created");
                Arc::new(Mutex::new(ShoppingCart::new(Arc::clone(&self.quoter))))
            })
            .clone()
    }

    /// Returns the cart for `id` if it exists.
    pub fn get(&self, id: &str) -> Option<SharedCart> {
        lock(&self.carts).get(id).cloned()
    }

    /// Deletes a cart wholesale. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = lock(&self.carts).remove(id).is_some();
        debug!(cart_id = %id, removed, "cart removed");
        removed
    }

    /// Number of open carts.
    pub fn len(&self) -> usize {
        lock(&self.carts).len()
    }

    /// Executes a function with read access to an existing cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let purchase = store.with_cart(&id, |cart| cart.to_purchase())??;
    /// ```
    pub fn with_cart<F, R>(&self, id: &str, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&ShoppingCart) -> R,
    {
        let cart = self.get(id).ok_or_else(|| AppError::cart_not_found(id))?;
        let guard = lock(&cart);
        Ok(f(&guard))
    }

    /// Executes a function with write access to a cart, creating it if needed.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// store.with_cart_mut(&id, |cart| cart.update_count("SHIRT", 3).map(|_| ()))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, id: &str, f: F) -> R
    where
        F: FnOnce(&mut ShoppingCart) -> R,
    {
        let cart = self.get_or_create(id);
        let mut guard = lock(&cart);
        f(&mut guard)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Arc::new(FlatRateQuoter))
    }
}

/// A panic while holding a cart leaves it in a consistent state (every
/// mutation validates before writing), so a poisoned lock is recovered.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
