use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument};

use crate::config::{Config, ConfigError};
use crate::models::{
    cart_count, cart_total, CartItem, CartSummary, FavoriteItem, Notice, Product, ProductId,
    StoreEvent, StoreEventKind,
};
use crate::repositories::{JsonCollection, KeyValueStorage};
use crate::services::{EventBus, Notifier, SubscriptionId, TracingNotifier};

pub const DEFAULT_CART_KEY: &str = "cart";
pub const DEFAULT_FAVORITES_KEY: &str = "favorites";

/// Result of [`CartStore::add_to_cart`]
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(CartItem),
    AlreadyPresent,
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }
}

/// Client-side cart and favorites state.
///
/// Every operation re-reads the persisted collection, applies its change,
/// writes the whole collection back and publishes a notification. Storage
/// failures never reach the caller: reads fall back to an empty collection
/// and failed writes are dropped.
pub struct CartStore {
    cart: JsonCollection<CartItem>,
    favorites: JsonCollection<FavoriteItem>,
    events: Arc<EventBus>,
    notifier: Arc<dyn Notifier>,
    write_lock: Mutex<()>,
}

impl CartStore {
    /// Create a store over the given storage with the default entry keys
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_keys(storage, DEFAULT_CART_KEY, DEFAULT_FAVORITES_KEY)
    }

    pub fn with_keys(
        storage: Arc<dyn KeyValueStorage>,
        cart_key: impl Into<String>,
        favorites_key: impl Into<String>,
    ) -> Self {
        Self {
            cart: JsonCollection::new(storage.clone(), cart_key),
            favorites: JsonCollection::new(storage, favorites_key),
            events: Arc::new(EventBus::new()),
            notifier: Arc::new(TracingNotifier),
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the notice sink
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Publish through a shared bus instead of a private one
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Build the configured storage backend and a store over it
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let storage = config.storage.open_backend()?;
        info!(
            backend = %config.storage.backend,
            cart_key = %config.storage.cart_key,
            favorites_key = %config.storage.favorites_key,
            "Cart store created"
        );
        Ok(Self::with_keys(
            storage,
            config.storage.cart_key.clone(),
            config.storage.favorites_key.clone(),
        ))
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Add a product with quantity 1; an existing line is never incremented
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(&self, product: &Product) -> AddOutcome {
        let item = {
            let guard = self.lock();
            let mut items = self.cart.load();

            if items.iter().any(|item| item.id == product.id) {
                info!("Product already in cart");
                drop(guard);
                self.notifier.notify(&Notice::AlreadyInCart {
                    id: product.id,
                    name: product.name.clone(),
                });
                return AddOutcome::AlreadyPresent;
            }

            let item = CartItem::from_product(product);
            items.push(item.clone());
            self.cart.save(&items);
            item
        };

        info!(unit_price = %item.unit_price, "Product added to cart");
        self.events.publish(&StoreEvent::CartItemAdded(item.clone()));
        AddOutcome::Added(item)
    }

    /// Bookmark a product; a duplicate is ignored silently
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_favorites(&self, product: &Product) -> bool {
        let item = {
            let _guard = self.lock();
            let mut items = self.favorites.load();

            if items.iter().any(|item| item.id == product.id) {
                debug!("Product already in favorites");
                return false;
            }

            let item = FavoriteItem::from_product(product);
            items.push(item.clone());
            self.favorites.save(&items);
            item
        };

        info!("Product added to favorites");
        self.events.publish(&StoreEvent::FavoriteAdded(item));
        true
    }

    pub fn get_cart_items(&self) -> Vec<CartItem> {
        self.cart.load()
    }

    pub fn get_favorite_items(&self) -> Vec<FavoriteItem> {
        self.favorites.load()
    }

    pub fn get_cart_item(&self, id: ProductId) -> Option<CartItem> {
        self.get_cart_items().into_iter().find(|item| item.id == id)
    }

    pub fn is_in_cart(&self, id: ProductId) -> bool {
        self.get_cart_items().iter().any(|item| item.id == id)
    }

    pub fn is_in_favorites(&self, id: ProductId) -> bool {
        self.get_favorite_items().iter().any(|item| item.id == id)
    }

    /// Drop a cart line. Persists and notifies even when nothing matched.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_from_cart(&self, id: ProductId) -> Vec<CartItem> {
        let items = {
            let _guard = self.lock();
            let mut items = self.cart.load();
            items.retain(|item| item.id != id);
            self.cart.save(&items);
            items
        };

        info!(remaining = items.len(), "Cart item removed");
        self.events.publish(&StoreEvent::CartUpdated);
        items
    }

    /// Drop a favorite. An unknown id leaves storage untouched and publishes nothing.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_from_favorites(&self, id: ProductId) -> Vec<FavoriteItem> {
        let items = {
            let _guard = self.lock();
            let mut items = self.favorites.load();
            let before = items.len();
            items.retain(|item| item.id != id);

            if items.len() == before {
                debug!("Product not in favorites");
                return items;
            }

            self.favorites.save(&items);
            items
        };

        info!(remaining = items.len(), "Favorite removed");
        self.events.publish(&StoreEvent::FavoritesUpdated);
        items
    }

    /// Set the quantity of a cart line. Zero is stored as-is; the line is not removed.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn update_cart_item_quantity(&self, id: ProductId, quantity: u32) -> Vec<CartItem> {
        let items = {
            let _guard = self.lock();
            let mut items = self.cart.load();
            match items.iter_mut().find(|item| item.id == id) {
                Some(item) => item.quantity = quantity,
                None => debug!("Product not in cart"),
            }
            self.cart.save(&items);
            items
        };

        info!("Cart item quantity updated");
        self.events.publish(&StoreEvent::CartUpdated);
        items
    }

    #[instrument(skip(self))]
    pub fn clear_cart(&self) {
        {
            let _guard = self.lock();
            self.cart.clear();
        }

        info!("Cart cleared");
        self.events.publish(&StoreEvent::CartUpdated);
    }

    /// Sum of `unit_price * quantity` over the cart
    pub fn calculate_cart_total(&self) -> Decimal {
        cart_total(&self.get_cart_items())
    }

    /// Sum of quantities over the cart
    pub fn get_cart_count(&self) -> u32 {
        cart_count(&self.get_cart_items())
    }

    pub fn get_cart_summary(&self) -> CartSummary {
        CartSummary::from_items(self.get_cart_items())
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn subscribe_to<F>(&self, kind: StoreEventKind, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.events.subscribe_to(kind, listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("favorites", &self.favorites)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
