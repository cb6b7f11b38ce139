pub mod config;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

pub use config::{Config, ConfigError, StorageBackend};
pub use models::{CartItem, FavoriteItem, Product, ProductId, ProductInput, StoreEvent, StoreEventKind};
pub use observability::{init_observability, ObservabilityError};
pub use repositories::{FileStorage, KeyValueStorage, MemoryStorage, UnavailableStorage};
pub use services::{AddOutcome, CartStore, EventBus, Notifier, SubscriptionId};
