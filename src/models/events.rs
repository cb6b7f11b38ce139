use serde::{Deserialize, Serialize};

use crate::models::{CartItem, FavoriteItem, ProductId};

/// Kinds of notifications broadcast by the cart store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum StoreEventKind {
    CartItemAdded,
    CartUpdated,
    FavoriteAdded,
    FavoritesUpdated,
}

impl StoreEventKind {
    pub const ALL: [StoreEventKind; 4] = [
        StoreEventKind::CartItemAdded,
        StoreEventKind::CartUpdated,
        StoreEventKind::FavoriteAdded,
        StoreEventKind::FavoritesUpdated,
    ];
}

impl std::fmt::Display for StoreEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreEventKind::CartItemAdded => write!(f, "CartItemAdded"),
            StoreEventKind::CartUpdated => write!(f, "CartUpdated"),
            StoreEventKind::FavoriteAdded => write!(f, "FavoriteAdded"),
            StoreEventKind::FavoritesUpdated => write!(f, "FavoritesUpdated"),
        }
    }
}

/// Store notification with a typed payload per kind.
///
/// The two "added" kinds carry the inserted record; the two "updated"
/// kinds carry nothing and only signal that the collection changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum StoreEvent {
    CartItemAdded(CartItem),
    CartUpdated,
    FavoriteAdded(FavoriteItem),
    FavoritesUpdated,
}

impl StoreEvent {
    pub fn kind(&self) -> StoreEventKind {
        match self {
            StoreEvent::CartItemAdded(_) => StoreEventKind::CartItemAdded,
            StoreEvent::CartUpdated => StoreEventKind::CartUpdated,
            StoreEvent::FavoriteAdded(_) => StoreEventKind::FavoriteAdded,
            StoreEvent::FavoritesUpdated => StoreEventKind::FavoritesUpdated,
        }
    }

    /// Product the event is about, for the kinds that carry one
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            StoreEvent::CartItemAdded(item) => Some(item.id),
            StoreEvent::FavoriteAdded(item) => Some(item.id),
            StoreEvent::CartUpdated | StoreEvent::FavoritesUpdated => None,
        }
    }
}

/// Transient user-facing notice, shown as a toast by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    AlreadyInCart { id: ProductId, name: String },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::AlreadyInCart { name, .. } if name.is_empty() => {
                "This product is already in your cart".to_string()
            }
            Notice::AlreadyInCart { name, .. } => format!("{} is already in your cart", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use rust_decimal_macros::dec;

    fn create_test_item() -> CartItem {
        CartItem::from_product(&Product::new(3, "Tank bag", dec!(60)))
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(
            StoreEvent::CartItemAdded(create_test_item()).kind(),
            StoreEventKind::CartItemAdded
        );
        assert_eq!(StoreEvent::CartUpdated.kind(), StoreEventKind::CartUpdated);
        assert_eq!(
            StoreEvent::FavoritesUpdated.kind(),
            StoreEventKind::FavoritesUpdated
        );
    }

    #[test]
    fn test_event_product_id() {
        assert_eq!(
            StoreEvent::CartItemAdded(create_test_item()).product_id(),
            Some(ProductId::new(3))
        );
        assert_eq!(StoreEvent::CartUpdated.product_id(), None);
    }

    #[test]
    fn test_event_kind_display() {
        let names: Vec<String> = StoreEventKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            vec!["CartItemAdded", "CartUpdated", "FavoriteAdded", "FavoritesUpdated"]
        );
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(StoreEvent::CartItemAdded(create_test_item())).unwrap();
        assert_eq!(json["type"], "CartItemAdded");
        assert_eq!(json["detail"]["id"], 3);

        let json = serde_json::to_value(StoreEvent::CartUpdated).unwrap();
        assert_eq!(json["type"], "CartUpdated");
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_notice_message() {
        let notice = Notice::AlreadyInCart {
            id: ProductId::new(3),
            name: "Tank bag".to_string(),
        };
        assert_eq!(notice.message(), "Tank bag is already in your cart");

        let notice = Notice::AlreadyInCart {
            id: ProductId::new(3),
            name: String::new(),
        };
        assert_eq!(notice.message(), "This product is already in your cart");
    }
}
