use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Product, ProductId};

/// Individual item in the shopping cart
///
/// Serialized with the same field names as the records already persisted in
/// browser storage, so existing entries keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "json_number")]
    pub unit_price: Decimal,
    #[serde(with = "json_number")]
    pub original_price: Decimal,
    #[serde(with = "json_number")]
    pub discount_percent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
}

/// Bookmarked product, a set member without quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "json_number")]
    pub price: Decimal,
    #[serde(with = "json_number")]
    pub discount_percent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Read model for cart badges and summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: Decimal,
}

impl CartItem {
    /// Create a cart line for a product with quantity 1.
    ///
    /// The discount is applied here once and frozen into `unit_price`.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.discounted_price(),
            original_price: to_stored_precision(product.price),
            discount_percent: to_stored_precision(product.discount_percent),
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Get the total price for this cart item (unit_price * quantity).
    ///
    /// Saturates at the decimal bounds, stored data is not trusted.
    pub fn total_price(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

impl FavoriteItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: to_stored_precision(product.price),
            discount_percent: to_stored_precision(product.discount_percent),
            image: product.image.clone(),
        }
    }
}

impl CartSummary {
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total_items = cart_count(&items);
        let total_price = cart_total(&items);
        Self {
            items,
            total_items,
            total_price,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Significant digits a stored JSON number keeps exactly.
pub const STORED_SIGNIFICANT_DIGITS: u32 = 15;

/// Round a decimal so that it survives the JSON number codec unchanged.
pub fn to_stored_precision(value: Decimal) -> Decimal {
    value.round_sf(STORED_SIGNIFICANT_DIGITS).unwrap_or(value)
}

/// Decimals stored as plain JSON numbers, the way browser code writes them.
///
/// Goes through the shortest decimal string so that a value like `6554.05`
/// is written as exactly that number token. Values carrying more than
/// `STORED_SIGNIFICANT_DIGITS` digits are rounded by the float step.
mod json_number {
    use rust_decimal::Decimal;
    use serde::{ser::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let number: f64 = value
            .normalize()
            .to_string()
            .parse()
            .map_err(S::Error::custom)?;
        serializer.serialize_f64(number)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer)
    }
}

/// Sum of `unit_price * quantity` over all cart lines, saturating
pub fn cart_total(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.total_price()))
}

/// Sum of quantities over all cart lines (not the number of distinct items)
pub fn cart_count(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
}
