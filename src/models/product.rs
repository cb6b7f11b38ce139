use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::{
    to_stored_precision, validate_discount_percent, validate_price, validate_product_id,
    validate_product_name, ValidationError, ValidationResult,
};

/// Catalog product identifier, unique key within the cart and favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Canonical product description accepted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub discount_percent: Decimal,
    pub image: Option<String>,
}

impl Product {
    /// Create a product without discount or image
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            discount_percent: Decimal::ZERO,
            image: None,
        }
    }

    pub fn with_discount(mut self, discount_percent: Decimal) -> Self {
        self.discount_percent = discount_percent;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Effective price after the discount: `price * (1 - discount / 100)`.
    ///
    /// Rounded to the precision a stored cart line keeps.
    pub fn discounted_price(&self) -> Decimal {
        let price = if self.discount_percent > Decimal::ZERO {
            self.price.saturating_mul(Decimal::ONE - self.discount_percent / dec!(100))
        } else {
            self.price
        };
        to_stored_precision(price)
    }

    /// Parse and normalize a loosely shaped upstream product record.
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        ProductInput::from_json(value)?.normalize()
    }
}

const ID_KEYS: &[&str] = &["id", "productId", "product_id"];
const NAME_KEYS: &[&str] = &["name", "title", "productName", "product_name"];
const PRICE_KEYS: &[&str] = &["price", "basePrice", "base_price", "originalPrice"];
const DISCOUNT_KEYS: &[&str] = &["discountPercent", "discount_percent", "discount"];
const IMAGE_KEYS: &[&str] = &["image", "imageUrl", "image_url", "img", "thumbnail"];

/// Product record as received from heterogeneous upstream data shapes.
///
/// Field names are resolved through alias tables; the first alias present
/// with a non-null value wins. Numbers may arrive as JSON numbers or as
/// numeric strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductInput {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
    pub image: Option<String>,
}

impl ProductInput {
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "product".to_string(),
                value: value.to_string(),
                reason: "Expected a JSON object".to_string(),
            })?;

        Ok(Self {
            id: lookup(object, ID_KEYS)
                .map(|(key, v)| parse_id(key, v))
                .transpose()?,
            name: lookup(object, NAME_KEYS)
                .map(|(key, v)| parse_text(key, v))
                .transpose()?,
            price: lookup(object, PRICE_KEYS)
                .map(|(key, v)| parse_decimal(key, v))
                .transpose()?,
            discount_percent: lookup(object, DISCOUNT_KEYS)
                .map(|(key, v)| parse_decimal(key, v))
                .transpose()?,
            image: lookup(object, IMAGE_KEYS)
                .map(|(key, v)| parse_text(key, v))
                .transpose()?
                .filter(|image| !image.trim().is_empty()),
        })
    }

    /// Map into the canonical [`Product`], validating every field.
    pub fn normalize(self) -> ValidationResult<Product> {
        let id = self.id.ok_or_else(|| ValidationError::RequiredField {
            field: "id".to_string(),
        })?;
        validate_product_id(id)?;

        let name = self.name.unwrap_or_default();
        validate_product_name(&name)?;

        let price = self.price.unwrap_or(Decimal::ZERO);
        validate_price(&price)?;

        let discount_percent = self.discount_percent.unwrap_or(Decimal::ZERO);
        validate_discount_percent(&discount_percent)?;

        Ok(Product {
            id: ProductId::new(id),
            name,
            price,
            discount_percent,
            image: self.image,
        })
    }
}

impl TryFrom<Value> for ProductInput {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|key| object.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
}

fn parse_id(field: &str, value: &Value) -> ValidationResult<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: "Expected an integer id".to_string(),
    })
}

fn parse_text(field: &str, value: &Value) -> ValidationResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Expected a string".to_string(),
        }),
    }
}

fn parse_decimal(field: &str, value: &Value) -> ValidationResult<Decimal> {
    let parsed = match value {
        Value::Number(_) => serde_json::from_value::<Decimal>(value.clone()).ok(),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: "Expected a numeric value".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discounted_price() {
        let product = Product::new(1, "Helmet", dec!(100)).with_discount(dec!(10));
        assert_eq!(product.discounted_price(), dec!(90));

        let product = Product::new(2, "Gloves", dec!(50));
        assert_eq!(product.discounted_price(), dec!(50));

        let product = Product::new(3, "Jacket", dec!(80)).with_discount(dec!(100));
        assert_eq!(product.discounted_price(), dec!(0));
    }

    #[test]
    fn test_from_json_canonical_shape() {
        let product = Product::from_json(&json!({
            "id": 7,
            "name": "Honda CB500F",
            "price": 6899.99,
            "discountPercent": 5,
            "image": "/storage/products/cb500f.jpg"
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.name, "Honda CB500F");
        assert_eq!(product.price, dec!(6899.99));
        assert_eq!(product.discount_percent, dec!(5));
        assert_eq!(product.image.as_deref(), Some("/storage/products/cb500f.jpg"));
    }

    #[test]
    fn test_from_json_aliases() {
        let product = Product::from_json(&json!({
            "product_id": "12",
            "title": "Oil filter",
            "base_price": "24.50",
            "discount": "10",
            "imageUrl": "filter.png"
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(12));
        assert_eq!(product.name, "Oil filter");
        assert_eq!(product.price, dec!(24.50));
        assert_eq!(product.discount_percent, dec!(10));
        assert_eq!(product.image.as_deref(), Some("filter.png"));
    }

    #[test]
    fn test_from_json_first_alias_wins() {
        let product = Product::from_json(&json!({
            "id": 1,
            "name": null,
            "title": "Chain kit",
            "productName": "ignored",
            "price": 10
        }))
        .unwrap();

        assert_eq!(product.name, "Chain kit");
    }

    #[test]
    fn test_from_json_defaults() {
        let product = Product::from_json(&json!({ "id": 3 })).unwrap();

        assert_eq!(product.name, "");
        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.discount_percent, Decimal::ZERO);
        assert!(product.image.is_none());
    }

    #[test]
    fn test_from_json_blank_image_is_none() {
        let product = Product::from_json(&json!({ "id": 3, "image": "  " })).unwrap();
        assert!(product.image.is_none());
    }

    #[test]
    fn test_from_json_missing_id() {
        match Product::from_json(&json!({ "name": "No id" })) {
            Err(ValidationError::RequiredField { field }) => assert_eq!(field, "id"),
            other => panic!("Expected RequiredField error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(Product::from_json(&json!({ "id": "abc" })).is_err());
        assert!(Product::from_json(&json!({ "id": 1, "price": "free" })).is_err());
        assert!(Product::from_json(&json!({ "id": 1, "price": -3 })).is_err());
        assert!(Product::from_json(&json!({ "id": 1, "discount": 150 })).is_err());
        assert!(Product::from_json(&json!({ "id": 1, "name": ["a"] })).is_err());
        assert!(Product::from_json(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_try_from_value() {
        let input = ProductInput::try_from(json!({ "id": 5, "price": 12 })).unwrap();
        assert_eq!(input.id, Some(5));
        assert_eq!(input.price, Some(dec!(12)));
    }

    #[test]
    fn test_product_id_conversions() {
        let id = ProductId::from(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }
}
