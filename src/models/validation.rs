use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{ValidationError, ValidationResult};

/// Validation constants
pub const MAX_PRODUCT_NAME_LENGTH: usize = 300;
pub const MIN_PRICE: Decimal = Decimal::ZERO;
pub const MAX_PRICE: Decimal = dec!(99999999.99);
pub const MIN_DISCOUNT_PERCENT: Decimal = Decimal::ZERO;
pub const MAX_DISCOUNT_PERCENT: Decimal = dec!(100);

/// Validate product id
pub fn validate_product_id(id: i64) -> ValidationResult<()> {
    if id < 0 {
        return Err(ValidationError::InvalidValue {
            field: "id".to_string(),
            value: id.to_string(),
            reason: "Product id cannot be negative".to_string(),
        });
    }
    Ok(())
}

/// Validate product name
///
/// An empty name is accepted; upstream shapes do not always carry one.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.len() > MAX_PRODUCT_NAME_LENGTH {
        return Err(ValidationError::OutOfRange {
            field: "name".to_string(),
            min: "0".to_string(),
            max: MAX_PRODUCT_NAME_LENGTH.to_string(),
            value: name.len().to_string(),
        });
    }

    if name
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: name.to_string(),
            reason: "Contains invalid control characters".to_string(),
        });
    }

    Ok(())
}

/// Validate base price
pub fn validate_price(price: &Decimal) -> ValidationResult<()> {
    if *price < MIN_PRICE || *price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: MIN_PRICE.to_string(),
            max: MAX_PRICE.to_string(),
            value: price.to_string(),
        });
    }
    Ok(())
}

/// Validate discount percent (0-100 inclusive)
pub fn validate_discount_percent(discount: &Decimal) -> ValidationResult<()> {
    if *discount < MIN_DISCOUNT_PERCENT || *discount > MAX_DISCOUNT_PERCENT {
        return Err(ValidationError::OutOfRange {
            field: "discountPercent".to_string(),
            min: MIN_DISCOUNT_PERCENT.to_string(),
            max: MAX_DISCOUNT_PERCENT.to_string(),
            value: discount.to_string(),
        });
    }
    Ok(())
}
