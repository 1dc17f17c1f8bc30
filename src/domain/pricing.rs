use bigdecimal::{BigDecimal, RoundingMode, Zero};

use super::catalog::ProductView;
use super::errors::DomainError;

/// Reject a discount percentage outside 0–100.
pub fn validate_discount(discount_percent: i32) -> Result<(), DomainError> {
    if !(0..=100).contains(&discount_percent) {
        return Err(DomainError::InvalidProductData(format!(
            "discount {discount_percent}% outside 0-100"
        )));
    }
    Ok(())
}

/// Reject prices and discounts a product must never carry: a negative base
/// price, or a discount percentage outside 0–100.
pub fn validate_pricing(
    price: &BigDecimal,
    discount_percent: Option<i32>,
) -> Result<(), DomainError> {
    if *price < BigDecimal::zero() {
        return Err(DomainError::InvalidProductData(format!(
            "negative price {price}"
        )));
    }
    if let Some(d) = discount_percent {
        validate_discount(d)?;
    }
    Ok(())
}

/// Resolve the effective unit price of a product: the base price reduced by
/// the active discount percentage, rounded half-up to two decimal places.
///
/// Invalid pricing data is rejected as `InvalidProductData`; aggregation
/// callers treat such a product as unavailable instead of failing the whole
/// view.
pub fn resolve_price(product: &ProductView) -> Result<BigDecimal, DomainError> {
    validate_pricing(&product.price, product.discount_percent)?;
    let unit = match product.discount_percent {
        None | Some(0) => product.price.clone(),
        Some(d) => &product.price * BigDecimal::from(100 - d) / BigDecimal::from(100),
    };
    Ok(unit.with_scale_round(2, RoundingMode::HalfUp))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn product(price: &str, discount_percent: Option<i32>) -> ProductView {
        ProductView {
            id: Uuid::new_v4(),
            title: "Beef noodle soup".to_string(),
            image_url: None,
            price: BigDecimal::from_str(price).expect("valid decimal"),
            discount_percent,
            category_id: Uuid::new_v4(),
            category_name: None,
            status: "active".to_string(),
            featured: false,
            description: None,
            created_at: Utc::now(),
        }
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn no_discount_returns_base_price() {
        assert_eq!(resolve_price(&product("45.00", None)).unwrap(), dec("45.00"));
        assert_eq!(resolve_price(&product("45.00", Some(0))).unwrap(), dec("45.00"));
    }

    #[test]
    fn discount_reduces_price() {
        assert_eq!(
            resolve_price(&product("200.00", Some(25))).unwrap(),
            dec("150.00")
        );
        assert_eq!(
            resolve_price(&product("9.99", Some(10))).unwrap(),
            dec("8.99")
        );
    }

    #[test]
    fn full_discount_yields_zero() {
        assert_eq!(
            resolve_price(&product("45.00", Some(100))).unwrap(),
            dec("0.00")
        );
    }

    #[test]
    fn negative_price_is_invalid() {
        assert!(matches!(
            resolve_price(&product("-1.00", None)),
            Err(DomainError::InvalidProductData(_))
        ));
    }

    #[test]
    fn out_of_range_discount_is_invalid() {
        for d in [-5, 101] {
            assert!(matches!(
                resolve_price(&product("45.00", Some(d))),
                Err(DomainError::InvalidProductData(_))
            ));
        }
    }
}
