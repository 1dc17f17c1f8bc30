use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::catalog::ProductView;
use super::pricing::resolve_price;

/// A (product, quantity) pair as stored in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

/// A cart exactly as persisted, stale lines included.
#[derive(Debug, Clone)]
pub struct CartView {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub lines: Vec<LineItem>,
}

/// One surviving cart line with its resolved price, recomputed on every
/// read and never persisted.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product: ProductView,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total_price: BigDecimal,
}

impl PricedCart {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total_price: BigDecimal::zero().with_scale(2),
        }
    }
}

/// Price a cart from its (quantity, product) pairs, given in line insertion
/// order. Pairs whose product fails price resolution are dropped from the
/// view; the stored line is left for the user to remove explicitly. An empty
/// or fully-dropped cart prices to zero, never an error.
pub fn price_cart(entries: Vec<(i32, ProductView)>) -> PricedCart {
    let mut lines = Vec::with_capacity(entries.len());
    let mut total = BigDecimal::zero();
    for (quantity, product) in entries {
        let unit_price = match resolve_price(&product) {
            Ok(p) => p,
            Err(_) => continue,
        };
        let line_total = BigDecimal::from(quantity) * &unit_price;
        total += &line_total;
        lines.push(PricedLine {
            product,
            quantity,
            unit_price,
            line_total,
        });
    }
    PricedCart {
        lines,
        total_price: total.with_scale(2),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product(title: &str, price: &str, discount_percent: Option<i32>) -> ProductView {
        ProductView {
            id: Uuid::new_v4(),
            title: title.to_string(),
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
    fn empty_cart_prices_to_zero() {
        let priced = price_cart(vec![]);
        assert!(priced.lines.is_empty());
        assert_eq!(priced.total_price, dec("0.00"));
    }

    #[test]
    fn totals_are_quantity_times_unit_price() {
        let priced = price_cart(vec![
            (2, product("Spring rolls", "30.00", None)),
            (1, product("Iced coffee", "20.00", Some(50))),
        ]);
        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].line_total, dec("60.00"));
        assert_eq!(priced.lines[1].unit_price, dec("10.00"));
        assert_eq!(priced.lines[1].line_total, dec("10.00"));
        assert_eq!(priced.total_price, dec("70.00"));
    }

    #[test]
    fn unpriceable_products_are_dropped_not_fatal() {
        let priced = price_cart(vec![
            (2, product("Good", "10.00", None)),
            (3, product("Bad discount", "10.00", Some(120))),
            (1, product("Negative", "-4.00", None)),
        ]);
        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].product.title, "Good");
        assert_eq!(priced.total_price, dec("20.00"));
    }

    #[test]
    fn line_order_is_preserved() {
        let priced = price_cart(vec![
            (1, product("First", "1.00", None)),
            (1, product("Second", "2.00", None)),
            (1, product("Third", "3.00", None)),
        ]);
        let titles: Vec<&str> = priced
            .lines
            .iter()
            .map(|l| l.product.title.as_str())
            .collect();
        assert_eq!(titles, ["First", "Second", "Third"]);
    }

    #[test]
    fn all_dropped_still_prices_to_zero() {
        let priced = price_cart(vec![(5, product("Bad", "10.00", Some(-1)))]);
        assert!(priced.lines.is_empty());
        assert_eq!(priced.total_price, dec("0.00"));
    }
}
