use uuid::Uuid;

use crate::domain::cart::{price_cart, PricedCart};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;

/// Cart mutations and the priced read-time projection. Quantities are
/// validated here; defaulting an absent quantity to 1 is the transport
/// layer's job, never this one's.
pub struct CartService<R> {
    repo: R,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Merge-add `quantity` of a product into the owner's cart, creating the
    /// cart on first use. Quantities of an existing line are summed, never
    /// overwritten.
    pub fn add_item(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidQuantity);
        }
        if self.repo.find_available_product(product_id)?.is_none() {
            return Err(DomainError::ProductUnavailable);
        }
        let cart_id = self.repo.ensure_cart(owner_id)?;
        self.repo.merge_line(cart_id, product_id, quantity)
    }

    /// Overwrite the quantity of an existing line.
    pub fn update_item(
        &self,
        owner_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidQuantity);
        }
        let cart = self
            .repo
            .find_by_owner(owner_id)?
            .ok_or(DomainError::CartNotFound)?;
        self.repo.set_line_quantity(cart.id, product_id, quantity)
    }

    /// Remove a line if present. Removing an absent line, or removing from
    /// an owner who never had a cart, succeeds without effect.
    pub fn remove_item(&self, owner_id: Uuid, product_id: Uuid) -> Result<(), DomainError> {
        match self.repo.find_by_owner(owner_id)? {
            Some(cart) => self.repo.remove_line(cart.id, product_id),
            None => Ok(()),
        }
    }

    /// Priced view of the owner's cart. Lines whose product is gone,
    /// inactive, soft-deleted, or unpriceable are dropped from the view but
    /// stay in storage. An owner without a cart gets an empty view.
    pub fn priced_view(&self, owner_id: Uuid) -> Result<PricedCart, DomainError> {
        let Some(cart) = self.repo.find_by_owner(owner_id)? else {
            return Ok(PricedCart::empty());
        };
        let entries = self.repo.priced_entries(cart.id)?;
        Ok(price_cart(entries))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Mutex;

    use bigdecimal::BigDecimal;
    use chrono::Utc;

    use super::*;
    use crate::domain::cart::{CartView, LineItem};
    use crate::domain::catalog::ProductView;

    /// In-memory cart store mirroring the merge/overwrite/remove semantics
    /// of the SQL implementation.
    struct FakeCartRepo {
        products: Vec<ProductView>,
        carts: Mutex<Vec<CartView>>,
    }

    impl FakeCartRepo {
        fn new(products: Vec<ProductView>) -> Self {
            Self {
                products,
                carts: Mutex::new(Vec::new()),
            }
        }

        fn lines_of(&self, owner_id: Uuid) -> Vec<LineItem> {
            self.carts
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.owner_id == owner_id)
                .map(|c| c.lines.clone())
                .unwrap_or_default()
        }
    }

    impl CartRepository for FakeCartRepo {
        fn find_available_product(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
            Ok(self
                .products
                .iter()
                .find(|p| p.id == id && p.status == "active")
                .cloned())
        }

        fn ensure_cart(&self, owner_id: Uuid) -> Result<Uuid, DomainError> {
            let mut carts = self.carts.lock().unwrap();
            if let Some(cart) = carts.iter().find(|c| c.owner_id == owner_id) {
                return Ok(cart.id);
            }
            let cart = CartView {
                id: Uuid::new_v4(),
                owner_id,
                lines: Vec::new(),
            };
            let id = cart.id;
            carts.push(cart);
            Ok(id)
        }

        fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<CartView>, DomainError> {
            Ok(self
                .carts
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.owner_id == owner_id)
                .cloned())
        }

        fn merge_line(
            &self,
            cart_id: Uuid,
            product_id: Uuid,
            quantity: i32,
        ) -> Result<(), DomainError> {
            let mut carts = self.carts.lock().unwrap();
            let cart = carts
                .iter_mut()
                .find(|c| c.id == cart_id)
                .ok_or(DomainError::CartNotFound)?;
            match cart.lines.iter_mut().find(|l| l.product_id == product_id) {
                Some(line) => line.quantity += quantity,
                None => cart.lines.push(LineItem {
                    product_id,
                    quantity,
                    added_at: Utc::now(),
                }),
            }
            Ok(())
        }

        fn set_line_quantity(
            &self,
            cart_id: Uuid,
            product_id: Uuid,
            quantity: i32,
        ) -> Result<(), DomainError> {
            let mut carts = self.carts.lock().unwrap();
            let cart = carts
                .iter_mut()
                .find(|c| c.id == cart_id)
                .ok_or(DomainError::CartNotFound)?;
            let line = cart
                .lines
                .iter_mut()
                .find(|l| l.product_id == product_id)
                .ok_or(DomainError::LineNotFound)?;
            line.quantity = quantity;
            Ok(())
        }

        fn remove_line(&self, cart_id: Uuid, product_id: Uuid) -> Result<(), DomainError> {
            let mut carts = self.carts.lock().unwrap();
            if let Some(cart) = carts.iter_mut().find(|c| c.id == cart_id) {
                cart.lines.retain(|l| l.product_id != product_id);
            }
            Ok(())
        }

        fn priced_entries(&self, cart_id: Uuid) -> Result<Vec<(i32, ProductView)>, DomainError> {
            let carts = self.carts.lock().unwrap();
            let Some(cart) = carts.iter().find(|c| c.id == cart_id) else {
                return Ok(Vec::new());
            };
            Ok(cart
                .lines
                .iter()
                .filter_map(|l| {
                    self.products
                        .iter()
                        .find(|p| p.id == l.product_id && p.status == "active")
                        .map(|p| (l.quantity, p.clone()))
                })
                .collect())
        }
    }

    fn product(price: &str, status: &str) -> ProductView {
        ProductView {
            id: Uuid::new_v4(),
            title: "Grilled pork with rice".to_string(),
            image_url: None,
            price: BigDecimal::from_str(price).expect("valid decimal"),
            discount_percent: None,
            category_id: Uuid::new_v4(),
            category_name: None,
            status: status.to_string(),
            featured: false,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn adding_twice_merges_into_one_line() {
        let p = product("35.00", "active");
        let product_id = p.id;
        let repo = FakeCartRepo::new(vec![p]);
        let owner = Uuid::new_v4();
        let svc = CartService::new(repo);

        svc.add_item(owner, product_id, 2).expect("first add");
        svc.add_item(owner, product_id, 3).expect("second add");

        let lines = svc.repo.lines_of(owner);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
    }

    #[test]
    fn zero_or_negative_quantity_is_rejected() {
        let p = product("35.00", "active");
        let product_id = p.id;
        let svc = CartService::new(FakeCartRepo::new(vec![p]));
        let owner = Uuid::new_v4();

        assert_eq!(
            svc.add_item(owner, product_id, 0),
            Err(DomainError::InvalidQuantity)
        );
        assert_eq!(
            svc.add_item(owner, product_id, -2),
            Err(DomainError::InvalidQuantity)
        );
        assert!(svc.repo.lines_of(owner).is_empty());
    }

    #[test]
    fn inactive_product_cannot_be_added() {
        let p = product("35.00", "inactive");
        let product_id = p.id;
        let svc = CartService::new(FakeCartRepo::new(vec![p]));

        assert_eq!(
            svc.add_item(Uuid::new_v4(), product_id, 1),
            Err(DomainError::ProductUnavailable)
        );
    }

    #[test]
    fn update_overwrites_instead_of_adding() {
        let p = product("35.00", "active");
        let product_id = p.id;
        let svc = CartService::new(FakeCartRepo::new(vec![p]));
        let owner = Uuid::new_v4();

        svc.add_item(owner, product_id, 3).expect("add");
        svc.update_item(owner, product_id, 1).expect("update");

        assert_eq!(svc.repo.lines_of(owner)[0].quantity, 1);
    }

    #[test]
    fn update_without_a_cart_is_cart_not_found() {
        let p = product("35.00", "active");
        let product_id = p.id;
        let svc = CartService::new(FakeCartRepo::new(vec![p]));

        assert_eq!(
            svc.update_item(Uuid::new_v4(), product_id, 1),
            Err(DomainError::CartNotFound)
        );
    }

    #[test]
    fn update_of_a_missing_line_is_line_not_found() {
        let p = product("35.00", "active");
        let product_id = p.id;
        let svc = CartService::new(FakeCartRepo::new(vec![p]));
        let owner = Uuid::new_v4();

        svc.add_item(owner, product_id, 1).expect("add");
        assert_eq!(
            svc.update_item(owner, Uuid::new_v4(), 2),
            Err(DomainError::LineNotFound)
        );
    }

    #[test]
    fn removing_an_absent_line_is_a_no_op() {
        let p = product("35.00", "active");
        let product_id = p.id;
        let svc = CartService::new(FakeCartRepo::new(vec![p]));
        let owner = Uuid::new_v4();

        // No cart at all yet.
        svc.remove_item(owner, product_id).expect("no-op remove");

        svc.add_item(owner, product_id, 2).expect("add");
        svc.remove_item(owner, Uuid::new_v4())
            .expect("remove of unknown product");
        assert_eq!(svc.repo.lines_of(owner).len(), 1);
    }

    #[test]
    fn priced_view_of_absent_cart_is_empty() {
        let svc = CartService::new(FakeCartRepo::new(vec![]));
        let priced = svc.priced_view(Uuid::new_v4()).expect("view");
        assert!(priced.lines.is_empty());
        assert_eq!(priced.total_price, BigDecimal::from_str("0.00").unwrap());
    }
}
