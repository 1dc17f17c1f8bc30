use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::upsert::excluded;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::{CartView, LineItem};
use crate::domain::catalog::{ProductView, PublishStatus};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_lines, carts, products};

use super::catalog_repo::product_view;
use super::models::{CartLineRow, CartRow, NewCartLineRow, NewCartRow, ProductRow};

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn find_available_product(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .find(id)
            .filter(products::status.eq(PublishStatus::Active.as_str()))
            .filter(products::deleted.eq(false))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(|r| product_view(r, None)))
    }

    fn ensure_cart(&self, owner_id: Uuid) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;
        // Insert-if-absent keyed on the owner; a concurrent first add simply
        // hits the conflict and both callers read the same cart back.
        diesel::insert_into(carts::table)
            .values(&NewCartRow {
                id: Uuid::new_v4(),
                owner_id,
            })
            .on_conflict(carts::owner_id)
            .do_nothing()
            .execute(&mut conn)?;
        Ok(carts::table
            .filter(carts::owner_id.eq(owner_id))
            .select(carts::id)
            .first(&mut conn)?)
    }

    fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<CartView>, DomainError> {
        let mut conn = self.pool.get()?;
        let cart = carts::table
            .filter(carts::owner_id.eq(owner_id))
            .select(CartRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(cart) = cart else {
            return Ok(None);
        };
        let lines: Vec<CartLineRow> = cart_lines::table
            .filter(cart_lines::cart_id.eq(cart.id))
            .order(cart_lines::added_at.asc())
            .select(CartLineRow::as_select())
            .load(&mut conn)?;
        Ok(Some(CartView {
            id: cart.id,
            owner_id: cart.owner_id,
            lines: lines
                .into_iter()
                .map(|l| LineItem {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    added_at: l.added_at,
                })
                .collect(),
        }))
    }

    fn merge_line(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        // One conditional write: insert the line, or add the incoming
        // quantity onto the existing one. The unique (cart_id, product_id)
        // index keeps the one-line-per-product invariant, and concurrent
        // adds cannot lose an update the way read-then-write would.
        diesel::insert_into(cart_lines::table)
            .values(&NewCartLineRow {
                id: Uuid::new_v4(),
                cart_id,
                product_id,
                quantity,
            })
            .on_conflict((cart_lines::cart_id, cart_lines::product_id))
            .do_update()
            .set(cart_lines::quantity.eq(cart_lines::quantity + excluded(cart_lines::quantity)))
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::ForeignKeyViolation,
                    _,
                ) => DomainError::CartNotFound,
                other => other.into(),
            })?;
        Ok(())
    }

    fn set_line_quantity(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(
            cart_lines::table
                .filter(cart_lines::cart_id.eq(cart_id))
                .filter(cart_lines::product_id.eq(product_id)),
        )
        .set(cart_lines::quantity.eq(quantity))
        .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::LineNotFound);
        }
        Ok(())
    }

    fn remove_line(&self, cart_id: Uuid, product_id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::delete(
            cart_lines::table
                .filter(cart_lines::cart_id.eq(cart_id))
                .filter(cart_lines::product_id.eq(product_id)),
        )
        .execute(&mut conn)?;
        Ok(())
    }

    fn priced_entries(&self, cart_id: Uuid) -> Result<Vec<(i32, ProductView)>, DomainError> {
        let mut conn = self.pool.get()?;
        // The join drops lines whose product is gone, inactive, or
        // soft-deleted; ordering by added_at keeps the original line order.
        let rows: Vec<(CartLineRow, ProductRow)> = cart_lines::table
            .inner_join(products::table)
            .filter(cart_lines::cart_id.eq(cart_id))
            .filter(products::status.eq(PublishStatus::Active.as_str()))
            .filter(products::deleted.eq(false))
            .order(cart_lines::added_at.asc())
            .select((CartLineRow::as_select(), ProductRow::as_select()))
            .load(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(|(line, row)| (line.quantity, product_view(row, None)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::catalog::{NewCategory, NewProduct};
    use crate::domain::ports::CatalogRepository;
    use crate::infrastructure::catalog_repo::DieselCatalogRepository;
    use crate::infrastructure::test_support::setup_db;

    fn seed_product(catalog: &DieselCatalogRepository, title: &str, price: &str) -> Uuid {
        let category = catalog
            .create_category(NewCategory {
                name: format!("{title} category"),
                description: None,
                image_url: None,
                status: PublishStatus::Active,
            })
            .expect("category");
        catalog
            .create_product(NewProduct {
                title: title.to_string(),
                image_url: None,
                price: BigDecimal::from_str(price).expect("valid decimal"),
                discount_percent: None,
                category_id: category.id,
                status: PublishStatus::Active,
                featured: false,
                description: None,
            })
            .expect("product")
            .id
    }

    #[tokio::test]
    async fn merge_line_sums_quantities_into_one_line() {
        let (_container, pool) = setup_db().await;
        let catalog = DieselCatalogRepository::new(pool.clone());
        let repo = DieselCartRepository::new(pool);
        let product_id = seed_product(&catalog, "Beef pho", "45.00");
        let owner = Uuid::new_v4();

        let cart_id = repo.ensure_cart(owner).expect("cart");
        repo.merge_line(cart_id, product_id, 2).expect("first add");
        repo.merge_line(cart_id, product_id, 3).expect("second add");

        let cart = repo.find_by_owner(owner).expect("find").expect("cart");
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
    }

    #[tokio::test]
    async fn ensure_cart_is_idempotent_per_owner() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool);
        let owner = Uuid::new_v4();

        let first = repo.ensure_cart(owner).expect("cart");
        let second = repo.ensure_cart(owner).expect("cart");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn merge_into_missing_cart_is_cart_not_found() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool);

        let result = repo.merge_line(Uuid::new_v4(), Uuid::new_v4(), 1);
        assert_eq!(result, Err(DomainError::CartNotFound));
    }

    #[tokio::test]
    async fn set_quantity_overwrites_and_requires_the_line() {
        let (_container, pool) = setup_db().await;
        let catalog = DieselCatalogRepository::new(pool.clone());
        let repo = DieselCartRepository::new(pool);
        let product_id = seed_product(&catalog, "Spring rolls", "30.00");
        let owner = Uuid::new_v4();

        let cart_id = repo.ensure_cart(owner).expect("cart");
        repo.merge_line(cart_id, product_id, 3).expect("add");
        repo.set_line_quantity(cart_id, product_id, 1).expect("set");

        let cart = repo.find_by_owner(owner).expect("find").expect("cart");
        assert_eq!(cart.lines[0].quantity, 1);

        assert_eq!(
            repo.set_line_quantity(cart_id, Uuid::new_v4(), 2),
            Err(DomainError::LineNotFound)
        );
    }

    #[tokio::test]
    async fn remove_line_is_idempotent() {
        let (_container, pool) = setup_db().await;
        let catalog = DieselCatalogRepository::new(pool.clone());
        let repo = DieselCartRepository::new(pool);
        let product_id = seed_product(&catalog, "Iced coffee", "20.00");
        let owner = Uuid::new_v4();

        let cart_id = repo.ensure_cart(owner).expect("cart");
        repo.merge_line(cart_id, product_id, 1).expect("add");

        repo.remove_line(cart_id, product_id).expect("remove");
        repo.remove_line(cart_id, product_id).expect("second remove");

        let cart = repo.find_by_owner(owner).expect("find").expect("cart");
        assert!(cart.lines.is_empty());
    }

    #[tokio::test]
    async fn priced_entries_skip_unavailable_products_but_keep_lines() {
        let (_container, pool) = setup_db().await;
        let catalog = DieselCatalogRepository::new(pool.clone());
        let repo = DieselCartRepository::new(pool);
        let keep = seed_product(&catalog, "Beef pho", "45.00");
        let retire = seed_product(&catalog, "Seasonal special", "60.00");
        let owner = Uuid::new_v4();

        let cart_id = repo.ensure_cart(owner).expect("cart");
        repo.merge_line(cart_id, keep, 2).expect("add");
        repo.merge_line(cart_id, retire, 1).expect("add");

        assert!(catalog
            .set_product_status(retire, PublishStatus::Inactive)
            .expect("status change"));

        let entries = repo.priced_entries(cart_id).expect("entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, 2);
        assert_eq!(entries[0].1.id, keep);

        // The stale line stays in the stored cart until removed explicitly.
        let cart = repo.find_by_owner(owner).expect("find").expect("cart");
        assert_eq!(cart.lines.len(), 2);
    }

    #[tokio::test]
    async fn priced_entries_keep_line_insertion_order() {
        let (_container, pool) = setup_db().await;
        let catalog = DieselCatalogRepository::new(pool.clone());
        let repo = DieselCartRepository::new(pool);
        let first = seed_product(&catalog, "First", "1.00");
        let second = seed_product(&catalog, "Second", "2.00");
        let third = seed_product(&catalog, "Third", "3.00");
        let owner = Uuid::new_v4();

        let cart_id = repo.ensure_cart(owner).expect("cart");
        for id in [first, second, third] {
            repo.merge_line(cart_id, id, 1).expect("add");
        }

        let entries = repo.priced_entries(cart_id).expect("entries");
        let ids: Vec<Uuid> = entries.iter().map(|(_, p)| p.id).collect();
        assert_eq!(ids, [first, second, third]);
    }
}
