use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{
    CategoryPatch, CategoryView, FeaturedKind, NewCategory, NewProduct, ProductListing,
    ProductPatch, ProductQuery, ProductView, PublishStatus, SortDir, SortKey,
};
use crate::domain::errors::DomainError;
use crate::domain::pagination::paginate;
use crate::domain::ports::CatalogRepository;
use crate::domain::search::SearchPattern;
use crate::schema::{categories, products};

use super::models::{
    CategoryChangeset, CategoryRow, NewCategoryRow, NewProductRow, ProductChangeset, ProductRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ───────────────────────────────────────────────────────────────

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Visibility gate plus the optional keyword filter. With a category scope
/// the keyword only matches titles; otherwise it also matches membership in
/// the set of categories whose name contains the keyword.
fn visible_products(
    query: &ProductQuery,
    keyword_category_ids: &[Uuid],
) -> products::BoxedQuery<'static, diesel::pg::Pg> {
    let mut q = products::table
        .into_boxed()
        .filter(products::status.eq(PublishStatus::Active.as_str()))
        .filter(products::deleted.eq(false));
    if let Some(category_id) = query.category_id {
        q = q.filter(products::category_id.eq(category_id));
    }
    if let Some(pattern) = &query.keyword {
        let like = pattern.like_pattern().to_string();
        if query.category_id.is_some() {
            q = q.filter(products::title.ilike(like));
        } else {
            q = q.filter(
                products::title
                    .ilike(like)
                    .or(products::category_id.eq_any(keyword_category_ids.to_vec())),
            );
        }
    }
    q
}

fn sorted(
    q: products::BoxedQuery<'static, diesel::pg::Pg>,
    key: SortKey,
    dir: SortDir,
) -> products::BoxedQuery<'static, diesel::pg::Pg> {
    match (key, dir) {
        (SortKey::CreatedAt, SortDir::Asc) => q.order(products::created_at.asc()),
        (SortKey::CreatedAt, SortDir::Desc) => q.order(products::created_at.desc()),
        (SortKey::Price, SortDir::Asc) => q.order(products::price.asc()),
        (SortKey::Price, SortDir::Desc) => q.order(products::price.desc()),
        (SortKey::Title, SortDir::Asc) => q.order(products::title.asc()),
        (SortKey::Title, SortDir::Desc) => q.order(products::title.desc()),
    }
}

fn matching_category_ids(
    conn: &mut PgConnection,
    pattern: &SearchPattern,
) -> Result<Vec<Uuid>, DomainError> {
    Ok(categories::table
        .filter(categories::name.ilike(pattern.like_pattern()))
        .select(categories::id)
        .load(conn)?)
}

pub(super) fn product_view(row: ProductRow, category_name: Option<String>) -> ProductView {
    ProductView {
        id: row.id,
        title: row.title,
        image_url: row.image_url,
        price: row.price,
        discount_percent: row.discount_percent,
        category_id: row.category_id,
        category_name,
        status: row.status,
        featured: row.featured,
        description: row.description,
        created_at: row.created_at,
    }
}

/// Stitch category names onto product rows, the relational counterpart of
/// the document store's populate step.
fn attach_category_names(
    conn: &mut PgConnection,
    rows: Vec<ProductRow>,
) -> Result<Vec<ProductView>, DomainError> {
    let mut ids: Vec<Uuid> = rows.iter().map(|r| r.category_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let names: HashMap<Uuid, String> = categories::table
        .filter(categories::id.eq_any(ids))
        .select((categories::id, categories::name))
        .load::<(Uuid, String)>(conn)?
        .into_iter()
        .collect();
    Ok(rows
        .into_iter()
        .map(|r| {
            let name = names.get(&r.category_id).cloned();
            product_view(r, name)
        })
        .collect())
}

fn category_view(row: CategoryRow) -> CategoryView {
    CategoryView {
        id: row.id,
        name: row.name,
        description: row.description,
        image_url: row.image_url,
        status: row.status,
        created_at: row.created_at,
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn list_products(&self, query: &ProductQuery) -> Result<ProductListing, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let keyword_category_ids = match (&query.keyword, query.category_id) {
                (Some(pattern), None) => matching_category_ids(conn, pattern)?,
                _ => Vec::new(),
            };

            let total: i64 = visible_products(query, &keyword_category_ids)
                .count()
                .get_result(conn)?;
            let window = paginate(query.page, query.page_size, total)?;

            let rows: Vec<ProductRow> = sorted(
                visible_products(query, &keyword_category_ids),
                query.sort_key,
                query.sort_dir,
            )
            .select(ProductRow::as_select())
            .offset(window.skip)
            .limit(window.page_size)
            .load(conn)?;

            let items = attach_category_names(conn, rows)?;
            Ok(ProductListing { items, window })
        })
    }

    fn search_products(
        &self,
        pattern: &SearchPattern,
        limit: i64,
    ) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        let category_ids = matching_category_ids(&mut conn, pattern)?;
        let rows: Vec<ProductRow> = products::table
            .filter(products::status.eq(PublishStatus::Active.as_str()))
            .filter(products::deleted.eq(false))
            .filter(
                products::title
                    .ilike(pattern.like_pattern())
                    .or(products::category_id.eq_any(&category_ids)),
            )
            .order(products::created_at.desc())
            .limit(limit)
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        attach_category_names(&mut conn, rows)
    }

    fn newest_products(&self, limit: i64) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<ProductRow> = products::table
            .filter(products::status.eq(PublishStatus::Active.as_str()))
            .filter(products::deleted.eq(false))
            .order(products::created_at.desc())
            .limit(limit)
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        attach_category_names(&mut conn, rows)
    }

    fn featured_products(
        &self,
        kind: FeaturedKind,
        limit: i64,
    ) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        let base = products::table
            .into_boxed()
            .filter(products::status.eq(PublishStatus::Active.as_str()))
            .filter(products::deleted.eq(false));
        let q = match kind {
            FeaturedKind::Featured => base
                .filter(products::featured.eq(true))
                .order(products::created_at.desc()),
            FeaturedKind::New => base.order(products::created_at.desc()),
            FeaturedKind::Mixed => {
                base.order((products::featured.desc(), products::created_at.desc()))
            }
        };
        let rows: Vec<ProductRow> = q
            .limit(limit)
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        attach_category_names(&mut conn, rows)
    }

    fn find_product(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };
        let name = categories::table
            .find(row.category_id)
            .select(categories::name)
            .first::<String>(&mut conn)
            .optional()?;
        Ok(Some(product_view(row, name)))
    }

    fn create_product(&self, input: NewProduct) -> Result<ProductView, DomainError> {
        let mut conn = self.pool.get()?;
        let row = NewProductRow {
            id: Uuid::new_v4(),
            title: input.title,
            image_url: input.image_url,
            price: input.price,
            discount_percent: input.discount_percent,
            category_id: input.category_id,
            status: input.status.as_str().to_string(),
            featured: input.featured,
            description: input.description,
        };
        diesel::insert_into(products::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::ForeignKeyViolation,
                    _,
                ) => DomainError::InvalidInput("category does not exist".to_string()),
                other => other.into(),
            })?;
        self.find_product(row.id)?
            .ok_or_else(|| DomainError::Internal("freshly created product vanished".to_string()))
    }

    fn update_product(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<Option<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;
        let changeset = ProductChangeset {
            title: patch.title,
            image_url: patch.image_url,
            price: patch.price,
            discount_percent: patch.discount_percent,
            category_id: patch.category_id,
            status: patch.status.map(|s| s.as_str().to_string()),
            featured: patch.featured,
            description: patch.description,
            updated_at: Utc::now(),
        };
        let updated = diesel::update(products::table.find(id))
            .set(&changeset)
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::ForeignKeyViolation,
                    _,
                ) => DomainError::InvalidInput("category does not exist".to_string()),
                other => other.into(),
            })?;
        if updated == 0 {
            return Ok(None);
        }
        self.find_product(id)
    }

    fn set_product_status(&self, id: Uuid, status: PublishStatus) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(products::table.find(id))
            .set((
                products::status.eq(status.as_str()),
                products::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        Ok(updated > 0)
    }

    fn soft_delete_product(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(products::deleted.eq(false)),
        )
        .set((
            products::deleted.eq(true),
            products::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)?;
        Ok(updated > 0)
    }

    fn list_categories(&self) -> Result<Vec<CategoryView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<CategoryRow> = categories::table
            .order(categories::created_at.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(category_view).collect())
    }

    fn find_category(&self, id: Uuid) -> Result<Option<CategoryView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(category_view))
    }

    fn create_category(&self, input: NewCategory) -> Result<CategoryView, DomainError> {
        let mut conn = self.pool.get()?;
        let row = NewCategoryRow {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            image_url: input.image_url,
            status: input.status.as_str().to_string(),
        };
        diesel::insert_into(categories::table)
            .values(&row)
            .execute(&mut conn)?;
        self.find_category(row.id)?
            .ok_or_else(|| DomainError::Internal("freshly created category vanished".to_string()))
    }

    fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Option<CategoryView>, DomainError> {
        let mut conn = self.pool.get()?;
        let changeset = CategoryChangeset {
            name: patch.name,
            description: patch.description,
            image_url: patch.image_url,
            status: patch.status.map(|s| s.as_str().to_string()),
            updated_at: Utc::now(),
        };
        let updated = diesel::update(categories::table.find(id))
            .set(&changeset)
            .execute(&mut conn)?;
        if updated == 0 {
            return Ok(None);
        }
        self.find_category(id)
    }

    fn delete_category(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(categories::table.find(id))
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::ForeignKeyViolation,
                    _,
                ) => DomainError::InvalidInput(
                    "category still has products and cannot be deleted".to_string(),
                ),
                other => other.into(),
            })?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::catalog::{NewCategory, NewProduct};
    use crate::infrastructure::test_support::setup_db;

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            description: None,
            image_url: None,
            status: PublishStatus::Active,
        }
    }

    fn new_product(title: &str, price: &str, category_id: Uuid) -> NewProduct {
        NewProduct {
            title: title.to_string(),
            image_url: None,
            price: BigDecimal::from_str(price).expect("valid decimal"),
            discount_percent: None,
            category_id,
            status: PublishStatus::Active,
            featured: false,
            description: None,
        }
    }

    fn query(keyword: Option<&str>) -> ProductQuery {
        ProductQuery {
            keyword: SearchPattern::parse(keyword),
            category_id: None,
            sort_key: SortKey::Title,
            sort_dir: SortDir::Asc,
            page: None,
            page_size: 20,
        }
    }

    #[tokio::test]
    async fn listing_hides_inactive_and_deleted_products() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        let cat = repo.create_category(new_category("Noodles")).expect("category");

        let shown = repo
            .create_product(new_product("Visible", "10.00", cat.id))
            .expect("product");
        let mut hidden = new_product("Hidden", "10.00", cat.id);
        hidden.status = PublishStatus::Inactive;
        repo.create_product(hidden).expect("product");
        let gone = repo
            .create_product(new_product("Gone", "10.00", cat.id))
            .expect("product");
        assert!(repo.soft_delete_product(gone.id).expect("soft delete"));

        let listing = repo.list_products(&query(None)).expect("listing");
        let titles: Vec<&str> = listing.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Visible"]);
        assert_eq!(listing.items[0].id, shown.id);
        assert_eq!(listing.items[0].category_name.as_deref(), Some("Noodles"));
        assert_eq!(listing.window.total_pages, 1);
    }

    #[tokio::test]
    async fn keyword_matches_title_or_category_name() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        let noodles = repo.create_category(new_category("Noodles")).expect("category");
        let drinks = repo.create_category(new_category("Drinks")).expect("category");

        repo.create_product(new_product("Beef pho", "45.00", noodles.id))
            .expect("product");
        repo.create_product(new_product("Iced tea", "12.00", drinks.id))
            .expect("product");
        repo.create_product(new_product("Noodle salad", "30.00", drinks.id))
            .expect("product");

        // "noodle" hits one product by title and one by category name.
        let listing = repo.list_products(&query(Some("noodle"))).expect("listing");
        let titles: Vec<&str> = listing.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Beef pho", "Noodle salad"]);
    }

    #[tokio::test]
    async fn keyword_wildcards_match_literally() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        let cat = repo.create_category(new_category("Promos")).expect("category");

        repo.create_product(new_product("50%_off combo", "20.00", cat.id))
            .expect("product");
        repo.create_product(new_product("500 gram off box", "20.00", cat.id))
            .expect("product");

        // Unescaped, '%50%_off%' would also match "500 gram off box".
        let listing = repo
            .list_products(&query(Some("50%_off")))
            .expect("listing");
        let titles: Vec<&str> = listing.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["50%_off combo"]);
    }

    #[tokio::test]
    async fn pagination_windows_the_listing() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        let cat = repo.create_category(new_category("Bulk")).expect("category");
        for i in 0..5 {
            repo.create_product(new_product(&format!("Item {i}"), "5.00", cat.id))
                .expect("product");
        }

        let mut q = query(None);
        q.page_size = 2;
        q.page = Some(3);
        let listing = repo.list_products(&q).expect("listing");
        assert_eq!(listing.window.skip, 4);
        assert_eq!(listing.window.total_pages, 3);
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].title, "Item 4");
    }

    #[tokio::test]
    async fn detail_returns_any_status_but_search_does_not() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        let cat = repo.create_category(new_category("Noodles")).expect("category");
        let mut inactive = new_product("Secret dish", "99.00", cat.id);
        inactive.status = PublishStatus::Inactive;
        let created = repo.create_product(inactive).expect("product");

        let found = repo.find_product(created.id).expect("find");
        assert!(found.is_some());

        let pattern = SearchPattern::parse(Some("Secret")).expect("pattern");
        let results = repo.search_products(&pattern, 100).expect("search");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn featured_listing_prefers_flagged_products() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);
        let cat = repo.create_category(new_category("Front page")).expect("category");

        repo.create_product(new_product("Plain", "10.00", cat.id))
            .expect("product");
        let mut flagged = new_product("Star", "10.00", cat.id);
        flagged.featured = true;
        repo.create_product(flagged).expect("product");

        let mixed = repo
            .featured_products(FeaturedKind::Mixed, 8)
            .expect("featured");
        assert_eq!(mixed[0].title, "Star");

        let only_flagged = repo
            .featured_products(FeaturedKind::Featured, 8)
            .expect("featured");
        assert_eq!(only_flagged.len(), 1);
        assert_eq!(only_flagged[0].title, "Star");
    }
}
