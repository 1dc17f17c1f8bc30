use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::blog::{
    BlogCategoryPatch, BlogCategoryView, BlogListing, BlogPatch, BlogSummary, BlogView, NewBlog,
    NewBlogCategory,
};
use crate::domain::catalog::{FeaturedKind, PublishStatus};
use crate::domain::errors::DomainError;
use crate::domain::pagination::paginate;
use crate::domain::ports::BlogRepository;
use crate::schema::{blog_categories, blogs};

use super::models::{
    BlogCategoryChangeset, BlogCategoryRow, BlogChangeset, BlogListRow, BlogRow, NewBlogCategoryRow,
    NewBlogRow,
};

pub struct DieselBlogRepository {
    pool: DbPool,
}

impl DieselBlogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn category_titles(
    conn: &mut PgConnection,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, String>, DomainError> {
    Ok(blog_categories::table
        .filter(blog_categories::id.eq_any(ids))
        .select((blog_categories::id, blog_categories::title))
        .load::<(Uuid, String)>(conn)?
        .into_iter()
        .collect())
}

fn summaries(
    conn: &mut PgConnection,
    rows: Vec<BlogListRow>,
) -> Result<Vec<BlogSummary>, DomainError> {
    let mut ids: Vec<Uuid> = rows.iter().map(|r| r.category_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let titles = category_titles(conn, ids)?;
    Ok(rows
        .into_iter()
        .map(|r| {
            let category_title = titles.get(&r.category_id).cloned();
            BlogSummary {
                id: r.id,
                title: r.title,
                slug: r.slug,
                description: r.description,
                thumbnail: r.thumbnail,
                category_id: r.category_id,
                category_title,
                status: r.status,
                featured: r.featured,
                created_at: r.created_at,
            }
        })
        .collect())
}

fn blog_view(row: BlogRow, category_title: Option<String>) -> BlogView {
    BlogView {
        id: row.id,
        title: row.title,
        slug: row.slug,
        description: row.description,
        content: row.content,
        thumbnail: row.thumbnail,
        category_id: row.category_id,
        category_title,
        status: row.status,
        featured: row.featured,
        created_at: row.created_at,
    }
}

fn blog_category_view(row: BlogCategoryRow) -> BlogCategoryView {
    BlogCategoryView {
        id: row.id,
        title: row.title,
        slug: row.slug,
        description: row.description,
        status: row.status,
        position: row.position,
        created_at: row.created_at,
    }
}

fn map_unique_slug(e: diesel::result::Error) -> DomainError {
    match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DomainError::InvalidInput("a record with this slug already exists".to_string())
        }
        diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DomainError::InvalidInput("blog category does not exist".to_string())
        }
        other => other.into(),
    }
}

impl BlogRepository for DieselBlogRepository {
    fn list(&self, page: Option<i64>, page_size: i64) -> Result<BlogListing, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let active = PublishStatus::Active.as_str();
            let total: i64 = blogs::table
                .filter(blogs::status.eq(active))
                .count()
                .get_result(conn)?;
            let window = paginate(page, page_size, total)?;
            let rows: Vec<BlogListRow> = blogs::table
                .filter(blogs::status.eq(active))
                .order(blogs::created_at.desc())
                .offset(window.skip)
                .limit(window.page_size)
                .select(BlogListRow::as_select())
                .load(conn)?;
            let items = summaries(conn, rows)?;
            Ok(BlogListing { items, window })
        })
    }

    fn featured(&self, kind: FeaturedKind, limit: i64) -> Result<Vec<BlogSummary>, DomainError> {
        let mut conn = self.pool.get()?;
        let base = blogs::table
            .into_boxed()
            .filter(blogs::status.eq(PublishStatus::Active.as_str()));
        let q = match kind {
            FeaturedKind::Featured => base
                .filter(blogs::featured.eq(true))
                .order(blogs::created_at.desc()),
            FeaturedKind::New => base.order(blogs::created_at.desc()),
            FeaturedKind::Mixed => base.order((blogs::featured.desc(), blogs::created_at.desc())),
        };
        let rows: Vec<BlogListRow> = q
            .limit(limit)
            .select(BlogListRow::as_select())
            .load(&mut conn)?;
        summaries(&mut conn, rows)
    }

    fn find(&self, id: Uuid) -> Result<Option<BlogView>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = blogs::table
            .find(id)
            .select(BlogRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };
        let title = blog_categories::table
            .find(row.category_id)
            .select(blog_categories::title)
            .first::<String>(&mut conn)
            .optional()?;
        Ok(Some(blog_view(row, title)))
    }

    fn create(&self, input: NewBlog) -> Result<BlogView, DomainError> {
        let mut conn = self.pool.get()?;
        let row = NewBlogRow {
            id: Uuid::new_v4(),
            title: input.title,
            slug: input.slug,
            description: input.description,
            content: input.content,
            thumbnail: input.thumbnail,
            category_id: input.category_id,
            status: input.status.as_str().to_string(),
            featured: input.featured,
        };
        diesel::insert_into(blogs::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(map_unique_slug)?;
        self.find(row.id)?
            .ok_or_else(|| DomainError::Internal("freshly created post vanished".to_string()))
    }

    fn update(&self, id: Uuid, patch: BlogPatch) -> Result<Option<BlogView>, DomainError> {
        let mut conn = self.pool.get()?;
        let changeset = BlogChangeset {
            title: patch.title,
            description: patch.description,
            content: patch.content,
            thumbnail: patch.thumbnail,
            category_id: patch.category_id,
            status: patch.status.map(|s| s.as_str().to_string()),
            featured: patch.featured,
            updated_at: Utc::now(),
        };
        let updated = diesel::update(blogs::table.find(id))
            .set(&changeset)
            .execute(&mut conn)
            .map_err(map_unique_slug)?;
        if updated == 0 {
            return Ok(None);
        }
        self.find(id)
    }

    fn set_status(&self, id: Uuid, status: PublishStatus) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(blogs::table.find(id))
            .set((
                blogs::status.eq(status.as_str()),
                blogs::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        Ok(updated > 0)
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(blogs::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn list_categories(&self) -> Result<Vec<BlogCategoryView>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<BlogCategoryRow> = blog_categories::table
            .order((blog_categories::position.asc(), blog_categories::created_at.asc()))
            .select(BlogCategoryRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(blog_category_view).collect())
    }

    fn create_category(&self, input: NewBlogCategory) -> Result<BlogCategoryView, DomainError> {
        let mut conn = self.pool.get()?;
        let row = NewBlogCategoryRow {
            id: Uuid::new_v4(),
            title: input.title,
            slug: input.slug,
            description: input.description,
            status: input.status.as_str().to_string(),
            position: input.position,
        };
        diesel::insert_into(blog_categories::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(map_unique_slug)?;
        let created = blog_categories::table
            .find(row.id)
            .select(BlogCategoryRow::as_select())
            .first(&mut conn)?;
        Ok(blog_category_view(created))
    }

    fn update_category(
        &self,
        id: Uuid,
        patch: BlogCategoryPatch,
    ) -> Result<Option<BlogCategoryView>, DomainError> {
        let mut conn = self.pool.get()?;
        let changeset = BlogCategoryChangeset {
            title: patch.title,
            description: patch.description,
            status: patch.status.map(|s| s.as_str().to_string()),
            position: patch.position,
            updated_at: Utc::now(),
        };
        let updated = diesel::update(blog_categories::table.find(id))
            .set(&changeset)
            .execute(&mut conn)?;
        if updated == 0 {
            return Ok(None);
        }
        let row = blog_categories::table
            .find(id)
            .select(BlogCategoryRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(blog_category_view))
    }

    fn delete_category(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(blog_categories::table.find(id))
            .execute(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::ForeignKeyViolation,
                    _,
                ) => DomainError::InvalidInput(
                    "blog category still has posts and cannot be deleted".to_string(),
                ),
                other => other.into(),
            })?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::test_support::setup_db;

    fn draft_category(title: &str, position: i32) -> NewBlogCategory {
        NewBlogCategory {
            title: title.to_string(),
            slug: crate::domain::slug::slugify(title),
            description: None,
            status: PublishStatus::Active,
            position,
        }
    }

    fn draft_post(title: &str, category_id: Uuid, status: PublishStatus) -> NewBlog {
        NewBlog {
            title: title.to_string(),
            slug: crate::domain::slug::slugify(title),
            description: Some("teaser".to_string()),
            content: "full body".to_string(),
            thumbnail: None,
            category_id,
            status,
            featured: false,
        }
    }

    #[tokio::test]
    async fn listing_is_active_only_and_excludes_content() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBlogRepository::new(pool);
        let cat = repo
            .create_category(draft_category("News", 0))
            .expect("category");

        repo.create(draft_post("Published", cat.id, PublishStatus::Active))
            .expect("post");
        repo.create(draft_post("Draft", cat.id, PublishStatus::Inactive))
            .expect("post");

        let listing = repo.list(None, 10).expect("listing");
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].title, "Published");
        assert_eq!(listing.items[0].category_title.as_deref(), Some("News"));
        assert_eq!(listing.window.total_pages, 1);
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected_as_invalid_input() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBlogRepository::new(pool);
        let cat = repo
            .create_category(draft_category("News", 0))
            .expect("category");

        repo.create(draft_post("Same Title", cat.id, PublishStatus::Active))
            .expect("post");
        let dup = repo.create(draft_post("Same Title", cat.id, PublishStatus::Active));
        assert!(matches!(dup, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn detail_carries_content_and_category_title() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBlogRepository::new(pool);
        let cat = repo
            .create_category(draft_category("Recipes", 1))
            .expect("category");
        let created = repo
            .create(draft_post("How to pho", cat.id, PublishStatus::Active))
            .expect("post");

        let view = repo.find(created.id).expect("find").expect("post");
        assert_eq!(view.content, "full body");
        assert_eq!(view.category_title.as_deref(), Some("Recipes"));
        assert_eq!(view.slug, "how-to-pho");
    }

    #[tokio::test]
    async fn categories_come_back_in_position_order() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBlogRepository::new(pool);
        repo.create_category(draft_category("Second", 2)).expect("category");
        repo.create_category(draft_category("First", 1)).expect("category");

        let titles: Vec<String> = repo
            .list_categories()
            .expect("list")
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, ["First", "Second"]);
    }
}
