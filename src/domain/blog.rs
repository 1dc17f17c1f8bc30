use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::catalog::PublishStatus;
use super::pagination::PageWindow;

/// Listing row for a post; the content body is deliberately not loaded.
#[derive(Debug, Clone)]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub category_id: Uuid,
    pub category_title: Option<String>,
    pub status: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// A full post as served by the detail endpoint.
#[derive(Debug, Clone)]
pub struct BlogView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: String,
    pub thumbnail: Option<String>,
    pub category_id: Uuid,
    pub category_title: Option<String>,
    pub status: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BlogListing {
    pub items: Vec<BlogSummary>,
    pub window: PageWindow,
}

#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: String,
    pub thumbnail: Option<String>,
    pub category_id: Uuid,
    pub status: PublishStatus,
    pub featured: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub category_id: Option<Uuid>,
    pub status: Option<PublishStatus>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct BlogCategoryView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBlogCategory {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: PublishStatus,
    pub position: i32,
}

#[derive(Debug, Clone, Default)]
pub struct BlogCategoryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<PublishStatus>,
    pub position: Option<i32>,
}
