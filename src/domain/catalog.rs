use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::pagination::PageWindow;
use super::search::SearchPattern;

#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: Uuid,
    pub title: String,
    pub image_url: Option<String>,
    pub price: BigDecimal,
    pub discount_percent: Option<i32>,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub status: String,
    pub featured: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductListing {
    pub items: Vec<ProductView>,
    pub window: PageWindow,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub image_url: Option<String>,
    pub price: BigDecimal,
    pub discount_percent: Option<i32>,
    pub category_id: Uuid,
    pub status: PublishStatus,
    pub featured: bool,
    pub description: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<BigDecimal>,
    pub discount_percent: Option<i32>,
    pub category_id: Option<Uuid>,
    pub status: Option<PublishStatus>,
    pub featured: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: PublishStatus,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<PublishStatus>,
}

/// Visibility of a catalog or blog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Active,
    Inactive,
}

impl PublishStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishStatus::Active => "active",
            PublishStatus::Inactive => "inactive",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "active" => Ok(PublishStatus::Active),
            "inactive" => Ok(PublishStatus::Inactive),
            other => Err(DomainError::InvalidInput(format!(
                "status must be 'active' or 'inactive', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    Price,
    Title,
}

impl SortKey {
    /// Unknown keys fall back to the default rather than erroring, matching
    /// the forgiving listing query surface.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("price") => SortKey::Price,
            Some("title") => SortKey::Title,
            _ => SortKey::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => SortDir::Asc,
            _ => SortDir::Desc,
        }
    }
}

/// Which curated slice of the catalog front page to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeaturedKind {
    Featured,
    New,
    Mixed,
}

impl FeaturedKind {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("featured") => FeaturedKind::Featured,
            Some("new") => FeaturedKind::New,
            _ => FeaturedKind::Mixed,
        }
    }
}

/// Filter/sort/page parameters for a product listing. When `category_id` is
/// set the keyword matches titles only; otherwise it also matches products
/// whose category name contains the keyword.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub keyword: Option<SearchPattern>,
    pub category_id: Option<Uuid>,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    pub page: Option<i64>,
    pub page_size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_the_two_known_values() {
        assert_eq!(PublishStatus::parse("active"), Ok(PublishStatus::Active));
        assert_eq!(
            PublishStatus::parse("inactive"),
            Ok(PublishStatus::Inactive)
        );
        assert!(matches!(
            PublishStatus::parse("archived"),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn sort_parsing_falls_back_to_defaults() {
        assert_eq!(SortKey::parse(Some("price")), SortKey::Price);
        assert_eq!(SortKey::parse(Some("bogus")), SortKey::CreatedAt);
        assert_eq!(SortKey::parse(None), SortKey::CreatedAt);
        assert_eq!(SortDir::parse(Some("asc")), SortDir::Asc);
        assert_eq!(SortDir::parse(Some("desc")), SortDir::Desc);
        assert_eq!(SortDir::parse(None), SortDir::Desc);
    }

    #[test]
    fn featured_kind_defaults_to_mixed() {
        assert_eq!(FeaturedKind::parse(Some("featured")), FeaturedKind::Featured);
        assert_eq!(FeaturedKind::parse(Some("new")), FeaturedKind::New);
        assert_eq!(FeaturedKind::parse(None), FeaturedKind::Mixed);
        assert_eq!(FeaturedKind::parse(Some("other")), FeaturedKind::Mixed);
    }
}
