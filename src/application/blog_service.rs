use uuid::Uuid;

use crate::domain::blog::{
    BlogCategoryPatch, BlogCategoryView, BlogListing, BlogPatch, BlogSummary, BlogView, NewBlog,
    NewBlogCategory,
};
use crate::domain::catalog::{FeaturedKind, PublishStatus};
use crate::domain::errors::DomainError;
use crate::domain::ports::BlogRepository;
use crate::domain::slug::slugify;

pub struct BlogService<R> {
    repo: R,
}

/// Inputs for blog creation before the slug is derived.
#[derive(Debug, Clone)]
pub struct BlogDraft {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub thumbnail: Option<String>,
    pub category_id: Uuid,
    pub status: PublishStatus,
    pub featured: bool,
}

#[derive(Debug, Clone)]
pub struct BlogCategoryDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: PublishStatus,
    pub position: i32,
}

impl<R: BlogRepository> BlogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self, page: Option<i64>, page_size: i64) -> Result<BlogListing, DomainError> {
        self.repo.list(page, page_size)
    }

    pub fn featured(
        &self,
        kind: FeaturedKind,
        limit: i64,
    ) -> Result<Vec<BlogSummary>, DomainError> {
        self.repo.featured(kind, limit)
    }

    pub fn detail(&self, id: Uuid) -> Result<BlogView, DomainError> {
        self.repo.find(id)?.ok_or(DomainError::NotFound)
    }

    pub fn create(&self, draft: BlogDraft) -> Result<BlogView, DomainError> {
        let slug = derive_slug(&draft.title)?;
        self.repo.create(NewBlog {
            title: draft.title,
            slug,
            description: draft.description,
            content: draft.content,
            thumbnail: draft.thumbnail,
            category_id: draft.category_id,
            status: draft.status,
            featured: draft.featured,
        })
    }

    pub fn update(&self, id: Uuid, patch: BlogPatch) -> Result<BlogView, DomainError> {
        self.repo.update(id, patch)?.ok_or(DomainError::NotFound)
    }

    pub fn change_status(&self, id: Uuid, raw_status: &str) -> Result<(), DomainError> {
        let status = PublishStatus::parse(raw_status)?;
        if self.repo.set_status(id, status)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    pub fn list_categories(&self) -> Result<Vec<BlogCategoryView>, DomainError> {
        self.repo.list_categories()
    }

    pub fn create_category(
        &self,
        draft: BlogCategoryDraft,
    ) -> Result<BlogCategoryView, DomainError> {
        let slug = derive_slug(&draft.title)?;
        self.repo.create_category(NewBlogCategory {
            title: draft.title,
            slug,
            description: draft.description,
            status: draft.status,
            position: draft.position,
        })
    }

    pub fn update_category(
        &self,
        id: Uuid,
        patch: BlogCategoryPatch,
    ) -> Result<BlogCategoryView, DomainError> {
        self.repo
            .update_category(id, patch)?
            .ok_or(DomainError::NotFound)
    }

    pub fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete_category(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }
}

fn derive_slug(title: &str) -> Result<String, DomainError> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(DomainError::InvalidInput(
            "title must contain at least one alphanumeric character".to_string(),
        ));
    }
    Ok(slug)
}
