use uuid::Uuid;

use crate::domain::catalog::{
    CategoryPatch, CategoryView, FeaturedKind, NewCategory, NewProduct, ProductListing,
    ProductPatch, ProductQuery, ProductView, PublishStatus,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::domain::pricing::{validate_discount, validate_pricing};
use crate::domain::search::SearchPattern;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_products(&self, query: &ProductQuery) -> Result<ProductListing, DomainError> {
        self.repo.list_products(query)
    }

    /// Keyword search across product titles and category names. Unlike the
    /// listing filter, the keyword is mandatory here.
    pub fn search_products(
        &self,
        raw_keyword: Option<&str>,
        limit: i64,
    ) -> Result<Vec<ProductView>, DomainError> {
        let pattern = SearchPattern::parse(raw_keyword).ok_or_else(|| {
            DomainError::InvalidInput("a search keyword is required".to_string())
        })?;
        self.repo.search_products(&pattern, limit)
    }

    pub fn newest_products(&self, limit: i64) -> Result<Vec<ProductView>, DomainError> {
        self.repo.newest_products(limit)
    }

    pub fn featured_products(
        &self,
        kind: FeaturedKind,
        limit: i64,
    ) -> Result<Vec<ProductView>, DomainError> {
        self.repo.featured_products(kind, limit)
    }

    pub fn product_detail(&self, id: Uuid) -> Result<ProductView, DomainError> {
        self.repo.find_product(id)?.ok_or(DomainError::NotFound)
    }

    pub fn create_product(&self, input: NewProduct) -> Result<ProductView, DomainError> {
        validate_pricing(&input.price, input.discount_percent)?;
        self.repo.create_product(input)
    }

    pub fn update_product(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<ProductView, DomainError> {
        if let Some(price) = &patch.price {
            validate_pricing(price, patch.discount_percent)?;
        } else if let Some(d) = patch.discount_percent {
            validate_discount(d)?;
        }
        self.repo.update_product(id, patch)?.ok_or(DomainError::NotFound)
    }

    pub fn change_product_status(&self, id: Uuid, raw_status: &str) -> Result<(), DomainError> {
        let status = PublishStatus::parse(raw_status)?;
        if self.repo.set_product_status(id, status)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    pub fn delete_product(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.soft_delete_product(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    pub fn list_categories(&self) -> Result<Vec<CategoryView>, DomainError> {
        self.repo.list_categories()
    }

    pub fn category_detail(&self, id: Uuid) -> Result<CategoryView, DomainError> {
        self.repo.find_category(id)?.ok_or(DomainError::NotFound)
    }

    pub fn create_category(&self, input: NewCategory) -> Result<CategoryView, DomainError> {
        self.repo.create_category(input)
    }

    pub fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<CategoryView, DomainError> {
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
