use uuid::Uuid;

use super::blog::{
    BlogCategoryPatch, BlogCategoryView, BlogListing, BlogPatch, BlogSummary, BlogView, NewBlog,
    NewBlogCategory,
};
use super::cart::CartView;
use super::catalog::{
    CategoryPatch, CategoryView, FeaturedKind, NewCategory, NewProduct, ProductListing,
    ProductPatch, ProductQuery, ProductView, PublishStatus,
};
use super::errors::DomainError;
use super::invoice::{InvoicePatch, InvoiceView, NewInvoice};
use super::search::SearchPattern;

pub trait CatalogRepository: Send + Sync + 'static {
    fn list_products(&self, query: &ProductQuery) -> Result<ProductListing, DomainError>;
    fn search_products(
        &self,
        pattern: &SearchPattern,
        limit: i64,
    ) -> Result<Vec<ProductView>, DomainError>;
    fn newest_products(&self, limit: i64) -> Result<Vec<ProductView>, DomainError>;
    fn featured_products(
        &self,
        kind: FeaturedKind,
        limit: i64,
    ) -> Result<Vec<ProductView>, DomainError>;
    fn find_product(&self, id: Uuid) -> Result<Option<ProductView>, DomainError>;
    fn create_product(&self, input: NewProduct) -> Result<ProductView, DomainError>;
    fn update_product(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<Option<ProductView>, DomainError>;
    fn set_product_status(&self, id: Uuid, status: PublishStatus) -> Result<bool, DomainError>;
    fn soft_delete_product(&self, id: Uuid) -> Result<bool, DomainError>;

    fn list_categories(&self) -> Result<Vec<CategoryView>, DomainError>;
    fn find_category(&self, id: Uuid) -> Result<Option<CategoryView>, DomainError>;
    fn create_category(&self, input: NewCategory) -> Result<CategoryView, DomainError>;
    fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Option<CategoryView>, DomainError>;
    fn delete_category(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait CartRepository: Send + Sync + 'static {
    /// Look up a product that is active and not soft-deleted.
    fn find_available_product(&self, id: Uuid) -> Result<Option<ProductView>, DomainError>;
    /// Fetch the owner's cart, creating it if this is the first use.
    fn ensure_cart(&self, owner_id: Uuid) -> Result<Uuid, DomainError>;
    fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<CartView>, DomainError>;
    /// Merge-add: one conditional write that inserts the line or increments
    /// the existing quantity, so concurrent adds cannot lose an update.
    fn merge_line(&self, cart_id: Uuid, product_id: Uuid, quantity: i32)
        -> Result<(), DomainError>;
    /// Overwrite the quantity of an existing line.
    fn set_line_quantity(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), DomainError>;
    fn remove_line(&self, cart_id: Uuid, product_id: Uuid) -> Result<(), DomainError>;
    /// (quantity, product) pairs for every line whose product is still
    /// available, in line insertion order.
    fn priced_entries(&self, cart_id: Uuid) -> Result<Vec<(i32, ProductView)>, DomainError>;
}

pub trait BlogRepository: Send + Sync + 'static {
    fn list(&self, page: Option<i64>, page_size: i64) -> Result<BlogListing, DomainError>;
    fn featured(&self, kind: FeaturedKind, limit: i64) -> Result<Vec<BlogSummary>, DomainError>;
    fn find(&self, id: Uuid) -> Result<Option<BlogView>, DomainError>;
    fn create(&self, input: NewBlog) -> Result<BlogView, DomainError>;
    fn update(&self, id: Uuid, patch: BlogPatch) -> Result<Option<BlogView>, DomainError>;
    fn set_status(&self, id: Uuid, status: PublishStatus) -> Result<bool, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    fn list_categories(&self) -> Result<Vec<BlogCategoryView>, DomainError>;
    fn create_category(&self, input: NewBlogCategory) -> Result<BlogCategoryView, DomainError>;
    fn update_category(
        &self,
        id: Uuid,
        patch: BlogCategoryPatch,
    ) -> Result<Option<BlogCategoryView>, DomainError>;
    fn delete_category(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait InvoiceRepository: Send + Sync + 'static {
    /// `owner = None` lists every invoice (back-office view).
    fn list(&self, owner: Option<Uuid>) -> Result<Vec<InvoiceView>, DomainError>;
    fn create(&self, input: NewInvoice) -> Result<InvoiceView, DomainError>;
    fn update(&self, id: Uuid, patch: InvoicePatch) -> Result<Option<InvoiceView>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
