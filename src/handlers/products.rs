use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::catalog_service::CatalogService;
use crate::db::DbPool;
use crate::domain::catalog::{
    FeaturedKind, NewProduct, ProductPatch, ProductQuery, ProductView, PublishStatus, SortDir,
    SortKey,
};
use crate::domain::pricing::resolve_price;
use crate::domain::search::SearchPattern;
use crate::errors::AppError;
use crate::infrastructure::catalog_repo::DieselCatalogRepository;

use super::identity::Identity;
use super::{created, ok, ok_message, PageWindowDto};

const DEFAULT_PAGE_SIZE: i64 = 20;
const SEARCH_RESULT_CAP: i64 = 100;

fn service(pool: &DbPool) -> CatalogService<DieselCatalogRepository> {
    CatalogService::new(DieselCatalogRepository::new(pool.clone()))
}

pub(crate) fn parse_money(raw: &str, field: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw)
        .map_err(|e| AppError::BadRequest(format!("Invalid {field} '{raw}': {e}")))
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: Uuid,
    pub title: String,
    pub image_url: Option<String>,
    /// Base price as a decimal string to avoid floating-point issues, e.g. "45.00"
    pub price: String,
    pub discount_percent: Option<i32>,
    /// Effective sale price after the discount; absent when the record does
    /// not price cleanly
    pub price_new: Option<String>,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub status: String,
    pub featured: bool,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<ProductView> for ProductDto {
    fn from(v: ProductView) -> Self {
        let price_new = resolve_price(&v).ok().map(|p| p.to_string());
        Self {
            id: v.id,
            title: v.title,
            image_url: v.image_url,
            price: v.price.to_string(),
            discount_percent: v.discount_percent,
            price_new,
            category_id: v.category_id,
            category_name: v.category_name,
            status: v.status,
            featured: v.featured,
            description: v.description,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListingDto {
    pub items: Vec<ProductDto>,
    pub pagination: PageWindowDto,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListProductsParams {
    /// Keyword matched against product titles and category names
    pub keyword: Option<String>,
    /// created_at (default), price, or title
    pub sort_key: Option<String>,
    /// asc or desc (default)
    pub sort_value: Option<String>,
    /// Page number (1-based). Defaults to 1.
    pub page: Option<i64>,
    /// Items per page. Defaults to 20.
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CuratedParams {
    pub limit: Option<i64>,
    /// featured, new, or absent for the mixed front-page slice
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub title: String,
    pub image_url: Option<String>,
    /// Decimal price as a string, e.g. "45.00"
    pub price: String,
    pub discount_percent: Option<i32>,
    pub category_id: Uuid,
    /// active or inactive; new products start inactive when absent
    pub status: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub discount_percent: Option<i32>,
    pub category_id: Option<Uuid>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub description: Option<String>,
}

fn listing_dto(listing: crate::domain::catalog::ProductListing) -> ProductListingDto {
    ProductListingDto {
        items: listing.items.into_iter().map(Into::into).collect(),
        pagination: listing.window.into(),
    }
}

fn parse_status(raw: Option<String>) -> Result<Option<PublishStatus>, AppError> {
    raw.map(|s| PublishStatus::parse(&s))
        .transpose()
        .map_err(Into::into)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
///
/// Active, non-deleted products with optional keyword filtering, sorting,
/// and pagination.
#[utoipa::path(
    get,
    path = "/products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Paginated product listing", body = ProductListingDto),
        (status = 400, description = "Invalid page size"),
    ),
    tag = "products"
)]
pub async fn index(
    pool: web::Data<DbPool>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let listing = web::block(move || {
        let query = ProductQuery {
            keyword: SearchPattern::parse(params.keyword.as_deref()),
            category_id: None,
            sort_key: SortKey::parse(params.sort_key.as_deref()),
            sort_dir: SortDir::parse(params.sort_value.as_deref()),
            page: params.page,
            page_size: params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        service(&pool).list_products(&query)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Product listing fetched", listing_dto(listing)))
}

/// GET /products/category/{category_id}
///
/// Same listing surface scoped to one category; the keyword then only
/// matches titles.
#[utoipa::path(
    get,
    path = "/products/category/{category_id}",
    params(
        ("category_id" = Uuid, Path, description = "Category UUID"),
        ListProductsParams,
    ),
    responses(
        (status = 200, description = "Paginated product listing", body = ProductListingDto),
    ),
    tag = "products"
)]
pub async fn by_category(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let category_id = path.into_inner();
    let params = query.into_inner();
    let listing = web::block(move || {
        let query = ProductQuery {
            keyword: SearchPattern::parse(params.keyword.as_deref()),
            category_id: Some(category_id),
            sort_key: SortKey::parse(params.sort_key.as_deref()),
            sort_dir: SortDir::parse(params.sort_value.as_deref()),
            page: params.page,
            page_size: params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        service(&pool).list_products(&query)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Category products fetched", listing_dto(listing)))
}

/// GET /products/search?keyword=
///
/// Keyword search across titles and category names; the keyword is
/// mandatory here.
#[utoipa::path(
    get,
    path = "/products/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching products", body = [ProductDto]),
        (status = 400, description = "Missing keyword"),
    ),
    tag = "products"
)]
pub async fn search(
    pool: web::Data<DbPool>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let results = web::block(move || {
        service(&pool).search_products(params.keyword.as_deref(), SEARCH_RESULT_CAP)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ProductDto> = results.into_iter().map(Into::into).collect();
    Ok(ok("Search results fetched", items))
}

/// GET /products/new
#[utoipa::path(
    get,
    path = "/products/new",
    params(CuratedParams),
    responses((status = 200, description = "Newest active products", body = [ProductDto])),
    tag = "products"
)]
pub async fn newest(
    pool: web::Data<DbPool>,
    query: web::Query<CuratedParams>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(5);
    let results = web::block(move || service(&pool).newest_products(limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ProductDto> = results.into_iter().map(Into::into).collect();
    Ok(ok("Newest products fetched", items))
}

/// GET /products/featured?type=featured|new
#[utoipa::path(
    get,
    path = "/products/featured",
    params(CuratedParams),
    responses((status = 200, description = "Curated products", body = [ProductDto])),
    tag = "products"
)]
pub async fn featured(
    pool: web::Data<DbPool>,
    query: web::Query<CuratedParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let limit = params.limit.unwrap_or(8);
    let kind = FeaturedKind::parse(params.kind.as_deref());
    let results = web::block(move || service(&pool).featured_products(kind, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<ProductDto> = results.into_iter().map(Into::into).collect();
    Ok(ok("Curated products fetched", items))
}

/// GET /products/detail/{id}
#[utoipa::path(
    get,
    path = "/products/detail/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn detail(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = web::block(move || service(&pool).product_detail(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Product fetched", ProductDto::from(product)))
}

/// POST /products/create
#[utoipa::path(
    post,
    path = "/products/create",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid product data"),
        (status = 403, description = "Administrator access required"),
    ),
    tag = "products"
)]
pub async fn create(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let body = body.into_inner();
    let price = parse_money(&body.price, "price")?;
    let status = parse_status(body.status)?.unwrap_or(PublishStatus::Inactive);

    let product = web::block(move || {
        service(&pool).create_product(NewProduct {
            title: body.title,
            image_url: body.image_url,
            price,
            discount_percent: body.discount_percent,
            category_id: body.category_id,
            status,
            featured: body.featured,
            description: body.description,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created("Product created", ProductDto::from(product)))
}

/// PATCH /products/update/{id}
#[utoipa::path(
    patch,
    path = "/products/update/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let id = path.into_inner();
    let body = body.into_inner();
    let price = body
        .price
        .as_deref()
        .map(|p| parse_money(p, "price"))
        .transpose()?;
    let status = parse_status(body.status)?;

    let product = web::block(move || {
        service(&pool).update_product(
            id,
            ProductPatch {
                title: body.title,
                image_url: body.image_url,
                price,
                discount_percent: body.discount_percent,
                category_id: body.category_id,
                status,
                featured: body.featured,
                description: body.description,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Product updated", ProductDto::from(product)))
}

/// PATCH /products/change-status/{status}/{id}
#[utoipa::path(
    patch,
    path = "/products/change-status/{status}/{id}",
    params(
        ("status" = String, Path, description = "active or inactive"),
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Status changed"),
        (status = 400, description = "Unknown status value"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn change_status(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let (status, id) = path.into_inner();
    web::block(move || service(&pool).change_product_status(id, &status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_message("Product status updated"))
}

/// DELETE /products/delete/{id}
///
/// Soft delete: the record is flagged and drops out of every active query.
#[utoipa::path(
    delete,
    path = "/products/delete/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let id = path.into_inner();
    web::block(move || service(&pool).delete_product(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_message("Product deleted"))
}
