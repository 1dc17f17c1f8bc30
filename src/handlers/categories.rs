use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::catalog_service::CatalogService;
use crate::db::DbPool;
use crate::domain::catalog::{CategoryPatch, CategoryView, NewCategory, PublishStatus};
use crate::errors::AppError;
use crate::infrastructure::catalog_repo::DieselCatalogRepository;

use super::identity::Identity;
use super::{created, ok, ok_message};

fn service(pool: &DbPool) -> CatalogService<DieselCatalogRepository> {
    CatalogService::new(DieselCatalogRepository::new(pool.clone()))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<CategoryView> for CategoryDto {
    fn from(v: CategoryView) -> Self {
        Self {
            id: v.id,
            name: v.name,
            description: v.description,
            image_url: v.image_url,
            status: v.status,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

fn parse_status(raw: Option<String>) -> Result<Option<PublishStatus>, AppError> {
    raw.map(|s| PublishStatus::parse(&s))
        .transpose()
        .map_err(Into::into)
}

/// GET /category
#[utoipa::path(
    get,
    path = "/category",
    responses((status = 200, description = "All categories", body = [CategoryDto])),
    tag = "categories"
)]
pub async fn index(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let categories = web::block(move || service(&pool).list_categories())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<CategoryDto> = categories.into_iter().map(Into::into).collect();
    Ok(ok("Categories fetched", items))
}

/// GET /category/detail/{id}
///
/// One canonical id lookup; a malformed id already fails path extraction.
#[utoipa::path(
    get,
    path = "/category/detail/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 200, description = "Category found", body = CategoryDto),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn detail(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let category = web::block(move || service(&pool).category_detail(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Category fetched", CategoryDto::from(category)))
}

/// POST /category/create
#[utoipa::path(
    post,
    path = "/category/create",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 403, description = "Administrator access required"),
    ),
    tag = "categories"
)]
pub async fn create(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let body = body.into_inner();
    let status = parse_status(body.status)?.unwrap_or(PublishStatus::Active);

    let category = web::block(move || {
        service(&pool).create_category(NewCategory {
            name: body.name,
            description: body.description,
            image_url: body.image_url,
            status,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created("Category created", CategoryDto::from(category)))
}

/// PATCH /category/edit/{id}
#[utoipa::path(
    patch,
    path = "/category/edit/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryDto),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn edit(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let id = path.into_inner();
    let body = body.into_inner();
    let status = parse_status(body.status)?;

    let category = web::block(move || {
        service(&pool).update_category(
            id,
            CategoryPatch {
                name: body.name,
                description: body.description,
                image_url: body.image_url,
                status,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Category updated", CategoryDto::from(category)))
}

/// DELETE /category/delete/{id}
#[utoipa::path(
    delete,
    path = "/category/delete/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "Category still has products"),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn delete(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let id = path.into_inner();
    web::block(move || service(&pool).delete_category(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_message("Category deleted"))
}
