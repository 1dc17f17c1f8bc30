use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::blog_service::{BlogCategoryDraft, BlogService};
use crate::db::DbPool;
use crate::domain::blog::{BlogCategoryPatch, BlogCategoryView};
use crate::domain::catalog::PublishStatus;
use crate::errors::AppError;
use crate::infrastructure::blog_repo::DieselBlogRepository;

use super::identity::Identity;
use super::{created, ok, ok_message};

fn service(pool: &DbPool) -> BlogService<DieselBlogRepository> {
    BlogService::new(DieselBlogRepository::new(pool.clone()))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogCategoryDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: String,
    pub position: i32,
    pub created_at: String,
}

impl From<BlogCategoryView> for BlogCategoryDto {
    fn from(v: BlogCategoryView) -> Self {
        Self {
            id: v.id,
            title: v.title,
            slug: v.slug,
            description: v.description,
            status: v.status,
            position: v.position,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlogCategoryRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBlogCategoryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub position: Option<i32>,
}

fn parse_status(raw: Option<String>) -> Result<Option<PublishStatus>, AppError> {
    raw.map(|s| PublishStatus::parse(&s))
        .transpose()
        .map_err(Into::into)
}

/// GET /category-blog
#[utoipa::path(
    get,
    path = "/category-blog",
    responses((status = 200, description = "Blog categories in display order", body = [BlogCategoryDto])),
    tag = "blog"
)]
pub async fn index(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let categories = web::block(move || service(&pool).list_categories())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<BlogCategoryDto> = categories.into_iter().map(Into::into).collect();
    Ok(ok("Blog categories fetched", items))
}

/// POST /category-blog/create
#[utoipa::path(
    post,
    path = "/category-blog/create",
    request_body = CreateBlogCategoryRequest,
    responses(
        (status = 201, description = "Blog category created", body = BlogCategoryDto),
        (status = 400, description = "Invalid data or duplicate slug"),
        (status = 403, description = "Administrator access required"),
    ),
    tag = "blog"
)]
pub async fn create(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<CreateBlogCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let body = body.into_inner();
    let status = parse_status(body.status)?.unwrap_or(PublishStatus::Active);

    let category = web::block(move || {
        service(&pool).create_category(BlogCategoryDraft {
            title: body.title,
            description: body.description,
            status,
            position: body.position,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created(
        "Blog category created",
        BlogCategoryDto::from(category),
    ))
}

/// PATCH /category-blog/edit/{id}
#[utoipa::path(
    patch,
    path = "/category-blog/edit/{id}",
    params(("id" = Uuid, Path, description = "Blog category UUID")),
    request_body = UpdateBlogCategoryRequest,
    responses(
        (status = 200, description = "Blog category updated", body = BlogCategoryDto),
        (status = 404, description = "Blog category not found"),
    ),
    tag = "blog"
)]
pub async fn edit(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBlogCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let id = path.into_inner();
    let body = body.into_inner();
    let status = parse_status(body.status)?;

    let category = web::block(move || {
        service(&pool).update_category(
            id,
            BlogCategoryPatch {
                title: body.title,
                description: body.description,
                status,
                position: body.position,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Blog category updated", BlogCategoryDto::from(category)))
}

/// DELETE /category-blog/delete/{id}
#[utoipa::path(
    delete,
    path = "/category-blog/delete/{id}",
    params(("id" = Uuid, Path, description = "Blog category UUID")),
    responses(
        (status = 200, description = "Blog category deleted"),
        (status = 400, description = "Blog category still has posts"),
        (status = 404, description = "Blog category not found"),
    ),
    tag = "blog"
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

    Ok(ok_message("Blog category deleted"))
}
