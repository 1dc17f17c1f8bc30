use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::blog_service::{BlogDraft, BlogService};
use crate::db::DbPool;
use crate::domain::blog::{BlogPatch, BlogSummary, BlogView};
use crate::domain::catalog::{FeaturedKind, PublishStatus};
use crate::errors::AppError;
use crate::infrastructure::blog_repo::DieselBlogRepository;

use super::identity::Identity;
use super::{created, ok, ok_message, PageWindowDto};

const DEFAULT_PAGE_SIZE: i64 = 10;

fn service(pool: &DbPool) -> BlogService<DieselBlogRepository> {
    BlogService::new(DieselBlogRepository::new(pool.clone()))
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub category_id: Uuid,
    pub category_title: Option<String>,
    pub status: String,
    pub featured: bool,
    pub created_at: String,
}

impl From<BlogSummary> for BlogSummaryDto {
    fn from(v: BlogSummary) -> Self {
        Self {
            id: v.id,
            title: v.title,
            slug: v.slug,
            description: v.description,
            thumbnail: v.thumbnail,
            category_id: v.category_id,
            category_title: v.category_title,
            status: v.status,
            featured: v.featured,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogDto {
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
    pub created_at: String,
}

impl From<BlogView> for BlogDto {
    fn from(v: BlogView) -> Self {
        Self {
            id: v.id,
            title: v.title,
            slug: v.slug,
            description: v.description,
            content: v.content,
            thumbnail: v.thumbnail,
            category_id: v.category_id,
            category_title: v.category_title,
            status: v.status,
            featured: v.featured,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogListingDto {
    pub items: Vec<BlogSummaryDto>,
    pub pagination: PageWindowDto,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBlogsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CuratedBlogParams {
    pub limit: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlogRequest {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub thumbnail: Option<String>,
    pub category_id: Uuid,
    /// active or inactive; new posts start inactive when absent
    pub status: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub thumbnail: Option<String>,
    pub category_id: Option<Uuid>,
    pub status: Option<String>,
    pub featured: Option<bool>,
}

fn parse_status(raw: Option<String>) -> Result<Option<PublishStatus>, AppError> {
    raw.map(|s| PublishStatus::parse(&s))
        .transpose()
        .map_err(Into::into)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /blog
///
/// Active posts, newest first; listings never carry the content body.
#[utoipa::path(
    get,
    path = "/blog",
    params(ListBlogsParams),
    responses((status = 200, description = "Paginated post listing", body = BlogListingDto)),
    tag = "blog"
)]
pub async fn index(
    pool: web::Data<DbPool>,
    query: web::Query<ListBlogsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let listing = web::block(move || {
        service(&pool).list(params.page, params.limit.unwrap_or(DEFAULT_PAGE_SIZE))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok(
        "Posts fetched",
        BlogListingDto {
            items: listing.items.into_iter().map(Into::into).collect(),
            pagination: listing.window.into(),
        },
    ))
}

/// GET /blog/featured?type=featured|new
#[utoipa::path(
    get,
    path = "/blog/featured",
    params(CuratedBlogParams),
    responses((status = 200, description = "Curated posts", body = [BlogSummaryDto])),
    tag = "blog"
)]
pub async fn featured(
    pool: web::Data<DbPool>,
    query: web::Query<CuratedBlogParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let limit = params.limit.unwrap_or(8);
    let kind = FeaturedKind::parse(params.kind.as_deref());
    let results = web::block(move || service(&pool).featured(kind, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<BlogSummaryDto> = results.into_iter().map(Into::into).collect();
    Ok(ok("Curated posts fetched", items))
}

/// GET /blog/detail/{id}
#[utoipa::path(
    get,
    path = "/blog/detail/{id}",
    params(("id" = Uuid, Path, description = "Post UUID")),
    responses(
        (status = 200, description = "Post found", body = BlogDto),
        (status = 404, description = "Post not found"),
    ),
    tag = "blog"
)]
pub async fn detail(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let post = web::block(move || service(&pool).detail(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Post fetched", BlogDto::from(post)))
}

/// POST /blog/create
///
/// The slug is derived from the title; a colliding slug is rejected.
#[utoipa::path(
    post,
    path = "/blog/create",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Post created", body = BlogDto),
        (status = 400, description = "Invalid post data or duplicate slug"),
        (status = 403, description = "Administrator access required"),
    ),
    tag = "blog"
)]
pub async fn create(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<CreateBlogRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let body = body.into_inner();
    let status = parse_status(body.status)?.unwrap_or(PublishStatus::Inactive);

    let post = web::block(move || {
        service(&pool).create(BlogDraft {
            title: body.title,
            description: body.description,
            content: body.content,
            thumbnail: body.thumbnail,
            category_id: body.category_id,
            status,
            featured: body.featured,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created("Post created", BlogDto::from(post)))
}

/// PATCH /blog/edit/{id}
#[utoipa::path(
    patch,
    path = "/blog/edit/{id}",
    params(("id" = Uuid, Path, description = "Post UUID")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Post updated", body = BlogDto),
        (status = 404, description = "Post not found"),
    ),
    tag = "blog"
)]
pub async fn edit(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBlogRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let id = path.into_inner();
    let body = body.into_inner();
    let status = parse_status(body.status)?;

    let post = web::block(move || {
        service(&pool).update(
            id,
            BlogPatch {
                title: body.title,
                description: body.description,
                content: body.content,
                thumbnail: body.thumbnail,
                category_id: body.category_id,
                status,
                featured: body.featured,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Post updated", BlogDto::from(post)))
}

/// PATCH /blog/change-status/{status}/{id}
#[utoipa::path(
    patch,
    path = "/blog/change-status/{status}/{id}",
    params(
        ("status" = String, Path, description = "active or inactive"),
        ("id" = Uuid, Path, description = "Post UUID"),
    ),
    responses(
        (status = 200, description = "Status changed"),
        (status = 400, description = "Unknown status value"),
        (status = 404, description = "Post not found"),
    ),
    tag = "blog"
)]
pub async fn change_status(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let (status, id) = path.into_inner();
    web::block(move || service(&pool).change_status(id, &status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_message("Post status updated"))
}

/// DELETE /blog/delete/{id}
#[utoipa::path(
    delete,
    path = "/blog/delete/{id}",
    params(("id" = Uuid, Path, description = "Post UUID")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 404, description = "Post not found"),
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
    web::block(move || service(&pool).delete(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_message("Post deleted"))
}
