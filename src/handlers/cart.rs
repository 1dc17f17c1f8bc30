use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::cart_service::CartService;
use crate::db::DbPool;
use crate::domain::cart::PricedCart;
use crate::errors::AppError;
use crate::infrastructure::cart_repo::DieselCartRepository;

use super::identity::Identity;
use super::products::ProductDto;
use super::{ok, ok_message};

fn service(pool: &DbPool) -> CartService<DieselCartRepository> {
    CartService::new(DieselCartRepository::new(pool.clone()))
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    /// Defaults to 1 when the body carries no quantity.
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartLineRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PricedLineDto {
    pub product: ProductDto,
    pub quantity: i32,
    /// Resolved unit price at read time, e.g. "45.00"
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PricedCartDto {
    pub products: Vec<PricedLineDto>,
    pub total_price: String,
}

impl From<PricedCart> for PricedCartDto {
    fn from(cart: PricedCart) -> Self {
        Self {
            products: cart
                .lines
                .into_iter()
                .map(|l| PricedLineDto {
                    product: l.product.into(),
                    quantity: l.quantity,
                    unit_price: l.unit_price.to_string(),
                    line_total: l.line_total.to_string(),
                })
                .collect(),
            total_price: cart.total_price.to_string(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
///
/// The priced view of the caller's cart. Prices are resolved from current
/// product state on every call; lines whose product is no longer available
/// are omitted here but stay in the stored cart.
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Priced cart view", body = PricedCartDto),
        (status = 401, description = "Missing caller identity"),
    ),
    tag = "cart"
)]
pub async fn index(pool: web::Data<DbPool>, identity: Identity) -> Result<HttpResponse, AppError> {
    let priced = web::block(move || service(&pool).priced_view(identity.user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Cart fetched", PricedCartDto::from(priced)))
}

/// POST /cart/add/{product_id}
///
/// Merge-add: adding a product already in the cart sums the quantities.
#[utoipa::path(
    post,
    path = "/cart/add/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product UUID")),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line merged into the cart"),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Product unavailable"),
    ),
    tag = "cart"
)]
pub async fn add(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: Option<web::Json<AddToCartRequest>>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    // Absent quantity defaults to 1 here at the transport boundary; the
    // service itself rejects anything below 1.
    let quantity = body.and_then(|b| b.quantity).unwrap_or(1);

    web::block(move || service(&pool).add_item(identity.user_id, product_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_message("Product added to cart"))
}

/// PATCH /cart/update/{product_id}
///
/// Overwrites the line's quantity, it does not add to it.
#[utoipa::path(
    patch,
    path = "/cart/update/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product UUID")),
    request_body = UpdateCartLineRequest,
    responses(
        (status = 200, description = "Quantity updated"),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Cart or line not found"),
    ),
    tag = "cart"
)]
pub async fn update(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCartLineRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let quantity = body.quantity;

    web::block(move || service(&pool).update_item(identity.user_id, product_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_message("Cart quantity updated"))
}

/// DELETE /cart/delete/{product_id}
///
/// Removing a product that is not in the cart succeeds without effect.
#[utoipa::path(
    delete,
    path = "/cart/delete/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Line removed (or was already absent)"),
        (status = 401, description = "Missing caller identity"),
    ),
    tag = "cart"
)]
pub async fn remove(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    web::block(move || service(&pool).remove_item(identity.user_id, product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok_message("Product removed from cart"))
}
