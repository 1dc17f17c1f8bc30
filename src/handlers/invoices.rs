use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::invoice_service::InvoiceService;
use crate::db::DbPool;
use crate::domain::invoice::{
    InvoiceLineView, InvoicePatch, InvoiceStatus, InvoiceView, NewInvoice, NewInvoiceLine,
    PaymentMethod,
};
use crate::errors::AppError;
use crate::infrastructure::invoice_repo::DieselInvoiceRepository;

use super::identity::Identity;
use super::products::parse_money;
use super::{created, ok, ok_message};

fn service(pool: &DbPool) -> InvoiceService<DieselInvoiceRepository> {
    InvoiceService::new(DieselInvoiceRepository::new(pool.clone()))
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceLineDto {
    pub product_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<InvoiceLineView> for InvoiceLineDto {
    fn from(v: InvoiceLineView) -> Self {
        Self {
            product_id: v.product_id,
            title: v.title,
            quantity: v.quantity,
            unit_price: v.unit_price.to_string(),
            line_total: v.line_total.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub shipping_address: Option<String>,
    pub sub_total: String,
    pub tax: String,
    pub discount: String,
    pub total_amount: String,
    pub status: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub lines: Vec<InvoiceLineDto>,
}

impl From<InvoiceView> for InvoiceDto {
    fn from(v: InvoiceView) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            order_number: v.order_number,
            customer_name: v.customer_name,
            customer_phone: v.customer_phone,
            customer_email: v.customer_email,
            shipping_address: v.shipping_address,
            sub_total: v.sub_total.to_string(),
            tax: v.tax.to_string(),
            discount: v.discount.to_string(),
            total_amount: v.total_amount.to_string(),
            status: v.status,
            payment_method: v.payment_method,
            notes: v.notes,
            created_at: v.created_at.to_rfc3339(),
            lines: v.lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvoiceLineRequest {
    pub product_id: Uuid,
    /// Product title snapshot at purchase time
    pub title: String,
    pub quantity: i32,
    /// Decimal amount as a string, e.g. "45.00"
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvoiceRequest {
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub shipping_address: Option<String>,
    pub sub_total: String,
    pub tax: Option<String>,
    pub discount: Option<String>,
    pub total_amount: String,
    /// pending (default), processing, shipped, delivered, or cancelled
    pub status: Option<String>,
    /// cash, card, transfer, or ewallet
    pub payment_method: String,
    pub notes: Option<String>,
    pub lines: Vec<CreateInvoiceLineRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInvoiceRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /invoices
///
/// Administrators see every invoice; everyone else only their own.
#[utoipa::path(
    get,
    path = "/invoices",
    responses(
        (status = 200, description = "Invoices, newest first", body = [InvoiceDto]),
        (status = 401, description = "Missing caller identity"),
    ),
    tag = "invoices"
)]
pub async fn index(pool: web::Data<DbPool>, identity: Identity) -> Result<HttpResponse, AppError> {
    let owner = if identity.is_admin() {
        None
    } else {
        Some(identity.user_id)
    };
    let invoices = web::block(move || service(&pool).list(owner))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<InvoiceDto> = invoices.into_iter().map(Into::into).collect();
    Ok(ok("Invoices fetched", items))
}

/// POST /invoices/create
///
/// The invoice is always attributed to the caller, whatever the body says.
#[utoipa::path(
    post,
    path = "/invoices/create",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created", body = InvoiceDto),
        (status = 400, description = "Invalid invoice data or duplicate order number"),
    ),
    tag = "invoices"
)]
pub async fn create(
    pool: web::Data<DbPool>,
    identity: Identity,
    body: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let status = body
        .status
        .as_deref()
        .map(InvoiceStatus::parse)
        .transpose()?
        .unwrap_or(InvoiceStatus::Pending);
    let payment_method = PaymentMethod::parse(&body.payment_method)?;
    let sub_total = parse_money(&body.sub_total, "sub_total")?;
    let tax = body
        .tax
        .as_deref()
        .map(|t| parse_money(t, "tax"))
        .transpose()?
        .unwrap_or_else(zero);
    let discount = body
        .discount
        .as_deref()
        .map(|d| parse_money(d, "discount"))
        .transpose()?
        .unwrap_or_else(zero);
    let total_amount = parse_money(&body.total_amount, "total_amount")?;

    let mut lines = Vec::with_capacity(body.lines.len());
    for line in body.lines {
        lines.push(NewInvoiceLine {
            product_id: line.product_id,
            title: line.title,
            quantity: line.quantity,
            unit_price: parse_money(&line.unit_price, "unit_price")?,
            line_total: parse_money(&line.line_total, "line_total")?,
        });
    }

    let input = NewInvoice {
        user_id: identity.user_id,
        order_number: body.order_number,
        customer_name: body.customer_name,
        customer_phone: body.customer_phone,
        customer_email: body.customer_email,
        shipping_address: body.shipping_address,
        sub_total,
        tax,
        discount,
        total_amount,
        status,
        payment_method,
        notes: body.notes,
        lines,
    };

    let invoice = web::block(move || service(&pool).create(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(created("Invoice created", InvoiceDto::from(invoice)))
}

/// PATCH /invoices/edit/{id}
#[utoipa::path(
    patch,
    path = "/invoices/edit/{id}",
    params(("id" = Uuid, Path, description = "Invoice UUID")),
    request_body = UpdateInvoiceRequest,
    responses(
        (status = 200, description = "Invoice updated", body = InvoiceDto),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "invoices"
)]
pub async fn edit(
    pool: web::Data<DbPool>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    identity.require_admin()?;
    let id = path.into_inner();
    let body = body.into_inner();
    let status = body
        .status
        .as_deref()
        .map(InvoiceStatus::parse)
        .transpose()?;

    let invoice = web::block(move || {
        service(&pool).update(
            id,
            InvoicePatch {
                status,
                notes: body.notes,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(ok("Invoice updated", InvoiceDto::from(invoice)))
}

/// DELETE /invoices/delete/{id}
#[utoipa::path(
    delete,
    path = "/invoices/delete/{id}",
    params(("id" = Uuid, Path, description = "Invoice UUID")),
    responses(
        (status = 200, description = "Invoice deleted"),
        (status = 404, description = "Invoice not found"),
    ),
    tag = "invoices"
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

    Ok(ok_message("Invoice deleted"))
}
