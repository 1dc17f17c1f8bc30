pub mod blog_categories;
pub mod blogs;
pub mod cart;
pub mod categories;
pub mod identity;
pub mod invoices;
pub mod products;

use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::pagination::PageWindow;

/// The `{success, message, data?}` envelope every endpoint answers with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub(crate) fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        success: true,
        message: message.to_string(),
        data: Some(data),
    })
}

pub(crate) fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse {
        success: true,
        message: message.to_string(),
        data: Some(data),
    })
}

pub(crate) fn ok_message(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::<()> {
        success: true,
        message: message.to_string(),
        data: None,
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageWindowDto {
    pub page: i64,
    pub limit: i64,
    pub skip: i64,
    pub total_pages: i64,
}

impl From<PageWindow> for PageWindowDto {
    fn from(w: PageWindow) -> Self {
        Self {
            page: w.page,
            limit: w.page_size,
            skip: w.skip,
            total_pages: w.total_pages,
        }
    }
}
