use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// Transport-level error. Carries a user-facing message for client faults
/// and hides the detail of internal ones.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidProductData(_)
            | DomainError::InvalidQuantity
            | DomainError::InvalidPageSize
            | DomainError::InvalidInput(_) => AppError::BadRequest(e.to_string()),
            DomainError::ProductUnavailable
            | DomainError::CartNotFound
            | DomainError::LineNotFound
            | DomainError::NotFound => AppError::NotFound(e.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = |message: &str| {
            json!({
                "success": false,
                "message": message,
            })
        };
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(body(msg)),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(body(msg)),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(body(msg)),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(body(msg)),
            AppError::Internal(msg) => {
                log::error!("internal error: {msg}");
                HttpResponse::InternalServerError().json(body("Internal server error"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn validation_kinds_map_to_400() {
        for e in [
            DomainError::InvalidQuantity,
            DomainError::InvalidPageSize,
            DomainError::InvalidProductData("bad".to_string()),
            DomainError::InvalidInput("bad".to_string()),
        ] {
            let app: AppError = e.into();
            assert_eq!(
                app.error_response().status(),
                actix_web::http::StatusCode::BAD_REQUEST
            );
        }
    }

    #[test]
    fn not_found_kinds_map_to_404() {
        for e in [
            DomainError::ProductUnavailable,
            DomainError::CartNotFound,
            DomainError::LineNotFound,
            DomainError::NotFound,
        ] {
            let app: AppError = e.into();
            assert_eq!(
                app.error_response().status(),
                actix_web::http::StatusCode::NOT_FOUND
            );
        }
    }

    #[test]
    fn internal_hides_the_message() {
        let app: AppError = DomainError::Internal("connection refused".to_string()).into();
        let resp = app.error_response();
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unauthorized_and_forbidden_statuses() {
        assert_eq!(
            AppError::Unauthorized("sign in".to_string())
                .error_response()
                .status(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("admins only".to_string())
                .error_response()
                .status(),
            actix_web::http::StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn quantity_error_keeps_its_message() {
        let app: AppError = DomainError::InvalidQuantity.into();
        assert_eq!(app.to_string(), "quantity must be a positive integer");
    }
}
