use thiserror::Error;

/// Closed set of failures a storefront operation can end in. Every operation
/// either succeeds or returns one of these kinds; nothing bubbles up
/// unclassified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid product data: {0}")]
    InvalidProductData(String),
    #[error("quantity must be a positive integer")]
    InvalidQuantity,
    #[error("product does not exist or is unavailable")]
    ProductUnavailable,
    #[error("cart not found")]
    CartNotFound,
    #[error("product is not in the cart")]
    LineNotFound,
    #[error("page size must be positive")]
    InvalidPageSize,
    #[error("{0}")]
    InvalidInput(String),
    #[error("record not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}
