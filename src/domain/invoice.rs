use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Processing => "processing",
            InvoiceStatus::Shipped => "shipped",
            InvoiceStatus::Delivered => "delivered",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "pending" => Ok(InvoiceStatus::Pending),
            "processing" => Ok(InvoiceStatus::Processing),
            "shipped" => Ok(InvoiceStatus::Shipped),
            "delivered" => Ok(InvoiceStatus::Delivered),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            other => Err(DomainError::InvalidInput(format!(
                "unknown invoice status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Ewallet,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Ewallet => "ewallet",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            "ewallet" => Ok(PaymentMethod::Ewallet),
            other => Err(DomainError::InvalidInput(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

/// Snapshot of one ordered product at purchase time.
#[derive(Debug, Clone)]
pub struct InvoiceLineView {
    pub product_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct InvoiceView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub shipping_address: Option<String>,
    pub sub_total: BigDecimal,
    pub tax: BigDecimal,
    pub discount: BigDecimal,
    pub total_amount: BigDecimal,
    pub status: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<InvoiceLineView>,
}

#[derive(Debug, Clone)]
pub struct NewInvoiceLine {
    pub product_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub user_id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub shipping_address: Option<String>,
    pub sub_total: BigDecimal,
    pub tax: BigDecimal,
    pub discount: BigDecimal,
    pub total_amount: BigDecimal,
    pub status: InvoiceStatus,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub lines: Vec<NewInvoiceLine>,
}

#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_parse() {
        for s in [
            InvoiceStatus::Pending,
            InvoiceStatus::Processing,
            InvoiceStatus::Shipped,
            InvoiceStatus::Delivered,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(InvoiceStatus::parse(s.as_str()), Ok(s));
        }
        assert!(InvoiceStatus::parse("refunded").is_err());
    }

    #[test]
    fn payment_method_round_trips_through_parse() {
        for m in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::Transfer,
            PaymentMethod::Ewallet,
        ] {
            assert_eq!(PaymentMethod::parse(m.as_str()), Ok(m));
        }
        assert!(PaymentMethod::parse("crypto").is_err());
    }
}
