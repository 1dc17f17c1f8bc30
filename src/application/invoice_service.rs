use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::invoice::{InvoicePatch, InvoiceView, NewInvoice};
use crate::domain::ports::InvoiceRepository;

pub struct InvoiceService<R> {
    repo: R,
}

impl<R: InvoiceRepository> InvoiceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self, owner: Option<Uuid>) -> Result<Vec<InvoiceView>, DomainError> {
        self.repo.list(owner)
    }

    pub fn create(&self, input: NewInvoice) -> Result<InvoiceView, DomainError> {
        if input.lines.is_empty() {
            return Err(DomainError::InvalidInput(
                "an invoice needs at least one line".to_string(),
            ));
        }
        if input.lines.iter().any(|l| l.quantity < 1) {
            return Err(DomainError::InvalidQuantity);
        }
        self.repo.create(input)
    }

    pub fn update(&self, id: Uuid, patch: InvoicePatch) -> Result<InvoiceView, DomainError> {
        self.repo.update(id, patch)?.ok_or(DomainError::NotFound)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }
}
