use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::invoice::{
    InvoiceLineView, InvoicePatch, InvoiceView, NewInvoice,
};
use crate::domain::ports::InvoiceRepository;
use crate::schema::{invoice_lines, invoices};

use super::models::{
    InvoiceChangeset, InvoiceLineRow, InvoiceRow, NewInvoiceLineRow, NewInvoiceRow,
};

pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn line_view(row: InvoiceLineRow) -> InvoiceLineView {
    InvoiceLineView {
        product_id: row.product_id,
        title: row.title,
        quantity: row.quantity,
        unit_price: row.unit_price,
        line_total: row.line_total,
    }
}

fn invoice_view(row: InvoiceRow, lines: Vec<InvoiceLineRow>) -> InvoiceView {
    InvoiceView {
        id: row.id,
        user_id: row.user_id,
        order_number: row.order_number,
        customer_name: row.customer_name,
        customer_phone: row.customer_phone,
        customer_email: row.customer_email,
        shipping_address: row.shipping_address,
        sub_total: row.sub_total,
        tax: row.tax,
        discount: row.discount,
        total_amount: row.total_amount,
        status: row.status,
        payment_method: row.payment_method,
        notes: row.notes,
        created_at: row.created_at,
        lines: lines.into_iter().map(line_view).collect(),
    }
}

impl InvoiceRepository for DieselInvoiceRepository {
    fn list(&self, owner: Option<Uuid>) -> Result<Vec<InvoiceView>, DomainError> {
        let mut conn = self.pool.get()?;
        let mut q = invoices::table.into_boxed();
        if let Some(user_id) = owner {
            q = q.filter(invoices::user_id.eq(user_id));
        }
        let rows: Vec<InvoiceRow> = q
            .order(invoices::created_at.desc())
            .select(InvoiceRow::as_select())
            .load(&mut conn)?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut lines_by_invoice: HashMap<Uuid, Vec<InvoiceLineRow>> = HashMap::new();
        let lines: Vec<InvoiceLineRow> = invoice_lines::table
            .filter(invoice_lines::invoice_id.eq_any(ids))
            .select(InvoiceLineRow::as_select())
            .load(&mut conn)?;
        for line in lines {
            lines_by_invoice.entry(line.invoice_id).or_default().push(line);
        }

        Ok(rows
            .into_iter()
            .map(|r| {
                let lines = lines_by_invoice.remove(&r.id).unwrap_or_default();
                invoice_view(r, lines)
            })
            .collect())
    }

    fn create(&self, input: NewInvoice) -> Result<InvoiceView, DomainError> {
        let mut conn = self.pool.get()?;
        let invoice_id = Uuid::new_v4();
        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(invoices::table)
                .values(&NewInvoiceRow {
                    id: invoice_id,
                    user_id: input.user_id,
                    order_number: input.order_number.clone(),
                    customer_name: input.customer_name.clone(),
                    customer_phone: input.customer_phone.clone(),
                    customer_email: input.customer_email.clone(),
                    shipping_address: input.shipping_address.clone(),
                    sub_total: input.sub_total.clone(),
                    tax: input.tax.clone(),
                    discount: input.discount.clone(),
                    total_amount: input.total_amount.clone(),
                    status: input.status.as_str().to_string(),
                    payment_method: input.payment_method.as_str().to_string(),
                    notes: input.notes.clone(),
                })
                .execute(conn)
                .map_err(|e| match e {
                    diesel::result::Error::DatabaseError(
                        DatabaseErrorKind::UniqueViolation,
                        _,
                    ) => DomainError::InvalidInput(format!(
                        "order number '{}' already exists",
                        input.order_number
                    )),
                    other => other.into(),
                })?;

            let line_rows: Vec<NewInvoiceLineRow> = input
                .lines
                .iter()
                .map(|l| NewInvoiceLineRow {
                    id: Uuid::new_v4(),
                    invoice_id,
                    product_id: l.product_id,
                    title: l.title.clone(),
                    quantity: l.quantity,
                    unit_price: l.unit_price.clone(),
                    line_total: l.line_total.clone(),
                })
                .collect();
            diesel::insert_into(invoice_lines::table)
                .values(&line_rows)
                .execute(conn)?;
            Ok(())
        })?;

        let row = invoices::table
            .find(invoice_id)
            .select(InvoiceRow::as_select())
            .first(&mut conn)?;
        let lines = invoice_lines::table
            .filter(invoice_lines::invoice_id.eq(invoice_id))
            .select(InvoiceLineRow::as_select())
            .load(&mut conn)?;
        Ok(invoice_view(row, lines))
    }

    fn update(&self, id: Uuid, patch: InvoicePatch) -> Result<Option<InvoiceView>, DomainError> {
        let mut conn = self.pool.get()?;
        let changeset = InvoiceChangeset {
            status: patch.status.map(|s| s.as_str().to_string()),
            notes: patch.notes,
            updated_at: Utc::now(),
        };
        let updated = diesel::update(invoices::table.find(id))
            .set(&changeset)
            .execute(&mut conn)?;
        if updated == 0 {
            return Ok(None);
        }
        let row = invoices::table
            .find(id)
            .select(InvoiceRow::as_select())
            .first(&mut conn)?;
        let lines = invoice_lines::table
            .filter(invoice_lines::invoice_id.eq(id))
            .select(InvoiceLineRow::as_select())
            .load(&mut conn)?;
        Ok(Some(invoice_view(row, lines)))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        // invoice_lines go with the invoice via ON DELETE CASCADE.
        let deleted = diesel::delete(invoices::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::invoice::{InvoiceStatus, NewInvoiceLine, PaymentMethod};
    use crate::infrastructure::test_support::setup_db;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn new_invoice(user_id: Uuid, order_number: &str) -> NewInvoice {
        NewInvoice {
            user_id,
            order_number: order_number.to_string(),
            customer_name: "Nguyen Van A".to_string(),
            customer_phone: Some("0900000000".to_string()),
            customer_email: None,
            shipping_address: Some("12 Ly Thuong Kiet".to_string()),
            sub_total: dec("90.00"),
            tax: dec("0.00"),
            discount: dec("0.00"),
            total_amount: dec("90.00"),
            status: InvoiceStatus::Pending,
            payment_method: PaymentMethod::Cash,
            notes: None,
            lines: vec![NewInvoiceLine {
                product_id: Uuid::new_v4(),
                title: "Beef pho".to_string(),
                quantity: 2,
                unit_price: dec("45.00"),
                line_total: dec("90.00"),
            }],
        }
    }

    #[tokio::test]
    async fn create_then_list_round_trips_header_and_lines() {
        let (_container, pool) = setup_db().await;
        let repo = DieselInvoiceRepository::new(pool);
        let user = Uuid::new_v4();

        let created = repo.create(new_invoice(user, "INV-0001")).expect("create");
        assert_eq!(created.lines.len(), 1);
        assert_eq!(created.total_amount, dec("90.00"));

        let mine = repo.list(Some(user)).expect("list");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].order_number, "INV-0001");
        assert_eq!(mine[0].lines[0].quantity, 2);

        let someone_else = repo.list(Some(Uuid::new_v4())).expect("list");
        assert!(someone_else.is_empty());
    }

    #[tokio::test]
    async fn duplicate_order_number_is_rejected() {
        let (_container, pool) = setup_db().await;
        let repo = DieselInvoiceRepository::new(pool);

        repo.create(new_invoice(Uuid::new_v4(), "INV-0002"))
            .expect("create");
        let dup = repo.create(new_invoice(Uuid::new_v4(), "INV-0002"));
        assert!(matches!(dup, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn status_update_and_delete() {
        let (_container, pool) = setup_db().await;
        let repo = DieselInvoiceRepository::new(pool);
        let created = repo
            .create(new_invoice(Uuid::new_v4(), "INV-0003"))
            .expect("create");

        let updated = repo
            .update(
                created.id,
                InvoicePatch {
                    status: Some(InvoiceStatus::Shipped),
                    notes: Some("left at the door".to_string()),
                },
            )
            .expect("update")
            .expect("invoice");
        assert_eq!(updated.status, "shipped");

        assert!(repo.delete(created.id).expect("delete"));
        assert!(repo.update(created.id, InvoicePatch::default()).expect("update").is_none());
    }
}
