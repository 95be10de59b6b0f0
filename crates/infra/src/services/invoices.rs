use std::sync::Arc;

use chrono::Utc;

use factura_core::{DomainError, InvoiceDetailId, InvoiceId};
use factura_invoicing::{Invoice, InvoiceDetail, NewInvoice, NewInvoiceDetail};

use crate::repositories::{InvoiceDetailRepository, InvoiceRepository, ProductRepository};
use crate::services::ServiceError;

/// An invoice header with its detail lines glued on.
///
/// Details live in their own table/store and are attached after a separate
/// per-invoice query.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceWithDetails {
    pub invoice: Invoice,
    pub details: Vec<InvoiceDetail>,
}

#[derive(Clone)]
pub struct InvoiceService {
    invoices: Arc<dyn InvoiceRepository>,
    details: Arc<dyn InvoiceDetailRepository>,
    products: Arc<dyn ProductRepository>,
}

impl InvoiceService {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        details: Arc<dyn InvoiceDetailRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            invoices,
            details,
            products,
        }
    }

    /// Create an invoice with zero or more detail lines.
    ///
    /// Every referenced product must exist; the check runs before anything is
    /// persisted so a bad line never leaves a half-written invoice behind.
    pub async fn create(
        &self,
        input: NewInvoice,
        lines: Vec<NewInvoiceDetail>,
    ) -> Result<InvoiceWithDetails, ServiceError> {
        let now = Utc::now();
        let invoice = Invoice::new(InvoiceId::new(), input, now)?;

        for line in &lines {
            line.validate()?;
            if self.products.find_by_id(line.product_id).await?.is_none() {
                return Err(DomainError::product_not_found(line.product_id).into());
            }
        }

        self.invoices.insert(invoice.clone()).await?;

        let mut details = Vec::with_capacity(lines.len());
        for line in lines {
            let detail = InvoiceDetail::new(InvoiceDetailId::new(), invoice.id, line, now)?;
            self.details.insert(detail.clone()).await?;
            details.push(detail);
        }

        tracing::info!(invoice_id = %invoice.id, lines = details.len(), "invoice created");
        Ok(InvoiceWithDetails { invoice, details })
    }

    pub async fn find_by_id(&self, id: InvoiceId) -> Result<InvoiceWithDetails, ServiceError> {
        let invoice = self
            .invoices
            .find_by_id(id)
            .await?
            .ok_or(DomainError::invoice_not_found(id))?;
        let details = self.details.find_all_by_invoice_id(id).await?;
        Ok(InvoiceWithDetails { invoice, details })
    }

    /// List every invoice with its details attached.
    pub async fn find_all(&self) -> Result<Vec<InvoiceWithDetails>, ServiceError> {
        let invoices = self.invoices.list().await?;
        let mut out = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            let details = self.details.find_all_by_invoice_id(invoice.id).await?;
            out.push(InvoiceWithDetails { invoice, details });
        }
        Ok(out)
    }

    /// Delete an invoice together with its detail lines.
    pub async fn delete(&self, id: InvoiceId) -> Result<(), ServiceError> {
        if self.invoices.find_by_id(id).await?.is_none() {
            return Err(DomainError::invoice_not_found(id).into());
        }
        self.details.delete_by_invoice_id(id).await?;
        self.invoices.delete(id).await?;
        tracing::info!(invoice_id = %id, "invoice deleted");
        Ok(())
    }
}
