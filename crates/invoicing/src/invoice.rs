use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factura_core::{DomainError, DomainResult, Entity, InvoiceDetailId, InvoiceId, ProductId};

/// Stored invoice header.
///
/// Details are stored separately and attached after a second query; see
/// `InvoiceService::find_all` in the infra crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub client_ci: String,
    pub client_name: String,
    pub client_address: String,
    pub total_before_taxes: Option<f64>,
    pub taxes: Option<f64>,
    pub total_after_taxes: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored invoice detail line: links one invoice to one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub id: InvoiceDetailId,
    pub invoice_id: InvoiceId,
    pub product_id: ProductId,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an invoice header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub client_ci: String,
    pub client_name: String,
    pub client_address: String,
    pub total_before_taxes: Option<f64>,
    pub taxes: Option<f64>,
    pub total_after_taxes: Option<f64>,
}

/// Input for one detail line of a new invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoiceDetail {
    pub product_id: ProductId,
    pub total_price: f64,
}

impl NewInvoice {
    pub fn validate(&self) -> DomainResult<()> {
        validate_client_field("client_ci", &self.client_ci)?;
        validate_client_field("client_name", &self.client_name)?;
        validate_client_field("client_address", &self.client_address)?;
        validate_total("total_before_taxes", self.total_before_taxes)?;
        validate_total("taxes", self.taxes)?;
        validate_total("total_after_taxes", self.total_after_taxes)?;
        Ok(())
    }
}

impl NewInvoiceDetail {
    pub fn validate(&self) -> DomainResult<()> {
        validate_total("total_price", Some(self.total_price))
    }
}

impl Invoice {
    /// Build a validated invoice header from creation input.
    pub fn new(id: InvoiceId, input: NewInvoice, now: DateTime<Utc>) -> DomainResult<Self> {
        input.validate()?;
        Ok(Self {
            id,
            client_ci: input.client_ci,
            client_name: input.client_name,
            client_address: input.client_address,
            total_before_taxes: input.total_before_taxes,
            taxes: input.taxes,
            total_after_taxes: input.total_after_taxes,
            created_at: now,
            updated_at: now,
        })
    }
}

impl InvoiceDetail {
    /// Build a validated detail line attached to an invoice.
    pub fn new(
        id: InvoiceDetailId,
        invoice_id: InvoiceId,
        input: NewInvoiceDetail,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        input.validate()?;
        Ok(Self {
            id,
            invoice_id,
            product_id: input.product_id,
            total_price: input.total_price,
            created_at: now,
        })
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for InvoiceDetail {
    type Id = InvoiceDetailId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_client_field(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn validate_total(field: &str, value: Option<f64>) -> DomainResult<()> {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            return Err(DomainError::validation(format!(
                "{field} must be a non-negative number"
            )));
        }
    }
    Ok(())
}
