//! Business services on top of the repositories.
//!
//! Services own the rules that need storage to enforce (existence checks,
//! name uniqueness) and the invoice/detail aggregation. Pure field validation
//! lives in the domain crates.

pub mod invoices;
pub mod products;

use thiserror::Error;

use factura_core::DomainError;

use crate::repositories::RepositoryError;

pub use invoices::{InvoiceService, InvoiceWithDetails};
pub use products::ProductService;

/// Failure surfaced by a service call: either a business rule or storage.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("repository failure: {0}")]
    Repository(#[from] RepositoryError),
}
