//! Domain error model.

use thiserror::Error;

use crate::id::{InvoiceId, ProductId};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Range of admissible stock values (half-open: 20 itself is rejected).
pub const STOCK_RANGE: core::ops::Range<i64> = 0..20;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// existence checks, range checks). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No product exists with the given id.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// No invoice exists with the given id.
    #[error("invoice {0} not found")]
    InvoiceNotFound(InvoiceId),

    /// A product with the same name already exists.
    #[error("a product named {0:?} already exists")]
    ProductAlreadyExists(String),

    /// Stock is outside [`STOCK_RANGE`].
    #[error("stock {stock} is out of range (0..20)")]
    StockOutOfRange { stock: i64 },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn product_not_found(id: ProductId) -> Self {
        Self::ProductNotFound(id)
    }

    pub fn invoice_not_found(id: InvoiceId) -> Self {
        Self::InvoiceNotFound(id)
    }

    pub fn product_already_exists(name: impl Into<String>) -> Self {
        Self::ProductAlreadyExists(name.into())
    }

    pub fn stock_out_of_range(stock: i64) -> Self {
        Self::StockOutOfRange { stock }
    }
}
