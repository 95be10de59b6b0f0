//! Repository abstractions over entity storage.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use factura_core::{InvoiceId, ProductId};
use factura_invoicing::{Invoice, InvoiceDetail};
use factura_products::Product;

pub use memory::{InMemoryInvoiceDetailRepository, InMemoryInvoiceRepository, InMemoryProductRepository};
pub use postgres::{
    PostgresInvoiceDetailRepository, PostgresInvoiceRepository, PostgresProductRepository,
};

/// Storage-level failure. Domain failures (not found, conflicts) are not
/// errors at this layer; they surface as `Ok(None)` / `Ok(false)`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: Product) -> Result<(), RepositoryError>;
    async fn update(&self, product: Product) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;
    /// Returns `false` when no product with that id existed.
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn insert(&self, invoice: Invoice) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Invoice>, RepositoryError>;
    /// Returns `false` when no invoice with that id existed.
    async fn delete(&self, id: InvoiceId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait InvoiceDetailRepository: Send + Sync {
    async fn insert(&self, detail: InvoiceDetail) -> Result<(), RepositoryError>;
    async fn find_all_by_invoice_id(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<InvoiceDetail>, RepositoryError>;
    /// Remove every detail line of an invoice; returns the number removed.
    async fn delete_by_invoice_id(&self, invoice_id: InvoiceId) -> Result<u64, RepositoryError>;
}
