//! `factura-infra` — storage and service layer.
//!
//! Repositories persist the domain entities (in-memory for dev/tests,
//! Postgres for real deployments); services carry the business logic on top
//! of them and are what the HTTP layer talks to.

pub mod repositories;
pub mod services;

pub use repositories::{
    InvoiceDetailRepository, InvoiceRepository, ProductRepository, RepositoryError,
};
pub use services::{InvoiceService, InvoiceWithDetails, ProductService, ServiceError};
