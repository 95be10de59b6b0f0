use std::sync::Arc;

use sqlx::PgPool;

use factura_infra::repositories::{
    InMemoryInvoiceDetailRepository, InMemoryInvoiceRepository, InMemoryProductRepository,
    InvoiceDetailRepository, InvoiceRepository, PostgresInvoiceDetailRepository,
    PostgresInvoiceRepository, PostgresProductRepository, ProductRepository, postgres,
};
use factura_infra::services::{InvoiceService, ProductService};

/// Services shared by every handler via `Extension`.
pub struct AppServices {
    pub products: ProductService,
    pub invoices: InvoiceService,
}

/// Wire repositories + services.
///
/// `USE_PERSISTENT_STORES=true` selects Postgres (requires `DATABASE_URL`);
/// anything else gets in-memory stores for dev/test.
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        build_persistent_services().await
    } else {
        build_in_memory_services()
    }
}

fn build_in_memory_services() -> AppServices {
    let products: Arc<dyn ProductRepository> = Arc::new(InMemoryProductRepository::new());
    let invoices: Arc<dyn InvoiceRepository> = Arc::new(InMemoryInvoiceRepository::new());
    let details: Arc<dyn InvoiceDetailRepository> = Arc::new(InMemoryInvoiceDetailRepository::new());

    wire(products, invoices, details)
}

async fn build_persistent_services() -> AppServices {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    postgres::ensure_schema(&pool)
        .await
        .expect("failed to create database schema");

    let products: Arc<dyn ProductRepository> = Arc::new(PostgresProductRepository::new(pool.clone()));
    let invoices: Arc<dyn InvoiceRepository> = Arc::new(PostgresInvoiceRepository::new(pool.clone()));
    let details: Arc<dyn InvoiceDetailRepository> =
        Arc::new(PostgresInvoiceDetailRepository::new(pool));

    wire(products, invoices, details)
}

fn wire(
    products: Arc<dyn ProductRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    details: Arc<dyn InvoiceDetailRepository>,
) -> AppServices {
    AppServices {
        products: ProductService::new(products.clone()),
        invoices: InvoiceService::new(invoices, details, products),
    }
}
