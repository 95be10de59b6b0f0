//! Postgres-backed repositories.
//!
//! Every query maps rows by hand via `try_get`; the schema is bootstrapped at
//! startup with [`ensure_schema`] so a fresh database works out of the box.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use factura_core::{InvoiceDetailId, InvoiceId, ProductId};
use factura_invoicing::{Invoice, InvoiceDetail};
use factura_products::Product;

use super::{
    InvoiceDetailRepository, InvoiceRepository, ProductRepository, RepositoryError,
};

/// Create the tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            price DOUBLE PRECISION NOT NULL,
            stock BIGINT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invoices (
            id UUID PRIMARY KEY,
            client_ci TEXT NOT NULL,
            client_name TEXT NOT NULL,
            client_address TEXT NOT NULL,
            total_before_taxes DOUBLE PRECISION,
            taxes DOUBLE PRECISION,
            total_after_taxes DOUBLE PRECISION,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invoice_details (
            id UUID PRIMARY KEY,
            invoice_id UUID NOT NULL REFERENCES invoices (id) ON DELETE CASCADE,
            product_id UUID NOT NULL REFERENCES products (id),
            total_price DOUBLE PRECISION NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS invoice_details_invoice_id_idx ON invoice_details (invoice_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        stock: row.try_get("stock")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn invoice_from_row(row: &PgRow) -> Result<Invoice, sqlx::Error> {
    Ok(Invoice {
        id: InvoiceId::from_uuid(row.try_get("id")?),
        client_ci: row.try_get("client_ci")?,
        client_name: row.try_get("client_name")?,
        client_address: row.try_get("client_address")?,
        total_before_taxes: row.try_get("total_before_taxes")?,
        taxes: row.try_get("taxes")?,
        total_after_taxes: row.try_get("total_after_taxes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn detail_from_row(row: &PgRow) -> Result<InvoiceDetail, sqlx::Error> {
    Ok(InvoiceDetail {
        id: InvoiceDetailId::from_uuid(row.try_get("id")?),
        invoice_id: InvoiceId::from_uuid(row.try_get("invoice_id")?),
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        total_price: row.try_get("total_price")?,
        created_at: row.try_get("created_at")?,
    })
}

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn insert(&self, product: Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, stock, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, product: Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE products
            SET name = $2, price = $3, stock = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, price, stock, created_at, updated_at FROM products WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| product_from_row(&r)).transpose().map_err(Into::into)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, price, stock, created_at, updated_at FROM products WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| product_from_row(&r)).transpose().map_err(Into::into)
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, price, stock, created_at, updated_at FROM products ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn insert(&self, invoice: Invoice) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, client_ci, client_name, client_address,
                total_before_taxes, taxes, total_after_taxes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(&invoice.client_ci)
        .bind(&invoice.client_name)
        .bind(&invoice.client_address)
        .bind(invoice.total_before_taxes)
        .bind(invoice.taxes)
        .bind(invoice.total_after_taxes)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, client_ci, client_name, client_address,
                   total_before_taxes, taxes, total_after_taxes,
                   created_at, updated_at
            FROM invoices WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| invoice_from_row(&r)).transpose().map_err(Into::into)
    }

    async fn list(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, client_ci, client_name, client_address,
                   total_before_taxes, taxes, total_after_taxes,
                   created_at, updated_at
            FROM invoices ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(invoice_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn delete(&self, id: InvoiceId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PostgresInvoiceDetailRepository {
    pool: PgPool,
}

impl PostgresInvoiceDetailRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceDetailRepository for PostgresInvoiceDetailRepository {
    async fn insert(&self, detail: InvoiceDetail) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO invoice_details (id, invoice_id, product_id, total_price, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(detail.id.as_uuid())
        .bind(detail.invoice_id.as_uuid())
        .bind(detail.product_id.as_uuid())
        .bind(detail.total_price)
        .bind(detail.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_all_by_invoice_id(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<InvoiceDetail>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, invoice_id, product_id, total_price, created_at
            FROM invoice_details
            WHERE invoice_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(invoice_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(detail_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn delete_by_invoice_id(&self, invoice_id: InvoiceId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM invoice_details WHERE invoice_id = $1")
            .bind(invoice_id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
