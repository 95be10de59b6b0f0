//! In-memory repositories for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use factura_core::{InvoiceDetailId, InvoiceId, ProductId};
use factura_invoicing::{Invoice, InvoiceDetail};
use factura_products::Product;

use super::{
    InvoiceDetailRepository, InvoiceRepository, ProductRepository, RepositoryError,
};

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: Product) -> Result<(), RepositoryError> {
        if let Ok(mut map) = self.inner.write() {
            map.insert(product.id, product);
        }
        Ok(())
    }

    async fn update(&self, product: Product) -> Result<(), RepositoryError> {
        if let Ok(mut map) = self.inner.write() {
            map.insert(product.id, product);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.inner.read().ok().and_then(|map| map.get(&id).cloned()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .ok()
            .and_then(|map| map.values().find(|p| p.name == name).cloned()))
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut items: Vec<Product> = match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        };
        // Stable order regardless of hash map iteration.
        items.sort_by_key(|p| (p.created_at, p.id));
        Ok(items)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self
            .inner
            .write()
            .ok()
            .map(|mut map| map.remove(&id).is_some())
            .unwrap_or(false))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    inner: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn insert(&self, invoice: Invoice) -> Result<(), RepositoryError> {
        if let Ok(mut map) = self.inner.write() {
            map.insert(invoice.id, invoice);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        Ok(self.inner.read().ok().and_then(|map| map.get(&id).cloned()))
    }

    async fn list(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let mut items: Vec<Invoice> = match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        };
        items.sort_by_key(|i| (i.created_at, i.id));
        Ok(items)
    }

    async fn delete(&self, id: InvoiceId) -> Result<bool, RepositoryError> {
        Ok(self
            .inner
            .write()
            .ok()
            .map(|mut map| map.remove(&id).is_some())
            .unwrap_or(false))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryInvoiceDetailRepository {
    inner: RwLock<HashMap<InvoiceDetailId, InvoiceDetail>>,
}

impl InMemoryInvoiceDetailRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceDetailRepository for InMemoryInvoiceDetailRepository {
    async fn insert(&self, detail: InvoiceDetail) -> Result<(), RepositoryError> {
        if let Ok(mut map) = self.inner.write() {
            map.insert(detail.id, detail);
        }
        Ok(())
    }

    async fn find_all_by_invoice_id(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<InvoiceDetail>, RepositoryError> {
        let mut items: Vec<InvoiceDetail> = match self.inner.read() {
            Ok(map) => map
                .values()
                .filter(|d| d.invoice_id == invoice_id)
                .cloned()
                .collect(),
            Err(_) => vec![],
        };
        items.sort_by_key(|d| (d.created_at, d.id));
        Ok(items)
    }

    async fn delete_by_invoice_id(&self, invoice_id: InvoiceId) -> Result<u64, RepositoryError> {
        let mut removed = 0u64;
        if let Ok(mut map) = self.inner.write() {
            map.retain(|_, d| {
                let keep = d.invoice_id != invoice_id;
                if !keep {
                    removed += 1;
                }
                keep
            });
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use factura_invoicing::{NewInvoice, NewInvoiceDetail};
    use factura_products::NewProduct;

    fn product(name: &str) -> Product {
        Product::new(
            ProductId::new(),
            NewProduct {
                name: name.to_string(),
                price: 0.5,
                stock: 10,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn find_by_name_matches_exactly() {
        let repo = InMemoryProductRepository::new();
        repo.insert(product("telefono")).await.unwrap();

        assert!(repo.find_by_name("telefono").await.unwrap().is_some());
        assert!(repo.find_by_name("Telefono").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_existed() {
        let repo = InMemoryProductRepository::new();
        let p = product("laptop");
        let id = p.id;
        repo.insert(p).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn details_are_scoped_to_their_invoice() {
        let invoices = InMemoryInvoiceRepository::new();
        let details = InMemoryInvoiceDetailRepository::new();

        let now = Utc::now();
        let mk_invoice = |ci: &str| {
            Invoice::new(
                InvoiceId::new(),
                NewInvoice {
                    client_ci: ci.to_string(),
                    client_name: "Juan Perez".to_string(),
                    client_address: "Quito".to_string(),
                    total_before_taxes: None,
                    taxes: None,
                    total_after_taxes: None,
                },
                now,
            )
            .unwrap()
        };
        let a = mk_invoice("1723456789");
        let b = mk_invoice("0923456789");
        invoices.insert(a.clone()).await.unwrap();
        invoices.insert(b.clone()).await.unwrap();

        let detail = InvoiceDetail::new(
            InvoiceDetailId::new(),
            a.id,
            NewInvoiceDetail {
                product_id: ProductId::new(),
                total_price: 0.5,
            },
            now,
        )
        .unwrap();
        details.insert(detail).await.unwrap();

        assert_eq!(details.find_all_by_invoice_id(a.id).await.unwrap().len(), 1);
        assert!(details.find_all_by_invoice_id(b.id).await.unwrap().is_empty());

        assert_eq!(details.delete_by_invoice_id(a.id).await.unwrap(), 1);
        assert!(details.find_all_by_invoice_id(a.id).await.unwrap().is_empty());
    }
}
