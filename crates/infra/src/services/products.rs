use std::sync::Arc;

use chrono::Utc;

use factura_core::{DomainError, ProductId};
use factura_products::{NewProduct, Product, ProductUpdate};

use crate::repositories::ProductRepository;
use crate::services::ServiceError;

/// Product CRUD with the two storage-backed business rules: lookups by id
/// must exist, and names must be unique.
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn find_by_id(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::product_not_found(id).into())
    }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.products.list().await?)
    }

    pub async fn create(&self, input: NewProduct) -> Result<Product, ServiceError> {
        // Field validation first (stock range ahead of everything else), so an
        // out-of-range request never touches the repository.
        input.validate()?;

        if self.products.find_by_name(&input.name).await?.is_some() {
            return Err(DomainError::product_already_exists(input.name).into());
        }

        let product = Product::new(ProductId::new(), input, Utc::now())?;
        self.products.insert(product.clone()).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product, ServiceError> {
        let mut product = self.find_by_id(id).await?;

        // Renaming must not collide with another product; keeping the same
        // name is fine.
        if let Some(ref name) = update.name {
            if *name != product.name {
                if let Some(existing) = self.products.find_by_name(name).await? {
                    if existing.id != id {
                        return Err(DomainError::product_already_exists(name.clone()).into());
                    }
                }
            }
        }

        product.apply_update(update, Utc::now())?;
        self.products.update(product.clone()).await?;
        tracing::info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), ServiceError> {
        if !self.products.delete(id).await? {
            return Err(DomainError::product_not_found(id).into());
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}
