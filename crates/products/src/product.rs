use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factura_core::error::STOCK_RANGE;
use factura_core::{DomainError, DomainResult, Entity, ProductId};

/// Stored product entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

/// Partial update: `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

impl NewProduct {
    /// Validate field-level rules.
    ///
    /// Stock range is checked first so callers can rely on out-of-range stock
    /// being rejected before any other work (name uniqueness is a repository
    /// concern and lives in the service layer).
    pub fn validate(&self) -> DomainResult<()> {
        validate_stock(self.stock)?;
        validate_name(&self.name)?;
        validate_price(self.price)?;
        Ok(())
    }
}

impl Product {
    /// Build a validated product from creation input.
    pub fn new(id: ProductId, input: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        input.validate()?;
        Ok(Self {
            id,
            name: input.name,
            price: input.price,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update, re-validating every touched field.
    pub fn apply_update(&mut self, update: ProductUpdate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(stock) = update.stock {
            validate_stock(stock)?;
        }
        if let Some(ref name) = update.name {
            validate_name(name)?;
        }
        if let Some(price) = update.price {
            validate_price(price)?;
        }

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

pub fn validate_stock(stock: i64) -> DomainResult<()> {
    if !STOCK_RANGE.contains(&stock) {
        return Err(DomainError::stock_out_of_range(stock));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation("price must be a non-negative number"));
    }
    Ok(())
}
