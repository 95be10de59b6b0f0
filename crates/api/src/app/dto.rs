use serde::Deserialize;

use factura_infra::services::InvoiceWithDetails;
use factura_invoicing::InvoiceDetail;
use factura_products::Product;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceDetailRequest {
    pub product_id: String,
    pub total_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub client_ci: String,
    pub client_name: String,
    pub client_address: String,
    pub total_before_taxes: Option<f64>,
    pub taxes: Option<f64>,
    pub total_after_taxes: Option<f64>,
    #[serde(default)]
    pub details: Vec<InvoiceDetailRequest>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id.to_string(),
        "name": p.name,
        "price": p.price,
        "stock": p.stock,
        "created_at": p.created_at.to_rfc3339(),
        "updated_at": p.updated_at.to_rfc3339(),
    })
}

pub fn invoice_to_json(rm: &InvoiceWithDetails) -> serde_json::Value {
    serde_json::json!({
        "id": rm.invoice.id.to_string(),
        "client_ci": rm.invoice.client_ci,
        "client_name": rm.invoice.client_name,
        "client_address": rm.invoice.client_address,
        "total_before_taxes": rm.invoice.total_before_taxes,
        "taxes": rm.invoice.taxes,
        "total_after_taxes": rm.invoice.total_after_taxes,
        "created_at": rm.invoice.created_at.to_rfc3339(),
        "details": rm.details.iter().map(detail_to_json).collect::<Vec<_>>(),
    })
}

pub fn detail_to_json(d: &InvoiceDetail) -> serde_json::Value {
    serde_json::json!({
        "id": d.id.to_string(),
        "invoice_id": d.invoice_id.to_string(),
        "product_id": d.product_id.to_string(),
        "total_price": d.total_price,
    })
}
