//! `factura-api` — HTTP surface for the inventory/invoicing backend.

pub mod app;
