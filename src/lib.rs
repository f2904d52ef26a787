//! Dairy Ledger Library
//!
//! Core logic for a dairy-distribution back office: GST line arithmetic,
//! inward/outward totals, amounts in words, invoice rendering, CSV export
//! and a typed client for the REST backend.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod validation;

pub use errors::ServiceError;
pub use models::{InwardTransaction, LineItem, OutwardTransaction};
pub use services::calculation::{document_total, DocumentTotals, LineAmounts, TotalBasis};
pub use services::invoice_template::{render_invoice_html, InvoiceDocument};
pub use services::words::convert_to_words;
