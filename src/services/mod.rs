// Pure calculations
pub mod calculation;
pub mod words;

// Invoice rendering and output
pub mod invoice_template;
pub mod invoicing;
pub mod print;

// Backend access
pub mod api_client;
pub mod transactions;

// Reporting
pub mod csv_export;
