//! CSV export of backend collections.
//!
//! Fields containing the delimiter, quotes or line breaks are quoted with
//! inner quotes doubled, so addresses such as `Pune, MH` stay one column.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rust_decimal::Decimal;
use strum::{Display, EnumString};
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::models::{
    Category, Customer, InwardTransaction, LineItem, OutwardTransaction, Product, Supplier,
    Transport, User, Warehouse,
};
use crate::services::calculation::{format_amount, DocumentTotals};

const DELIMITER: char = ',';

/// A record that can be flattened into one CSV row.
pub trait CsvRecord {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

/// Collections the CLI can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportResource {
    Inward,
    Outward,
    #[strum(to_string = "product", serialize = "products")]
    Product,
    Category,
    #[strum(to_string = "customer", serialize = "customers")]
    Customer,
    #[strum(to_string = "supplier", serialize = "suppliers")]
    Supplier,
    Warehouse,
    Transport,
    #[strum(to_string = "user", serialize = "users")]
    User,
}

pub fn escape_field(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

fn join_row(fields: impl IntoIterator<Item = String>) -> String {
    fields
        .into_iter()
        .map(|field| escape_field(&field, DELIMITER))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

/// Header line plus one line per record. Empty input still yields the header.
pub fn to_csv<T: CsvRecord>(records: &[T]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(join_row(T::headers().iter().map(|h| h.to_string())));
    lines.extend(records.iter().map(|record| join_row(record.row())));
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Writes `<dir>/<name>-<UTC timestamp>.csv` and returns its path.
#[instrument(skip(records), fields(rows = records.len()))]
pub async fn write_csv<T: CsvRecord>(
    dir: &Path,
    name: &str,
    records: &[T],
) -> Result<PathBuf, ServiceError> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}-{}.csv", name, Utc::now().format("%Y%m%d-%H%M%S")));
    fs::write(&path, to_csv(records)).await?;
    info!(path = %path.display(), "export written");
    Ok(path)
}

fn products_summary(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|item| format!("{} x {}", item.display_name(), item.quantity.normalize()))
        .collect::<Vec<_>>()
        .join("; ")
}

fn party_name<T>(party: Option<&T>, name: impl Fn(&T) -> &str) -> String {
    party.map(|p| name(p).to_string()).unwrap_or_default()
}

fn money(value: Decimal) -> String {
    format_amount(value)
}

/// Taxable value, GST and rental cells. Left blank when the lines cannot be
/// totalled so the rest of the export still goes out.
fn totals_cells(invoice_no: &str, items: &[LineItem], rental_cost: Decimal) -> [String; 3] {
    match DocumentTotals::from_items(items, rental_cost) {
        Ok(totals) => [
            money(totals.taxable_value),
            money(totals.total_gst),
            money(totals.rental_cost),
        ],
        Err(err) => {
            warn!(invoice_no = %invoice_no, error = %err, "leaving totals blank in export row");
            Default::default()
        }
    }
}

impl CsvRecord for InwardTransaction {
    fn headers() -> &'static [&'static str] {
        &[
            "Invoice No",
            "Date",
            "Supplier",
            "Source",
            "Destination",
            "Products",
            "Taxable Value",
            "GST",
            "Rental Cost",
            "Amount",
        ]
    }

    fn row(&self) -> Vec<String> {
        let [taxable_value, total_gst, rental_cost] =
            totals_cells(&self.invoice_no, &self.product_details, self.rental_cost());
        vec![
            self.invoice_no.clone(),
            self.date.clone(),
            party_name(self.supplier_details.as_ref(), |s| s.supplier_name.as_str()),
            self.source.clone(),
            self.destination.clone(),
            products_summary(&self.product_details),
            taxable_value,
            total_gst,
            rental_cost,
            money(self.amount),
        ]
    }
}

impl CsvRecord for OutwardTransaction {
    fn headers() -> &'static [&'static str] {
        &[
            "Invoice No",
            "Date",
            "Customer",
            "Source",
            "Products",
            "Taxable Value",
            "GST",
            "Rental Cost",
            "Total",
            "Payment Type",
            "Outstanding",
        ]
    }

    fn row(&self) -> Vec<String> {
        let [taxable_value, total_gst, rental_cost] =
            totals_cells(&self.invoice_no, &self.product_details, self.rental_cost());
        vec![
            self.invoice_no.clone(),
            self.date.clone(),
            party_name(self.customer_details.as_ref(), |c| c.customer_name.as_str()),
            self.source.clone(),
            products_summary(&self.product_details),
            taxable_value,
            total_gst,
            rental_cost,
            money(self.total),
            self.payment_type.to_string(),
            money(self.outstanding_payment),
        ]
    }
}

impl CsvRecord for Product {
    fn headers() -> &'static [&'static str] {
        &["Code", "Name", "Category", "Price", "Quantity", "GST %"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.product_code.clone(),
            self.product_name.clone(),
            self.category.label().to_string(),
            money(self.product_price),
            self.quantity.normalize().to_string(),
            self.gst_percentage.normalize().to_string(),
        ]
    }
}

impl CsvRecord for Category {
    fn headers() -> &'static [&'static str] {
        &["Name", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.category_name.clone(), self.description.clone()]
    }
}

impl CsvRecord for Customer {
    fn headers() -> &'static [&'static str] {
        &["Name", "Mobile", "GST No", "Address"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.customer_name.clone(),
            self.customer_mobile.clone(),
            self.customer_gst_no.clone(),
            self.customer_address.clone(),
        ]
    }
}

impl CsvRecord for Supplier {
    fn headers() -> &'static [&'static str] {
        &["Name", "Mobile", "GST No", "Address", "Bank", "Account No", "IFSC"]
    }

    fn row(&self) -> Vec<String> {
        let bank = self.bank_details.clone().unwrap_or_default();
        vec![
            self.supplier_name.clone(),
            self.supplier_mobile.clone(),
            self.supplier_gst_no.clone(),
            self.supplier_address.clone(),
            bank.bank_name,
            bank.account_number,
            bank.ifsc_code,
        ]
    }
}

impl CsvRecord for Warehouse {
    fn headers() -> &'static [&'static str] {
        &["Name", "Location", "Capacity"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.warehouse_name.clone(),
            self.location.clone(),
            self.capacity.normalize().to_string(),
        ]
    }
}

impl CsvRecord for Transport {
    fn headers() -> &'static [&'static str] {
        &["Transporter", "Vehicle No", "Driver", "Driver Mobile", "Rental Cost"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.transporter_name.clone(),
            self.vehicle_number.clone(),
            self.driver_name.clone(),
            self.driver_mobile.clone(),
            money(self.rental_cost),
        ]
    }
}

impl CsvRecord for User {
    fn headers() -> &'static [&'static str] {
        &["Name", "Email", "Mobile", "Role"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.mobile.clone(),
            self.role.to_string(),
        ]
    }
}
