//! Records exchanged with the dairy backend.
//!
//! Every record is a plain serde struct using the backend's camelCase field
//! names. Numeric fields go through [`amount`] so that numbers, numeric
//! strings and junk all deserialize (junk becomes zero).

use chrono::{DateTime, NaiveDate};
use serde::{de::DeserializeOwned, Serialize};

pub mod bank;
pub mod category;
pub mod company;
pub mod customer;
pub mod inward;
pub mod line_item;
pub mod outward;
pub mod product;
pub mod supplier;
pub mod transport;
pub mod user;
pub mod warehouse;

pub use bank::BankDetails;
pub use category::Category;
pub use company::CompanyDetails;
pub use customer::Customer;
pub use inward::InwardTransaction;
pub use line_item::{LineItem, ProductRef};
pub use outward::{OutwardTransaction, PaymentType};
pub use product::{CategoryRef, Product, ProductConfiguration};
pub use supplier::Supplier;
pub use transport::Transport;
pub use user::{User, UserRole};
pub use warehouse::Warehouse;

/// A record type served by one backend collection route.
pub trait ApiResource: Serialize + DeserializeOwned + Send + Sync {
    /// Collection route, e.g. `/api/inward`.
    const PATH: &'static str;
    /// Human readable name used in logs and error messages.
    const NAME: &'static str;
    /// Reference data only admins and managers may create or edit.
    const MASTER_DATA: bool = true;

    fn id(&self) -> Option<&str>;
}

/// Lenient (de)serialization for money and quantity fields.
///
/// Accepts JSON numbers, numeric strings, `null` and missing values.
/// Anything that does not parse becomes zero. Values are written back as
/// decimal strings.
pub mod amount {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::services::calculation::parse_amount;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::Number(number)) => parse_amount(&number.to_string()),
            Some(Value::String(text)) => parse_amount(&text),
            _ => Decimal::ZERO,
        })
    }
}

/// Formats a backend date (RFC 3339 timestamp or `YYYY-MM-DD`) as
/// `DD-MM-YYYY`. Unparseable input is returned unchanged, empty input as `N/A`.
pub fn display_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "N/A".to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.format("%d-%m-%Y").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return parsed.format("%d-%m-%Y").to_string();
    }
    trimmed.to_string()
}
