use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{amount, ApiResource, LineItem, Supplier, Transport};
use crate::errors::ServiceError;
use crate::services::calculation::{document_total, TotalBasis};
use crate::validation::{FormErrors, FormValidate};

/// Goods received from a supplier into a warehouse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct InwardTransaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Invoice number is required"))]
    pub invoice_no: String,

    pub date: String,

    #[validate(length(min = 1, message = "Source is required"))]
    pub source: String,

    #[validate(length(min = 1, message = "Destination is required"))]
    pub destination: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub supplier_details: Option<Supplier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub transport_details: Option<Transport>,

    #[validate]
    pub product_details: Vec<LineItem>,

    /// GST-exclusive document amount: Σ base amounts + rental cost.
    #[serde(with = "amount")]
    pub amount: Decimal,
}

impl InwardTransaction {
    pub fn rental_cost(&self) -> Decimal {
        self.transport_details
            .as_ref()
            .map(|transport| transport.rental_cost)
            .unwrap_or(Decimal::ZERO)
    }

    /// Refreshes every line's derived amounts and the document `amount`.
    pub fn recalculate(&mut self) -> Result<Decimal, ServiceError> {
        for item in &mut self.product_details {
            item.recalculate()?;
        }
        self.amount = document_total(
            &self.product_details,
            TotalBasis::ExcludingGst,
            self.rental_cost(),
        )?;
        Ok(self.amount)
    }

    pub fn set_rental_cost(&mut self, rental_cost: Decimal) -> Result<Decimal, ServiceError> {
        self.transport_details
            .get_or_insert_with(Transport::default)
            .rental_cost = rental_cost;
        self.recalculate()
    }

    pub fn has_gst(&self) -> bool {
        self.product_details.iter().any(LineItem::has_gst)
    }
}

impl FormValidate for InwardTransaction {
    fn record_checks(&self, errors: &mut FormErrors) {
        if self.supplier_details.is_none() {
            errors.add("supplierDetails", "Select a supplier");
        }
        if self.product_details.is_empty() {
            errors.add("productDetails", "Add at least one product");
        }
    }
}

impl ApiResource for InwardTransaction {
    const PATH: &'static str = "/api/inward";
    const NAME: &'static str = "inward entry";
    const MASTER_DATA: bool = false;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
