use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::EnumString;
use validator::Validate;

use super::{amount, ApiResource, Customer, LineItem, Transport};
use crate::errors::ServiceError;
use crate::services::calculation::{document_total, TotalBasis};
use crate::validation::{validate_non_negative, FormErrors, FormValidate};

/// How an outward entry is paid. Values the backend knows beyond the common
/// ones are kept verbatim in `Other` so saving a fetched entry sends them back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PaymentType {
    #[default]
    Cash,
    Credit,
    #[strum(serialize = "UPI")]
    Upi,
    #[strum(serialize = "Bank Transfer", serialize = "BankTransfer")]
    BankTransfer,
    #[strum(default)]
    Other(String),
}

impl PaymentType {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentType::Cash => "Cash",
            PaymentType::Credit => "Credit",
            PaymentType::Upi => "UPI",
            PaymentType::BankTransfer => "Bank Transfer",
            PaymentType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PaymentType::from_str(&raw).unwrap_or(PaymentType::Other(raw)))
    }
}

/// Goods dispatched from a warehouse to a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct OutwardTransaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Invoice number is required"))]
    pub invoice_no: String,

    pub date: String,

    /// Dispatching warehouse.
    pub source: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub customer_details: Option<Customer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub transport_details: Option<Transport>,

    #[validate]
    pub product_details: Vec<LineItem>,

    /// GST-inclusive document total: Σ line totals + rental cost.
    #[serde(with = "amount")]
    pub total: Decimal,

    pub payment_type: PaymentType,

    #[serde(with = "amount")]
    #[validate(custom = "validate_non_negative")]
    pub outstanding_payment: Decimal,
}

impl OutwardTransaction {
    pub fn rental_cost(&self) -> Decimal {
        self.transport_details
            .as_ref()
            .map(|transport| transport.rental_cost)
            .unwrap_or(Decimal::ZERO)
    }

    /// Refreshes every line's derived amounts and the document `total`.
    pub fn recalculate(&mut self) -> Result<Decimal, ServiceError> {
        for item in &mut self.product_details {
            item.recalculate()?;
        }
        self.total = document_total(
            &self.product_details,
            TotalBasis::IncludingGst,
            self.rental_cost(),
        )?;
        Ok(self.total)
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

impl FormValidate for OutwardTransaction {
    fn record_checks(&self, errors: &mut FormErrors) {
        if self.customer_details.is_none() {
            errors.add("customerDetails", "Select a customer");
        }
        if self.product_details.is_empty() {
            errors.add("productDetails", "Add at least one product");
        }
        if self.outstanding_payment > self.total {
            errors.add(
                "outstandingPayment",
                "Outstanding payment cannot exceed the invoice total",
            );
        }
    }
}

impl ApiResource for OutwardTransaction {
    const PATH: &'static str = "/api/outward";
    const NAME: &'static str = "outward entry";
    const MASTER_DATA: bool = false;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductRef;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, rate: Decimal, gst: Decimal) -> LineItem {
        LineItem {
            product_id: ProductRef::Id("p1".into()),
            quantity,
            product_rate: rate,
            gst_percentage: gst,
            ..Default::default()
        }
    }

    #[test]
    fn total_includes_gst_and_rental() {
        let mut outward = OutwardTransaction {
            product_details: vec![
                item(dec!(10), dec!(100), dec!(18)),
                item(dec!(4), dec!(25), dec!(0)),
            ],
            ..Default::default()
        };
        assert_eq!(outward.recalculate().unwrap(), dec!(1280.00));
        assert_eq!(outward.set_rental_cost(dec!(120)).unwrap(), dec!(1400.00));
    }

    #[test]
    fn payment_type_accepts_backend_spellings() {
        let parsed: Vec<PaymentType> = serde_json::from_str(
            r#"["Cash","credit","UPI","Bank Transfer","bankTransfer","Cheque"]"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            vec![
                PaymentType::Cash,
                PaymentType::Credit,
                PaymentType::Upi,
                PaymentType::BankTransfer,
                PaymentType::BankTransfer,
                PaymentType::Other("Cheque".into())
            ]
        );
        assert_eq!(PaymentType::BankTransfer.to_string(), "Bank Transfer");
        assert_eq!(PaymentType::from_str("upi").unwrap(), PaymentType::Upi);
    }

    #[test]
    fn unknown_payment_type_survives_a_save() {
        let outward: OutwardTransaction =
            serde_json::from_str(r#"{"invoiceNo": "OUT-9", "paymentType": "Cheque"}"#).unwrap();
        assert_eq!(outward.payment_type, PaymentType::Other("Cheque".into()));
        assert_eq!(outward.payment_type.to_string(), "Cheque");

        let resent = serde_json::to_value(&outward).unwrap();
        assert_eq!(resent["paymentType"], "Cheque");

        let known = serde_json::to_value(OutwardTransaction {
            payment_type: PaymentType::Upi,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(known["paymentType"], "UPI");
    }

    #[test]
    fn outstanding_cannot_exceed_total() {
        let mut outward = OutwardTransaction {
            invoice_no: "OUT-7".into(),
            customer_details: Some(Customer {
                customer_name: "Sai Sweets".into(),
                customer_mobile: "9123456780".into(),
                customer_address: "Nashik".into(),
                ..Default::default()
            }),
            product_details: vec![item(dec!(1), dec!(100), dec!(0))],
            outstanding_payment: dec!(150),
            ..Default::default()
        };
        outward.recalculate().unwrap();
        let errors = outward.check().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("outstandingPayment"));

        outward.outstanding_payment = dec!(40);
        assert!(outward.check().is_ok());
    }
}
