use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use validator::{Validate, ValidationError};

use super::{amount, Product};
use crate::errors::ServiceError;
use crate::services::calculation::LineAmounts;
use crate::validation::{validate_gst_percentage, validate_positive};

/// The product a line refers to: a bare id on write, possibly the populated
/// product record on read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(String),
    Record(Box<Product>),
}

impl Default for ProductRef {
    fn default() -> Self {
        ProductRef::Id(String::new())
    }
}

impl ProductRef {
    pub fn id(&self) -> &str {
        match self {
            ProductRef::Id(id) => id,
            ProductRef::Record(product) => product.id.as_deref().unwrap_or(""),
        }
    }

    pub fn product(&self) -> Option<&Product> {
        match self {
            ProductRef::Id(_) => None,
            ProductRef::Record(product) => Some(product),
        }
    }
}

impl Serialize for ProductRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

fn validate_product_ref(product: &ProductRef) -> Result<(), ValidationError> {
    if product.id().trim().is_empty() {
        let mut err = ValidationError::new("product_id");
        err.message = Some("Select a product".into());
        return Err(err);
    }
    Ok(())
}

/// One `productDetails[i]` entry of an inward or outward transaction.
///
/// `gst_amount` and `total_amount` are derived; call [`LineItem::recalculate`]
/// after editing quantity, rate or GST.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    #[validate(custom = "validate_product_ref")]
    pub product_id: ProductRef,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_code: String,

    #[serde(with = "amount")]
    #[validate(custom = "validate_positive")]
    pub quantity: Decimal,

    #[serde(with = "amount", alias = "productPrice")]
    #[validate(custom = "validate_positive")]
    pub product_rate: Decimal,

    #[serde(with = "amount")]
    #[validate(custom = "validate_gst_percentage")]
    pub gst_percentage: Decimal,

    #[serde(with = "amount")]
    pub gst_amount: Decimal,

    #[serde(with = "amount")]
    pub total_amount: Decimal,
}

impl LineItem {
    pub fn new(product: &Product, quantity: Decimal) -> Result<Self, ServiceError> {
        let mut item = Self {
            quantity,
            ..Default::default()
        };
        item.select_product(product)?;
        Ok(item)
    }

    /// Amounts computed from quantity, rate and GST; stored fields are ignored.
    pub fn amounts(&self) -> Result<LineAmounts, ServiceError> {
        LineAmounts::compute(self.quantity, self.product_rate, self.gst_percentage)
    }

    pub fn base_amount(&self) -> Result<Decimal, ServiceError> {
        Ok(self.amounts()?.base_amount)
    }

    pub fn has_gst(&self) -> bool {
        !self.gst_percentage.is_zero()
    }

    /// Refreshes the derived `gst_amount` and `total_amount` fields. They are
    /// left untouched when the amounts cannot be computed.
    pub fn recalculate(&mut self) -> Result<LineAmounts, ServiceError> {
        let amounts = self.amounts()?;
        self.gst_amount = amounts.gst_amount;
        self.total_amount = amounts.total_amount;
        Ok(amounts)
    }

    /// Copies id, name, code, price and GST from a product picked in the lookup list.
    pub fn select_product(&mut self, product: &Product) -> Result<LineAmounts, ServiceError> {
        self.product_id = ProductRef::Id(product.id.clone().unwrap_or_default());
        self.product_name = product.product_name.clone();
        self.product_code = product.product_code.clone();
        self.product_rate = product.product_price;
        self.gst_percentage = product.gst_percentage;
        self.recalculate()
    }

    /// Name for display: the explicit name, else the populated product's, else `N/A`.
    pub fn display_name(&self) -> &str {
        if !self.product_name.trim().is_empty() {
            return &self.product_name;
        }
        self.product_id
            .product()
            .map(|product| product.product_name.as_str())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("N/A")
    }

    pub fn display_code(&self) -> &str {
        if !self.product_code.trim().is_empty() {
            return &self.product_code;
        }
        self.product_id
            .product()
            .map(|product| product.product_code.as_str())
            .filter(|code| !code.trim().is_empty())
            .unwrap_or("N/A")
    }
}
