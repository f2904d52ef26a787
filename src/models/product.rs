use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

use super::{amount, ApiResource, Category};
use crate::validation::{validate_gst_percentage, validate_non_negative, FormValidate};

/// Packing configuration of a product, e.g. 20 bags of 500 ml pouches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductConfiguration {
    #[serde(with = "amount")]
    pub number_of_bags: Decimal,
    #[serde(with = "amount")]
    pub sku_quantity: Decimal,
    #[serde(with = "amount")]
    pub number_of_pieces: Decimal,
}

/// A product's category, either as sent on write (id or name) or populated
/// by the backend on read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Record(Category),
}

impl Default for CategoryRef {
    fn default() -> Self {
        CategoryRef::Name(String::new())
    }
}

impl CategoryRef {
    pub fn label(&self) -> &str {
        match self {
            CategoryRef::Name(name) => name,
            CategoryRef::Record(category) => &category.category_name,
        }
    }
}

impl Serialize for CategoryRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryRef::Name(name) => serializer.serialize_str(name),
            CategoryRef::Record(category) => serializer
                .serialize_str(category.id.as_deref().unwrap_or(&category.category_name)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Product code is required"))]
    pub product_code: String,

    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,

    #[serde(with = "amount")]
    #[validate(custom = "validate_non_negative")]
    pub product_price: Decimal,

    #[serde(with = "amount")]
    #[validate(custom = "validate_non_negative")]
    pub quantity: Decimal,

    pub category: CategoryRef,

    #[serde(with = "amount")]
    #[validate(custom = "validate_gst_percentage")]
    pub gst_percentage: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ProductConfiguration>,
}

impl FormValidate for Product {}

impl ApiResource for Product {
    const PATH: &'static str = "/api/product";
    const NAME: &'static str = "product";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
