use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{amount, ApiResource};
use crate::validation::{validate_non_negative, FormValidate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Warehouse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Warehouse name is required"))]
    pub warehouse_name: String,
    #[validate(length(min = 1, message = "Warehouse location is required"))]
    pub location: String,
    #[serde(with = "amount")]
    #[validate(custom = "validate_non_negative")]
    pub capacity: Decimal,
}

impl FormValidate for Warehouse {}

impl ApiResource for Warehouse {
    const PATH: &'static str = "/api/warehouse";
    const NAME: &'static str = "warehouse";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
