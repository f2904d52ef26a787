use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ApiResource, BankDetails};
use crate::validation::{validate_gst_number, validate_mobile, FormValidate};

/// Customer master record, also embedded in outward entries as `customerDetails`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,

    #[validate(custom = "validate_mobile")]
    pub customer_mobile: String,

    #[serde(rename = "customerGSTNo", alias = "customerGstNo")]
    #[validate(custom = "validate_gst_number")]
    pub customer_gst_no: String,

    #[validate(length(min = 1, message = "Customer address is required"))]
    pub customer_address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub bank_details: Option<BankDetails>,
}

impl FormValidate for Customer {}

impl ApiResource for Customer {
    const PATH: &'static str = "/api/customer";
    const NAME: &'static str = "customer";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
