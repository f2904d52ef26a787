use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ApiResource, BankDetails};
use crate::validation::{validate_gst_number, validate_mobile, FormValidate};

/// Supplier master record, also embedded in inward entries as `supplierDetails`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Supplier {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Supplier name is required"))]
    pub supplier_name: String,

    #[validate(custom = "validate_mobile")]
    pub supplier_mobile: String,

    #[serde(rename = "supplierGSTNo", alias = "supplierGstNo")]
    #[validate(custom = "validate_gst_number")]
    pub supplier_gst_no: String,

    #[validate(length(min = 1, message = "Supplier address is required"))]
    pub supplier_address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub bank_details: Option<BankDetails>,
}

impl FormValidate for Supplier {}

impl ApiResource for Supplier {
    const PATH: &'static str = "/api/Suppliers";
    const NAME: &'static str = "supplier";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
