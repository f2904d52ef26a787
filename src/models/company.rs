use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ApiResource, BankDetails};
use crate::validation::{validate_gst_number, validate_optional_mobile, FormValidate};

/// Seller block printed at the top of every invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyDetails {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,

    #[serde(alias = "companyAddress")]
    pub address: String,

    #[serde(alias = "gstNo", alias = "GSTNo", alias = "companyGSTNo")]
    #[validate(custom = "validate_gst_number")]
    pub gst_number: String,

    #[serde(alias = "phone", alias = "companyMobile")]
    #[validate(custom = "validate_optional_mobile")]
    pub mobile: String,

    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub bank_details: Option<BankDetails>,
}

impl FormValidate for CompanyDetails {}

impl ApiResource for CompanyDetails {
    const PATH: &'static str = "/api/Company-Details";
    const NAME: &'static str = "company details";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
