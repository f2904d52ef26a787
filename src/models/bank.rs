use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_ifsc;

/// Bank account printed on invoices and kept on party records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    pub account_holder_name: String,
    pub account_number: String,
    pub bank_name: String,
    #[serde(alias = "IFSCCode", alias = "ifsc")]
    #[validate(custom = "validate_ifsc")]
    pub ifsc_code: String,
    pub branch: String,
}

impl BankDetails {
    pub fn is_empty(&self) -> bool {
        self.account_number.trim().is_empty() && self.bank_name.trim().is_empty()
    }
}
