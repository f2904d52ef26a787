use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{amount, ApiResource};
use crate::validation::{validate_non_negative, validate_optional_mobile, FormValidate};

/// Transport master record, also embedded in transactions as `transportDetails`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Transport {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub transporter_name: String,
    pub vehicle_number: String,
    pub driver_name: String,
    #[validate(custom = "validate_optional_mobile")]
    pub driver_mobile: String,
    #[serde(with = "amount")]
    #[validate(custom = "validate_non_negative")]
    pub rental_cost: Decimal,
}

impl FormValidate for Transport {}

impl ApiResource for Transport {
    const PATH: &'static str = "/api/transport";
    const NAME: &'static str = "transport";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
