use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

use super::ApiResource;
use crate::validation::{validate_mobile, FormValidate};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Staff,
    #[serde(other)]
    Other,
}

impl UserRole {
    /// Whether the role may create or edit master data.
    pub fn can_manage_masters(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom = "validate_mobile")]
    pub mobile: String,
    pub role: UserRole,
}

impl FormValidate for User {}

impl ApiResource for User {
    const PATH: &'static str = "/api/user";
    const NAME: &'static str = "user";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
