use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ApiResource;
use crate::validation::FormValidate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Category name is required"))]
    pub category_name: String,
    pub description: String,
}

impl FormValidate for Category {}

impl ApiResource for Category {
    const PATH: &'static str = "/api/category";
    const NAME: &'static str = "category";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
