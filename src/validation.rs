//! Client-side form rules.
//!
//! Field-level rules are expressed with `validator` derives on the models;
//! the custom functions live here. [`FormErrors`] flattens the nested
//! `ValidationErrors` tree into `path -> message` entries so a caller can
//! block submission and surface the first violated rule. Paths use the
//! backend's field names, e.g. `productDetails[0].quantity`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::ServiceError;

static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static GSTIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").unwrap()
});
static IFSC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").unwrap());

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile.trim())
}

pub fn is_valid_gst_number(gst: &str) -> bool {
    GSTIN_RE.is_match(&gst.trim().to_ascii_uppercase())
}

pub fn is_valid_ifsc(ifsc: &str) -> bool {
    IFSC_RE.is_match(&ifsc.trim().to_ascii_uppercase())
}

pub fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    if is_valid_mobile(mobile) {
        Ok(())
    } else {
        Err(rule("mobile", "Mobile number must be 10 digits"))
    }
}

/// Same as [`validate_mobile`] but an empty value passes.
pub fn validate_optional_mobile(mobile: &str) -> Result<(), ValidationError> {
    if mobile.trim().is_empty() {
        return Ok(());
    }
    validate_mobile(mobile)
}

/// GSTIN is optional for unregistered parties; when present it must be well formed.
pub fn validate_gst_number(gst: &str) -> Result<(), ValidationError> {
    if gst.trim().is_empty() || is_valid_gst_number(gst) {
        Ok(())
    } else {
        Err(rule("gst_number", "GST number must be a valid 15 character GSTIN"))
    }
}

pub fn validate_ifsc(ifsc: &str) -> Result<(), ValidationError> {
    if ifsc.trim().is_empty() || is_valid_ifsc(ifsc) {
        Ok(())
    } else {
        Err(rule("ifsc", "IFSC code must look like ABCD0123456"))
    }
}

pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(rule("positive", "Value must be greater than 0"))
    }
}

pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(rule("non_negative", "Value cannot be negative"))
    } else {
        Ok(())
    }
}

pub fn validate_gst_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        Err(rule("gst_percentage", "GST percentage must be between 0 and 100"))
    } else {
        Ok(())
    }
}

/// Fields whose backend name is not the plain camelCase of the Rust name.
const WIRE_NAMES: &[(&str, &str)] = &[
    ("customer_gst_no", "customerGSTNo"),
    ("supplier_gst_no", "supplierGSTNo"),
];

/// Backend spelling of a Rust field name: `product_details` -> `productDetails`.
pub fn wire_name(field: &str) -> String {
    if let Some((_, wire)) = WIRE_NAMES.iter().find(|(rust, _)| *rust == field) {
        return wire.to_string();
    }

    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' && !name.is_empty() {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered collection of violated rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    entries: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Appends every error in `errors`, prefixing nested paths with `prefix`.
    /// Keys are renamed with [`wire_name`] and visited in sorted order.
    pub fn extend_from(&mut self, prefix: &str, errors: &ValidationErrors) {
        let mut keys: Vec<_> = errors.errors().keys().copied().collect();
        keys.sort_unstable();

        for key in keys {
            let name = wire_name(key);
            let path = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}.{name}")
            };
            match &errors.errors()[key] {
                ValidationErrorsKind::Field(field_errors) => {
                    for err in field_errors {
                        let message = err
                            .message
                            .as_ref()
                            .map(|msg| msg.to_string())
                            .unwrap_or_else(|| format!("{path} is invalid"));
                        self.add(path.clone(), message);
                    }
                }
                ValidationErrorsKind::Struct(inner) => self.extend_from(&path, inner),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.extend_from(&format!("{path}[{index}]"), inner);
                    }
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.entries.first()
    }

    /// First message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(first) => write!(f, "{}", first.message),
            None => write!(f, "no validation errors"),
        }
    }
}

impl std::error::Error for FormErrors {}

impl From<FormErrors> for ServiceError {
    fn from(errors: FormErrors) -> Self {
        ServiceError::ValidationError(errors.to_string())
    }
}

/// Submission check: derived field rules plus record-level rules that
/// `validator` cannot express (e.g. a required nested record).
pub trait FormValidate: Validate {
    fn record_checks(&self, _errors: &mut FormErrors) {}

    fn check(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        self.record_checks(&mut errors);
        if let Err(field_errors) = self.validate() {
            errors.extend_from("", &field_errors);
        }
        errors.into_result()
    }
}
