use std::{collections::BTreeMap, fmt};

/// Form validation errors reported before a request is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Required,
    InvalidFormat(String),
    Other(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required => write!(f, "This field is required"),
            ValidationError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            ValidationError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Field name -> error, ordered by field name so messages are stable.
pub type FieldErrors = BTreeMap<String, ValidationError>;

/// Record `Required` for `field` when `value` is blank.
pub(crate) fn require(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), ValidationError::Required);
    }
}

/// Render a human-readable string from a map of validation errors.
pub fn format_errors(errors: &FieldErrors) -> String {
    errors.iter().map(|(k, v)| format!("{}: {}", k, v)).collect::<Vec<_>>().join(", ")
}
