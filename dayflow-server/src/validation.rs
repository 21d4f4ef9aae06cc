//! Request body validation built on the `validator` derive.
//!
//! Collected errors are flattened into a field -> messages map so the
//! response envelope can report them under `fieldErrors`.

use once_cell::sync::Lazy;
use regex::Regex;
use shared::error::AppError;
use std::collections::HashMap;
use validator::{Validate, ValidationError};

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-()]+$").unwrap());

/// Validate a request body; on failure return a validation `AppError`
/// carrying the per-field messages.
pub fn validate<T: Validate>(body: &T) -> Result<(), AppError> {
    let errors = match body.validate() {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value for {field}"))
            })
            .collect();
        field_errors.insert(field.to_string(), messages);
    }

    Err(AppError::validation("Validation failed").with_field_errors(field_errors))
}

/// Password must be at least 6 characters with upper, lower, digit and
/// special character.
pub fn password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.len() >= 6;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if long_enough && has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(
            "Password must be at least 6 characters and include uppercase, lowercase, number and special character".into(),
        ))
    }
}

/// Employee IDs are numeric, at most 7 digits.
pub fn employee_id_format(employee_id: &str) -> Result<(), ValidationError> {
    let ok = !employee_id.is_empty()
        && employee_id.len() <= 7
        && employee_id.chars().all(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("employee_id_format")
            .with_message("Employee ID must be numeric and at most 7 digits".into()))
    }
}

/// Loose phone format: optional leading +, digits with separators, at
/// least 10 characters.
pub fn phone_format(phone: &str) -> Result<(), ValidationError> {
    if phone.len() >= 10 && PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_format")
            .with_message("Phone number must be at least 10 digits".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_password_strength() {
        assert!(password_strength("Abc1!x").is_ok());
        assert!(password_strength("abc1!x").is_err()); // no uppercase
        assert!(password_strength("ABC1!X").is_err()); // no lowercase
        assert!(password_strength("Abcd!x").is_err()); // no digit
        assert!(password_strength("Abc12x").is_err()); // no special
        assert!(password_strength("Ab1!").is_err()); // too short
    }

    #[test]
    fn test_employee_id_format() {
        assert!(employee_id_format("1234567").is_ok());
        assert!(employee_id_format("1").is_ok());
        assert!(employee_id_format("12345678").is_err()); // too long
        assert!(employee_id_format("12a4").is_err()); // non-digit
        assert!(employee_id_format("").is_err());
    }

    #[test]
    fn test_phone_format() {
        assert!(phone_format("+1 555-123-4567").is_ok());
        assert!(phone_format("0123456789").is_ok());
        assert!(phone_format("12345").is_err()); // too short
        assert!(phone_format("notaphone!").is_err());
    }

    #[derive(Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email(message = "Invalid email address"))]
        email: String,
    }

    #[test]
    fn test_validate_flattens_field_errors() {
        let bad = Sample {
            name: String::new(),
            email: "nope".into(),
        };
        let err = validate(&bad).unwrap_err();
        let fields = err.field_errors.unwrap();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert_eq!(fields["name"][0], "Name is required");
    }
}
