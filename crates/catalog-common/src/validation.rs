use serde::Serialize;

use crate::models::auth::UserCredential;
use crate::models::page::PageParams;

pub const MAX_NAME_LEN: usize = 80;
pub const MAX_DESCRIPTION_LEN: usize = 300;
pub const MAX_IMAGE_URL_LEN: usize = 300;
pub const MIN_PASSWORD_LEN: usize = 8;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn require(errors: &mut Vec<FieldError>, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, format!("{field} is required")));
    } else if value.chars().count() > max_len {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {max_len} characters"),
        ));
    }
}

/// Validate a category payload (name and image url, both required).
pub fn validate_category(name: &str, image_url: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    require(&mut errors, "name", name, MAX_NAME_LEN);
    require(&mut errors, "image_url", image_url, MAX_IMAGE_URL_LEN);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a product payload. Price is not structurally constrained
/// here; non-negativity is a domain expectation, not an input rule.
pub fn validate_product(name: &str, description: &str, image_url: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    require(&mut errors, "name", name, MAX_NAME_LEN);
    require(&mut errors, "description", description, MAX_DESCRIPTION_LEN);
    require(&mut errors, "image_url", image_url, MAX_IMAGE_URL_LEN);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate registration/login input before it reaches the identity
/// store: a plausible email and a password meeting the minimum policy.
pub fn validate_credential(credential: &UserCredential) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    let email = credential.email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("email", "email is required"));
    } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        errors.push(FieldError::new("email", "email is not a valid address"));
    }
    if credential.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Page parameters below 1 are a caller contract violation.
pub fn validate_page_params(params: &PageParams) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if params.page_number < 1 {
        errors.push(FieldError::new("page_number", "page_number must be at least 1"));
    }
    if params.page_size < 1 {
        errors.push(FieldError::new("page_size", "page_size must be at least 1"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ok() {
        assert!(validate_category("Drinks", "https://img.example/1.jpg").is_ok());
    }

    #[test]
    fn test_category_missing_fields() {
        let errors = validate_category("", " ").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[1].field, "image_url");
    }

    #[test]
    fn test_category_name_too_long() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        let errors = validate_category(&name, "img.jpg").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn test_product_description_too_long() {
        let desc = "d".repeat(MAX_DESCRIPTION_LEN + 1);
        let errors = validate_product("Soda", &desc, "img.jpg").unwrap_err();
        assert_eq!(errors[0].field, "description");
    }

    #[test]
    fn test_credential_bad_email() {
        let cred = UserCredential {
            email: "not-an-email".to_string(),
            password: "long-enough-pw".to_string(),
        };
        let errors = validate_credential(&cred).unwrap_err();
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_credential_short_password() {
        let cred = UserCredential {
            email: "user@example.com".to_string(),
            password: "short".to_string(),
        };
        let errors = validate_credential(&cred).unwrap_err();
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn test_page_params_rejects_zero() {
        let errors = validate_page_params(&PageParams {
            page_number: 0,
            page_size: 0,
        })
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_page_params_defaults_are_valid() {
        assert!(validate_page_params(&PageParams::default()).is_ok());
    }
}
