use std::collections::BTreeMap;

use common::error::{AppError, Res};
use common::misc::is_valid_email;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Checks login input before anything is sent.
pub fn validate_login(email: &str, password: &str) -> Res<()> {
    let mut fields = BTreeMap::new();
    check_email(email, &mut fields);
    if password.is_empty() {
        fields.insert("password".to_string(), "Password is required".to_string());
    }
    finish(fields)
}

/// Checks registration input, including the password confirmation.
pub fn validate_register(name: &str, email: &str, password: &str, confirm: &str) -> Res<()> {
    let mut fields = BTreeMap::new();
    if name.trim().is_empty() {
        fields.insert("name".to_string(), "Name is required".to_string());
    }
    check_email(email, &mut fields);
    if password.is_empty() {
        fields.insert("password".to_string(), "Password is required".to_string());
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        fields.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
    if confirm.is_empty() {
        fields.insert(
            "confirmPassword".to_string(),
            "Confirm password is required".to_string(),
        );
    } else if confirm != password {
        fields.insert("confirmPassword".to_string(), "Passwords must match".to_string());
    }
    finish(fields)
}

/// Checks profile edits.
pub fn validate_profile(name: &str, email: &str) -> Res<()> {
    let mut fields = BTreeMap::new();
    if name.trim().is_empty() {
        fields.insert("name".to_string(), "Name is required".to_string());
    }
    check_email(email, &mut fields);
    finish(fields)
}

fn check_email(email: &str, fields: &mut BTreeMap<String, String>) {
    if email.trim().is_empty() {
        fields.insert("email".to_string(), "Email is required".to_string());
    } else if !is_valid_email(email) {
        fields.insert("email".to_string(), "Invalid email address".to_string());
    }
}

fn finish(fields: BTreeMap<String, String>) -> Res<()> {
    if fields.is_empty() {
        return Ok(());
    }
    let message = fields.values().next().cloned().unwrap_or_default();
    Err(AppError::Validation { message, fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(res: Res<()>) -> BTreeMap<String, String> {
        match res {
            Err(AppError::Validation { fields, .. }) => fields,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn register_requires_matching_confirmation() {
        let f = fields(validate_register("Jane", "jane@example.com", "password1", "password2"));
        assert_eq!(f["confirmPassword"], "Passwords must match");
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn register_enforces_minimum_length() {
        let f = fields(validate_register("Jane", "jane@example.com", "short", "short"));
        assert_eq!(f["password"], "Password must be at least 8 characters");
    }

    #[test]
    fn register_collects_every_field() {
        let f = fields(validate_register(" ", "nope", "", ""));
        assert!(f.contains_key("name"));
        assert!(f.contains_key("email"));
        assert!(f.contains_key("password"));
        assert!(f.contains_key("confirmPassword"));
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_register("Jane", "jane@example.com", "password1", "password1").is_ok());
        assert!(validate_login("jane@example.com", "x").is_ok());
        assert!(validate_profile("Jane", "jane@example.com").is_ok());
    }

    #[test]
    fn login_requires_password() {
        let f = fields(validate_login("jane@example.com", ""));
        assert_eq!(f["password"], "Password is required");
    }
}
