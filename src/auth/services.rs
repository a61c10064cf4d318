use super::dto::RegisterRequest;
use super::repo_types::UserRole;
use crate::{
    config::AdminConfig,
    error::FieldErrors,
    validation::{char_len, is_valid_email, push},
};

/// Normalizes the request in place and returns field errors, if any.
pub fn validate_registration(req: &mut RegisterRequest) -> Result<(), FieldErrors> {
    req.name = req.name.trim().to_string();
    req.email = req.email.trim().to_lowercase();

    let mut errors = FieldErrors::new();
    if char_len(&req.name) < 2 {
        push(&mut errors, "name", "Name must be at least 2 characters.");
    }
    if !is_valid_email(&req.email) {
        push(&mut errors, "email", "Invalid email address.");
    }
    if char_len(&req.password) < 6 {
        push(&mut errors, "password", "Password must be at least 6 characters.");
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Role is fixed at registration by matching the configured admin email.
pub fn role_for_email(admin: &AdminConfig, email: &str) -> UserRole {
    if admin.is_admin_email(email) {
        UserRole::Admin
    } else {
        UserRole::Customer
    }
}
