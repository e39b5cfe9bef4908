//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate`. Validation runs
//! before any service is called, so services can assume well-formed input.

use identity_core::{LoginIdentifier, Snowflake};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Names are login identifiers: no whitespace, and nothing that login
/// would route to the email lookup instead
fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().any(char::is_whitespace) {
        let mut err = ValidationError::new("no_whitespace");
        err.message = Some("Name may not contain spaces".into());
        return Err(err);
    }
    if LoginIdentifier::classify(name).is_email() {
        let mut err = ValidationError::new("not_email");
        err.message = Some("Name may not be an email address".into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Auth Requests
// ============================================================================

/// Account registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 5, max = 32, message = "Name must be 5-32 characters"),
        custom(function = "validate_name")
    )]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 32, message = "Password must be 8-32 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 255, message = "Device must be 1-255 characters"))]
    pub device: String,
}

/// Login by name or email
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255, message = "Login is required"))]
    pub login: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, max = 255, message = "Device must be 1-255 characters"))]
    pub device: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 32, message = "Password must be 8-32 characters"))]
    pub password: String,
}

// ============================================================================
// Self-service Requests
// ============================================================================

/// Only the email is editable through the profile endpoint
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewsletterRequest {
    pub subscribe: bool,
}

// ============================================================================
// Admin Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminCreateUserRequest {
    #[validate(
        length(min = 5, max = 32, message = "Name must be 5-32 characters"),
        custom(function = "validate_name")
    )]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 32, message = "Password must be 8-32 characters"))]
    pub password: String,

    /// Role ids to assign after creation
    #[serde(default)]
    pub roles: Option<Vec<Snowflake>>,
}

/// Partial update; `roles`, when present, replaces the whole role set
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(
        length(min = 5, max = 32, message = "Name must be 5-32 characters"),
        custom(function = "validate_name")
    )]
    pub name: Option<String>,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 32, message = "Password must be 8-32 characters"))]
    pub password: Option<String>,

    pub roles: Option<Vec<Snowflake>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            device: "phone".to_string(),
        }
    }

    #[test]
    fn test_register_accepts_valid_input() {
        assert!(register("username", "user@example.com", "password").validate().is_ok());
    }

    #[test]
    fn test_register_rejects_name_with_space() {
        let errors = register("invalid name", "user@example.com", "password")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_name_shaped_like_email_is_rejected() {
        let errors = register("bob@x.com", "bob.real@y.com", "password")
            .validate()
            .unwrap_err();
        let name = &errors.field_errors()["name"];
        assert_eq!(name[0].code, "not_email");

        let req = AdminUpdateUserRequest {
            name: Some("bob@x.com".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_rejects_short_fields() {
        let errors = register("abc", "not-an-email", "short").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_admin_update_allows_empty_body() {
        assert!(AdminUpdateUserRequest::default().validate().is_ok());

        let req = AdminUpdateUserRequest {
            name: Some("has space".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_roles_accept_string_and_numeric_ids() {
        let req: AdminCreateUserRequest = serde_json::from_str(
            r#"{"name":"username","email":"u@x.com","password":"password","roles":["1",2]}"#,
        )
        .unwrap();
        assert_eq!(req.roles, Some(vec![Snowflake::new(1), Snowflake::new(2)]));
    }
}
