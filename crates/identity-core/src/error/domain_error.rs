//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found")]
    UserNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown role: {0}")]
    UnknownRole(Snowflake),

    // =========================================================================
    // Credential Errors
    // =========================================================================
    #[error("Wrong credentials")]
    InvalidCredentials,

    #[error("Password could not be reset")]
    InvalidResetToken,

    #[error("Reset link could not be sent")]
    ResetLinkUnavailable,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unauthorized")]
    NotSuperAdmin,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("The name has already been taken")]
    NameAlreadyExists,

    #[error("The email has already been taken")]
    EmailAlreadyExists,

    #[error("Role slug already exists")]
    RoleSlugExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::UnknownRole(_) => "INVALID_ROLE",

            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::ResetLinkUnavailable => "RESET_LINK_UNAVAILABLE",

            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotSuperAdmin => "UNAUTHORIZED",

            Self::NameAlreadyExists => "NAME_ALREADY_EXISTS",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::RoleSlugExists => "ROLE_SLUG_EXISTS",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::UnknownRole(_))
    }

    /// Check if this is a login or reset failure
    pub fn is_credentials(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::InvalidResetToken | Self::ResetLinkUnavailable
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::NotSuperAdmin)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::NameAlreadyExists | Self::EmailAlreadyExists | Self::RoleSlugExists
        )
    }
}
